//! Google Maps adapter: geocode the postal code, then run a nearby search
//! for pharmacies carrying vaccines, truncated to the highest-relevance
//! results.

use super::{LocationError, LocationGateway, PostalCode, Site, MAX_SITES};
use async_trait::async_trait;
use serde::Deserialize;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const NEARBY_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

pub struct GooglePlacesGateway {
    client: reqwest::Client,
    api_key: String,
    radius_m: u32,
}

impl GooglePlacesGateway {
    pub fn new(api_key: impl Into<String>, radius_m: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            radius_m,
        }
    }

    async fn geocode(&self, postal: &PostalCode) -> Result<LatLng, LocationError> {
        let response: GeocodeResponse = self
            .client
            .get(GEOCODE_URL)
            .query(&[("address", postal.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await?
            .json()
            .await?;

        if response.status != "OK" {
            return Err(LocationError::Ungeocodable(postal.to_string()));
        }

        response
            .results
            .into_iter()
            .next()
            .map(|result| result.geometry.location)
            .ok_or_else(|| LocationError::Ungeocodable(postal.to_string()))
    }
}

impl std::fmt::Debug for GooglePlacesGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GooglePlacesGateway")
            .field("radius_m", &self.radius_m)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LocationGateway for GooglePlacesGateway {
    async fn nearby_sites(&self, postal: &PostalCode) -> Result<Vec<Site>, LocationError> {
        let center = self.geocode(postal).await?;

        let response: PlacesResponse = self
            .client
            .get(NEARBY_URL)
            .query(&[
                ("location", format!("{},{}", center.lat, center.lng)),
                ("radius", self.radius_m.to_string()),
                ("type", "pharmacy".to_string()),
                ("keyword", "vaccine".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?
            .json()
            .await?;

        match response.status.as_str() {
            "OK" | "ZERO_RESULTS" => {}
            other => return Err(LocationError::Upstream(other.to_string())),
        }

        Ok(response
            .results
            .into_iter()
            .take(MAX_SITES)
            .map(|place| Site {
                id: place.place_id,
                name: place.name,
                address: place
                    .vicinity
                    .or(place.formatted_address)
                    .unwrap_or_default(),
                latitude: place.geometry.location.lat,
                longitude: place.geometry.location.lng,
                rating: place.rating,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    #[serde(default)]
    vicinity: Option<String>,
    #[serde(default)]
    formatted_address: Option<String>,
    geometry: Geometry,
    #[serde(default)]
    rating: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}
