//! Nearby-provider lookup: the gateway contract consumed by the intake
//! workflow's final stage, and the Google Maps adapter implementing it.

mod google;

pub use google::GooglePlacesGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of sites a gateway may return.
pub const MAX_SITES: usize = 5;

/// A validated 5-digit numeric postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PostalCode {
    type Err = LocationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.len() == 5 && trimmed.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(LocationError::InvalidPostalCode(value.to_string()))
        }
    }
}

impl TryFrom<String> for PostalCode {
    type Error = LocationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PostalCode> for String {
    fn from(value: PostalCode) -> Self {
        value.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A nearby provider site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("postal code must be a 5-digit number, got '{0}'")]
    InvalidPostalCode(String),
    #[error("unable to geocode postal code {0}")]
    Ungeocodable(String),
    #[error("places lookup failed: {0}")]
    Upstream(String),
    #[error("location request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Resolves a postal code to a short list of nearby provider sites.
/// Failures never abort the intake workflow; callers surface them and
/// leave the site list empty.
#[async_trait]
pub trait LocationGateway: Send + Sync {
    async fn nearby_sites(&self, postal: &PostalCode) -> Result<Vec<Site>, LocationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_five_digit_codes() {
        let code: PostalCode = "94720".parse().expect("valid code");
        assert_eq!(code.as_str(), "94720");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let code: PostalCode = " 50309 ".parse().expect("valid code");
        assert_eq!(code.as_str(), "50309");
    }

    #[test]
    fn rejects_malformed_codes() {
        for raw in ["9472", "947200", "94-72", "abcde", ""] {
            assert!(
                raw.parse::<PostalCode>().is_err(),
                "'{raw}' should be rejected"
            );
        }
    }
}
