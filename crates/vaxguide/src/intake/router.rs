use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::alerts::AlertPublisher;
use super::domain::{DeliveryMethod, IntakeError, IntakeStage, Preference};
use super::service::{IntakeService, IntakeServiceError, LocationLookup};
use super::store::SessionStore;
use crate::engine::{HistoryEntry, IntakeForm};
use crate::locations::{LocationError, LocationGateway};

/// Router builder exposing the intake workflow over HTTP.
pub fn intake_router<S, A, L>(service: Arc<IntakeService<S, A, L>>) -> Router
where
    S: SessionStore + 'static,
    A: AlertPublisher + 'static,
    L: LocationGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/intake/:session_id",
            get(session_status_handler::<S, A, L>),
        )
        .route(
            "/api/v1/intake/:session_id/form",
            post(submit_form_handler::<S, A, L>),
        )
        .route(
            "/api/v1/intake/:session_id/history",
            post(submit_history_handler::<S, A, L>),
        )
        .route(
            "/api/v1/intake/:session_id/advance",
            post(advance_handler::<S, A, L>),
        )
        .route(
            "/api/v1/intake/:session_id/preferences",
            post(submit_preferences_handler::<S, A, L>),
        )
        .route(
            "/api/v1/intake/:session_id/alert-ack",
            post(acknowledge_handler::<S, A, L>),
        )
        .route(
            "/api/v1/intake/:session_id/back",
            post(back_handler::<S, A, L>),
        )
        .route(
            "/api/v1/intake/:session_id/reset",
            post(reset_handler::<S, A, L>),
        )
        .route(
            "/api/v1/intake/:session_id/delivery",
            post(delivery_handler::<S, A, L>),
        )
        .route(
            "/api/v1/intake/:session_id/locations",
            get(locations_handler::<S, A, L>),
        )
        .route("/api/v1/catalog/conditions", get(conditions_handler::<S, A, L>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeliveryBody {
    pub(crate) method: DeliveryMethod,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocationQuery {
    pub(crate) zip: String,
}

fn error_response(error: IntakeServiceError) -> Response {
    let status = match &error {
        IntakeServiceError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        IntakeServiceError::Workflow(IntakeError::Validation(errors)) => {
            let payload = json!({
                "error": error.to_string(),
                "fields": errors,
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
        IntakeServiceError::Workflow(IntakeError::UnknownVaccine(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        IntakeServiceError::Workflow(_) => StatusCode::CONFLICT,
        IntakeServiceError::Location(
            LocationError::InvalidPostalCode(_) | LocationError::Ungeocodable(_),
        ) => StatusCode::BAD_REQUEST,
        IntakeServiceError::Location(_) => StatusCode::BAD_GATEWAY,
        IntakeServiceError::Store(_) | IntakeServiceError::Alert(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn session_status_handler<S, A, L>(
    State(service): State<Arc<IntakeService<S, A, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    A: AlertPublisher + 'static,
    L: LocationGateway + 'static,
{
    match service.session(&session_id) {
        Ok(session) => {
            let payload = json!({
                "stage": session.stage(),
                "candidates": session.candidates(),
                "recommendations": session.recommendations(),
                "preferences": session.preferences(),
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_form_handler<S, A, L>(
    State(service): State<Arc<IntakeService<S, A, L>>>,
    Path(session_id): Path<String>,
    Json(form): Json<IntakeForm>,
) -> Response
where
    S: SessionStore + 'static,
    A: AlertPublisher + 'static,
    L: LocationGateway + 'static,
{
    match service.submit_intake(&session_id, form) {
        Ok(candidates) => {
            let payload = json!({ "stage": "history", "candidates": candidates });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_history_handler<S, A, L>(
    State(service): State<Arc<IntakeService<S, A, L>>>,
    Path(session_id): Path<String>,
    Json(entries): Json<BTreeMap<String, HistoryEntry>>,
) -> Response
where
    S: SessionStore + 'static,
    A: AlertPublisher + 'static,
    L: LocationGateway + 'static,
{
    match service.submit_history(&session_id, entries) {
        Ok(recommendations) => {
            let payload = json!({
                "stage": "recommendations",
                "recommendations": recommendations,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn advance_handler<S, A, L>(
    State(service): State<Arc<IntakeService<S, A, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    A: AlertPublisher + 'static,
    L: LocationGateway + 'static,
{
    match service.advance_to_preferences(&session_id) {
        Ok(stage) => (StatusCode::OK, Json(json!({ "stage": stage }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_preferences_handler<S, A, L>(
    State(service): State<Arc<IntakeService<S, A, L>>>,
    Path(session_id): Path<String>,
    Json(preferences): Json<BTreeMap<String, Preference>>,
) -> Response
where
    S: SessionStore + 'static,
    A: AlertPublisher + 'static,
    L: LocationGateway + 'static,
{
    match service.submit_preferences(&session_id, preferences) {
        Ok(result) => {
            let payload = json!({
                "stage": result.stage,
                "wanted": result.summary.wanted,
                "unsure": result.summary.unsure,
                "no": result.summary.declined,
                "provider_alert": result.stage == IntakeStage::ProviderAlert,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn acknowledge_handler<S, A, L>(
    State(service): State<Arc<IntakeService<S, A, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    A: AlertPublisher + 'static,
    L: LocationGateway + 'static,
{
    match service.acknowledge_alert(&session_id) {
        Ok(stage) => (StatusCode::OK, Json(json!({ "stage": stage }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn back_handler<S, A, L>(
    State(service): State<Arc<IntakeService<S, A, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    A: AlertPublisher + 'static,
    L: LocationGateway + 'static,
{
    match service.go_back(&session_id) {
        Ok(stage) => (StatusCode::OK, Json(json!({ "stage": stage }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reset_handler<S, A, L>(
    State(service): State<Arc<IntakeService<S, A, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    A: AlertPublisher + 'static,
    L: LocationGateway + 'static,
{
    match service.reset(&session_id) {
        Ok(stage) => (StatusCode::OK, Json(json!({ "stage": stage }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delivery_handler<S, A, L>(
    State(service): State<Arc<IntakeService<S, A, L>>>,
    Path(session_id): Path<String>,
    Json(body): Json<DeliveryBody>,
) -> Response
where
    S: SessionStore + 'static,
    A: AlertPublisher + 'static,
    L: LocationGateway + 'static,
{
    match service.select_delivery(&session_id, body.method) {
        Ok(()) => {
            let payload = json!({ "status": "dispatched", "method": body.method });
            (StatusCode::ACCEPTED, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn locations_handler<S, A, L>(
    State(service): State<Arc<IntakeService<S, A, L>>>,
    Path(session_id): Path<String>,
    Query(query): Query<LocationQuery>,
) -> Response
where
    S: SessionStore + 'static,
    A: AlertPublisher + 'static,
    L: LocationGateway + 'static,
{
    match service.request_locations(&session_id, &query.zip).await {
        Ok(LocationLookup::Sites(sites)) => {
            let payload = json!({ "zip": query.zip, "locations": sites });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Ok(LocationLookup::Superseded) => {
            let payload = json!({
                "zip": query.zip,
                "superseded": true,
                "locations": [],
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn conditions_handler<S, A, L>(
    State(service): State<Arc<IntakeService<S, A, L>>>,
) -> Response
where
    S: SessionStore + 'static,
    A: AlertPublisher + 'static,
    L: LocationGateway + 'static,
{
    let payload = json!({
        "medical_conditions": service.catalog().medical_conditions,
    });
    (StatusCode::OK, Json(payload)).into_response()
}
