use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::domain::{ContactMessageCreate, PropertyCreate, PropertyId};
use super::service::{ListingService, ListingServiceError};
use crate::store::DocumentStore;

pub const API_BANNER: &str = "BH Investment API";

/// Router builder exposing the `/api` listing and inquiry endpoints.
pub fn listing_router<S>(service: Arc<ListingService<S>>) -> Router
where
    S: DocumentStore + 'static,
{
    Router::new()
        .route("/api", get(banner_handler))
        .route("/api/", get(banner_handler))
        .route(
            "/api/properties",
            get(list_properties_handler::<S>).post(create_property_handler::<S>),
        )
        .route(
            "/api/properties/:property_id",
            get(get_property_handler::<S>).delete(delete_property_handler::<S>),
        )
        .route("/api/contact", post(create_contact_handler::<S>))
        .route(
            "/api/contact-messages",
            get(list_contact_messages_handler::<S>),
        )
        .with_state(service)
}

fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "detail": message.into() }))).into_response()
}

fn rejection_response(rejection: JsonRejection) -> Response {
    warn!(status = %rejection.status(), "request body rejected");
    detail(rejection.status(), rejection.body_text())
}

fn error_response(err: ListingServiceError) -> Response {
    match err {
        ListingServiceError::NotFound => detail(StatusCode::NOT_FOUND, err.to_string()),
        other => {
            error!(error = %other, "listing request failed");
            detail(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

pub(crate) async fn banner_handler() -> Json<serde_json::Value> {
    Json(json!({ "message": API_BANNER }))
}

pub(crate) async fn list_properties_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
) -> Response
where
    S: DocumentStore + 'static,
{
    match service.list_properties().await {
        Ok(properties) => (StatusCode::OK, Json(properties)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_property_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    Path(property_id): Path<String>,
) -> Response
where
    S: DocumentStore + 'static,
{
    match service.get_property(&PropertyId(property_id)).await {
        Ok(property) => (StatusCode::OK, Json(property)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_property_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    payload: Result<Json<PropertyCreate>, JsonRejection>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let Json(create) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.create_property(create).await {
        Ok(property) => (StatusCode::OK, Json(property)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_property_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    Path(property_id): Path<String>,
) -> Response
where
    S: DocumentStore + 'static,
{
    match service.delete_property(&PropertyId(property_id)).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Property deleted successfully" })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_contact_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    payload: Result<Json<ContactMessageCreate>, JsonRejection>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let Json(create) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.create_contact_message(create).await {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_contact_messages_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
) -> Response
where
    S: DocumentStore + 'static,
{
    match service.list_contact_messages().await {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(err) => error_response(err),
    }
}
