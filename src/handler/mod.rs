//! HTTP handler for the crop yield collection service
//!
//! Routes:
//! - `GET /` - plain-text liveness banner
//! - `GET /api/data/test` and `GET /api/data/test-direct` - liveness checks
//! - `POST /api/data/collect` - validate and store one observation
//! - `GET /api/data/all` - every stored observation, newest first
//!
//! Validation failures map to 400 with the missing field names; any storage
//! failure maps to a generic 500 with the detail logged, never returned.
//! Unmatched routes fall through to axum's default 404.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{StorageError, ValidationError};
use crate::schema::{CollectRequest, YieldObservation};
use crate::store::YieldStore;

/// Application state shared across all routes
pub struct AppState {
    pub store: Arc<dyn YieldStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn YieldStore>) -> Self {
        Self { store }
    }
}

/// Create the router
///
/// Cross-origin access is open to all origins; panics inside handlers are
/// caught at this boundary and become 500 responses.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api/data", data_routes())
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn data_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/test", get(test_route))
        .route("/test-direct", get(test_direct))
        .route("/collect", post(collect))
        .route("/all", get(list_all))
}

/// GET / - liveness banner
async fn root() -> &'static str {
    "Backend for Crop Yield Dashboard"
}

/// GET /api/data/test
async fn test_route() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Data route working".to_string(),
    })
}

/// GET /api/data/test-direct
async fn test_direct() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Direct route working".to_string(),
    })
}

/// POST /api/data/collect - validate and store one observation
///
/// An absent or malformed body is treated as an empty candidate, so it is
/// rejected the same way as one with every field missing.
async fn collect(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CollectRequest>>,
) -> Result<(StatusCode, Json<CollectResponse>), ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let candidate = request.validate()?;

    let stored = state.store.insert(candidate).await?;

    tracing::info!(crop = %stored.crop_name, location = %stored.location, "observation stored");

    Ok((
        StatusCode::CREATED,
        Json(CollectResponse {
            message: "Data saved".to_string(),
            data: stored,
        }),
    ))
}

/// GET /api/data/all - full listing, newest first
async fn list_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<YieldObservation>>, ApiError> {
    let records = state.store.list_all().await?;
    Ok(Json(records))
}

/// API error types
#[derive(Debug)]
pub enum ApiError {
    MissingFields(Vec<&'static str>),
    Storage(StorageError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::MissingFields(_) => "MISSING_FIELDS",
            ApiError::Storage(_) => "SERVER_ERROR",
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let ValidationError::MissingFields { fields } = err;
        ApiError::MissingFields(fields)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::MissingFields(fields) => ErrorBody {
                error: self.error_code(),
                message: format!("Missing fields: {}", fields.join(", ")),
            },
            ApiError::Storage(err) => {
                // Log the detail here; the caller only sees a generic message
                tracing::error!(error = %err, "storage operation failed");
                ErrorBody {
                    error: self.error_code(),
                    message: "Server error".to_string(),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Liveness response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Successful collect response
#[derive(Debug, Serialize)]
pub struct CollectResponse {
    pub message: String,
    pub data: YieldObservation,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        let err = ApiError::MissingFields(vec!["cropName"]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "MISSING_FIELDS");

        let err = ApiError::Storage(StorageError::write("disk full"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "SERVER_ERROR");
    }

    #[test]
    fn test_validation_error_converts_to_api_error() {
        let err: ApiError = ValidationError::MissingFields {
            fields: vec!["location"],
        }
        .into();
        assert!(matches!(err, ApiError::MissingFields(ref f) if f == &["location"]));
    }

    #[test]
    fn test_storage_error_converts_to_api_error() {
        let err: ApiError = StorageError::query("cursor lost").into();
        assert!(matches!(err, ApiError::Storage(StorageError::Query(_))));
    }
}
