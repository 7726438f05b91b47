pub mod lights;

use axum::Json;
use axum::Router;
use axum::response::{IntoResponse, Response};
use hyper::StatusCode;
use serde_json::json;

use crate::error::ApiError;
use crate::server::appstate::AppState;

#[derive(Debug)]
/// Error wrapper for http handlers, carrying the status to answer with.
pub struct RouteError {
    status: StatusCode,
    message: String,
}

pub type RouteResult<T> = Result<T, RouteError>;

impl From<ApiError> for RouteError {
    fn from(value: ApiError) -> Self {
        let status = match value {
            ApiError::LightNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::SerdeJson(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: value.to_string(),
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            log::error!("Request failed: {}", self.message);
        } else {
            log::warn!("Request failed: {}", self.message);
        }

        let res = json!({"error": self.message});

        (self.status, Json(res)).into_response()
    }
}

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/lights", lights::router())
}
