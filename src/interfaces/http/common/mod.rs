//! Shared HTTP building blocks: response envelope, error mapping and the
//! validating JSON extractor.

mod validated_json;

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::CapacityConflict
        | DomainError::FragmentationConflict
        | DomainError::InvalidTransition { .. } => StatusCode::CONFLICT,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a domain error onto status code and envelope. Storage details are
/// logged, not returned.
pub fn domain_error(e: DomainError) -> ApiError {
    let status = status_for(&e);
    let message = match &e {
        DomainError::Validation(msg) => msg.clone(),
        DomainError::NotFound { entity, .. } => format!("{} not found", entity),
        DomainError::Storage(_) => {
            error!(error = %e, "Storage failure while handling request");
            "Internal storage error".to_string()
        }
        _ => e.to_string(),
    };
    (status, Json(ApiResponse::error(message)))
}

pub fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}
