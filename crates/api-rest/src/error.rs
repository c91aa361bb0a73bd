use api_shared::{AuthHeaderError, ErrorRes};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rx_core::{IdentityError, PrescriptionError};

/// Handler failure, rendered as `{ "error": message }`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (ApiError::BadRequest(error)
        | ApiError::Unauthorized(error)
        | ApiError::NotFound(error)
        | ApiError::Internal(error)) = self;

        if status.is_server_error() {
            tracing::error!(%status, %error, "request failed");
        } else {
            tracing::warn!(%status, %error, "request rejected");
        }

        (status, Json(ErrorRes { error })).into_response()
    }
}

impl From<PrescriptionError> for ApiError {
    fn from(e: PrescriptionError) -> Self {
        match e {
            PrescriptionError::InvalidInput(msg) => ApiError::BadRequest(msg),
            PrescriptionError::Image(image) => ApiError::BadRequest(image.to_string()),
            PrescriptionError::NotFound => ApiError::NotFound("Prescription not found".into()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthHeaderError> for ApiError {
    fn from(e: AuthHeaderError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<IdentityError> for ApiError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::Rejected(_) => ApiError::Unauthorized("Invalid or expired token".into()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
