use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::error;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Every failure an upload or lookup can signal. All variants render as the
/// same JSON envelope so clients never see a framework default error page.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Only video files are allowed (got {got})")]
    UnsupportedMediaType { got: String },

    #[error("File too large. Maximum file size is {limit_mb}MB.")]
    PayloadTooLarge { limit_mb: u64 },

    #[error("Invalid upload request: {0}")]
    InvalidRequest(String),

    #[error("Failed to save file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Video not found")]
    NotFound,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType { .. } => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Translate a multipart parsing failure into the matching API error. Multer
/// reports the size ceiling as a field-size violation, which the HTTP surface
/// presents as 413 rather than a generic bad request.
pub fn from_multipart(err: multer::Error, max_file_size: u64) -> ApiError {
    match err {
        multer::Error::FieldSizeExceeded { .. } | multer::Error::StreamSizeExceeded { .. } => {
            ApiError::PayloadTooLarge {
                limit_mb: max_file_size / 1024 / 1024,
            }
        }
        other => ApiError::InvalidRequest(other.to_string()),
    }
}
