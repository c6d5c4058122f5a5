use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No file provided")]
    MissingFile,

    #[error("No file selected")]
    EmptyFilename,

    #[error("Failed to read multipart form: {0}")]
    Multipart(String),

    #[error("{0}")]
    Config(String),

    /// A dependent service returned non-success. The vision client records
    /// the upstream status so it can be forwarded verbatim; language and
    /// speech failures carry no status and map to a plain 500.
    #[error("{service} request failed: {message}")]
    Upstream {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingFile | AppError::EmptyFilename | AppError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Upstream { status, .. } => status
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Correlation id for matching an error response to the server log.
        let request_id = Uuid::new_v4();
        tracing::error!(error = %self, %request_id);

        (
            status,
            Json(json!({ "error": self.to_string(), "request_id": request_id.to_string() })),
        )
            .into_response()
    }
}
