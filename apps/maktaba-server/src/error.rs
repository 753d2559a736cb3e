//! Error types for the Maktaba server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::epub::EpubError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("EPUB file not available for book {0}")]
    EpubUnavailable(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Epub(#[from] EpubError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// HTTP status, machine-readable kind and client-facing message
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::BookNotFound(id) => (
                StatusCode::NOT_FOUND,
                "book_not_found",
                format!("Book not found: {}", id),
            ),
            AppError::EpubUnavailable(id) => (
                StatusCode::NOT_FOUND,
                "epub_unavailable",
                format!("No EPUB file is available for book {}", id),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Epub(e) => match e {
                EpubError::FileFormat(_)
                | EpubError::InvalidContainer(_)
                | EpubError::InvalidPackage(_) => {
                    tracing::warn!("Unreadable EPUB: {}", e);
                    (StatusCode::NOT_FOUND, "invalid_epub", e.to_string())
                }
                EpubError::ChapterIndexOutOfRange { .. } => (
                    StatusCode::BAD_REQUEST,
                    "chapter_out_of_range",
                    e.to_string(),
                ),
                EpubError::InvalidQuery(msg) => {
                    (StatusCode::BAD_REQUEST, "invalid_query", msg.clone())
                }
                EpubError::Markup(_) | EpubError::Io(_) => {
                    tracing::error!("EPUB processing error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "processing_error",
                        "Failed to process EPUB".to_string(),
                    )
                }
            },
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "IO error".to_string(),
                )
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "parse_error",
                    "Failed to parse JSON".to_string(),
                )
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = self.parts();

        let body = Json(ErrorResponse {
            success: false,
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
