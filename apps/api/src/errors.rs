use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::render::LayoutError;
use crate::table::LoadError;

/// Conversion failure taxonomy shared by the loader and the layout engine.
/// None of these are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedFormat,
    EmptyTable,
    CorruptInput,
    RenderFailure,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorKind::EmptyTable => "EMPTY_TABLE",
            ErrorKind::CorruptInput => "CORRUPT_INPUT",
            ErrorKind::RenderFailure => "RENDER_FAILURE",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::UnsupportedFormat => StatusCode::BAD_REQUEST,
            ErrorKind::EmptyTable | ErrorKind::CorruptInput => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::RenderFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("Upload error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The conversion error kind, if this error came out of the loader or engine.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AppError::Load(e) => Some(e.kind()),
            AppError::Layout(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::Load(e) => {
                let kind = e.kind();
                (kind.status(), kind.code(), e.to_string())
            }
            AppError::Layout(e) => {
                let kind = e.kind();
                tracing::error!(code = kind.code(), "Conversion failed: {e}");
                (kind.status(), kind.code(), e.to_string())
            }
            AppError::Multipart(e) => (e.status(), "UPLOAD_ERROR", e.body_text()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
