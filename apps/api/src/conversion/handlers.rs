use anyhow::Context;
use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::warn;

use crate::conversion::convert_upload;
use crate::errors::AppError;
use crate::render::ConversionResult;
use crate::state::AppState;
use crate::table::SourceFormat;

/// Multipart field carrying the spreadsheet.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub success: bool,
    /// Suggested name for the downloaded PDF.
    pub filename: String,
    pub download_path: String,
    pub metadata: ConversionResult,
}

/// POST /convert
pub async fn handle_convert(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ConvertResponse>, AppError> {
    let (original_name, format, data) = read_upload(&mut multipart).await?;
    if data.len() > state.config.max_upload_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File exceeds the {} byte upload limit",
            state.config.max_upload_bytes
        )));
    }

    let (stored, metadata) = convert_upload(&state.store, &original_name, format, data)
        .await
        .inspect_err(|e| {
            if let Some(kind) = e.kind() {
                warn!(code = kind.code(), file = %original_name, "Conversion rejected");
            }
        })?;

    Ok(Json(ConvertResponse {
        success: true,
        filename: stored.download_name,
        download_path: format!("/download/{}", stored.file_name),
        metadata,
    }))
}

/// Pulls the `file` field out of the form. The format is checked before the body is read.
async fn read_upload(multipart: &mut Multipart) -> Result<(String, SourceFormat, Bytes), AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let original_name = field.file_name().unwrap_or_default().to_string();
        if original_name.is_empty() {
            return Err(AppError::Validation("No file selected".to_string()));
        }
        let format = SourceFormat::from_filename(&original_name)?;
        let data = field.bytes().await?;
        return Ok((original_name, format, data));
    }
    Err(AppError::Validation("No file uploaded".to_string()))
}

/// GET /download/:file_name
///
/// Serves the PDF once; the file is deleted as it is handed over.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    let (bytes, download_name) = state
        .store
        .take_output(&file_name)
        .await
        .context("failed to read generated PDF")?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    let disposition = format!("attachment; filename=\"{download_name}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
