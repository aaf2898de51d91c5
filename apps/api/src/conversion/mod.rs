//! Upload → PDF pipeline.
//!
//! The format check runs before anything touches disk. Loading, layout and PDF
//! serialization are CPU-bound and run on the blocking pool; the request task only
//! awaits the result. The staged upload is removed as soon as the table is loaded.

pub mod handlers;
pub mod storage;

use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::render::{render, ConversionResult};
use crate::table::{load_table_from_path, SourceFormat};
use storage::{download_name_for, StoredOutput, TempStore};

/// Converts one uploaded file and stores the PDF for a single download.
///
/// `format` must already have been derived from `original_name`.
pub async fn convert_upload(
    store: &TempStore,
    original_name: &str,
    format: SourceFormat,
    data: Bytes,
) -> Result<(StoredOutput, ConversionResult), AppError> {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let download_name = download_name_for(original_name);
    let store = store.clone();

    tokio::task::spawn_blocking(move || {
        convert_blocking(&store, &data, format, &extension, &download_name)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("conversion task failed: {e}")))?
}

fn convert_blocking(
    store: &TempStore,
    data: &[u8],
    format: SourceFormat,
    extension: &str,
    download_name: &str,
) -> Result<(StoredOutput, ConversionResult), AppError> {
    let staged = store
        .stage_input(data, extension)
        .context("failed to stage upload")?;
    let loaded = load_table_from_path(staged.path(), format);
    if let Err(e) = staged.close() {
        warn!("Failed to remove staged upload: {e}");
    }
    let table = loaded?;

    let (document, result) = render(&table)?;
    drop(table);

    let stored = store
        .store_output(document.as_bytes(), download_name)
        .context("failed to store generated PDF")?;
    if let Err(e) = store.sweep_expired() {
        warn!("Failed to sweep expired PDFs: {e}");
    }

    info!(
        rows = result.rows,
        columns = result.columns,
        pages = result.pages,
        physical_pages = document.page_count(),
        page_width = result.page_width,
        page_height = result.page_height,
        output = %stored.file_name,
        "Converted upload"
    );
    Ok((stored, result))
}
