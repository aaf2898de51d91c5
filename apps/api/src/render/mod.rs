//! Table renderer: turns a loaded `Table` into a paginated, gridded PDF.
//!
//! # Pipeline
//! 1. Measure column widths from the header and the first 100 rows.
//! 2. Pick the page: A0 landscape, or a wider custom page when the columns need it.
//! 3. Chunk the rows by the page's estimated row capacity.
//! 4. Paint each chunk under a repeated header, one chunk per page. A chunk whose
//!    wrapped rows are taller than the page continues on extra pages, header again.
//!
//! Everything is synchronous and CPU-bound; async callers go through `spawn_blocking`.

pub mod painter;
pub mod pdf;
pub mod theme;

use pdf_writer::Content;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::ErrorKind;
use crate::layout::{
    chunk_rows, column_widths, page_count, rows_per_page, PageGeometry, BODY_STYLE, HEADER_STYLE,
};
use crate::render::painter::{lay_out_row, paint_block, split_to_frame, Frame, LaidOutRow};
use crate::render::pdf::PdfBuilder;
use crate::table::Table;

pub use pdf::Document;

/// Largest page side most PDF viewers accept without a `/UserUnit` scale.
const VIEWER_PAGE_LIMIT_PT: f32 = 14_400.0;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Cannot lay out an empty table ({columns} columns, {rows} rows)")]
    EmptyTable { columns: usize, rows: usize },

    #[error("Failed to render document: {0}")]
    RenderFailure(String),
}

impl LayoutError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LayoutError::EmptyTable { .. } => ErrorKind::EmptyTable,
            LayoutError::RenderFailure(_) => ErrorKind::RenderFailure,
        }
    }
}

/// Summary of one conversion, returned alongside the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionResult {
    pub rows: usize,
    pub columns: usize,
    /// Row chunks, i.e. `ceil(rows / rows_per_page)`.
    pub pages: usize,
    pub page_width: f32,
    pub page_height: f32,
}

/// Lays out and paints `table`. Either the whole document is produced or nothing is.
pub fn render(table: &Table) -> Result<(Document, ConversionResult), LayoutError> {
    let rows = table.row_count();
    let columns = table.column_count();
    if rows == 0 || columns == 0 {
        return Err(LayoutError::EmptyTable { columns, rows });
    }

    let widths = column_widths(table);
    let total_width: f32 = widths.iter().sum();
    let geometry = PageGeometry::for_table_width(total_width);
    if !(geometry.width.is_finite() && geometry.height.is_finite()) {
        return Err(LayoutError::RenderFailure(format!(
            "page size {}x{} is not representable",
            geometry.width, geometry.height
        )));
    }
    if geometry.width > VIEWER_PAGE_LIMIT_PT {
        warn!(
            page_width = geometry.width,
            columns, "Page is wider than many PDF viewers display"
        );
    }

    let per_page = rows_per_page(&geometry);
    let chunks = chunk_rows(rows, per_page);
    debug!(
        page = ?geometry.kind,
        page_width = geometry.width,
        rows_per_page = per_page,
        chunks = chunks.len(),
        "Selected page geometry"
    );
    let frame = Frame::for_page(&geometry, total_width);
    let header = lay_out_row(table.headers(), &widths, &HEADER_STYLE);
    if header.height >= frame.height {
        return Err(LayoutError::RenderFailure(format!(
            "header row ({:.0}pt) does not fit on a {:.0}pt page",
            header.height, geometry.height
        )));
    }

    let mut builder = PdfBuilder::new();
    for (index, chunk) in chunks.iter().enumerate() {
        let body: Vec<LaidOutRow> = table.rows()[chunk.rows()]
            .iter()
            .map(|row| lay_out_row(row, &widths, &BODY_STYLE))
            .collect();
        if let Some((offset, row)) = body
            .iter()
            .enumerate()
            .find(|(_, row)| header.height + row.height > frame.height)
        {
            return Err(LayoutError::RenderFailure(format!(
                "row {} ({:.0}pt) is too tall for a {:.0}pt page",
                chunk.start + offset + 1,
                row.height,
                geometry.height
            )));
        }

        let segments = split_to_frame(&body, header.height, frame.height);
        debug!(
            chunk = index,
            rows = chunk.row_count(),
            physical_pages = segments.len(),
            "Painting chunk"
        );
        for segment in segments {
            let mut content = Content::new();
            paint_block(
                &mut content,
                &frame,
                &widths,
                &header,
                &body[segment.clone()],
                segment.start,
            );
            builder.add_page(&geometry, content);
        }
    }

    let result = ConversionResult {
        rows,
        columns,
        pages: page_count(rows, per_page),
        page_width: geometry.width,
        page_height: geometry.height,
    };
    Ok((builder.finish(), result))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::columns::MAX_COLUMN_WIDTH_PT;
    use crate::layout::geometry::{REFERENCE_HEIGHT_PT, REFERENCE_WIDTH_PT};

    fn uniform_table(columns: usize, rows: usize, cell: &str) -> Table {
        let headers = (0..columns).map(|i| format!("c{i}")).collect();
        let body = vec![vec![cell.to_string(); columns]; rows];
        Table::new(headers, body).unwrap()
    }

    #[test]
    fn test_small_table_on_reference_page() {
        let table = uniform_table(3, 40, "x");
        let (document, result) = render(&table).unwrap();

        assert_eq!(result.rows, 40);
        assert_eq!(result.columns, 3);
        assert_eq!(result.pages, 1);
        assert_eq!(result.page_width, REFERENCE_WIDTH_PT);
        assert_eq!(result.page_height, REFERENCE_HEIGHT_PT);
        assert_eq!(document.page_count(), 1);
        assert!(document.as_bytes().starts_with(b"%PDF-"));
    }

    #[test]
    fn test_long_cell_clamps_and_fits_one_page() {
        let table = uniform_table(1, 1, &"lorem ipsum ".repeat(42)[..500]);
        assert_eq!(column_widths(&table), vec![MAX_COLUMN_WIDTH_PT]);

        let (document, result) = render(&table).unwrap();
        assert_eq!(result.pages, 1);
        assert_eq!(result.page_width, REFERENCE_WIDTH_PT);
        assert_eq!(document.page_count(), 1);
    }

    #[test]
    fn test_wide_table_gets_custom_page() {
        // Bold "IDIDIDIDID" at 8pt = 5em = 40pt; × 1.25 = exactly 50pt per column.
        let headers = vec!["IDIDIDIDID".to_string(); 200];
        let table = Table::new(headers, vec![vec!["x".to_string(); 200]; 5]).unwrap();
        assert!(column_widths(&table).iter().all(|w| *w == 50.0));

        let (_, result) = render(&table).unwrap();
        assert_eq!(result.columns, 200);
        assert_eq!(result.page_width, 10_072.0);
        assert_eq!(result.page_height, REFERENCE_HEIGHT_PT);
        assert_eq!(result.pages, 1);
    }

    #[test]
    fn test_page_count_matches_chunk_arithmetic() {
        let table = uniform_table(2, 185, "row");
        let (document, result) = render(&table).unwrap();
        assert_eq!(result.pages, 3); // 92 + 92 + 1
        assert_eq!(document.page_count(), 3);
    }

    #[test]
    fn test_rows_and_columns_reported_for_any_shape() {
        for (columns, rows) in [(1, 1), (4, 15), (7, 93), (12, 300)] {
            let (_, result) = render(&uniform_table(columns, rows, "v")).unwrap();
            assert_eq!((result.columns, result.rows), (columns, rows));
            assert_eq!(result.pages, rows.div_ceil(92));
        }
    }

    #[test]
    fn test_tall_rows_spill_onto_continuation_pages() {
        // Each cell wraps to many lines, so 92 rows cannot fit on one A0 page.
        let tall = "word ".repeat(60);
        let table = uniform_table(1, 92, &tall);
        let (document, result) = render(&table).unwrap();
        assert_eq!(result.pages, 1);
        assert!(
            document.page_count() > 1,
            "expected continuation pages, got {}",
            document.page_count()
        );
    }

    /// Text of every content stream that draws anything, in page order.
    fn page_streams(document: &Document) -> Vec<String> {
        String::from_utf8_lossy(document.as_bytes())
            .split("endstream")
            .filter(|segment| segment.contains(" Tj"))
            .map(str::to_string)
            .collect()
    }

    fn assert_header_on_every_page(document: &Document) {
        let streams = page_streams(document);
        assert_eq!(streams.len(), document.page_count());
        for (page, stream) in streams.iter().enumerate() {
            assert!(stream.contains("/F2 8 Tf"), "page {page} has no header font");
            assert!(stream.contains("(c0) Tj"), "page {page} has no header text");
        }
    }

    #[test]
    fn test_header_repeats_on_every_chunk_page() {
        let table = uniform_table(2, 185, "row");
        let (document, result) = render(&table).unwrap();
        assert_eq!(result.pages, 3);
        assert_header_on_every_page(&document);
    }

    #[test]
    fn test_header_repeats_on_continuation_pages() {
        let table = uniform_table(1, 92, &"word ".repeat(60));
        let (document, _) = render(&table).unwrap();
        assert!(document.page_count() > 1);
        assert_header_on_every_page(&document);
    }

    #[test]
    fn test_row_taller_than_page_fails() {
        let table = uniform_table(1, 1, &"word ".repeat(20_000));
        let err = render(&table).unwrap_err();
        assert!(matches!(err, LayoutError::RenderFailure(_)), "got {err:?}");
        assert_eq!(err.kind(), ErrorKind::RenderFailure);
        assert!(err.to_string().contains("row 1"), "got: {err}");
    }

    #[test]
    fn test_producer_recorded_in_document_info() {
        let table = uniform_table(1, 1, "x");
        let (document, _) = render(&table).unwrap();
        let text = String::from_utf8_lossy(document.as_bytes());
        assert!(text.contains("/Producer (sheetpress"));
    }

    #[test]
    fn test_empty_table_is_rejected_by_engine() {
        let table = Table::new_unchecked(vec!["a".to_string()], vec![]);
        let err = render(&table).unwrap_err();
        assert!(matches!(err, LayoutError::EmptyTable { columns: 1, rows: 0 }));
        assert_eq!(err.kind(), ErrorKind::EmptyTable);
    }

    #[test]
    fn test_no_columns_is_rejected_by_engine() {
        let table = Table::new_unchecked(vec![], vec![vec![]]);
        assert!(matches!(
            render(&table).unwrap_err(),
            LayoutError::EmptyTable { columns: 0, .. }
        ));
    }
}
