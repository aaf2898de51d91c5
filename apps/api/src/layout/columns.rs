//! Column width estimation.
//!
//! Each column is as wide as its widest sampled text plus 25% slack, bounded to
//! `[MIN_COLUMN_WIDTH_PT, MAX_COLUMN_WIDTH_PT]`. Only the first `WIDTH_SAMPLE_ROWS`
//! rows are measured, so an outlier further down does not widen the column;
//! wrapping absorbs it instead.

use crate::layout::font_metrics::{BODY_STYLE, HEADER_STYLE};
use crate::table::Table;

pub const MIN_COLUMN_WIDTH_PT: f32 = 40.0;
pub const MAX_COLUMN_WIDTH_PT: f32 = 200.0;
pub const WIDTH_SAMPLE_ROWS: usize = 100;
pub const WIDTH_PADDING_FACTOR: f32 = 1.25;

/// Width in points for a column with the given header and cells (in row order).
pub fn optimal_column_width<'a>(header: &str, cells: impl IntoIterator<Item = &'a str>) -> f32 {
    let header_width = HEADER_STYLE.width_of(header);
    let widest = cells
        .into_iter()
        .take(WIDTH_SAMPLE_ROWS)
        .map(|cell| BODY_STYLE.width_of(cell))
        .fold(header_width, f32::max);

    (widest * WIDTH_PADDING_FACTOR).clamp(MIN_COLUMN_WIDTH_PT, MAX_COLUMN_WIDTH_PT)
}

/// One width per column, in column order.
pub fn column_widths(table: &Table) -> Vec<f32> {
    table
        .headers()
        .iter()
        .enumerate()
        .map(|(index, header)| optimal_column_width(header, table.column(index)))
        .collect()
}
