//! Paints one table block (header band + body rows) into a page content stream.
//!
//! Drawing order per block: backgrounds, then text, then grid lines on top.

use std::ops::Range;

use pdf_writer::{Content, Str};

use crate::layout::{wrap_text, PageGeometry, TextStyle, WrappedCell, BODY_STYLE, HEADER_STYLE};
use crate::render::pdf::{encode_win_ansi, font_resource};
use crate::render::theme::{
    row_background, Rgb, BODY_TEXT, CELL_PADDING_X_PT, CELL_PADDING_Y_PT, GRID_COLOR,
    GRID_LINE_WIDTH_PT, HEADER_BACKGROUND, HEADER_TEXT, PAGE_MARGIN_PT,
};

/// A row whose cells have been wrapped to their column widths.
#[derive(Debug, Clone)]
pub struct LaidOutRow {
    pub cells: Vec<WrappedCell>,
    pub height: f32,
}

/// Wraps every cell of a row and derives the row height from its tallest cell.
pub fn lay_out_row(texts: &[String], widths: &[f32], style: &TextStyle) -> LaidOutRow {
    let cells: Vec<WrappedCell> = texts
        .iter()
        .zip(widths)
        .map(|(text, width)| wrap_text(text, width - 2.0 * CELL_PADDING_X_PT, style))
        .collect();
    let lines = cells.iter().map(WrappedCell::line_count).max().unwrap_or(1);
    LaidOutRow {
        cells,
        height: lines as f32 * style.leading_pt + 2.0 * CELL_PADDING_Y_PT,
    }
}

/// Where the table sits on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// x of the table's left edge; the table is centred horizontally.
    pub left: f32,
    /// y of the table's top edge.
    pub top: f32,
    /// Vertical space available between the top and bottom margins.
    pub height: f32,
}

impl Frame {
    pub fn for_page(geometry: &PageGeometry, table_width: f32) -> Self {
        Frame {
            left: (geometry.width - table_width) / 2.0,
            top: geometry.height - PAGE_MARGIN_PT,
            height: geometry.height - 2.0 * PAGE_MARGIN_PT,
        }
    }
}

/// Splits a chunk's rows into runs that each fit under a header within `frame_height`.
///
/// Every run holds at least one row, so a single oversized row still gets a page.
pub fn split_to_frame(rows: &[LaidOutRow], header_height: f32, frame_height: f32) -> Vec<Range<usize>> {
    let available = frame_height - header_height;
    let mut segments = Vec::new();
    let mut start = 0;
    let mut used = 0.0_f32;

    for (index, row) in rows.iter().enumerate() {
        if index > start && used + row.height > available {
            segments.push(start..index);
            start = index;
            used = 0.0;
        }
        used += row.height;
    }
    if start < rows.len() {
        segments.push(start..rows.len());
    }
    segments
}

/// Paints `header` followed by `rows` with its top-left corner at the frame origin.
///
/// `first_row_index` is the position of `rows[0]` within its chunk and keeps the
/// zebra striping continuous across continuation pages.
pub fn paint_block(
    content: &mut Content,
    frame: &Frame,
    widths: &[f32],
    header: &LaidOutRow,
    rows: &[LaidOutRow],
    first_row_index: usize,
) {
    let table_width: f32 = widths.iter().sum();
    let bottom = frame.top - header.height - rows.iter().map(|r| r.height).sum::<f32>();

    // Backgrounds
    fill_rect(content, HEADER_BACKGROUND, frame.left, frame.top - header.height, table_width, header.height);
    let mut y = frame.top - header.height;
    for (offset, row) in rows.iter().enumerate() {
        let shade = row_background(first_row_index + offset);
        fill_rect(content, shade, frame.left, y - row.height, table_width, row.height);
        y -= row.height;
    }

    // Text
    paint_row_text(content, frame.left, frame.top, widths, header, &HEADER_STYLE, HEADER_TEXT);
    let mut y = frame.top - header.height;
    for row in rows {
        paint_row_text(content, frame.left, y, widths, row, &BODY_STYLE, BODY_TEXT);
        y -= row.height;
    }

    // Grid
    content.save_state();
    set_stroke(content, GRID_COLOR);
    content.set_line_width(GRID_LINE_WIDTH_PT);
    let right = frame.left + table_width;
    let mut y = frame.top;
    for height in std::iter::once(header.height).chain(rows.iter().map(|r| r.height)) {
        content.move_to(frame.left, y);
        content.line_to(right, y);
        y -= height;
    }
    content.move_to(frame.left, bottom);
    content.line_to(right, bottom);
    let mut x = frame.left;
    for width in std::iter::once(&0.0).chain(widths) {
        x += width;
        content.move_to(x, frame.top);
        content.line_to(x, bottom);
    }
    content.stroke();
    content.restore_state();
}

/// Draws each cell's lines centred horizontally and vertically within its box.
fn paint_row_text(
    content: &mut Content,
    left: f32,
    top: f32,
    widths: &[f32],
    row: &LaidOutRow,
    style: &TextStyle,
    color: Rgb,
) {
    content.begin_text();
    set_fill(content, color);
    content.set_font(font_resource(style.face), style.size_pt);

    let mut x = left;
    for (cell, width) in row.cells.iter().zip(widths) {
        let block_top = top - (row.height - cell.text_height(style)) / 2.0;
        for (index, line) in cell.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let line_x = x + (width - style.width_of(line)) / 2.0;
            let baseline = block_top - index as f32 * style.leading_pt - style.size_pt;
            content.set_text_matrix([1.0, 0.0, 0.0, 1.0, line_x, baseline]);
            content.show(Str(&encode_win_ansi(line)));
        }
        x += width;
    }

    content.end_text();
}

fn fill_rect(content: &mut Content, color: Rgb, x: f32, y: f32, width: f32, height: f32) {
    set_fill(content, color);
    content.rect(x, y, width, height);
    content.fill_nonzero();
}

fn set_fill(content: &mut Content, Rgb(r, g, b): Rgb) {
    content.set_fill_rgb(r, g, b);
}

fn set_stroke(content: &mut Content, Rgb(r, g, b): Rgb) {
    content.set_stroke_rgb(r, g, b);
}
