//! The fixed visual theme. Nothing here is configurable per request.

/// An RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const fn gray(level: f32) -> Self {
        Rgb(level, level, level)
    }
}

pub const BLACK: Rgb = Rgb::gray(0.0);
pub const WHITE: Rgb = Rgb::gray(1.0);
pub const GREY: Rgb = Rgb::gray(0.5);
pub const LIGHT_GREY: Rgb = Rgb::gray(0.827);
pub const WHITE_SMOKE: Rgb = Rgb::gray(0.961);

pub const HEADER_BACKGROUND: Rgb = GREY;
pub const HEADER_TEXT: Rgb = WHITE_SMOKE;
pub const BODY_TEXT: Rgb = BLACK;
/// Body rows alternate through these, starting with the first row under the header.
pub const ROW_BACKGROUNDS: [Rgb; 2] = [WHITE, LIGHT_GREY];

pub const GRID_COLOR: Rgb = BLACK;
pub const GRID_LINE_WIDTH_PT: f32 = 0.5;

pub const CELL_PADDING_X_PT: f32 = 4.0;
pub const CELL_PADDING_Y_PT: f32 = 3.0;

/// Drawn page margin on all four sides (0.5in).
pub const PAGE_MARGIN_PT: f32 = 36.0;

/// Background for the body row at `index` within its block.
pub fn row_background(index: usize) -> Rgb {
    ROW_BACKGROUNDS[index % ROW_BACKGROUNDS.len()]
}
