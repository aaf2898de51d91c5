// Layout: measurement and pagination for the table renderer.
// Pure, synchronous arithmetic on a loaded `Table`; nothing here touches the PDF.

pub mod columns;
pub mod font_metrics;
pub mod geometry;
pub mod pagination;
pub mod wrap;

// Re-export the public API consumed by the renderer.
pub use columns::column_widths;
pub use font_metrics::{FontFace, TextStyle, BODY_STYLE, HEADER_STYLE};
pub use geometry::PageGeometry;
pub use pagination::{chunk_rows, page_count, rows_per_page};
pub use wrap::{wrap_text, WrappedCell};
