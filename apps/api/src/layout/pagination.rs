//! Row chunking: every data row lands in exactly one page-sized chunk, in order.

use std::ops::Range;

use crate::layout::geometry::PageGeometry;

/// Assumed height of one rendered row when estimating page capacity.
pub const ESTIMATED_ROW_HEIGHT_PT: f32 = 25.0;
/// Capacity floor so very short pages still make progress.
pub const MIN_ROWS_PER_PAGE: usize = 15;

/// A contiguous `[start, end)` slice of data rows rendered under one header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChunk {
    pub start: usize,
    pub end: usize,
}

impl PageChunk {
    pub fn row_count(&self) -> usize {
        self.end - self.start
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// `max(15, floor(usable_height / 25))`.
pub fn rows_per_page(geometry: &PageGeometry) -> usize {
    let estimated = (geometry.usable_height() / ESTIMATED_ROW_HEIGHT_PT).floor() as usize;
    estimated.max(MIN_ROWS_PER_PAGE)
}

/// Splits `0..total_rows` into consecutive chunks of `rows_per_page`; the last may be short.
pub fn chunk_rows(total_rows: usize, rows_per_page: usize) -> Vec<PageChunk> {
    let step = rows_per_page.max(1);
    (0..total_rows)
        .step_by(step)
        .map(|start| PageChunk {
            start,
            end: (start + step).min(total_rows),
        })
        .collect()
}

/// `ceil(total_rows / rows_per_page)`.
pub fn page_count(total_rows: usize, rows_per_page: usize) -> usize {
    total_rows.div_ceil(rows_per_page.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::{PageKind, REFERENCE_HEIGHT_PT};

    #[test]
    fn test_reference_page_holds_92_rows() {
        // floor((2383.94 - 72) / 25) = 92
        assert_eq!(rows_per_page(&PageGeometry::reference()), 92);
    }

    #[test]
    fn test_short_page_uses_floor() {
        let geometry = PageGeometry {
            width: 500.0,
            height: 200.0,
            kind: PageKind::Custom,
        };
        assert_eq!(rows_per_page(&geometry), MIN_ROWS_PER_PAGE);
    }

    #[test]
    fn test_custom_page_keeps_reference_capacity() {
        let geometry = PageGeometry::for_table_width(50_000.0);
        assert_eq!(geometry.height, REFERENCE_HEIGHT_PT);
        assert_eq!(rows_per_page(&geometry), 92);
    }

    #[test]
    fn test_chunks_partition_rows_in_order() {
        for (total, per_page) in [(1, 15), (15, 15), (16, 15), (40, 92), (185, 92), (1000, 37)] {
            let chunks = chunk_rows(total, per_page);
            assert_eq!(chunks.len(), page_count(total, per_page));
            assert_eq!(chunks.first().map(|c| c.start), Some(0));
            assert_eq!(chunks.last().map(|c| c.end), Some(total));
            for pair in chunks.windows(2) {
                assert_eq!(pair[0].end, pair[1].start, "gap or overlap in {pair:?}");
            }
            assert!(chunks.iter().all(|c| (1..=per_page).contains(&c.row_count())));
        }
    }

    #[test]
    fn test_last_chunk_may_be_short() {
        let chunks = chunk_rows(185, 92);
        assert_eq!(
            chunks,
            vec![
                PageChunk { start: 0, end: 92 },
                PageChunk { start: 92, end: 184 },
                PageChunk { start: 184, end: 185 },
            ]
        );
    }

    #[test]
    fn test_no_rows_no_chunks() {
        assert!(chunk_rows(0, 92).is_empty());
        assert_eq!(page_count(0, 92), 0);
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count(40, 92), 1);
        assert_eq!(page_count(92, 92), 1);
        assert_eq!(page_count(93, 92), 2);
    }
}
