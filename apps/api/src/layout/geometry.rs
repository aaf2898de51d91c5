//! Page geometry selection.
//!
//! Tables that fit go on an A0 landscape sheet. Wider tables get a custom page whose
//! width grows to hold every column, so columns are never split across pages.

/// Points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;

/// A0 landscape width (1189mm) in points.
pub const REFERENCE_WIDTH_PT: f32 = 1189.0 * PT_PER_MM;
/// A0 landscape height (841mm) in points.
pub const REFERENCE_HEIGHT_PT: f32 = 841.0 * PT_PER_MM;

/// Space reserved around the table for capacity arithmetic (not the drawn margins).
pub const MARGIN_BUDGET_PT: f32 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Reference,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub kind: PageKind,
}

impl PageGeometry {
    pub fn reference() -> Self {
        PageGeometry {
            width: REFERENCE_WIDTH_PT,
            height: REFERENCE_HEIGHT_PT,
            kind: PageKind::Reference,
        }
    }

    /// Chooses the page for a table whose columns sum to `total_width` points.
    pub fn for_table_width(total_width: f32) -> Self {
        let needed = total_width + MARGIN_BUDGET_PT;
        if needed <= REFERENCE_WIDTH_PT {
            Self::reference()
        } else {
            PageGeometry {
                width: needed,
                height: REFERENCE_HEIGHT_PT,
                kind: PageKind::Custom,
            }
        }
    }

    /// Vertical space left for rows once the margin budget is taken out.
    pub fn usable_height(&self) -> f32 {
        (self.height - MARGIN_BUDGET_PT).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_is_a0_landscape() {
        assert!((REFERENCE_WIDTH_PT - 3370.3937).abs() < 0.01);
        assert!((REFERENCE_HEIGHT_PT - 2383.937).abs() < 0.01);
        assert!(REFERENCE_WIDTH_PT > REFERENCE_HEIGHT_PT);
    }

    #[test]
    fn test_narrow_table_uses_reference_page() {
        let geometry = PageGeometry::for_table_width(120.0);
        assert_eq!(geometry, PageGeometry::reference());
        assert_eq!(geometry.kind, PageKind::Reference);
    }

    #[test]
    fn test_exact_fit_stays_on_reference_page() {
        let geometry = PageGeometry::for_table_width(REFERENCE_WIDTH_PT - MARGIN_BUDGET_PT);
        assert_eq!(geometry.kind, PageKind::Reference);
    }

    #[test]
    fn test_wide_table_gets_custom_width() {
        let geometry = PageGeometry::for_table_width(10_000.0);
        assert_eq!(geometry.kind, PageKind::Custom);
        assert_eq!(geometry.width, 10_072.0);
        assert_eq!(geometry.height, REFERENCE_HEIGHT_PT);
    }

    #[test]
    fn test_usable_height_subtracts_budget() {
        let geometry = PageGeometry::reference();
        assert!((geometry.usable_height() - (REFERENCE_HEIGHT_PT - 72.0)).abs() < 1e-3);
    }
}
