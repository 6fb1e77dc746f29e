//! Toroidal position resolution.
//!
//! Every cell has a fixed relative coordinate. Its on-screen position is that
//! coordinate shifted by the pan offset and folded back into the grid extent
//! with a true modulo, so a cell leaving one edge reappears at the opposite
//! edge at the same sub-pixel offset. Cells never change identity or image;
//! only their positions cycle.
//!
//! All positions here are in screen space: origin at the top-left corner of
//! the window, y growing downward, a position naming a cell's top-left corner.

use bevy::math::{DVec2, IVec2};

/// Modulo that is always in `[0, m)`, including for negative `n`.
///
/// Written as `((n % m) + m) % m` rather than `rem_euclid` so that a tiny
/// negative `n` folds to `0` instead of rounding up to `m`.
pub fn wrap(n: f64, m: f64) -> f64 {
    ((n % m) + m) % m
}

/// Size of the repeating tile the cells live on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridExtent {
    /// Cell size plus gap: the distance between neighbouring cell origins
    pub total_cell: f64,
    pub cols: u32,
    pub rows: u32,
}

impl GridExtent {
    pub fn new(total_cell: f64, cols: u32, rows: u32) -> Self {
        Self {
            total_cell,
            cols,
            rows,
        }
    }

    pub fn width(&self) -> f64 {
        self.cols as f64 * self.total_cell
    }

    pub fn height(&self) -> f64 {
        self.rows as f64 * self.total_cell
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width(), self.height())
    }

    /// Screen position of the cell at `relative` for the given pan offset.
    ///
    /// The `+ total_cell` / `- total_cell` shift moves the wrap seam one cell
    /// off-screen to the left/top, so positions run through `[-total_cell,
    /// extent - total_cell)` and never jump inside the visible area.
    pub fn resolve(&self, relative: IVec2, pan_offset: DVec2) -> DVec2 {
        let t = self.total_cell;
        DVec2::new(
            wrap(relative.x as f64 * t + pan_offset.x + t, self.width()) - t,
            wrap(relative.y as f64 * t + pan_offset.y + t, self.height()) - t,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent() -> GridExtent {
        // 1000x800 viewport, 280 cell, 20 gap
        GridExtent::new(300.0, 8, 7)
    }

    #[test]
    fn test_wrap_positive() {
        assert_eq!(wrap(300.0, 2400.0), 300.0);
        assert_eq!(wrap(2700.0, 2400.0), 300.0);
    }

    #[test]
    fn test_wrap_negative() {
        assert_eq!(wrap(-300.0, 2400.0), 2100.0);
        assert_eq!(wrap(-4800.0, 2400.0), 0.0);
        assert_eq!(wrap(-2401.5, 2400.0), 2398.5);
    }

    #[test]
    fn test_wrap_tiny_negative_stays_in_range() {
        let w = wrap(-1e-20, 2400.0);
        assert!((0.0..2400.0).contains(&w), "got {}", w);
    }

    #[test]
    fn test_extent_dimensions() {
        let e = extent();
        assert_eq!(e.width(), 2400.0);
        assert_eq!(e.height(), 2100.0);
    }

    #[test]
    fn test_origin_cell_at_rest() {
        let pos = extent().resolve(IVec2::ZERO, DVec2::ZERO);
        assert_eq!(pos, DVec2::ZERO);
    }

    #[test]
    fn test_one_full_width_is_identity() {
        let e = extent();
        for col in -4..4 {
            let cell = IVec2::new(col, 0);
            assert_eq!(
                e.resolve(cell, DVec2::ZERO),
                e.resolve(cell, DVec2::new(2400.0, 0.0))
            );
        }
    }

    #[test]
    fn test_periodicity_with_fractional_and_negative_offsets() {
        let e = extent();
        let offsets = [
            DVec2::new(-12345.5, 777.25),
            DVec2::new(0.125, -0.125),
            DVec2::new(9_000_000.0, -9_000_000.0),
        ];
        for offset in offsets {
            for (col, row) in [(-4, -3), (0, 0), (3, 3), (1, -2)] {
                let cell = IVec2::new(col, row);
                let base = e.resolve(cell, offset);
                assert_eq!(base, e.resolve(cell, offset + e.size()));
                assert_eq!(base, e.resolve(cell, offset - e.size() * 3.0));
            }
        }
    }

    #[test]
    fn test_positions_stay_in_window() {
        let e = extent();
        for step in -50..50 {
            let offset = DVec2::new(step as f64 * 137.3, step as f64 * -91.7);
            for col in -4..4 {
                for row in -3..4 {
                    let p = e.resolve(IVec2::new(col, row), offset);
                    assert!(p.x >= -300.0 && p.x < 2100.0, "x {}", p.x);
                    assert!(p.y >= -300.0 && p.y < 1800.0, "y {}", p.y);
                }
            }
        }
    }

    #[test]
    fn test_small_drag_moves_cell_one_to_one() {
        let e = extent();
        let pos = e.resolve(IVec2::new(1, 1), DVec2::new(12.5, -7.0));
        assert_eq!(pos, DVec2::new(312.5, 293.0));
    }

    #[test]
    fn test_cell_wraps_to_opposite_edge() {
        let e = extent();
        // Cell 0 dragged 301px left falls off the left edge and reappears at the right
        let pos = e.resolve(IVec2::ZERO, DVec2::new(-301.0, 0.0));
        assert_eq!(pos.x, 2099.0);
    }
}
