//! Grid layout: how many cells, where each one sits, and which image it shows.

use bevy::log::warn;
use bevy::math::{IVec2, Vec2};

use crate::catalog::ImageResource;
use crate::constants::OVERFILL_MARGIN;

use super::pool::ImagePool;
use super::wrap::GridExtent;

/// One tile of the grid. Its image and relative coordinate never change;
/// the whole set is rebuilt when the viewport changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    /// Column/row offset from the nominal center cell
    pub relative: IVec2,
    pub image: ImageResource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub cols: u32,
    pub rows: u32,
    pub cell_size: u32,
    pub gap: u32,
    pub cells: Vec<GridCell>,
}

impl GridLayout {
    /// Column/row counts needed to overfill `viewport` with cells of
    /// `cell_size + gap` pitch.
    ///
    /// A viewport with zero width or height gets a single cell instead of a
    /// margin-padded empty strip.
    pub fn dimensions(viewport: Vec2, cell_size: u32, gap: u32) -> (u32, u32) {
        let total_cell = cell_size.saturating_add(gap).max(1) as f32;
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            warn!(
                "Degenerate viewport {}x{}, using a 1x1 layout",
                viewport.x, viewport.y
            );
            return (1, 1);
        }

        let cols = (viewport.x / total_cell).ceil() as u32 + OVERFILL_MARGIN;
        let rows = (viewport.y / total_cell).ceil() as u32 + OVERFILL_MARGIN;
        (cols, rows)
    }

    /// Number of images the pool must provide for this viewport.
    pub fn cell_count_for(viewport: Vec2, cell_size: u32, gap: u32) -> usize {
        let (cols, rows) = Self::dimensions(viewport, cell_size, gap);
        cols as usize * rows as usize
    }

    /// Lay out cells row by row, handing out pool images in order.
    ///
    /// The pool should hold at least `cols * rows` images (see
    /// [`GridLayout::cell_count_for`]); a shorter pool is reused cyclically.
    pub fn compute(viewport: Vec2, cell_size: u32, gap: u32, pool: &ImagePool) -> Self {
        let (cols, rows) = Self::dimensions(viewport, cell_size, gap);
        if pool.is_empty() {
            warn!("Empty image pool, the layout will have no cells");
        }
        let start_col = -((cols / 2) as i32);
        let start_row = -((rows / 2) as i32);

        let mut cells = Vec::with_capacity(cols as usize * rows as usize);
        let mut index = 0;
        for row in 0..rows as i32 {
            for col in 0..cols as i32 {
                let Some(image) = pool.image_for(index) else {
                    continue;
                };
                cells.push(GridCell {
                    relative: IVec2::new(start_col + col, start_row + row),
                    image: image.clone(),
                });
                index += 1;
            }
        }

        Self {
            cols,
            rows,
            cell_size,
            gap,
            cells,
        }
    }

    pub fn total_cell(&self) -> u32 {
        self.cell_size.saturating_add(self.gap)
    }

    pub fn extent(&self) -> GridExtent {
        GridExtent::new(self.total_cell() as f64, self.cols, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::pool::build_pool;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn pool_for(viewport: Vec2, images: usize) -> ImagePool {
        let catalog: Vec<_> = (0..images)
            .map(|i| ImageResource::new(format!("gallery/{i}.png")))
            .collect();
        let mut rng = StdRng::seed_from_u64(9);
        build_pool(&catalog, GridLayout::cell_count_for(viewport, 280, 20), &mut rng).unwrap()
    }

    #[test]
    fn test_dimensions_reference_viewport() {
        assert_eq!(
            GridLayout::dimensions(Vec2::new(1000.0, 800.0), 280, 20),
            (8, 7)
        );
    }

    #[test]
    fn test_dimensions_exact_multiple() {
        // 900 / 300 = 3 exactly, no extra partial column
        assert_eq!(
            GridLayout::dimensions(Vec2::new(900.0, 300.0), 280, 20),
            (7, 5)
        );
    }

    #[test]
    fn test_degenerate_viewport_is_single_cell() {
        assert_eq!(GridLayout::dimensions(Vec2::ZERO, 280, 20), (1, 1));
        assert_eq!(
            GridLayout::dimensions(Vec2::new(1000.0, 0.0), 280, 20),
            (1, 1)
        );
    }

    #[test]
    fn test_huge_pitch_saturates_instead_of_wrapping() {
        assert_eq!(
            GridLayout::dimensions(Vec2::new(1600.0, 900.0), u32::MAX, 2),
            (5, 5)
        );
        let layout = GridLayout::compute(
            Vec2::new(1600.0, 900.0),
            u32::MAX,
            2,
            &ImagePool::default(),
        );
        assert_eq!(layout.total_cell(), u32::MAX);
    }

    #[test]
    fn test_compute_cell_count_and_centering() {
        let viewport = Vec2::new(1000.0, 800.0);
        let layout = GridLayout::compute(viewport, 280, 20, &pool_for(viewport, 27));
        assert_eq!(layout.cells.len(), 56);

        let first = &layout.cells[0];
        let last = &layout.cells[55];
        assert_eq!(first.relative, IVec2::new(-4, -3));
        assert_eq!(last.relative, IVec2::new(3, 3));
    }

    #[test]
    fn test_relative_coordinates_are_unique() {
        let viewport = Vec2::new(1600.0, 900.0);
        let layout = GridLayout::compute(viewport, 280, 20, &pool_for(viewport, 5));
        let coords: HashSet<_> = layout.cells.iter().map(|c| c.relative).collect();
        assert_eq!(coords.len(), layout.cells.len());
    }

    #[test]
    fn test_images_follow_pool_order() {
        let viewport = Vec2::new(1000.0, 800.0);
        let pool = pool_for(viewport, 27);
        let layout = GridLayout::compute(viewport, 280, 20, &pool);
        for (index, cell) in layout.cells.iter().enumerate() {
            assert_eq!(Some(&cell.image), pool.image_for(index));
        }
    }

    #[test]
    fn test_extent_matches_reference() {
        let viewport = Vec2::new(1000.0, 800.0);
        let layout = GridLayout::compute(viewport, 280, 20, &pool_for(viewport, 27));
        let extent = layout.extent();
        assert_eq!(extent.width(), 2400.0);
        assert_eq!(extent.height(), 2100.0);
    }

    #[test]
    fn test_empty_pool_gives_no_cells() {
        let layout = GridLayout::compute(
            Vec2::new(1000.0, 800.0),
            280,
            20,
            &ImagePool::default(),
        );
        assert!(layout.cells.is_empty());
        assert_eq!((layout.cols, layout.rows), (8, 7));
    }
}
