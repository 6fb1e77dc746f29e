//! The grid engine: one owned bundle of layout, pan, and pointer state.
//!
//! Input handlers mutate it through the pan controller and
//! [`GridEngine::on_pointer_move`]; once per frame the render pass asks it
//! for every cell's placement. Placements are never cached: they are a pure
//! function of the layout, the current pan offset, and the pointer.

use bevy::log::debug;
use bevy::math::{DVec2, Vec2};
use bevy::prelude::Resource;
use rand::Rng;

use crate::catalog::ImageResource;
use crate::error::GridError;
use crate::pan::{MomentumSettings, PanController};

use super::layout::{GridCell, GridLayout};
use super::pool::build_pool;
use super::proximity::ProximityScale;
use super::render::CellRenderer;

/// Where and how large one cell is drawn this frame, in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPlacement {
    /// Index into [`GridLayout::cells`]
    pub index: usize,
    /// Top-left corner
    pub position: Vec2,
    pub center: Vec2,
    pub scale: f32,
    /// Inside the band `[-total_cell, viewport + total_cell]` on both axes
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub cell_size: u32,
    pub gap: u32,
    pub momentum: MomentumSettings,
    pub proximity: ProximityScale,
}

#[derive(Resource, Debug, Clone)]
pub struct GridEngine {
    settings: EngineSettings,
    viewport: Vec2,
    layout: GridLayout,
    pan: PanController,
    pointer: Option<Vec2>,
}

impl GridEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            viewport: Vec2::ZERO,
            layout: GridLayout {
                cols: 0,
                rows: 0,
                cell_size: settings.cell_size,
                gap: settings.gap,
                cells: Vec::new(),
            },
            pan: PanController::new(settings.momentum),
            pointer: None,
        }
    }

    /// Replace the whole cell set for a new viewport.
    ///
    /// Shuffles a fresh pool from `catalog`, lays it out, and stops any
    /// drag or momentum in flight. The pan offset itself is kept. On error
    /// the previous layout stays in place.
    pub fn rebuild<R: Rng + ?Sized>(
        &mut self,
        viewport: Vec2,
        catalog: &[ImageResource],
        rng: &mut R,
    ) -> Result<(), GridError> {
        let min_length =
            GridLayout::cell_count_for(viewport, self.settings.cell_size, self.settings.gap);
        let pool = build_pool(catalog, min_length, rng)?;
        debug!(
            "Shuffled pool of {} images ({} per segment)",
            pool.len(),
            pool.segment_len()
        );

        self.layout =
            GridLayout::compute(viewport, self.settings.cell_size, self.settings.gap, &pool);
        self.viewport = viewport;
        self.pan.halt();
        Ok(())
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn pan(&self) -> &PanController {
        &self.pan
    }

    pub fn pan_mut(&mut self) -> &mut PanController {
        &mut self.pan
    }

    pub fn pan_offset(&self) -> DVec2 {
        self.pan.offset()
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Latest pointer position in screen space, `None` once it leaves.
    pub fn on_pointer_move(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer;
    }

    pub fn cell(&self, index: usize) -> Option<&GridCell> {
        self.layout.cells.get(index)
    }

    /// Placement of the cell at `index` for the current pan offset and pointer.
    pub fn placement(&self, index: usize) -> Option<CellPlacement> {
        let cell = self.layout.cells.get(index)?;
        let extent = self.layout.extent();
        let position = extent.resolve(cell.relative, self.pan.offset()).as_vec2();

        let cell_size = self.layout.cell_size as f32;
        let center = position + Vec2::splat(cell_size / 2.0);
        let scale = self.settings.proximity.scale_at(center, self.pointer);

        let total = self.layout.total_cell() as f32;
        let far = self.viewport + Vec2::splat(total);
        let visible = position.x >= -total
            && position.y >= -total
            && position.x + cell_size <= far.x
            && position.y + cell_size <= far.y;

        Some(CellPlacement {
            index,
            position,
            center,
            scale,
            visible,
        })
    }

    pub fn placements(&self) -> impl Iterator<Item = CellPlacement> + '_ {
        (0..self.layout.cells.len()).filter_map(|index| self.placement(index))
    }

    /// Hand every cell and its placement to `renderer`.
    pub fn render<T: CellRenderer + ?Sized>(&self, renderer: &mut T) {
        for placement in self.placements() {
            let cell = &self.layout.cells[placement.index];
            renderer.draw_cell(cell, &placement);
        }
    }
}
