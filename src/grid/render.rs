//! Rendering adapters.
//!
//! The engine only produces plain placement data; anything that can draw an
//! image at a position and scale implements [`CellRenderer`]. The Bevy
//! adapter writes sprite transforms.

use bevy::prelude::*;

use super::engine::CellPlacement;
use super::layout::GridCell;

pub trait CellRenderer {
    fn draw_cell(&mut self, cell: &GridCell, placement: &CellPlacement);
}

/// Marker for the parent entity all cell sprites hang off. Its visibility is
/// the preload gate's output.
#[derive(Component)]
pub struct GridRoot;

#[derive(Component)]
pub struct CellSprite {
    pub index: usize,
}

/// Set once a sprite's source rect has been cropped to a centered square.
#[derive(Component)]
pub struct CroppedToFill;

/// Set once a sprite has been switched to the placeholder texture.
#[derive(Component)]
pub struct MissingImage;

/// Cell entities, indexed like [`super::layout::GridLayout::cells`].
#[derive(Resource, Default)]
pub struct CellEntities {
    pub root: Option<Entity>,
    pub cells: Vec<Entity>,
}

/// Convert a screen-space point (top-left origin, y down) into 2D world space
/// for a camera centered on the window (center origin, y up).
pub fn screen_to_world(point: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(point.x - viewport.x / 2.0, viewport.y / 2.0 - point.y)
}

/// Source rect that crops an image of `size` to its centered square, the
/// way `object-fit: cover` fills a square cell.
pub fn cover_rect(size: UVec2) -> Rect {
    let w = size.x as f32;
    let h = size.y as f32;
    let side = w.min(h);
    let x0 = (w - side) / 2.0;
    let y0 = (h - side) / 2.0;
    Rect::new(x0, y0, x0 + side, y0 + side)
}

/// Transform and visibility of every cell sprite.
pub type CellSpriteQuery<'w, 's> = Query<
    'w,
    's,
    (&'static mut Transform, &'static mut Visibility),
    With<CellSprite>,
>;

/// Writes placements into cell sprite transforms.
pub struct SpriteRenderer<'a, 'w, 's> {
    pub viewport: Vec2,
    pub entities: &'a [Entity],
    pub sprites: &'a mut CellSpriteQuery<'w, 's>,
}

impl CellRenderer for SpriteRenderer<'_, '_, '_> {
    fn draw_cell(&mut self, _cell: &GridCell, placement: &CellPlacement) {
        let Some(&entity) = self.entities.get(placement.index) else {
            return;
        };
        let Ok((mut transform, mut visibility)) = self.sprites.get_mut(entity) else {
            return;
        };

        let world = screen_to_world(placement.center, self.viewport);
        // Magnified cells draw above their neighbours
        let z = (placement.scale - 1.0) * 10.0;
        let target = Transform::from_xyz(world.x, world.y, z)
            .with_scale(Vec3::new(placement.scale, placement.scale, 1.0));
        if *transform != target {
            *transform = target;
        }

        let wanted = if placement.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
}
