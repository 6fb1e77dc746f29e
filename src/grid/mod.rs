mod engine;
mod layout;
mod pool;
mod proximity;
mod render;
mod wrap;


pub use engine::{EngineSettings, GridEngine};
pub use proximity::ProximityScale;
pub use render::GridRoot;

use render::{
    cover_rect, CellEntities, CellSprite, CellSpriteQuery, CroppedToFill, MissingImage,
    SpriteRenderer,
};

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::catalog::{CatalogLoaded, ImageCatalog, PlaceholderTexture};
use crate::config::GridConfig;
use crate::constants::{DEFAULT_CELL_SIZE, DEFAULT_GAP};
use crate::pan::MomentumSettings;
use crate::preload::{FailedImages, PreloadGate};

/// Per-frame ordering: input, then motion, then layout, then placement.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    Simulate,
    Layout,
    Render,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            gap: DEFAULT_GAP,
            momentum: MomentumSettings::default(),
            proximity: ProximityScale::default(),
        }
    }
}

impl Default for GridEngine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

/// Random source for image shuffles
#[derive(Resource)]
pub struct ShuffleRng(pub StdRng);

impl Default for ShuffleRng {
    fn default() -> Self {
        Self(StdRng::from_os_rng())
    }
}

/// Set when the grid could not be built (no images); shown as a dialog.
#[derive(Resource, Default)]
pub struct GridBuildError {
    pub message: Option<String>,
}

/// Everything needed to rebuild the grid and respawn its sprites.
#[derive(SystemParam)]
pub struct GridBuilder<'w, 's> {
    commands: Commands<'w, 's>,
    engine: ResMut<'w, GridEngine>,
    rng: ResMut<'w, ShuffleRng>,
    catalog: Res<'w, ImageCatalog>,
    entities: ResMut<'w, CellEntities>,
    build_error: ResMut<'w, GridBuildError>,
    gate: Res<'w, PreloadGate>,
}

impl GridBuilder<'_, '_> {
    /// Rebuild the layout for `viewport` and replace every cell sprite.
    fn rebuild(&mut self, viewport: Vec2) {
        let rng = &mut self.rng.0;
        if let Err(e) = self.engine.rebuild(viewport, self.catalog.resources(), rng) {
            error!("Cannot build grid: {}", e);
            self.build_error.message = Some(e.to_string());
            return;
        }
        self.build_error.message = None;

        if let Some(root) = self.entities.root.take() {
            self.commands.entity(root).despawn();
        }

        let root_visibility = if self.gate.is_ready() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        let root = self
            .commands
            .spawn((GridRoot, Transform::default(), root_visibility))
            .id();

        let layout = self.engine.layout();
        let cell_size = Vec2::splat(layout.cell_size as f32);
        let mut cells = Vec::with_capacity(layout.cells.len());
        for (index, cell) in layout.cells.iter().enumerate() {
            let image = self.catalog.handle(&cell.image).cloned().unwrap_or_default();
            let entity = self
                .commands
                .spawn((
                    CellSprite { index },
                    Sprite {
                        image,
                        custom_size: Some(cell_size),
                        ..default()
                    },
                    Transform::default(),
                    Visibility::Hidden,
                    ChildOf(root),
                ))
                .id();
            cells.push(entity);
        }

        let extent = layout.extent().size();
        info!(
            "Built {}x{} grid ({} cells, {}x{} extent) for {}x{} viewport",
            layout.cols,
            layout.rows,
            cells.len(),
            extent.x,
            extent.y,
            viewport.x,
            viewport.y
        );
        self.entities.root = Some(root);
        self.entities.cells = cells;
    }
}

/// Apply config and build the first grid for the window's current size.
fn build_initial_grid(
    config: Res<GridConfig>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut builder: GridBuilder,
) {
    *builder.engine = GridEngine::new(config.engine_settings());
    if let Some(seed) = config.data.shuffle_seed {
        builder.rng.0 = StdRng::seed_from_u64(seed);
    }

    let Ok(window) = window_query.single() else {
        warn!("No primary window, grid not built");
        return;
    };
    builder.rebuild(Vec2::new(window.width(), window.height()));
}

/// Full rebuild whenever the window size actually changes.
fn rebuild_on_resize(mut resized: MessageReader<WindowResized>, mut builder: GridBuilder) {
    let Some(last) = resized.read().last() else {
        return;
    };
    let viewport = Vec2::new(last.width, last.height);
    if viewport != builder.engine.viewport() {
        builder.rebuild(viewport);
    }
}

/// The per-frame pass: position and scale for every cell.
fn apply_placements(
    engine: Res<GridEngine>,
    entities: Res<CellEntities>,
    mut sprites: CellSpriteQuery,
) {
    let mut renderer = SpriteRenderer {
        viewport: engine.viewport(),
        entities: &entities.cells,
        sprites: &mut sprites,
    };
    engine.render(&mut renderer);
}

/// Swap failed images for the placeholder tile.
fn apply_placeholders(
    mut commands: Commands,
    failed: Res<FailedImages>,
    placeholder: Res<PlaceholderTexture>,
    engine: Res<GridEngine>,
    mut sprites: Query<(Entity, &CellSprite, &mut Sprite), Without<MissingImage>>,
) {
    if failed.images.is_empty() {
        return;
    }
    for (entity, cell_sprite, mut sprite) in sprites.iter_mut() {
        let Some(cell) = engine.cell(cell_sprite.index) else {
            continue;
        };
        if failed.images.contains(&cell.image) {
            sprite.image = placeholder.handle.clone();
            sprite.rect = None;
            commands.entity(entity).insert(MissingImage);
        }
    }
}

/// Crop each loaded image to its centered square so it fills the cell.
fn crop_to_fill(
    mut commands: Commands,
    images: Res<Assets<Image>>,
    mut sprites: Query<
        (Entity, &mut Sprite),
        (With<CellSprite>, Without<CroppedToFill>, Without<MissingImage>),
    >,
) {
    for (entity, mut sprite) in sprites.iter_mut() {
        let Some(image) = images.get(&sprite.image) else {
            continue;
        };
        sprite.rect = Some(cover_rect(image.size()));
        commands.entity(entity).insert(CroppedToFill);
    }
}

pub struct GridPlugin;

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GridEngine>()
            .init_resource::<ShuffleRng>()
            .init_resource::<CellEntities>()
            .init_resource::<GridBuildError>()
            .configure_sets(
                Update,
                (
                    FrameSet::Input,
                    FrameSet::Simulate,
                    FrameSet::Layout,
                    FrameSet::Render,
                )
                    .chain(),
            )
            .add_systems(Startup, build_initial_grid.after(CatalogLoaded))
            .add_systems(Update, rebuild_on_resize.in_set(FrameSet::Layout))
            .add_systems(
                Update,
                (apply_placements, apply_placeholders, crop_to_fill).in_set(FrameSet::Render),
            );
    }
}
