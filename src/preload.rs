//! Preload gate.
//!
//! Every catalog image is requested once at startup. The grid stays hidden
//! until each request has resolved, successfully or not, and a short settle
//! delay has passed. A failed image counts as done; its cells show the
//! placeholder instead.

use bevy::asset::LoadState;
use bevy::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

use crate::catalog::{CatalogLoaded, ImageCatalog, ImageResource};
use crate::config::GridConfig;
use crate::error::GridError;
use crate::grid::{FrameSet, GridRoot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Loading,
    Settling { waited: Duration },
    Ready,
}

/// Snapshot for a progress indicator.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreloadProgress {
    /// Images resolved so far, failures included
    pub loaded_count: usize,
    pub total_count: usize,
    pub is_ready: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct PreloadGate {
    total: usize,
    loaded: usize,
    failed: usize,
    settle_delay: Duration,
    state: GateState,
}

impl Default for PreloadGate {
    fn default() -> Self {
        Self::new(0, Duration::ZERO)
    }
}

impl PreloadGate {
    pub fn new(total: usize, settle_delay: Duration) -> Self {
        let state = if total == 0 {
            GateState::Settling {
                waited: Duration::ZERO,
            }
        } else {
            GateState::Loading
        };
        Self {
            total,
            loaded: 0,
            failed: 0,
            settle_delay,
            state,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == GateState::Ready
    }

    pub fn resolved(&self) -> usize {
        self.loaded + self.failed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Count one resolved image. Extra reports past the total are ignored.
    pub fn record(&mut self, outcome: LoadOutcome) {
        if self.resolved() >= self.total {
            return;
        }
        match outcome {
            LoadOutcome::Loaded => self.loaded += 1,
            LoadOutcome::Failed => self.failed += 1,
        }
        if self.resolved() == self.total && self.state == GateState::Loading {
            self.state = GateState::Settling {
                waited: Duration::ZERO,
            };
        }
    }

    /// Advance the settle delay. Returns `true` on the frame the gate opens.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let GateState::Settling { waited } = self.state else {
            return false;
        };
        let waited = waited + delta;
        if waited >= self.settle_delay {
            self.state = GateState::Ready;
            true
        } else {
            self.state = GateState::Settling { waited };
            false
        }
    }

    pub fn progress(&self) -> PreloadProgress {
        PreloadProgress {
            loaded_count: self.resolved(),
            total_count: self.total,
            is_ready: self.is_ready(),
        }
    }
}

/// Catalog images whose load has not resolved yet.
#[derive(Resource, Default)]
struct PendingImages {
    handles: Vec<(ImageResource, Handle<Image>)>,
}

/// Images that failed to load; cells showing them get the placeholder.
#[derive(Resource, Default)]
pub struct FailedImages {
    pub images: HashSet<ImageResource>,
}

fn start_preload(
    catalog: Res<ImageCatalog>,
    config: Res<GridConfig>,
    mut gate: ResMut<PreloadGate>,
    mut pending: ResMut<PendingImages>,
) {
    *gate = PreloadGate::new(catalog.len(), config.data.settle_delay());
    pending.handles = catalog
        .entries()
        .map(|(resource, handle)| (resource.clone(), handle.clone()))
        .collect();
}

fn poll_preload(
    asset_server: Res<AssetServer>,
    mut pending: ResMut<PendingImages>,
    mut failed: ResMut<FailedImages>,
    mut gate: ResMut<PreloadGate>,
) {
    if gate.state() != GateState::Loading {
        return;
    }
    pending
        .handles
        .retain(|(resource, handle)| match asset_server.load_state(handle) {
            LoadState::Loaded => {
                gate.record(LoadOutcome::Loaded);
                false
            }
            LoadState::Failed(err) => {
                let err = GridError::ResourceLoad {
                    path: resource.path().to_owned(),
                    reason: err.to_string(),
                };
                warn!("{}", err);
                failed.images.insert(resource.clone());
                gate.record(LoadOutcome::Failed);
                false
            }
            LoadState::NotLoaded | LoadState::Loading => true,
        });
}

fn reveal_grid(
    time: Res<Time>,
    mut gate: ResMut<PreloadGate>,
    mut progress: ResMut<PreloadProgress>,
    mut roots: Query<&mut Visibility, With<GridRoot>>,
) {
    if gate.tick(time.delta()) {
        info!(
            "All {} images resolved ({} failed), revealing grid",
            gate.progress().total_count,
            gate.failed()
        );
        for mut visibility in roots.iter_mut() {
            *visibility = Visibility::Visible;
        }
    }

    let latest = gate.progress();
    if *progress != latest {
        if !latest.is_ready {
            debug!(
                "Preloaded {}/{} images",
                latest.loaded_count, latest.total_count
            );
        }
        *progress = latest;
    }
}

pub struct PreloadPlugin;

impl Plugin for PreloadPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PreloadGate>()
            .init_resource::<PreloadProgress>()
            .init_resource::<PendingImages>()
            .init_resource::<FailedImages>()
            .add_systems(Startup, start_preload.after(CatalogLoaded))
            .add_systems(
                Update,
                (poll_preload, reveal_grid)
                    .chain()
                    .after(FrameSet::Render),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTLE: Duration = Duration::from_millis(400);

    #[test]
    fn test_waits_for_every_image() {
        let mut gate = PreloadGate::new(3, SETTLE);
        gate.record(LoadOutcome::Loaded);
        gate.record(LoadOutcome::Loaded);
        assert_eq!(gate.state(), GateState::Loading);
        assert!(!gate.tick(Duration::from_secs(5)));
        assert!(!gate.is_ready());
    }

    #[test]
    fn test_failures_count_as_done() {
        let mut gate = PreloadGate::new(2, SETTLE);
        gate.record(LoadOutcome::Failed);
        gate.record(LoadOutcome::Failed);
        assert!(matches!(gate.state(), GateState::Settling { .. }));
        assert!(gate.tick(SETTLE));
        assert!(gate.is_ready());
        assert_eq!(gate.failed(), 2);
    }

    #[test]
    fn test_settle_delay_accumulates() {
        let mut gate = PreloadGate::new(1, SETTLE);
        gate.record(LoadOutcome::Loaded);
        assert!(!gate.tick(Duration::from_millis(150)));
        assert!(!gate.tick(Duration::from_millis(150)));
        assert!(gate.tick(Duration::from_millis(150)));
        // Opening is reported once
        assert!(!gate.tick(Duration::from_millis(150)));
        assert!(gate.is_ready());
    }

    #[test]
    fn test_progress_reports_counts() {
        let mut gate = PreloadGate::new(4, SETTLE);
        gate.record(LoadOutcome::Loaded);
        gate.record(LoadOutcome::Failed);
        assert_eq!(
            gate.progress(),
            PreloadProgress {
                loaded_count: 2,
                total_count: 4,
                is_ready: false,
            }
        );
    }

    #[test]
    fn test_extra_reports_are_ignored() {
        let mut gate = PreloadGate::new(1, SETTLE);
        gate.record(LoadOutcome::Loaded);
        gate.record(LoadOutcome::Loaded);
        assert_eq!(gate.resolved(), 1);
    }

    #[test]
    fn test_empty_catalog_settles_immediately() {
        let mut gate = PreloadGate::new(0, Duration::ZERO);
        assert!(gate.tick(Duration::ZERO));
    }
}
