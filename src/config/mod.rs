use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CELL_SIZE, DEFAULT_FRICTION, DEFAULT_GALLERY_DIR, DEFAULT_GAP, DEFAULT_MAX_BOOST,
    DEFAULT_MIN_VELOCITY, DEFAULT_PROXIMITY_RADIUS, DEFAULT_SETTLE_DELAY_MS, MAX_CELL_PITCH,
    NOMINAL_TIMESTEP,
};
use crate::error::GridError;
use crate::grid::{EngineSettings, ProximityScale};
use crate::pan::{FrictionMode, MomentumSettings};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Grid tunables persisted to disk. Every field falls back to its default
/// when missing, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfigData {
    /// Image directory, relative to the assets folder or absolute
    pub gallery_dir: PathBuf,
    pub cell_size: u32,
    pub gap: u32,
    /// Velocity multiplier per nominal 16 ms tick, in (0, 1)
    pub friction: f64,
    /// Pixels per second below which momentum stops
    pub min_velocity: f64,
    pub friction_mode: FrictionMode,
    pub proximity_radius: f32,
    pub max_boost: f32,
    pub settle_delay_ms: u64,
    /// Fixed seed for the image shuffle; random per launch when unset
    pub shuffle_seed: Option<u64>,
}

impl Default for GridConfigData {
    fn default() -> Self {
        Self {
            gallery_dir: PathBuf::from(DEFAULT_GALLERY_DIR),
            cell_size: DEFAULT_CELL_SIZE,
            gap: DEFAULT_GAP,
            friction: DEFAULT_FRICTION,
            min_velocity: DEFAULT_MIN_VELOCITY,
            friction_mode: FrictionMode::default(),
            proximity_radius: DEFAULT_PROXIMITY_RADIUS,
            max_boost: DEFAULT_MAX_BOOST,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            shuffle_seed: None,
        }
    }
}

impl GridConfigData {
    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), GridError> {
        let pitch_ok = self
            .cell_size
            .checked_add(self.gap)
            .is_some_and(|pitch| pitch <= MAX_CELL_PITCH);
        if self.cell_size == 0 || !pitch_ok {
            return Err(GridError::InvalidCellSize {
                cell_size: self.cell_size,
                gap: self.gap,
                max: MAX_CELL_PITCH,
            });
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(GridError::InvalidSetting {
                field: "friction",
                reason: format!("must be in (0, 1), got {}", self.friction),
            });
        }
        if !(self.min_velocity > 0.0) {
            return Err(GridError::InvalidSetting {
                field: "min_velocity",
                reason: format!("must be positive, got {}", self.min_velocity),
            });
        }
        if !(self.proximity_radius >= 0.0) || !(self.max_boost >= 0.0) {
            return Err(GridError::InvalidSetting {
                field: "proximity_radius/max_boost",
                reason: format!(
                    "must not be negative, got {} and {}",
                    self.proximity_radius, self.max_boost
                ),
            });
        }
        Ok(())
    }

    pub fn momentum_settings(&self) -> MomentumSettings {
        MomentumSettings {
            friction: self.friction,
            min_velocity: self.min_velocity,
            nominal_timestep: NOMINAL_TIMESTEP,
            mode: self.friction_mode,
        }
    }

    pub fn proximity(&self) -> ProximityScale {
        ProximityScale::new(self.proximity_radius, self.max_boost)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct GridConfig {
    /// The persisted configuration data
    pub data: GridConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl GridConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            cell_size: self.data.cell_size,
            gap: self.data.gap,
            momentum: self.data.momentum_settings(),
            proximity: self.data.proximity(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            data: GridConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Result of loading config from disk
struct LoadConfigResult {
    data: GridConfigData,
    /// True when no file existed and the defaults should be written out
    fresh: bool,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

/// Parse config JSON, falling back to defaults on any problem.
fn parse_config(json: &str) -> (GridConfigData, Option<String>) {
    match serde_json::from_str::<GridConfigData>(json) {
        Ok(data) => match data.validate() {
            Ok(()) => (data, None),
            Err(e) => {
                warn!("Invalid config values: {}", e);
                (
                    GridConfigData::default(),
                    Some(format!("Configuration had invalid values: {}", e)),
                )
            }
        },
        Err(e) => {
            warn!("Failed to parse config file: {}", e);
            (
                GridConfigData::default(),
                Some(format!("Configuration file was corrupted: {}", e)),
            )
        }
    }
}

fn load_config(config_path: &PathBuf) -> LoadConfigResult {
    if !config_path.exists() {
        info!("No config file found, using defaults");
        return LoadConfigResult {
            data: GridConfigData::default(),
            fresh: true,
            reset_reason: None,
        };
    }

    match std::fs::read_to_string(config_path) {
        Ok(json) => {
            let (data, reset_reason) = parse_config(&json);
            if reset_reason.is_none() {
                info!("Loaded config from {:?}", config_path);
            }
            LoadConfigResult {
                data,
                fresh: false,
                reset_reason,
            }
        }
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            LoadConfigResult {
                data: GridConfigData::default(),
                fresh: false,
                reset_reason: Some(format!("Could not read configuration file: {}", e)),
            }
        }
    }
}

fn save_config(config: &GridConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<GridConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    if let Err(e) = crate::paths::ensure_directories() {
        warn!("Failed to create config directories: {}", e);
    }

    let result = load_config(&config.config_path);
    config.data = result.data;

    // Write the defaults out on first run so they can be edited
    if result.fresh {
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }

    // Set notification if config was reset due to an error
    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<GridConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GridConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                save_config_system.run_if(on_message::<SaveConfigRequest>),
            );
    }
}
