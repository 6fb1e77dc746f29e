//! Where Gridscape reads and writes files.
//!
//! Running from the source tree (cargo run or a debug build) keeps
//! everything next to the working directory: `gridscape.json`, `logs/` and
//! the `assets/gallery` folder. An installed build keeps the config and logs
//! in the platform's user directories and reads the gallery shipped beside
//! the executable.

use std::path::PathBuf;

const APP_DIR: &str = "gridscape";
const CONFIG_FILE: &str = "gridscape.json";

/// Running from the source tree rather than an installed build.
pub fn is_dev_mode() -> bool {
    std::env::var("CARGO").is_ok() || cfg!(debug_assertions)
}

/// Directory holding `gridscape.json`. `None` when the platform has no
/// config directory.
pub fn config_dir() -> Option<PathBuf> {
    if is_dev_mode() {
        return Some(PathBuf::from("."));
    }
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

pub fn config_file() -> PathBuf {
    config_dir()
        .map(|p| p.join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// `./logs` in dev mode, otherwise `logs/` under the platform data
/// directory (falling back to `./logs`).
pub fn logs_dir() -> PathBuf {
    if is_dev_mode() {
        return PathBuf::from("./logs");
    }
    dirs::data_dir()
        .map(|p| p.join(APP_DIR).join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Root that relative gallery directories resolve against.
pub fn bundled_assets_dir() -> PathBuf {
    if is_dev_mode() {
        return PathBuf::from("assets");
    }

    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.join("assets")))
        .unwrap_or_else(|| PathBuf::from("assets"))
}

/// Create the config and log directories of an installed build.
pub fn ensure_directories() -> std::io::Result<()> {
    if is_dev_mode() {
        return Ok(());
    }

    if let Some(config) = config_dir() {
        std::fs::create_dir_all(config)?;
    }
    std::fs::create_dir_all(logs_dir())
}
