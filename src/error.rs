//! Error types for grid construction and asset loading.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// No images to build a pool from. Fatal to grid construction.
    #[error("image catalog is empty, nothing to put in the grid")]
    EmptyCatalog,

    /// A single image failed to load. The cell falls back to a placeholder.
    #[error("failed to load image {path}: {reason}")]
    ResourceLoad { path: String, reason: String },

    /// Cells must be at least one pixel and their pitch bounded.
    #[error(
        "cell size ({cell_size}) must be greater than zero and cell size plus gap ({gap}) at most {max} px"
    )]
    InvalidCellSize { cell_size: u32, gap: u32, max: u32 },

    /// A tuning value outside its usable range.
    #[error("{field} is out of range: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
}
