//! Configuration types for the layout engine.

use crate::error::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::sync::{OnceLock, RwLock};

/// Grid used for `Grid` placement and optional snapping of other requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSettings {
    /// Width of one grid cell in pixels.
    /// Default: 8.
    pub cell_width: u32,

    /// Height of one grid cell in pixels.
    /// Default: 8.
    pub cell_height: u32,

    /// Whether absolute and relative requests are snapped to the nearest cell.
    /// Default: false.
    pub snap_enabled: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            cell_width: 8,
            cell_height: 8,
            snap_enabled: false,
        }
    }
}

fn global_grid() -> &'static RwLock<GridSettings> {
    static GLOBAL: OnceLock<RwLock<GridSettings>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(GridSettings::default()))
}

impl GridSettings {
    /// Create grid settings with the given cell size and snapping disabled.
    pub fn with_cell_size(cell_width: u32, cell_height: u32) -> Self {
        Self {
            cell_width,
            cell_height,
            ..Default::default()
        }
    }

    /// Enable or disable snapping.
    pub fn snap(mut self, enabled: bool) -> Self {
        self.snap_enabled = enabled;
        self
    }

    /// The process-wide default grid.
    ///
    /// Engines copy this value at construction; later changes do not reach them.
    pub fn global_default() -> GridSettings {
        match global_grid().read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Replace the process-wide default grid.
    pub fn set_global_default(settings: GridSettings) -> Result<()> {
        settings.validate()?;
        match global_grid().write() {
            Ok(mut guard) => *guard = settings,
            Err(poisoned) => *poisoned.into_inner() = settings,
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(LayoutError::InvalidConfig(
                "grid cells must be at least 1 pixel wide and tall".to_string(),
            ));
        }
        Ok(())
    }
}

/// Combined configuration for a [`LayoutEngine`](crate::LayoutEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Grid configuration, copied into the engine.
    pub grid: GridSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: GridSettings::global_default(),
        }
    }
}

impl EngineConfig {
    /// Create an engine config with the given grid.
    pub fn with_grid(grid: GridSettings) -> Self {
        Self { grid }
    }

    /// Parse a config from JSON, e.g. `{"grid": {"cell_width": 10, ...}}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| LayoutError::InvalidConfig(format!("malformed engine config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration.
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        Ok(())
    }
}
