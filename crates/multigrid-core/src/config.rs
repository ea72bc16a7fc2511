use crate::color::ColorName;
use crate::grid::CellState;
use crate::seed::DEFAULT_SEED;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Pixels per grid cell edge.
pub const TILE_PIXELS: u32 = 32;

/// Default state → color table: healthy trees green, burning trees orange,
/// burnt trees brown.
pub fn default_state_colors() -> BTreeMap<CellState, ColorName> {
    BTreeMap::from([
        (CellState::Healthy, ColorName::Green),
        (CellState::OnFire, ColorName::Orange),
        (CellState::Burnt, ColorName::Brown),
    ])
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tile_size must be positive")]
    InvalidTileSize,
    #[error("grid must have at least one cell, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("grid of {width}x{height} cells cannot be addressed")]
    GridOverflow { width: usize, height: usize },
    #[error("grid of {cells} cells exceeds supported maximum ({max})")]
    GridTooLarge { max: usize, cells: usize },
    #[error("{agents} agents do not fit on a grid of {cells} cells")]
    TooManyAgents { agents: usize, cells: usize },
    #[error("{fires} initial fires do not fit on a grid of {cells} cells")]
    TooManyFires { fires: usize, cells: usize },
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("cell state `{0}` has no color mapping")]
    UnmappedState(CellState),
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for one wildfire run and how it is drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    pub grid_width: usize,
    pub grid_height: usize,
    pub num_agents: usize,
    pub initial_fires: usize,
    pub spread_probability: f64,
    pub burnout_probability: f64,
    pub max_steps: usize,
    pub tile_size: u32,
    pub state_colors: BTreeMap<CellState, ColorName>,
    /// Palette entries replacing the defaults, as `[r, g, b]`.
    pub palette: BTreeMap<ColorName, [u8; 3]>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            grid_width: 16,
            grid_height: 16,
            num_agents: 2,
            initial_fires: 1,
            spread_probability: 0.15,
            burnout_probability: 0.1,
            max_steps: 100,
            tile_size: TILE_PIXELS,
            state_colors: default_state_colors(),
            palette: BTreeMap::new(),
        }
    }
}

impl SimConfig {
    pub const MAX_GRID_CELLS: usize = 1 << 20;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size == 0 {
            return Err(ConfigError::InvalidTileSize);
        }
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        let cells = self
            .grid_width
            .checked_mul(self.grid_height)
            .filter(|&cells| cells <= Self::MAX_GRID_CELLS)
            .ok_or(ConfigError::GridTooLarge {
                max: Self::MAX_GRID_CELLS,
                cells: self.grid_width.saturating_mul(self.grid_height),
            })?;
        if self.num_agents > cells {
            return Err(ConfigError::TooManyAgents {
                agents: self.num_agents,
                cells,
            });
        }
        if self.initial_fires > cells {
            return Err(ConfigError::TooManyFires {
                fires: self.initial_fires,
                cells,
            });
        }
        for (name, value) in [
            ("spread_probability", self.spread_probability),
            ("burnout_probability", self.burnout_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        if let Some(&missing) = CellState::ALL
            .iter()
            .find(|s| !self.state_colors.contains_key(s))
        {
            return Err(ConfigError::UnmappedState(missing));
        }
        // Pixel extent of the whole grid must be addressable by the image buffer.
        let width_px = (self.grid_width as u64) * u64::from(self.tile_size);
        let height_px = (self.grid_height as u64) * u64::from(self.tile_size);
        if width_px > u64::from(u32::MAX) || height_px > u64::from(u32::MAX) {
            return Err(ConfigError::GridTooLarge {
                max: Self::MAX_GRID_CELLS,
                cells,
            });
        }
        Ok(())
    }

    /// Reads and validates a JSON config. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: SimConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}
