//! Rendering and reproducibility support for grid-based multi-agent wildfire
//! simulations.
//!
//! [`seed::set_seed`] fixes every random source in the process. The
//! [`render`] module composites agent tiles onto rendered grids, and
//! [`export`] turns rendered episodes into GIF animations.

pub mod agent;
pub mod color;
pub mod config;
pub mod export;
pub mod grid;
pub mod render;
pub mod seed;
pub mod sim;
pub mod world;

pub use agent::Agent;
pub use color::{ColorName, Palette};
pub use config::{ConfigError, SimConfig, TILE_PIXELS};
pub use export::{save_frames_as_gif, ExportError};
pub use grid::{CellState, Grid, Position, StateLookup, Tree};
pub use render::{render_agent_tile, render_frame, render_grid, RenderError};
pub use seed::{set_seed, DEFAULT_SEED};
pub use sim::{SimError, WildfireSim};
pub use world::{StateColorMap, WildfireWorld};
