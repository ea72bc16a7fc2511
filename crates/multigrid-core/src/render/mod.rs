//! Grid and agent rendering into RGB image buffers.
//!
//! Frames are drawn in three passes: the grid with agent cells emptied
//! ([`render_grid`]), then one [`render_agent_tile`] call per agent that
//! restores the cell's background from the helper grid and draws the agent
//! marker and grid lines on top. [`render_frame`] runs all three.

mod fill;
mod frame;
mod raw;
mod tile;

pub use fill::{
    fill_coords, fill_pixel_centers, point_in_circle, point_in_rect, TileMut, TileRect, SUBDIVS,
};
pub use frame::{render_frame, render_grid};
pub use raw::{render_agent_tile_raw, RawTileError};
pub use tile::{draw_grid_lines, render_agent_tile, AGENT_RADIUS, GRID_LINE_WIDTH};

use crate::grid::CellState;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("position ({x}, {y}) out of bounds for {width}x{height} grid")]
    PositionOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("cell ({x}, {y}) holds no tree; state not renderable")]
    StateNotRenderable { x: usize, y: usize },
    #[error("cell state `{0}` has no color mapping; state not renderable")]
    UnmappedState(CellState),
    #[error(
        "tile for cell ({x}, {y}) at {tile_size}px does not fit in {width}x{height} image"
    )]
    TileOutsideImage {
        x: usize,
        y: usize,
        tile_size: u32,
        width: u32,
        height: u32,
    },
    #[error("{width}x{height} grid at {tile_size}px exceeds the maximum image size")]
    ImageTooLarge {
        width: usize,
        height: usize,
        tile_size: u32,
    },
}
