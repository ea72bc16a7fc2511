//! Tile compositing on plain byte buffers, for hosts that cannot share
//! [`RgbImage`] or [`Grid`](crate::grid::Grid) values.

use super::tile::render_agent_tile;
use super::RenderError;
use crate::agent::Agent;
use crate::color::{ColorName, Palette, UnknownColor};
use crate::config::{default_state_colors, ConfigError};
use crate::grid::{CellState, Position, StateLookup, UnknownCellState};
use crate::world::{StateColorMap, WildfireWorld};
use image::RgbImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RawTileError {
    #[error("buffer of {len} bytes does not hold {width}x{height} RGB pixels")]
    BufferSize { width: u32, height: u32, len: usize },
    #[error(transparent)]
    Color(#[from] UnknownColor),
    #[error(transparent)]
    State(#[from] UnknownCellState),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Ground truth for exactly one cell; every other position is out of bounds.
struct SingleCell {
    pos: Position,
    state: CellState,
}

impl StateLookup for SingleCell {
    fn cell_state(&self, pos: Position) -> Result<CellState, RenderError> {
        if pos != self.pos {
            return Err(RenderError::PositionOutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.pos.x.saturating_add(1),
                height: self.pos.y.saturating_add(1),
            });
        }
        Ok(self.state)
    }
}

/// Composites an agent of `agent_color` standing on a `cell_state` tree at
/// `pos` onto a row-major RGB buffer of `width` × `height` pixels, using the
/// default palette and state colors.
///
/// No grid is allocated for the lookup, so arbitrary coordinates fail with
/// [`RenderError::TileOutsideImage`] before any pixel is written.
pub fn render_agent_tile_raw(
    img: Vec<u8>,
    width: u32,
    height: u32,
    pos: Position,
    agent_color: &str,
    cell_state: &str,
    tile_size: u32,
) -> Result<Vec<u8>, RawTileError> {
    let color = agent_color.parse::<ColorName>()?;
    let state = cell_state.parse::<CellState>()?;
    let len = img.len();
    let mut image = RgbImage::from_raw(width, height, img).ok_or(RawTileError::BufferSize {
        width,
        height,
        len,
    })?;
    let world = WildfireWorld::new(
        Palette::default(),
        StateColorMap::from_entries(&default_state_colors()),
        tile_size,
    )?;

    let helper = SingleCell { pos, state };
    render_agent_tile(&mut image, &Agent::new(0, pos, color), &helper, &world)?;
    Ok(image.into_raw())
}
