use super::fill::TileMut;
use super::tile::{draw_grid_lines, render_agent_tile};
use super::RenderError;
use crate::agent::Agent;
use crate::color::ColorName;
use crate::grid::Grid;
use crate::seed;
use crate::world::WildfireWorld;
use image::RgbImage;
use rayon::prelude::*;

fn image_size(grid: &Grid, tile_size: u32) -> Result<(u32, u32), RenderError> {
    let too_large = RenderError::ImageTooLarge {
        width: grid.width(),
        height: grid.height(),
        tile_size,
    };
    let px = |cells: usize| {
        u32::try_from(cells)
            .ok()
            .and_then(|c| c.checked_mul(tile_size))
    };
    match (px(grid.width()), px(grid.height())) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(too_large),
    }
}

/// Draws every cell of `grid`: its state color if it holds a tree, black if
/// empty, then the grid lines.
///
/// Tile rows are drawn in parallel unless [`seed::deterministic_mode`] is set.
/// Every pixel depends only on its own cell, so both paths give the same image.
pub fn render_grid(grid: &Grid, world: &WildfireWorld) -> Result<RgbImage, RenderError> {
    let tile_size = world.tile_size();
    let (width, height) = image_size(grid, tile_size)?;
    let mut img = RgbImage::new(width, height);
    if grid.width() == 0 || grid.height() == 0 {
        return Ok(img);
    }

    let size = tile_size as usize;
    let stride = width as usize * 3;
    let empty = world.color(ColorName::Black);
    let draw_row = |(y, band): (usize, &mut [u8])| -> Result<(), RenderError> {
        for (x, cell) in grid.row(y).iter().enumerate() {
            let background = match cell {
                Some(tree) => world.state_color(tree.state)?,
                None => empty,
            };
            let mut tile = TileMut::in_band(band, stride, x, size);
            tile.fill(background);
            draw_grid_lines(&mut tile);
        }
        Ok(())
    };

    let band_len = stride * size;
    if seed::deterministic_mode() {
        img.chunks_mut(band_len).enumerate().try_for_each(draw_row)?;
    } else {
        img.par_chunks_mut(band_len)
            .enumerate()
            .try_for_each(draw_row)?;
    }
    Ok(img)
}

/// Renders one frame: the grid with agent cells emptied, then each agent's tile
/// restored from `grid`, which stays the ground truth.
///
/// Agents sharing a cell are drawn in slice order; the last one wins.
pub fn render_frame(
    grid: &Grid,
    agents: &[Agent],
    world: &WildfireWorld,
) -> Result<RgbImage, RenderError> {
    let mut primary = grid.clone();
    for agent in agents {
        primary.remove(agent.pos)?;
    }
    let mut img = render_grid(&primary, world)?;
    for agent in agents {
        render_agent_tile(&mut img, agent, grid, world)?;
    }
    Ok(img)
}
