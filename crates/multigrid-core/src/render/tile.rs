use super::fill::{fill_coords, fill_pixel_centers, point_in_circle, point_in_rect, TileMut};
use super::RenderError;
use crate::agent::Agent;
use crate::color::GRID_LINE_COLOR;
use crate::grid::StateLookup;
use crate::world::WildfireWorld;
use image::RgbImage;

/// Radius of the agent marker in normalized tile coordinates.
pub const AGENT_RADIUS: f32 = 0.25;

/// Width of the grid lines along the left and top tile edges, normalized.
pub const GRID_LINE_WIDTH: f32 = 0.031;

/// Draws the left and top grid lines of a tile.
///
/// Pixels are tested at their centre, so the lines are solid grey wherever they
/// appear. Tiles under 17 px are too coarse for any pixel centre to fall inside.
pub fn draw_grid_lines(tile: &mut TileMut<'_>) {
    fill_pixel_centers(
        tile,
        point_in_rect(0.0, GRID_LINE_WIDTH, 0.0, 1.0),
        GRID_LINE_COLOR,
    );
    fill_pixel_centers(
        tile,
        point_in_rect(0.0, 1.0, 0.0, GRID_LINE_WIDTH),
        GRID_LINE_COLOR,
    );
}

/// Redraws the tile under `agent`: the cell's true background taken from
/// `helper_grid`, the agent marker, then the grid lines.
///
/// `img` is expected to hold a frame where the agent's cell was emptied. Only
/// pixels inside the agent's tile are written, and every one of them is
/// overwritten, so repeating the call leaves the buffer unchanged.
pub fn render_agent_tile<'a, G>(
    img: &'a mut RgbImage,
    agent: &Agent,
    helper_grid: &G,
    world: &WildfireWorld,
) -> Result<&'a mut RgbImage, RenderError>
where
    G: StateLookup + ?Sized,
{
    let state = helper_grid.cell_state(agent.pos)?;
    let background = world.state_color(state)?;

    let mut tile = TileMut::new(img, agent.pos, world.tile_size())?;
    fill_coords(
        &mut tile,
        point_in_circle(0.5, 0.5, AGENT_RADIUS),
        world.color(agent.color),
        Some(background),
    );
    // Grid lines go last so the marker's background fill cannot cover them.
    draw_grid_lines(&mut tile);

    Ok(img)
}
