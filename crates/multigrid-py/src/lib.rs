//! PyO3 module exposing multigrid-core seeding and tile rendering to Python.

use multigrid_core::render::render_agent_tile_raw;
use multigrid_core::Position;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pyfunction]
#[pyo3(signature = (seed = multigrid_core::DEFAULT_SEED))]
fn set_seed(seed: u64) {
    multigrid_core::set_seed(seed);
}

/// Composites one agent tile onto a row-major RGB buffer of `height` × `width`
/// pixels and returns the updated bytes.
#[pyfunction]
#[pyo3(signature = (img, width, height, x, y, agent_color, cell_state, tile_size = multigrid_core::TILE_PIXELS))]
#[allow(clippy::too_many_arguments)]
fn render_agent_tile(
    img: Vec<u8>,
    width: u32,
    height: u32,
    x: usize,
    y: usize,
    agent_color: &str,
    cell_state: &str,
    tile_size: u32,
) -> PyResult<Vec<u8>> {
    render_agent_tile_raw(
        img,
        width,
        height,
        Position::new(x, y),
        agent_color,
        cell_state,
        tile_size,
    )
    .map_err(|err| PyValueError::new_err(err.to_string()))
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_function(wrap_pyfunction!(set_seed, m)?)?;
    m.add_function(wrap_pyfunction!(render_agent_tile, m)?)?;
    Ok(())
}
