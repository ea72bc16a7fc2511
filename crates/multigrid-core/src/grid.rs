//! Cell grid holding the trees of a wildfire world.
//!
//! The same [`Grid`] type serves as the primary render grid (trees under agents
//! removed) and as the helper grid that keeps the ground truth for every cell.

use crate::config::ConfigError;
use crate::render::RenderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

/// Condition of the tree in a cell. Discriminants match the state indices used
/// in recorded episodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    Healthy = 0,
    OnFire = 1,
    Burnt = 2,
}

impl CellState {
    pub const ALL: [CellState; 3] = [CellState::Healthy, CellState::OnFire, CellState::Burnt];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.index() == index)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CellState::Healthy => "healthy",
            CellState::OnFire => "on_fire",
            CellState::Burnt => "burnt",
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown cell state `{0}`")]
pub struct UnknownCellState(pub String);

impl FromStr for CellState {
    type Err = UnknownCellState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownCellState(s.to_owned()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub state: CellState,
}

impl Tree {
    pub const fn new(state: CellState) -> Self {
        Self { state }
    }
}

/// Read access to the ground-truth state of a cell.
///
/// The tile compositor only ever consults this interface for state; placement
/// comes from the agent's position.
pub trait StateLookup {
    fn cell_state(&self, pos: Position) -> Result<CellState, RenderError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<Tree>>,
}

impl Grid {
    /// Empty grid of `width` columns by `height` rows.
    ///
    /// # Panics
    /// If `width * height` overflows; see [`Grid::try_new`].
    pub fn new(width: usize, height: usize) -> Self {
        Self::try_new(width, height).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(width: usize, height: usize) -> Result<Self, ConfigError> {
        Self::try_with(width, height, None)
    }

    /// Grid with a tree in every cell.
    ///
    /// # Panics
    /// If `width * height` overflows; see [`Grid::try_filled`].
    pub fn filled(width: usize, height: usize, state: CellState) -> Self {
        Self::try_filled(width, height, state).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_filled(
        width: usize,
        height: usize,
        state: CellState,
    ) -> Result<Self, ConfigError> {
        Self::try_with(width, height, Some(Tree::new(state)))
    }

    fn try_with(width: usize, height: usize, cell: Option<Tree>) -> Result<Self, ConfigError> {
        let cells = width
            .checked_mul(height)
            .ok_or(ConfigError::GridOverflow { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![cell; cells],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Position) -> Result<usize, RenderError> {
        if !self.contains(pos) {
            return Err(RenderError::PositionOutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(pos.y * self.width + pos.x)
    }

    pub fn get(&self, pos: Position) -> Result<Option<&Tree>, RenderError> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx].as_ref())
    }

    pub fn get_mut(&mut self, pos: Position) -> Result<Option<&mut Tree>, RenderError> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx].as_mut())
    }

    pub fn set(&mut self, pos: Position, tree: Option<Tree>) -> Result<(), RenderError> {
        let idx = self.index(pos)?;
        self.cells[idx] = tree;
        Ok(())
    }

    /// Takes the tree out of a cell, leaving it empty.
    pub fn remove(&mut self, pos: Position) -> Result<Option<Tree>, RenderError> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx].take())
    }

    /// Iterates cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Option<&Tree>)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Position::new(i % width, i / width), cell.as_ref()))
    }

    /// Cells of row `y`, left to right.
    pub(crate) fn row(&self, y: usize) -> &[Option<Tree>] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.map(|t| t.state) == Some(state))
            .count()
    }
}

impl StateLookup for Grid {
    fn cell_state(&self, pos: Position) -> Result<CellState, RenderError> {
        self.get(pos)?
            .map(|tree| tree.state)
            .ok_or(RenderError::StateNotRenderable { x: pos.x, y: pos.y })
    }
}
