use crate::color::ColorName;
use crate::grid::Position;
use serde::{Deserialize, Serialize};

/// Colors handed out to agents in index order.
pub const AGENT_COLORS: [ColorName; 5] = [
    ColorName::Red,
    ColorName::Blue,
    ColorName::Purple,
    ColorName::Yellow,
    ColorName::Grey,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub index: usize,
    pub pos: Position,
    pub color: ColorName,
}

impl Agent {
    pub fn new(index: usize, pos: Position, color: ColorName) -> Self {
        Self { index, pos, color }
    }

    /// Agent colored from [`AGENT_COLORS`] by its index.
    pub fn with_default_color(index: usize, pos: Position) -> Self {
        Self::new(index, pos, AGENT_COLORS[index % AGENT_COLORS.len()])
    }
}

/// Agent movement choices; `Stay` is also the fallback for blocked moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Stay,
    Left,
    Right,
    Up,
    Down,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Stay,
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
    ];

    /// Target cell of the move, or `None` if it would leave a `width` × `height` grid.
    pub fn apply(self, pos: Position, width: usize, height: usize) -> Option<Position> {
        let target = match self {
            Action::Stay => pos,
            Action::Left => Position::new(pos.x.checked_sub(1)?, pos.y),
            Action::Right => Position::new(pos.x + 1, pos.y),
            Action::Up => Position::new(pos.x, pos.y.checked_sub(1)?),
            Action::Down => Position::new(pos.x, pos.y + 1),
        };
        (target.x < width && target.y < height).then_some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_off_the_grid_are_rejected() {
        let corner = Position::new(0, 0);
        assert_eq!(Action::Left.apply(corner, 3, 3), None);
        assert_eq!(Action::Up.apply(corner, 3, 3), None);
        assert_eq!(Action::Right.apply(corner, 3, 3), Some(Position::new(1, 0)));
        assert_eq!(Action::Down.apply(Position::new(2, 2), 3, 3), None);
        assert_eq!(Action::Stay.apply(corner, 3, 3), Some(corner));
    }

    #[test]
    fn default_colors_cycle_by_index() {
        let a = Agent::with_default_color(0, Position::new(0, 0));
        let b = Agent::with_default_color(AGENT_COLORS.len(), Position::new(1, 0));
        assert_eq!(a.color, ColorName::Red);
        assert_eq!(a.color, b.color);
    }
}
