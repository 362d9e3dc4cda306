use super::grid::Bounds;
use ratatui::layout::Position;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector of the direction, with `y` growing downwards
    pub(crate) fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Return the cell one step from `pos` in this direction, or `None` if
    /// that cell lies outside of `bounds`
    pub(crate) fn advance(self, pos: Position, bounds: Bounds) -> Option<Position> {
        let (dx, dy) = self.delta();
        let x = pos.x.checked_add_signed(i16::from(dx))?;
        let y = pos.y.checked_add_signed(i16::from(dy))?;
        let pos = Position { x, y };
        bounds.contains(pos).then_some(pos)
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}
