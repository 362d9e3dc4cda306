use super::grid::Bounds;
use super::snake::Snake;
use rand::{seq::IteratorRandom, Rng};
use ratatui::layout::Position;

/// The single piece of food on the grid
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Food {
    pub(crate) position: Position,
}

impl Food {
    /// Place food on a random cell of `bounds` not occupied by `snake`.
    /// Returns `None` if the snake fills the whole grid.
    pub(crate) fn spawn<R: Rng>(bounds: Bounds, snake: &Snake, rng: &mut R) -> Option<Food> {
        bounds
            .positions()
            .filter(|&p| !snake.occupies(p))
            .choose(rng)
            .map(|position| Food { position })
    }
}
