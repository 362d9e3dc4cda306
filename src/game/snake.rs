use super::direction::Direction;
use super::grid::Bounds;
use crate::consts;
use ratatui::layout::Position;
use std::collections::VecDeque;

/// Snake state.  Snate.
///
/// All positions are relative to the top-left corner of the grid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    /// The cells occupied by the snake, head first
    pub(crate) segments: VecDeque<Position>,

    /// The direction applied at the most recent tick
    pub(crate) direction: Direction,

    /// The most recently requested direction, applied at the next tick
    pub(crate) pending_direction: Direction,

    /// The number of segments the snake is allowed to have.  The segment
    /// list catches up with this one tick after a call to `grow()`.
    pub(crate) length: usize,

    pub(crate) score: u32,

    /// Milliseconds between movements
    pub(crate) tick_interval: u64,

    pub(crate) rainbow_mode: bool,
}

impl Snake {
    pub(crate) fn new(head: Position, direction: Direction) -> Snake {
        Snake {
            segments: VecDeque::from([head]),
            direction,
            pending_direction: direction,
            length: consts::INITIAL_SNAKE_LENGTH,
            score: 0,
            tick_interval: consts::BASE_TICK_MS,
            rainbow_mode: false,
        }
    }

    /// Put the snake back into its starting state without replacing it.
    /// `rainbow_mode` is left alone.
    pub(crate) fn reset(&mut self, head: Position, direction: Direction) {
        self.segments.clear();
        self.segments.push_back(head);
        self.direction = direction;
        self.pending_direction = direction;
        self.length = consts::INITIAL_SNAKE_LENGTH;
        self.score = 0;
        self.tick_interval = consts::BASE_TICK_MS;
    }

    pub(crate) fn head(&self) -> Position {
        self.segments[0]
    }

    pub(crate) fn segments(&self) -> &VecDeque<Position> {
        &self.segments
    }

    pub(crate) fn occupies(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    /// Request a turn at the next tick.  A request to reverse the current
    /// direction is ignored.
    pub(crate) fn set_direction(&mut self, direction: Direction) {
        if direction != self.direction.reverse() {
            self.pending_direction = direction;
        }
    }

    /// Move the snake forwards one cell.  Returns `false`, leaving the
    /// segments untouched, if the snake would leave `bounds` or run into its
    /// own body.
    pub(crate) fn advance(&mut self, bounds: Bounds) -> bool {
        self.direction = self.pending_direction;
        let Some(head) = self.direction.advance(self.head(), bounds) else {
            return false;
        };
        if self.segments.iter().skip(1).any(|&p| p == head) {
            return false;
        }
        self.segments.push_front(head);
        while self.segments.len() > self.length {
            let _ = self.segments.pop_back();
        }
        true
    }

    /// Lengthen the snake and score a point in response to eating food, then
    /// recompute the speed.
    pub(crate) fn grow(&mut self) {
        self.length += 1;
        self.score += consts::SCORE_PER_FOOD;
        let steps = u64::from(self.score / consts::SCORE_THRESHOLD);
        self.tick_interval = consts::BASE_TICK_MS
            .saturating_sub(consts::SPEED_STEP_MS.saturating_mul(steps))
            .max(consts::MIN_TICK_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BOUNDS: Bounds = Bounds {
        width: 17,
        height: 17,
    };

    fn snake_at(head: Position, direction: Direction) -> Snake {
        Snake::new(head, direction)
    }

    #[rstest]
    #[case(Direction::Up)]
    #[case(Direction::Down)]
    #[case(Direction::Left)]
    #[case(Direction::Right)]
    fn no_reversal(#[case] d: Direction) {
        let mut snake = snake_at(Position::new(8, 8), d);
        snake.set_direction(d.reverse());
        assert_eq!(snake.pending_direction, d);
    }

    #[test]
    fn reversal_blocked_against_current_not_pending() {
        let mut snake = snake_at(Position::new(8, 8), Direction::Right);
        snake.set_direction(Direction::Up);
        // Left is the reverse of the current direction, even though Up is
        // buffered.
        snake.set_direction(Direction::Left);
        assert_eq!(snake.pending_direction, Direction::Up);
    }

    #[test]
    fn last_request_wins() {
        let mut snake = snake_at(Position::new(8, 8), Direction::Right);
        snake.set_direction(Direction::Up);
        snake.set_direction(Direction::Down);
        assert_eq!(snake.direction, Direction::Right);
        assert!(snake.advance(BOUNDS));
        assert_eq!(snake.direction, Direction::Down);
        assert_eq!(snake.head(), Position::new(8, 9));
    }

    #[test]
    fn three_steps_right() {
        let mut snake = snake_at(Position::new(8, 8), Direction::Right);
        let mut heads = Vec::new();
        for _ in 0..3 {
            assert!(snake.advance(BOUNDS));
            heads.push(snake.head());
            assert_eq!(snake.segments().len(), 1);
        }
        assert_eq!(
            heads,
            [Position::new(9, 8), Position::new(10, 8), Position::new(11, 8)]
        );
    }

    #[test]
    fn straight_line_until_wall() {
        let mut snake = snake_at(Position::new(3, 5), Direction::Up);
        let mut expected_y = 5;
        while snake.advance(BOUNDS) {
            expected_y -= 1;
            assert_eq!(snake.head(), Position::new(3, expected_y));
        }
        assert_eq!(expected_y, 0);
        assert_eq!(snake.head(), Position::new(3, 0));
    }

    #[test]
    fn wall_collision_leaves_segments() {
        let mut snake = snake_at(Position::new(16, 8), Direction::Right);
        let before = snake.segments().clone();
        assert!(!snake.advance(BOUNDS));
        assert_eq!(snake.segments(), &before);
    }

    #[test]
    fn growth_lags_one_tick() {
        let mut snake = snake_at(Position::new(8, 8), Direction::Right);
        assert!(snake.advance(BOUNDS));
        let before = snake.segments().len();
        snake.grow();
        assert_eq!(snake.segments().len(), before);
        assert!(snake.advance(BOUNDS));
        assert_eq!(snake.segments().len(), before + 1);
        assert!(snake.advance(BOUNDS));
        assert_eq!(snake.segments().len(), before + 1);
    }

    #[test]
    fn self_collision() {
        let mut snake = snake_at(Position::new(5, 5), Direction::Right);
        snake.segments = VecDeque::from([
            Position::new(5, 5),
            Position::new(4, 5),
            Position::new(4, 6),
            Position::new(5, 6),
            Position::new(6, 6),
        ]);
        snake.length = 5;
        snake.set_direction(Direction::Down);
        let before = snake.segments().clone();
        assert!(!snake.advance(BOUNDS));
        assert_eq!(snake.segments(), &before);
    }

    #[rstest]
    #[case(0, 150)]
    #[case(4, 150)]
    #[case(5, 140)]
    #[case(9, 140)]
    #[case(10, 130)]
    #[case(45, 60)]
    #[case(200, 60)]
    fn speed_staircase(#[case] score: u32, #[case] interval: u64) {
        let mut snake = snake_at(Position::new(8, 8), Direction::Right);
        snake.score = score.saturating_sub(1);
        if score > 0 {
            snake.grow();
        }
        assert_eq!(snake.score, score);
        assert_eq!(snake.tick_interval, interval);
    }

    #[test]
    fn reset_in_place() {
        let mut snake = snake_at(Position::new(8, 8), Direction::Right);
        snake.rainbow_mode = true;
        snake.grow();
        assert!(snake.advance(BOUNDS));
        assert!(snake.advance(BOUNDS));
        snake.reset(Position::new(8, 8), Direction::Right);
        assert_eq!(snake.segments(), &VecDeque::from([Position::new(8, 8)]));
        assert_eq!(snake.score, 0);
        assert_eq!(snake.length, consts::INITIAL_SNAKE_LENGTH);
        assert_eq!(snake.tick_interval, consts::BASE_TICK_MS);
        assert!(snake.rainbow_mode);
    }
}
