mod direction;
mod easter;
mod food;
mod grid;
mod paused;
mod snake;
use self::direction::Direction;
use self::easter::{EasterEggs, Egg};
use self::food::Food;
use self::grid::Bounds;
use self::paused::{PauseMenu, PauseOpt};
use self::snake::Snake;
use crate::audio::Cue;
use crate::clock::TickScheduler;
use crate::command::Command;
use crate::consts;
use crate::screen::{Context, Request, Screen};
use crate::util::{center_rect, get_display_area};
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rand::{rngs::StdRng, Rng};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Offset, Position, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
};
use std::time::Duration;

/// A round of snake: the snake, its food, and where the round is at
#[derive(Clone, Debug)]
pub(crate) struct Game<R = StdRng> {
    rng: R,
    bounds: Bounds,
    snake: Snake,
    /// `None` only once the snake has filled the board
    food: Option<Food>,
    scheduler: TickScheduler,
    phase: Phase,
    eggs: EasterEggs,
    /// Draw with plain ASCII glyphs
    retro: bool,
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(mut rng: R) -> Game<R> {
        let bounds = Bounds::from(consts::GRID_SIZE);
        let snake = Snake::new(bounds.center(), Direction::Right);
        let food = Food::spawn(bounds, &snake, &mut rng);
        Game {
            rng,
            bounds,
            snake,
            food,
            scheduler: TickScheduler::new(),
            phase: Phase::Waiting,
            eggs: EasterEggs::new(),
            retro: false,
        }
    }

    /// Start the round over without replacing the game.  Rainbow & retro
    /// modes stay as they are.
    pub(crate) fn restart(&mut self, ctx: &mut Context<'_>) {
        self.snake.reset(self.bounds.center(), Direction::Right);
        self.food = Food::spawn(self.bounds, &self.snake, &mut self.rng);
        self.scheduler.reset();
        self.phase = Phase::Waiting;
        self.eggs = EasterEggs::new();
        ctx.effects.clear();
        tracing::debug!("Game restarted");
    }

    /// Move the snake one cell and resolve whatever it runs into
    fn step(&mut self, ctx: &mut Context<'_>) {
        if !self.snake.advance(self.bounds) {
            self.end(Outcome::Collision, ctx);
            return;
        }
        let head = self.snake.head();
        if self.food.is_some_and(|f| f.position == head) {
            self.snake.grow();
            ctx.effects.burst(head);
            ctx.audio.play(Cue::Eat, ctx.settings.sound_volume());
            tracing::debug!(
                score = self.snake.score,
                interval = self.snake.tick_interval,
                "Food eaten"
            );
            self.food = Food::spawn(self.bounds, &self.snake, &mut self.rng);
            if self.food.is_none() {
                self.end(Outcome::BoardFilled, ctx);
            }
        }
    }

    fn end(&mut self, outcome: Outcome, ctx: &mut Context<'_>) {
        self.phase = Phase::GameOver(outcome);
        ctx.audio.play(Cue::GameOver, ctx.settings.sound_volume());
        if outcome == Outcome::Collision && ctx.settings.settings().screen_shake {
            ctx.effects.shake();
        }
        tracing::info!(score = self.snake.score, ?outcome, "Game over");
    }

    fn choose(&mut self, opt: PauseOpt, ctx: &mut Context<'_>) -> Option<Request> {
        match opt {
            PauseOpt::Resume => self.resume(),
            PauseOpt::Restart => self.restart(ctx),
            PauseOpt::MainMenu => return Some(Request::Menu),
            PauseOpt::Quit => return Some(Request::Quit),
        }
        None
    }
}

impl<R> Game<R> {
    #[cfg(test)]
    pub(crate) fn waiting_to_start(&self) -> bool {
        self.phase == Phase::Waiting
    }

    pub(crate) fn running(&self) -> bool {
        self.phase == Phase::Running
    }

    #[cfg(test)]
    pub(crate) fn paused(&self) -> bool {
        matches!(self.phase, Phase::Paused { .. })
    }

    #[cfg(test)]
    pub(crate) fn game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    pub(crate) fn score(&self) -> u32 {
        self.snake.score
    }

    fn start(&mut self, direction: Option<Direction>) {
        if let Some(d) = direction {
            self.snake.set_direction(d);
        }
        self.scheduler.reset();
        self.phase = Phase::Running;
    }

    fn pause(&mut self) {
        let started = match self.phase {
            Phase::Waiting => false,
            Phase::Running => true,
            Phase::Paused { .. } | Phase::GameOver(_) => return,
        };
        self.phase = Phase::Paused {
            menu: PauseMenu::new(),
            started,
        };
    }

    fn resume(&mut self) {
        if let Phase::Paused { started, .. } = self.phase {
            self.scheduler.reset();
            self.phase = if started {
                Phase::Running
            } else {
                Phase::Waiting
            };
        }
    }

    fn hatch(&mut self, egg: Egg) {
        match egg {
            Egg::Rainbow => self.snake.rainbow_mode = !self.snake.rainbow_mode,
            Egg::Retro => self.retro = !self.retro,
        }
        tracing::debug!(?egg, "Easter egg found");
    }

    fn symbols(&self) -> Glyphs {
        if self.retro {
            Glyphs {
                head: consts::RETRO_HEAD_SYMBOL,
                body: consts::RETRO_BODY_SYMBOL,
                food: consts::RETRO_FOOD_SYMBOL,
            }
        } else {
            Glyphs {
                head: consts::SNAKE_HEAD_SYMBOL,
                body: consts::SNAKE_BODY_SYMBOL,
                food: consts::FOOD_SYMBOL,
            }
        }
    }

    fn segment_style(&self, i: usize) -> Style {
        if self.snake.rainbow_mode {
            consts::SNAKE_STYLE.fg(consts::RAINBOW[i % consts::RAINBOW.len()])
        } else {
            consts::SNAKE_STYLE
        }
    }

    fn pause_area(display: Rect) -> Rect {
        center_rect(
            display,
            Size {
                width: PauseMenu::WIDTH,
                height: PauseMenu::HEIGHT,
            },
        )
    }
}

impl<R: Rng> Screen for Game<R> {
    fn update(&mut self, dt: Duration, ctx: &mut Context<'_>) -> Option<Request> {
        if self.running()
            && !ctx.overlay_open
            && self.scheduler.tick(dt, self.snake.tick_interval)
        {
            self.step(ctx);
        }
        None
    }

    fn render(&self, area: Rect, buf: &mut Buffer, ctx: &Context<'_>) {
        let display = get_display_area(area);
        let [score_area, field_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        Line::styled(format!(" Score: {}", self.snake.score), consts::SCORE_BAR_STYLE)
            .render(score_area, buf);

        let grid = self.bounds.size();
        let block_size = Size {
            width: grid
                .width
                .saturating_mul(consts::CELL_WIDTH)
                .saturating_add(2),
            height: grid.height.saturating_add(2),
        };
        let (dx, dy) = ctx.effects.shake_offset();
        let block_area = center_rect(field_area, block_size)
            .offset(Offset {
                x: i32::from(dx),
                y: i32::from(dy),
            })
            .clamp(display);
        Block::bordered().render(block_area, buf);

        let level_area = block_area.inner(Margin::new(1, 1));
        let glyphs = self.symbols();
        let mut level = Canvas {
            area: level_area,
            buf,
        };
        if let Some(food) = self.food {
            level.draw_cell(food.position, glyphs.food, consts::FOOD_STYLE);
        }
        for (i, &p) in self.snake.segments().iter().enumerate().skip(1) {
            level.draw_cell(p, glyphs.body, self.segment_style(i));
        }
        if self.phase == Phase::GameOver(Outcome::Collision) {
            level.draw_cell(
                self.snake.head(),
                consts::COLLISION_SYMBOL,
                consts::COLLISION_STYLE,
            );
        } else {
            level.draw_cell(self.snake.head(), glyphs.head, self.segment_style(0));
        }
        ctx.effects.render_particles(level_area, buf);

        match self.phase {
            Phase::Running => (),
            Phase::Waiting => {
                Line::from_iter([
                    Span::raw(" Steer with the "),
                    Span::styled("arrow keys", consts::KEY_STYLE),
                    Span::raw(" to start — Pause ("),
                    Span::styled("Esc", consts::KEY_STYLE),
                    Span::raw(")"),
                ])
                .render(msg1_area, buf);
            }
            Phase::Paused { menu, .. } => menu.render(Self::pause_area(display), buf),
            Phase::GameOver(outcome) => {
                let banner = match outcome {
                    Outcome::Collision => " — GAME OVER —",
                    Outcome::BoardFilled => " — THE BOARD IS FULL! —",
                };
                Span::from(banner).render(msg1_area, buf);
                Line::from_iter([
                    Span::raw(" Choose One: Restart ("),
                    Span::styled("r", consts::KEY_STYLE),
                    Span::raw(") — Main Menu ("),
                    Span::styled("m", consts::KEY_STYLE),
                    Span::raw(") — Quit ("),
                    Span::styled("q", consts::KEY_STYLE),
                    Span::raw(")"),
                ])
                .render(msg2_area, buf);
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent, ctx: &mut Context<'_>) -> Option<Request> {
        if let Phase::Paused { .. } = self.phase {
            if let (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(ch)) =
                (key.modifiers, key.code)
            {
                if let Some(egg) = self.eggs.feed(ch) {
                    self.hatch(egg);
                    return None;
                }
            }
        }
        let cmd = Command::from_key_event(key)?;
        match self.phase {
            Phase::Waiting => match cmd {
                Command::Quit => return Some(Request::Quit),
                Command::Up => self.start(Some(Direction::Up)),
                Command::Down => self.start(Some(Direction::Down)),
                Command::Left => self.start(Some(Direction::Left)),
                Command::Right => self.start(Some(Direction::Right)),
                Command::Enter | Command::Space => self.start(None),
                Command::Esc | Command::P => self.pause(),
                _ => (),
            },
            Phase::Running => match cmd {
                Command::Quit => return Some(Request::Quit),
                Command::Up => self.snake.set_direction(Direction::Up),
                Command::Down => self.snake.set_direction(Direction::Down),
                Command::Left => self.snake.set_direction(Direction::Left),
                Command::Right => self.snake.set_direction(Direction::Right),
                Command::Esc | Command::P => self.pause(),
                _ => (),
            },
            Phase::Paused { ref mut menu, .. } => {
                if cmd == Command::P {
                    self.resume();
                } else if let Some(opt) = menu.handle_command(cmd) {
                    return self.choose(opt, ctx);
                }
            }
            Phase::GameOver(_) => match cmd {
                Command::Enter | Command::Space | Command::R => self.restart(ctx),
                Command::Esc | Command::M => return Some(Request::Menu),
                Command::Quit | Command::Q => return Some(Request::Quit),
                _ => (),
            },
        }
        None
    }

    fn on_mouse(
        &mut self,
        mouse: MouseEvent,
        area: Rect,
        ctx: &mut Context<'_>,
    ) -> Option<Request> {
        let clicked = match mouse.kind {
            MouseEventKind::Moved => false,
            MouseEventKind::Down(MouseButton::Left) => true,
            _ => return None,
        };
        let pause_area = Self::pause_area(get_display_area(area));
        let Phase::Paused { ref mut menu, .. } = self.phase else {
            return None;
        };
        let pos = Position::new(mouse.column, mouse.row);
        let opt = menu.handle_pointer(pause_area, pos, clicked)?;
        self.choose(opt, ctx)
    }

    fn on_focus_lost(&mut self) {
        if self.running() {
            self.pause();
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    /// The snake is drawn but doesn't move until a direction is chosen
    Waiting,
    Running,
    /// `started` is whether the snake was moving before the pause
    Paused { menu: PauseMenu, started: bool },
    GameOver(Outcome),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Outcome {
    /// The snake ran into a wall or itself
    Collision,
    /// The snake covers every cell, leaving nowhere to put food
    BoardFilled,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Glyphs {
    head: &'static str,
    body: &'static str,
    food: &'static str,
}

/// Draws into a grid of logical cells, each [`consts::CELL_WIDTH`] columns
/// wide
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_cell(&mut self, pos: Position, symbol: &str, style: Style) {
        let Some(x) = pos
            .x
            .checked_mul(consts::CELL_WIDTH)
            .and_then(|x| x.checked_add(self.area.x))
        else {
            return;
        };
        let Some(y) = self.area.y.checked_add(pos.y) else {
            return;
        };
        if !self.area.contains(Position::new(x, y)) {
            return;
        }
        self.buf
            .set_string(x, y, symbol, Style::reset().patch(style));
    }
}
