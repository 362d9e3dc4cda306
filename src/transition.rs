//! The full-screen wipe played between top-level screens
use crate::consts;
use ratatui::{buffer::Buffer, layout::Rect};
use std::time::Duration;

/// Fraction of the duration by which the cells farthest from the centre lag
/// behind the centre cell
const MAX_DELAY: f32 = 0.5;

/// A two-phase screen wipe that holds on to a command `C` and hands it back
/// exactly once, at the moment the screen is fully covered.
///
/// While the transition is active the caller must not feed input or updates
/// to the screen underneath it.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Transition<C> {
    duration: Duration,
    timer: Duration,
    phase: Phase,
    pending: Option<C>,
    cells: Vec<Cell>,
    grid_width: u16,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Idle,
    /// The wipe is covering the old screen
    FadeOut,
    /// The wipe is uncovering the new screen
    FadeIn,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    /// Start offset as a fraction of the duration
    delay: f32,
    /// 0.0 is fully transparent; 1.0 hides whatever is beneath
    alpha: f32,
}

impl<C> Transition<C> {
    pub(crate) fn new() -> Transition<C> {
        Transition::with_duration(consts::TRANSITION_DURATION)
    }

    pub(crate) fn with_duration(duration: Duration) -> Transition<C> {
        let grid = consts::TRANSITION_GRID;
        let cx = f32::from(grid.width.saturating_sub(1)) / 2.0;
        let cy = f32::from(grid.height.saturating_sub(1)) / 2.0;
        let max_dist = cx.hypot(cy).max(f32::EPSILON);
        let mut cells = Vec::with_capacity(usize::from(grid.width) * usize::from(grid.height));
        for y in 0..grid.height {
            for x in 0..grid.width {
                let dist = (f32::from(x) - cx).hypot(f32::from(y) - cy);
                cells.push(Cell {
                    delay: dist / max_dist * MAX_DELAY,
                    alpha: 0.0,
                });
            }
        }
        Transition {
            duration,
            timer: Duration::ZERO,
            phase: Phase::Idle,
            pending: None,
            cells,
            grid_width: grid.width,
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Begin a transition that will hand back `cmd` once the screen is
    /// covered.  Does nothing, and returns `false`, if a transition is
    /// already in progress.
    pub(crate) fn start(&mut self, cmd: C) -> bool {
        if self.active() {
            return false;
        }
        self.phase = Phase::FadeOut;
        self.timer = Duration::ZERO;
        self.pending = Some(cmd);
        true
    }

    /// Advance the animation.  Returns the command passed to `start()` on
    /// the update at which the outward half finishes, and `None` otherwise.
    pub(crate) fn update(&mut self, dt: Duration) -> Option<C> {
        match self.phase {
            Phase::Idle => None,
            Phase::FadeOut => {
                self.timer = self.timer.saturating_add(dt);
                let progress = self.progress();
                for cell in &mut self.cells {
                    cell.alpha = ((progress - cell.delay) / (1.0 - cell.delay)).clamp(0.0, 1.0);
                }
                if progress >= 1.0 {
                    self.phase = Phase::FadeIn;
                    self.timer = Duration::ZERO;
                    self.pending.take()
                } else {
                    None
                }
            }
            Phase::FadeIn => {
                self.timer = self.timer.saturating_add(dt);
                let t = self.timer.as_secs_f32() / self.duration.as_secs_f32().max(f32::EPSILON);
                for cell in &mut self.cells {
                    cell.alpha = (1.0 - (t - cell.delay)).clamp(0.0, 1.0);
                }
                if self.cells.iter().all(|c| c.alpha <= 0.0) {
                    self.phase = Phase::Idle;
                    self.timer = Duration::ZERO;
                }
                None
            }
        }
    }

    /// `min(timer / duration, 1)`
    fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.timer.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    pub(crate) fn render(&self, area: Rect, buf: &mut Buffer) {
        if !self.active() || area.is_empty() {
            return;
        }
        let grid = consts::TRANSITION_GRID;
        for pos in area.positions() {
            let gx = u32::from(pos.x - area.x) * u32::from(grid.width) / u32::from(area.width);
            let gy = u32::from(pos.y - area.y) * u32::from(grid.height) / u32::from(area.height);
            let Ok(i) = usize::try_from(gy * u32::from(self.grid_width) + gx) else {
                continue;
            };
            let Some(symbol) = self.cells.get(i).and_then(|c| shade(c.alpha)) else {
                continue;
            };
            if let Some(cell) = buf.cell_mut(pos) {
                cell.set_char(symbol);
                cell.set_style(consts::TRANSITION_STYLE);
            }
        }
    }
}

/// The glyph to draw for a cell with opacity `alpha`, or `None` if the cell
/// is fully transparent
fn shade(alpha: f32) -> Option<char> {
    if alpha <= 0.0 {
        return None;
    }
    let steps = consts::TRANSITION_SHADES.len();
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    let i = ((alpha * steps as f32).ceil() as usize).clamp(1, steps) - 1;
    Some(consts::TRANSITION_SHADES[i])
}
