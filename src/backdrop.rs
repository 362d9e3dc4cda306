//! Decorations drawn behind every screen
use crate::consts;
use rand::{rngs::StdRng, Rng};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Widget},
};
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct Backdrop {
    leaves: Vec<Leaf>,
    show_border: bool,
    rng: StdRng,
}

/// A leaf drifting down the screen.  Coordinates are fractions of the
/// drawing area.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Leaf {
    x: f32,
    y: f32,
    /// Fraction of the screen height fallen per second
    speed: f32,
    /// Fraction of the screen width blown sideways per second
    drift: f32,
}

impl Backdrop {
    pub(crate) fn new(mut rng: StdRng) -> Backdrop {
        let leaves = (0..consts::LEAF_COUNT)
            .map(|_| {
                let mut leaf = Leaf::random(&mut rng);
                leaf.y = rng.random();
                leaf
            })
            .collect();
        Backdrop {
            leaves,
            show_border: false,
            rng,
        }
    }

    #[cfg(test)]
    pub(crate) fn show_border(&self) -> bool {
        self.show_border
    }

    /// Flip whether a border is drawn around the screen and return the new
    /// state
    pub(crate) fn toggle_border(&mut self) -> bool {
        self.show_border = !self.show_border;
        self.show_border
    }

    pub(crate) fn update(&mut self, dt: Duration) {
        let secs = dt.as_secs_f32();
        for leaf in &mut self.leaves {
            leaf.y += leaf.speed * secs;
            leaf.x = (leaf.x + leaf.drift * secs).rem_euclid(1.0);
            if leaf.y >= 1.0 {
                *leaf = Leaf::random(&mut self.rng);
            }
        }
    }

    /// Draw the leaves into the blank cells of `area`
    pub(crate) fn render_leaves(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        for leaf in &self.leaves {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (dx, dy) = (
                (leaf.x * f32::from(area.width)) as u16,
                (leaf.y * f32::from(area.height)) as u16,
            );
            let x = area.x.saturating_add(dx.min(area.width - 1));
            let y = area.y.saturating_add(dy.min(area.height - 1));
            if let Some(cell) = buf.cell_mut((x, y)) {
                if cell.symbol() == " " {
                    cell.set_char(consts::LEAF_SYMBOL);
                    cell.set_style(consts::LEAF_STYLE);
                }
            }
        }
    }

    /// Draw the border, if enabled, around `area`
    pub(crate) fn render_border(&self, area: Rect, buf: &mut Buffer) {
        if self.show_border {
            Block::bordered().render(area, buf);
        }
    }
}

impl Leaf {
    fn random(rng: &mut StdRng) -> Leaf {
        Leaf {
            x: rng.random(),
            y: 0.0,
            speed: rng.random_range(0.02..0.08),
            drift: rng.random_range(-0.02..0.02),
        }
    }
}
