//! Purely cosmetic gameplay effects: eat bursts and screen shake
use crate::consts;
use rand::{rngs::StdRng, Rng};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
};
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct Effects {
    particles: Vec<Particle>,
    shake: Duration,
    shake_offset: (i16, i16),
    rng: StdRng,
}

/// A speck flying away from an eaten piece of food, in grid coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    age: Duration,
}

impl Effects {
    pub(crate) fn new(rng: StdRng) -> Effects {
        Effects {
            particles: Vec::new(),
            shake: Duration::ZERO,
            shake_offset: (0, 0),
            rng,
        }
    }

    /// Spray particles out of the grid cell `at`
    pub(crate) fn burst(&mut self, at: Position) {
        for _ in 0..consts::BURST_PARTICLES {
            let angle: f32 = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed: f32 = self.rng.random_range(4.0..9.0);
            self.particles.push(Particle {
                x: f32::from(at.x) + 0.5,
                y: f32::from(at.y) + 0.5,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                age: Duration::ZERO,
            });
        }
    }

    /// Start shaking the screen
    pub(crate) fn shake(&mut self) {
        self.shake = consts::SHAKE_DURATION;
    }

    pub(crate) fn shaking(&self) -> bool {
        !self.shake.is_zero()
    }

    /// How far to displace the playing field this frame, in columns & rows
    pub(crate) fn shake_offset(&self) -> (i16, i16) {
        self.shake_offset
    }

    #[cfg(test)]
    pub(crate) fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub(crate) fn clear(&mut self) {
        self.particles.clear();
        self.shake = Duration::ZERO;
        self.shake_offset = (0, 0);
    }

    pub(crate) fn update(&mut self, dt: Duration) {
        let secs = dt.as_secs_f32();
        for p in &mut self.particles {
            p.x += p.vx * secs;
            p.y += p.vy * secs;
            p.age = p.age.saturating_add(dt);
        }
        self.particles.retain(|p| p.age < consts::PARTICLE_LIFETIME);
        self.shake = self.shake.saturating_sub(dt);
        self.shake_offset = if self.shaking() {
            (self.rng.random_range(-2..=2), self.rng.random_range(-1..=1))
        } else {
            (0, 0)
        };
    }

    /// Draw the particles over a grid drawn in `level_area`
    pub(crate) fn render_particles(&self, level_area: Rect, buf: &mut Buffer) {
        for p in &self.particles {
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (gx, gy) = (p.x as u16, p.y as u16);
            let Some(x) = gx
                .checked_mul(consts::CELL_WIDTH)
                .and_then(|x| x.checked_add(level_area.x))
            else {
                continue;
            };
            let Some(y) = gy.checked_add(level_area.y) else {
                continue;
            };
            if !level_area.contains(Position::new(x, y)) {
                continue;
            }
            let fade = p.age.as_secs_f32() / consts::PARTICLE_LIFETIME.as_secs_f32();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let idx = ((fade * 3.0) as usize).min(consts::PARTICLE_SYMBOLS.len() - 1);
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(consts::PARTICLE_SYMBOLS[idx]);
                cell.set_style(consts::PARTICLE_STYLE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn effects() -> Effects {
        Effects::new(StdRng::seed_from_u64(0x0123456789ABCDEF))
    }

    #[test]
    fn burst_expires() {
        let mut fx = effects();
        fx.burst(Position::new(8, 8));
        assert_eq!(fx.particle_count(), consts::BURST_PARTICLES);
        fx.update(Duration::from_millis(100));
        assert_eq!(fx.particle_count(), consts::BURST_PARTICLES);
        fx.update(consts::PARTICLE_LIFETIME);
        assert_eq!(fx.particle_count(), 0);
    }

    #[test]
    fn shake_settles() {
        let mut fx = effects();
        fx.shake();
        assert!(fx.shaking());
        fx.update(consts::SHAKE_DURATION);
        assert!(!fx.shaking());
        assert_eq!(fx.shake_offset(), (0, 0));
    }

    #[test]
    fn particles_stay_inside_level() {
        let mut fx = effects();
        fx.burst(Position::new(0, 0));
        fx.update(Duration::from_millis(200));
        let level = Rect::new(10, 2, 34, 17);
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        fx.render_particles(level, &mut buf);
        for pos in buf.area.positions() {
            if !level.contains(pos) {
                assert_eq!(buf[pos].symbol(), " ");
            }
        }
    }
}
