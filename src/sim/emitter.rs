//! Particle emitters
//!
//! Each emitter owns a bounded pool of particles, emits new ones at a
//! possibly fractional per-tick rate (the remainder carries across ticks),
//! forwards the tick's force context to its pool, and prunes dead or
//! out-of-bounds particles with an index-stable `retain`.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::particle::{Forces, Particle};

/// A particle source with a bounded pool; spawn parameters are scaled by
/// level at generation time
#[derive(Debug, Clone)]
pub struct Emitter {
    pub pos: Vec2,
    /// Particles per tick; fractions accumulate in `emit_carry`
    pub rate: f32,
    /// Emission direction (radians) and half-angle jitter around it
    pub direction: f32,
    pub spread: f32,
    /// Base launch speed, jittered per particle
    pub speed: f32,
    pub size_range: (f32, f32),
    pub decay_range: (f32, f32),
    /// Palette index handed to spawned particles
    pub color: u32,
    pub max_particles: usize,
    pub particles: Vec<Particle>,
    pub active: bool,
    emit_carry: f32,
}

impl Emitter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pos: Vec2,
        rate: f32,
        direction: f32,
        spread: f32,
        speed: f32,
        color: u32,
        max_particles: usize,
    ) -> Self {
        debug_assert!(pos.is_finite());
        debug_assert!(rate > 0.0 && speed > 0.0);
        Self {
            pos,
            rate,
            direction,
            spread,
            speed,
            size_range: (2.0, 5.0),
            decay_range: (0.003, 0.008),
            color,
            max_particles,
            particles: Vec::new(),
            active: true,
            emit_carry: 0.0,
        }
    }

    /// True while this emitter can still produce particles
    #[inline]
    pub fn can_emit(&self) -> bool {
        self.active && self.particles.len() < self.max_particles
    }

    /// Emit this tick's share of new particles, then step the whole pool
    /// under the current force fields.
    pub fn update(&mut self, rng: &mut Pcg32, forces: &Forces) {
        if self.active {
            self.emit_carry += self.rate;
            while self.emit_carry >= 1.0 {
                self.emit_carry -= 1.0;
                if self.particles.len() >= self.max_particles {
                    break;
                }
                let particle = self.spawn(rng);
                self.particles.push(particle);
            }
        }

        for particle in self.particles.iter_mut() {
            particle.step(forces);
        }
    }

    /// Drop inactive and out-of-bounds particles (index-stable)
    pub fn prune(&mut self, bounds: Vec2) {
        self.particles.retain(|p| !p.should_prune(bounds));
    }

    fn spawn(&self, rng: &mut Pcg32) -> Particle {
        let angle = self.direction + (rng.random::<f32>() - 0.5) * self.spread;
        let speed = self.speed * rng.random_range(0.7..1.3);
        let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
        let size = rng.random_range(self.size_range.0..self.size_range.1);
        let decay = rng.random_range(self.decay_range.0..self.decay_range.1);
        Particle::new(self.pos, vel, size, self.color, decay)
    }
}
