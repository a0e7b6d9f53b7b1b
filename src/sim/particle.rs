//! Particle physics integration
//!
//! One particle, one tick, one fixed force order: gravity, path-follow,
//! obstacle avoidance, magnet, time-slow, friction, Euler step, trail,
//! life decay. Collision tests run strictly after this step, in the tick
//! orchestrator.

use glam::Vec2;

use super::geom::closest_point_on_segment;
use super::path::Path;
use super::state::{CollectionPoint, Obstacle};
use crate::consts::*;

/// Force-field context for one tick, shared by every particle
///
/// Borrowed read-only from the session state; the two booleans are the only
/// power-up knowledge the integrator has.
#[derive(Clone, Copy)]
pub struct Forces<'a> {
    pub paths: &'a [Path],
    pub obstacles: &'a [Obstacle],
    pub collection_points: &'a [CollectionPoint],
    pub magnet: bool,
    pub time_slow: bool,
}

/// A physically simulated particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Palette index for the renderer
    pub color: u32,
    /// Remaining life in [0, 1], 1 = fresh
    pub life: f32,
    /// Life lost per tick
    pub decay: f32,
    /// Added to vertical velocity each tick
    pub gravity: f32,
    /// Past positions, oldest first, capped at `TRAIL_LENGTH`
    pub trail: Vec<Vec2>,
    pub active: bool,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, size: f32, color: u32, decay: f32) -> Self {
        debug_assert!(pos.is_finite() && vel.is_finite());
        debug_assert!(size > 0.0);
        debug_assert!(decay > 0.0);
        Self {
            pos,
            vel,
            size,
            color,
            life: 1.0,
            decay,
            gravity: PARTICLE_GRAVITY,
            trail: Vec::with_capacity(TRAIL_LENGTH),
            active: true,
        }
    }

    /// Advance one tick under the current force fields.
    ///
    /// Force accumulation completes before friction and integration; the
    /// ordering is load-bearing for game feel and must not be rearranged.
    pub fn step(&mut self, forces: &Forces) {
        if !self.active {
            return;
        }

        // Gravity
        self.vel.y += self.gravity;

        // Path attraction: globally closest segment point across all
        // active paths, linear falloff to zero at the threshold
        if let Some((target, dist)) = nearest_path_point(self.pos, forces.paths) {
            if dist < PATH_ATTRACT_RADIUS {
                let strength = PATH_FOLLOW_FORCE * (1.0 - dist / PATH_ATTRACT_RADIUS);
                let dir = (target - self.pos).normalize_or_zero();
                self.vel += dir * strength;
            }
        }

        // Obstacle repulsion, additive across all nearby obstacles
        for obstacle in forces.obstacles {
            let avoid_radius = obstacle.radius + AVOID_MARGIN;
            let dist = self.pos.distance(obstacle.pos);
            if dist < avoid_radius {
                let strength = AVOID_FORCE * (1.0 - dist / avoid_radius);
                let dir = (self.pos - obstacle.pos).normalize_or_zero();
                self.vel += dir * strength;
            }
        }

        // Magnet power-up: nearest uncollected collection point
        if forces.magnet {
            let nearest = forces
                .collection_points
                .iter()
                .filter(|p| !p.collected)
                .map(|p| (p.pos, self.pos.distance(p.pos)))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((target, dist)) = nearest {
                if dist < MAGNET_RADIUS {
                    let strength = MAGNET_FORCE * (1.0 - dist / MAGNET_RADIUS);
                    let dir = (target - self.pos).normalize_or_zero();
                    self.vel += dir * strength;
                }
            }
        }

        // Time-slow: one velocity scale per tick while active
        if forces.time_slow {
            self.vel *= TIME_SLOW_SCALE;
        }

        // Friction, then explicit Euler (one time unit per tick)
        self.vel *= FRICTION;
        self.pos += self.vel;

        self.record_trail();

        // Tick-based decay; deactivation is permanent
        self.life -= self.decay;
        if self.life <= 0.0 {
            self.life = 0.0;
            self.active = false;
        }
    }

    /// Append the current position to the trail, oldest point out first
    fn record_trail(&mut self) {
        self.trail.push(self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.remove(0);
        }
    }

    /// True once life has run out or the particle left the play region
    pub fn should_prune(&self, bounds: Vec2) -> bool {
        !self.active
            || self.pos.x < -CULL_MARGIN
            || self.pos.y < -CULL_MARGIN
            || self.pos.x > bounds.x + CULL_MARGIN
            || self.pos.y > bounds.y + CULL_MARGIN
    }
}

/// Closest point on any active path to `pos`, with its distance
fn nearest_path_point(pos: Vec2, paths: &[Path]) -> Option<(Vec2, f32)> {
    let mut best: Option<(Vec2, f32)> = None;
    for path in paths.iter().filter(|p| p.active) {
        for (a, b) in path.segments() {
            let candidate = closest_point_on_segment(pos, a, b);
            let dist = pos.distance(candidate);
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((candidate, dist));
            }
        }
        // A single-point stroke has no segments but still attracts
        if path.points.len() == 1 {
            let candidate = path.points[0];
            let dist = pos.distance(candidate);
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((candidate, dist));
            }
        }
    }
    best
}
