//! Flow Rush - a particle-steering arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (particle physics, collisions, levels, game state)
//! - `highscores`: Leaderboard persisted to LocalStorage
//! - `settings`: Player preferences (sound, volumes)
//!
//! Rendering, raw input capture, and audio playback live in host
//! collaborators; the engine exposes read-only entity snapshots and a
//! discrete event queue toward them.

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Paths attract particles inside this radius
    pub const PATH_ATTRACT_RADIUS: f32 = 100.0;
    /// Path attraction strength at zero distance (falls off linearly)
    pub const PATH_FOLLOW_FORCE: f32 = 0.5;
    /// Maximum points a path keeps (oldest dropped first)
    pub const PATH_MAX_POINTS: usize = 50;
    /// Wall-clock lifetime of a drawn path
    pub const PATH_LIFETIME_MS: f64 = 3000.0;

    /// Obstacles repel particles inside radius + this margin
    pub const AVOID_MARGIN: f32 = 50.0;
    /// Obstacle repulsion strength at zero distance
    pub const AVOID_FORCE: f32 = 2.0;

    /// Magnet power-up pulls toward collection points inside this radius
    pub const MAGNET_RADIUS: f32 = 200.0;
    /// Magnet attraction strength at zero distance
    pub const MAGNET_FORCE: f32 = 0.2;

    /// Time-slow velocity scale, applied once per tick while active
    pub const TIME_SLOW_SCALE: f32 = 0.5;
    /// Isotropic friction applied after force accumulation
    pub const FRICTION: f32 = 0.98;
    /// Constant downward pull on particles, per tick
    pub const PARTICLE_GRAVITY: f32 = 0.05;
    /// Particles are culled this far outside canvas bounds
    pub const CULL_MARGIN: f32 = 50.0;
    /// Maximum trail points per particle
    pub const TRAIL_LENGTH: usize = 10;

    /// Emitter ring radius as a fraction of min(width, height)
    pub const EMITTER_RING_FACTOR: f32 = 0.3;
    /// Emitter count cap regardless of level
    pub const MAX_EMITTERS: u32 = 3;
    /// Obstacles at level 1, before level scaling
    pub const BASE_OBSTACLES: u32 = 3;
    /// Collection points at level 1, before level scaling
    pub const BASE_COLLECTION_POINTS: u32 = 3;
    /// Rejection-sampling attempt budget per placement
    pub const PLACEMENT_ATTEMPTS: u32 = 50;
    /// Layout rectangle is inset this far from canvas edges
    pub const LAYOUT_MARGIN: f32 = 50.0;
    /// Minimum obstacle distance from any emitter
    pub const OBSTACLE_EMITTER_GAP: f32 = 150.0;
    /// Minimum collection-point / power-up distance from any emitter
    pub const POINT_EMITTER_GAP: f32 = 100.0;
    /// Extra clearance around obstacles for points and power-ups
    pub const OBSTACLE_CLEARANCE: f32 = 50.0;
    /// Collection point radius
    pub const COLLECTION_RADIUS: f32 = 18.0;

    /// Per-level difficulty growth
    pub const PARTICLE_SPEED_GROWTH: f32 = 1.1;
    pub const SPAWN_RATE_GROWTH: f32 = 1.1;
    pub const POWER_UP_CHANCE_GROWTH: f32 = 1.05;
    /// Power-up spawn probability per tick at level 1
    pub const BASE_POWER_UP_CHANCE: f32 = 0.02;
    /// Spawn probability never exceeds this
    pub const MAX_POWER_UP_CHANCE: f32 = 0.05;
    /// Power-up duration: base + per-level bonus, in wall-clock ms
    pub const POWER_UP_BASE_DURATION_MS: f64 = 5000.0;
    pub const POWER_UP_LEVEL_DURATION_MS: f64 = 500.0;
    pub const POWER_UP_RADIUS: f32 = 15.0;

    /// Score bonus on level completion: this times the new level
    pub const LEVEL_BONUS: u32 = 100;
    /// Ticks after level generation during which game over cannot trigger
    pub const GAME_OVER_GRACE_TICKS: u32 = 90;
}

/// Wrap a phase angle to [0, 2π)
#[inline]
pub fn wrap_phase(mut phase: f32) -> f32 {
    use std::f32::consts::TAU;
    while phase >= TAU {
        phase -= TAU;
    }
    while phase < 0.0 {
        phase += TAU;
    }
    phase
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
