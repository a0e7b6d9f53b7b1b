//! Player-drawn guide paths
//!
//! A path is a bounded polyline produced by the input collaborator while
//! the player drags across the canvas. Unlike particles (whose life decays
//! a fixed amount per tick), a path's life is driven by wall-clock time
//! elapsed since the stroke began, so paths fade at the same real-time rate
//! regardless of frame rate.

use glam::Vec2;

use crate::consts::{PATH_LIFETIME_MS, PATH_MAX_POINTS};

/// A decaying polyline the particles steer toward
#[derive(Debug, Clone)]
pub struct Path {
    /// Stroke points, oldest first
    pub points: Vec<Vec2>,
    /// Wall-clock timestamp of the stroke start (ms)
    pub started_ms: f64,
    /// Remaining life in [0, 1], derived from elapsed time
    pub life: f32,
    pub active: bool,
}

impl Path {
    pub fn new(start: Vec2, now_ms: f64) -> Self {
        debug_assert!(start.is_finite());
        Self {
            points: vec![start],
            started_ms: now_ms,
            life: 1.0,
            active: true,
        }
    }

    /// Append a stroke point, dropping the oldest beyond the cap
    pub fn push_point(&mut self, p: Vec2) {
        debug_assert!(p.is_finite());
        self.points.push(p);
        if self.points.len() > PATH_MAX_POINTS {
            self.points.remove(0);
        }
    }

    /// Refresh life from the current wall clock; deactivates when expired
    pub fn update(&mut self, now_ms: f64) {
        let elapsed = now_ms - self.started_ms;
        self.life = (1.0 - elapsed / PATH_LIFETIME_MS).clamp(0.0, 1.0) as f32;
        if self.life <= 0.0 {
            self.active = false;
        }
    }

    /// Point-to-point segments of the stroke
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
    }
}
