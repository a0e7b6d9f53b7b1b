//! Stateless 2D geometry helpers
//!
//! Segment projection and circle tests shared by the force integrator,
//! collision resolution, and placement sampling.

use glam::Vec2;

/// Closest point to `p` on the segment `a`-`b`.
///
/// Standard projection with the parameter clamped to [0, 1]; degenerate
/// (zero-length) segments collapse to `a`.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-6 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// True if `p` lies inside (or on) the circle at `center` with `radius`.
#[inline]
pub fn point_in_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    p.distance_squared(center) <= radius * radius
}

/// True if `p` is at least `gap` away from every position in `others`.
pub fn clear_of_all(p: Vec2, others: impl IntoIterator<Item = Vec2>, gap: f32) -> bool {
    let gap_sq = gap * gap;
    others.into_iter().all(|o| p.distance_squared(o) >= gap_sq)
}
