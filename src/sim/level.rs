//! Procedural level layout
//!
//! Emitters sit evenly on a ring around the canvas center; obstacles and
//! collection points are rejection-sampled inside a margin-inset rectangle
//! under minimum-distance constraints. Placement exhaustion skips the
//! entity and logs a warning; a level may legitimately come up short.
//! Power-ups are not part of the layout - they spawn at runtime.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::emitter::Emitter;
use super::geom::clear_of_all;
use super::state::{CollectionPoint, GameState, Obstacle, PowerUp, PowerUpKind};
use crate::consts::*;
use crate::polar_to_cartesian;

/// Emitters for level N: one more every three levels, capped
pub fn emitter_count(level: u32) -> u32 {
    (1 + level / 3).min(MAX_EMITTERS)
}

/// Obstacles for level N
pub fn obstacle_count(level: u32) -> u32 {
    BASE_OBSTACLES + level / 2
}

/// Collection points for level N
pub fn collection_point_count(level: u32) -> u32 {
    BASE_COLLECTION_POINTS + level / 3
}

/// Point value for level N
pub fn collection_value(level: u32) -> u32 {
    10 * (1 + level / 2)
}

/// Power-up duration for level N, in wall-clock ms
pub fn power_up_duration_ms(level: u32) -> f64 {
    POWER_UP_BASE_DURATION_MS + level as f64 * POWER_UP_LEVEL_DURATION_MS
}

/// Replace the current layout with one generated for `state.level`
/// against the current canvas bounds.
pub fn generate_level(state: &mut GameState) {
    let level = state.level;
    let bounds = state.bounds;
    let difficulty = state.difficulty.clone();
    let rng = &mut state.rng;

    // Emitters: evenly spaced ring, aimed at the canvas center
    let center = bounds * 0.5;
    let ring_radius = EMITTER_RING_FACTOR * bounds.min_element();
    let count = emitter_count(level);
    let mut emitters = Vec::with_capacity(count as usize);
    for i in 0..count {
        let angle = -FRAC_PI_2 + TAU * i as f32 / count as f32;
        let pos = center + polar_to_cartesian(ring_radius, angle);
        let direction = angle + PI;
        let rate = (0.08 + 0.01 * level as f32) * difficulty.spawn_rate;
        let speed = 2.0 * difficulty.particle_speed;
        let max_particles = (60 + 10 * level as usize).min(150);
        let mut emitter = Emitter::new(pos, rate, direction, 0.6, speed, i, max_particles);
        emitter.size_range = (2.0, 5.0 + 0.2 * level as f32);
        emitters.push(emitter);
    }
    let emitter_positions: Vec<Vec2> = emitters.iter().map(|e| e.pos).collect();

    // Obstacles: uniform in the inset rectangle, clear of all emitters
    let requested_obstacles = obstacle_count(level);
    let mut obstacles = Vec::with_capacity(requested_obstacles as usize);
    for _ in 0..requested_obstacles {
        let radius = rng.random_range(20.0..40.0);
        let placed = sample_clear_position(rng, bounds, |p| {
            clear_of_all(p, emitter_positions.iter().copied(), OBSTACLE_EMITTER_GAP)
        });
        match placed {
            Some(pos) => {
                let phase = rng.random_range(0.0..TAU);
                obstacles.push(Obstacle::new(pos, radius, phase));
            }
            None => log::warn!("level {level}: obstacle placement exhausted, skipping"),
        }
    }

    // Collection points: clear of emitters and of every placed obstacle
    let requested_points = collection_point_count(level);
    let value = collection_value(level);
    let mut points = Vec::with_capacity(requested_points as usize);
    for _ in 0..requested_points {
        let placed = sample_clear_position(rng, bounds, |p| {
            clear_of_all(p, emitter_positions.iter().copied(), POINT_EMITTER_GAP)
                && obstacles
                    .iter()
                    .all(|o| p.distance(o.pos) >= o.radius + OBSTACLE_CLEARANCE)
        });
        match placed {
            Some(pos) => {
                let phase = rng.random_range(0.0..TAU);
                points.push(CollectionPoint::new(pos, COLLECTION_RADIUS, value, phase));
            }
            None => log::warn!("level {level}: collection point placement exhausted, skipping"),
        }
    }

    if obstacles.len() < requested_obstacles as usize
        || points.len() < requested_points as usize
    {
        log::warn!(
            "level {level} layout underfilled: {}/{requested_obstacles} obstacles, {}/{requested_points} collection points",
            obstacles.len(),
            points.len(),
        );
    } else {
        log::info!(
            "level {level} layout: {} emitters, {} obstacles, {} collection points",
            emitters.len(),
            obstacles.len(),
            points.len(),
        );
    }

    state.emitters = emitters;
    state.obstacles = obstacles;
    state.collection_points = points;
    state.power_ups.clear();
    state.level_age_ticks = 0;
}

/// Runtime power-up spawning: one roll per tick against the level's spawn
/// chance, then a rejection-sampled placement clear of emitters, obstacles,
/// and uncollected collection points.
pub fn try_spawn_power_up(state: &mut GameState) {
    let GameState {
        rng,
        emitters,
        obstacles,
        collection_points,
        power_ups,
        difficulty,
        level,
        bounds,
        ..
    } = state;

    if rng.random::<f32>() >= difficulty.power_up_chance {
        return;
    }

    let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
    let placed = sample_clear_position(rng, *bounds, |p| {
        emitters
            .iter()
            .all(|e| p.distance(e.pos) >= POINT_EMITTER_GAP)
            && obstacles
                .iter()
                .all(|o| p.distance(o.pos) >= o.radius + OBSTACLE_CLEARANCE)
            && collection_points
                .iter()
                .filter(|c| !c.collected)
                .all(|c| p.distance(c.pos) >= c.radius + OBSTACLE_CLEARANCE)
    });

    if let Some(pos) = placed {
        let duration = power_up_duration_ms(*level);
        log::debug!("spawned {} power-up at {pos}", kind.label());
        power_ups.push(PowerUp::new(pos, kind, duration));
    }
}

/// Draw uniform candidates inside the margin-inset rectangle until
/// `is_clear` accepts one or the attempt budget runs out.
fn sample_clear_position(
    rng: &mut Pcg32,
    bounds: Vec2,
    is_clear: impl Fn(Vec2) -> bool,
) -> Option<Vec2> {
    let min = Vec2::splat(LAYOUT_MARGIN);
    let max = bounds - Vec2::splat(LAYOUT_MARGIN);
    if max.x <= min.x || max.y <= min.y {
        return None;
    }
    for _ in 0..PLACEMENT_ATTEMPTS {
        let candidate = Vec2::new(
            rng.random_range(min.x..max.x),
            rng.random_range(min.y..max.y),
        );
        if is_clear(candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn generated_state(seed: u64, level: u32, bounds: Vec2) -> GameState {
        let mut state = GameState::new(seed, bounds);
        state.level = level;
        generate_level(&mut state);
        state
    }

    #[test]
    fn test_count_formulas() {
        assert_eq!(emitter_count(1), 1);
        assert_eq!(emitter_count(3), 2);
        assert_eq!(emitter_count(6), 3);
        assert_eq!(emitter_count(30), 3);

        assert_eq!(obstacle_count(1), BASE_OBSTACLES);
        assert_eq!(obstacle_count(4), BASE_OBSTACLES + 2);

        assert_eq!(collection_point_count(2), BASE_COLLECTION_POINTS);
        assert_eq!(collection_point_count(6), BASE_COLLECTION_POINTS + 2);
    }

    #[test]
    fn test_value_and_duration_formulas() {
        assert_eq!(collection_value(1), 10);
        assert_eq!(collection_value(4), 30);

        assert_eq!(power_up_duration_ms(1), 5500.0);
        assert_eq!(power_up_duration_ms(10), 10000.0);
    }

    #[test]
    fn test_emitters_sit_on_ring() {
        let bounds = Vec2::new(800.0, 600.0);
        let state = generated_state(42, 6, bounds);
        assert_eq!(state.emitters.len(), 3);

        let center = bounds * 0.5;
        let ring = EMITTER_RING_FACTOR * bounds.min_element();
        for emitter in &state.emitters {
            assert!((emitter.pos.distance(center) - ring).abs() < 1e-3);
        }
    }

    #[test]
    fn test_collection_points_carry_level_value() {
        let state = generated_state(42, 5, Vec2::new(800.0, 600.0));
        for point in &state.collection_points {
            assert_eq!(point.value, collection_value(5));
        }
    }

    #[test]
    fn test_generation_clears_power_ups_and_resets_grace() {
        let mut state = GameState::new(42, Vec2::new(800.0, 600.0));
        state.power_ups.push(PowerUp::new(
            Vec2::new(400.0, 300.0),
            PowerUpKind::Shield,
            5000.0,
        ));
        state.level_age_ticks = 500;
        generate_level(&mut state);
        assert!(state.power_ups.is_empty());
        assert_eq!(state.level_age_ticks, 0);
    }

    #[test]
    fn test_forced_power_up_spawn_respects_constraints() {
        let mut state = generated_state(7, 3, Vec2::new(800.0, 600.0));
        state.difficulty.power_up_chance = 1.0;

        for _ in 0..200 {
            try_spawn_power_up(&mut state);
        }
        assert!(!state.power_ups.is_empty());
        for pu in &state.power_ups {
            assert_eq!(pu.duration_ms, power_up_duration_ms(3));
            for emitter in &state.emitters {
                assert!(pu.pos.distance(emitter.pos) >= POINT_EMITTER_GAP);
            }
            for obstacle in &state.obstacles {
                assert!(pu.pos.distance(obstacle.pos) >= obstacle.radius + OBSTACLE_CLEARANCE);
            }
        }
    }

    #[test]
    fn test_zero_chance_never_spawns() {
        let mut state = generated_state(7, 1, Vec2::new(800.0, 600.0));
        state.difficulty.power_up_chance = 0.0;
        for _ in 0..500 {
            try_spawn_power_up(&mut state);
        }
        assert!(state.power_ups.is_empty());
    }

    proptest! {
        #[test]
        fn placement_respects_min_distances(
            seed in any::<u64>(),
            level in 1u32..25,
            width in 600.0f32..1600.0,
            height in 500.0f32..1200.0,
        ) {
            let state = generated_state(seed, level, Vec2::new(width, height));

            for obstacle in &state.obstacles {
                for emitter in &state.emitters {
                    prop_assert!(
                        obstacle.pos.distance(emitter.pos) >= OBSTACLE_EMITTER_GAP
                    );
                }
                prop_assert!(obstacle.pos.x >= LAYOUT_MARGIN);
                prop_assert!(obstacle.pos.x <= width - LAYOUT_MARGIN);
                prop_assert!(obstacle.pos.y >= LAYOUT_MARGIN);
                prop_assert!(obstacle.pos.y <= height - LAYOUT_MARGIN);
            }

            for point in &state.collection_points {
                for emitter in &state.emitters {
                    prop_assert!(point.pos.distance(emitter.pos) >= POINT_EMITTER_GAP);
                }
                for obstacle in &state.obstacles {
                    prop_assert!(
                        point.pos.distance(obstacle.pos)
                            >= obstacle.radius + OBSTACLE_CLEARANCE
                    );
                }
            }
        }
    }
}
