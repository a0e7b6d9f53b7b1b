//! Per-frame tick orchestration
//!
//! One tick runs to completion per display-refresh callback, in a fixed
//! order: input handling, visual phases, emitter updates (all force
//! accumulation), collision resolution, pruning, pull-model power-up
//! expiry, runtime power-up spawning, then the level-complete and
//! game-over predicates. Reordering any of these changes game feel.

use super::collision;
use super::level;
use super::particle::Forces;
use super::path::Path;
use super::state::{GameEvent, GamePhase, GameState, PowerUpKind};
use crate::consts::*;

/// Input for a single tick
///
/// `paths` is the input collaborator's current set of active strokes,
/// read once per tick; the engine never touches raw pointer events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput<'a> {
    pub paths: &'a [Path],
    /// Toggle pause; only honored while Playing or Paused
    pub toggle_pause: bool,
    /// Reset the session and begin a fresh run
    pub restart: bool,
    /// Tab/window hidden; forces a pause while Playing
    pub hidden: bool,
}

/// Advance the game state by one tick.
///
/// `now_ms` is the host's wall clock (e.g. `performance.now()`); it drives
/// path fade and power-up expiry, never the physics step itself.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    if input.restart {
        state.start();
        return;
    }

    if input.hidden && state.phase == GamePhase::Playing {
        state.phase = GamePhase::Paused;
        log::info!("auto-paused (tab hidden)");
    }

    if input.toggle_pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    state.level_age_ticks = state.level_age_ticks.saturating_add(1);

    // Visual phases
    for obstacle in &mut state.obstacles {
        obstacle.pulse();
    }
    for point in &mut state.collection_points {
        point.pulse();
    }
    for power_up in &mut state.power_ups {
        power_up.spin();
    }

    // Physics: every emitter integrates its pool under this tick's force
    // fields. All force accumulation completes before any collision test.
    {
        let GameState {
            rng,
            emitters,
            obstacles,
            collection_points,
            effects,
            ..
        } = state;
        let forces = Forces {
            paths: input.paths,
            obstacles: obstacles.as_slice(),
            collection_points: collection_points.as_slice(),
            magnet: effects.is_active(PowerUpKind::Magnet),
            time_slow: effects.is_active(PowerUpKind::TimeSlow),
        };
        for emitter in emitters.iter_mut() {
            emitter.update(rng, &forces);
        }
    }

    collision::resolve(state, now_ms);

    // Prune after collisions so a particle destroyed this tick is gone
    // before the terminal predicates run
    let bounds = state.bounds;
    for emitter in &mut state.emitters {
        emitter.prune(bounds);
    }

    // Pull-model expiry: no deferred callbacks, nothing to outlive a run
    state.effects.expire(now_ms);

    level::try_spawn_power_up(state);

    // Level complete: every collection point claimed
    if !state.collection_points.is_empty()
        && state.collection_points.iter().all(|c| c.collected)
    {
        state.level += 1;
        state.difficulty.advance();
        state.score += LEVEL_BONUS * state.level;
        state.events.push(GameEvent::LevelComplete { level: state.level });
        log::info!("level complete, advancing to {}", state.level);
        level::generate_level(state);
        return;
    }

    // Game over: the system can no longer produce particles. Suppressed
    // for a grace window after generation so a fresh layout gets to emit.
    if state.level_age_ticks > GAME_OVER_GRACE_TICKS
        && state.live_particle_count() == 0
        && !state.emitters.iter().any(|e| e.can_emit())
    {
        state.end_game();
    }
}
