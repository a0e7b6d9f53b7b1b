//! Collision and scoring resolution
//!
//! Runs once per tick, strictly after every particle has completed its
//! physics step. Per particle the classes resolve in a fixed order:
//! obstacles (first-hit-wins, suppressed entirely by Shield), collection
//! points (at most one per particle per tick, Multiplier doubles the
//! gain), then power-up pickups. Pruning is the tick orchestrator's job
//! and happens after this pass.

use super::state::{GameEvent, GameState, PowerUpKind};

/// Resolve all collision classes for the current tick.
///
/// `now_ms` anchors power-up activations picked up this tick.
pub fn resolve(state: &mut GameState, now_ms: f64) {
    let GameState {
        emitters,
        obstacles,
        collection_points,
        power_ups,
        effects,
        events,
        score,
        ..
    } = state;

    let shield = effects.is_active(PowerUpKind::Shield);
    let multiplier = effects.is_active(PowerUpKind::Multiplier);

    for emitter in emitters.iter_mut() {
        for particle in emitter.particles.iter_mut() {
            if !particle.active {
                continue;
            }

            // Obstacle hits destroy the particle; iteration order is the
            // tie-break when several obstacles overlap the position
            if !shield {
                for obstacle in obstacles.iter() {
                    if obstacle.contains(particle.pos) {
                        particle.active = false;
                        break;
                    }
                }
                if !particle.active {
                    continue;
                }
            }

            // Collection: the point is one-shot, the particle survives
            for point in collection_points.iter_mut() {
                if !point.collected && point.contains(particle.pos) {
                    let gain = point.collect() * if multiplier { 2 } else { 1 };
                    *score += gain;
                    events.push(GameEvent::Collected { value: gain });
                    break;
                }
            }

            // Power-up pickup hands (kind, duration) to the state machine
            for power_up in power_ups.iter_mut() {
                if power_up.contains(particle.pos) {
                    power_up.collected = true;
                    effects.activate(power_up.kind, power_up.duration_ms, now_ms);
                    events.push(GameEvent::PowerUpAcquired {
                        kind: power_up.kind,
                        duration_ms: power_up.duration_ms,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::emitter::Emitter;
    use crate::sim::particle::Particle;
    use crate::sim::state::{CollectionPoint, Obstacle, PowerUp};
    use glam::Vec2;

    fn state_with_particle_at(pos: Vec2) -> GameState {
        let mut state = GameState::new(1, Vec2::new(800.0, 600.0));
        let mut emitter = Emitter::new(Vec2::new(400.0, 300.0), 0.1, 0.0, 0.5, 2.0, 0, 50);
        emitter
            .particles
            .push(Particle::new(pos, Vec2::ZERO, 3.0, 0, 0.005));
        state.emitters.push(emitter);
        state
    }

    #[test]
    fn test_obstacle_destroys_particle() {
        let mut state = state_with_particle_at(Vec2::new(100.0, 100.0));
        state
            .obstacles
            .push(Obstacle::new(Vec2::new(100.0, 100.0), 30.0, 0.0));

        resolve(&mut state, 0.0);
        assert!(!state.emitters[0].particles[0].active);
    }

    #[test]
    fn test_shield_suppresses_obstacle_kills() {
        let mut state = state_with_particle_at(Vec2::new(100.0, 100.0));
        state
            .obstacles
            .push(Obstacle::new(Vec2::new(100.0, 100.0), 30.0, 0.0));
        state.effects.activate(PowerUpKind::Shield, 5000.0, 0.0);

        resolve(&mut state, 0.0);
        assert!(state.emitters[0].particles[0].active);
    }

    #[test]
    fn test_collection_scores_and_is_one_shot() {
        let mut state = state_with_particle_at(Vec2::new(200.0, 200.0));
        state
            .collection_points
            .push(CollectionPoint::new(Vec2::new(200.0, 200.0), 20.0, 30, 0.0));

        resolve(&mut state, 0.0);
        assert_eq!(state.score, 30);
        assert!(state.collection_points[0].collected);
        assert!(state.emitters[0].particles[0].active);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Collected { value: 30 }]
        );

        // Second tick over the same point: no further gain
        resolve(&mut state, 0.0);
        assert_eq!(state.score, 30);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_multiplier_doubles_gain_exactly() {
        let mut state = state_with_particle_at(Vec2::new(200.0, 200.0));
        state
            .collection_points
            .push(CollectionPoint::new(Vec2::new(200.0, 200.0), 20.0, 30, 0.0));
        state.effects.activate(PowerUpKind::Multiplier, 5000.0, 0.0);

        resolve(&mut state, 0.0);
        assert_eq!(state.score, 60);
    }

    #[test]
    fn test_one_collection_per_particle_per_tick() {
        // Two overlapping uncollected points: a single particle claims
        // only the first in iteration order this tick.
        let mut state = state_with_particle_at(Vec2::new(200.0, 200.0));
        state
            .collection_points
            .push(CollectionPoint::new(Vec2::new(200.0, 200.0), 20.0, 30, 0.0));
        state
            .collection_points
            .push(CollectionPoint::new(Vec2::new(205.0, 200.0), 20.0, 30, 0.0));

        resolve(&mut state, 0.0);
        assert_eq!(state.score, 30);
        assert!(state.collection_points[0].collected);
        assert!(!state.collection_points[1].collected);
    }

    #[test]
    fn test_destroyed_particle_cannot_collect() {
        // Obstacle and collection point overlap the particle; the obstacle
        // class resolves first and the dead particle scores nothing.
        let mut state = state_with_particle_at(Vec2::new(200.0, 200.0));
        state
            .obstacles
            .push(Obstacle::new(Vec2::new(200.0, 200.0), 30.0, 0.0));
        state
            .collection_points
            .push(CollectionPoint::new(Vec2::new(200.0, 200.0), 20.0, 30, 0.0));

        resolve(&mut state, 0.0);
        assert_eq!(state.score, 0);
        assert!(!state.collection_points[0].collected);
    }

    #[test]
    fn test_power_up_pickup_activates_effect() {
        let mut state = state_with_particle_at(Vec2::new(200.0, 200.0));
        state.power_ups.push(PowerUp::new(
            Vec2::new(200.0, 200.0),
            PowerUpKind::Magnet,
            6000.0,
        ));

        resolve(&mut state, 1000.0);
        assert!(state.power_ups[0].collected);
        assert!(state.effects.is_active(PowerUpKind::Magnet));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::PowerUpAcquired {
                kind: PowerUpKind::Magnet,
                duration_ms: 6000.0
            }]
        );

        // Collected power-ups stop colliding
        resolve(&mut state, 1001.0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_first_obstacle_in_order_wins() {
        // Both obstacles contain the particle; resolution touches only the
        // particle, so first-hit-wins is observable via iteration order
        // (no double-processing after deactivation).
        let mut state = state_with_particle_at(Vec2::new(100.0, 100.0));
        state
            .obstacles
            .push(Obstacle::new(Vec2::new(100.0, 100.0), 30.0, 0.0));
        state
            .obstacles
            .push(Obstacle::new(Vec2::new(110.0, 100.0), 30.0, 0.0));

        resolve(&mut state, 0.0);
        assert!(!state.emitters[0].particles[0].active);
    }
}
