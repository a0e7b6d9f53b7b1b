//! Flow Rush entry point
//!
//! Native builds run a headless demo session: a scripted "player" keeps a
//! guide path drawn from the first emitter toward the nearest uncollected
//! point while the engine ticks at a simulated 60 Hz. Wasm hosts drive the
//! engine from the embedding page instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flow_rush::HighScores;
    use flow_rush::sim::{GameEvent, GamePhase, GameState, Path, TickInput, tick};
    use glam::Vec2;

    env_logger::init();

    let seed: u64 = rand::random();
    let mut state = GameState::new(seed, Vec2::new(800.0, 600.0));
    state.start();

    // The demo stands in for the input collaborator: it owns the strokes,
    // ages them by wall clock, and redraws when the last one fades.
    let mut paths: Vec<Path> = Vec::new();

    let frame_ms = 1000.0 / 60.0;
    let mut now_ms = 0.0_f64;

    // One simulated minute, or until the run ends
    for _ in 0..3600 {
        for path in paths.iter_mut() {
            path.update(now_ms);
        }
        paths.retain(|p| p.active);

        if paths.is_empty() {
            let target = state
                .collection_points
                .iter()
                .find(|c| !c.collected)
                .map(|c| c.pos);
            if let (Some(target), Some(emitter)) = (target, state.emitters.first()) {
                let mut path = Path::new(emitter.pos, now_ms);
                for i in 1..=12 {
                    let t = i as f32 / 12.0;
                    path.push_point(emitter.pos.lerp(target, t));
                }
                paths.push(path);
            }
        }

        let input = TickInput {
            paths: &paths,
            ..Default::default()
        };
        tick(&mut state, &input, now_ms);

        for event in state.drain_events() {
            match event {
                GameEvent::Collected { value } => log::info!("collected +{value}"),
                GameEvent::PowerUpAcquired { kind, duration_ms } => {
                    log::info!("power-up {} for {duration_ms} ms", kind.label())
                }
                GameEvent::LevelComplete { level } => log::info!("reached level {level}"),
                GameEvent::GameOver { score } => log::info!("game over, final score {score}"),
            }
        }

        if state.phase == GamePhase::GameOver {
            break;
        }
        now_ms += frame_ms;
    }

    log::info!(
        "demo finished: score {} at level {} after {} ticks",
        state.score,
        state.level,
        state.time_ticks
    );

    let mut high_scores = HighScores::load();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0);
    if let Some(rank) = high_scores.add_score(state.score, state.level, timestamp) {
        log::info!("new high score, rank {rank}");
        high_scores.save();
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Wasm hosts instantiate the engine through the library crate
}
