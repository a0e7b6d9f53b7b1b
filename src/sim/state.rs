//! Game state and core entity types
//!
//! Session state is an explicitly constructed [`GameState`] handed to the
//! tick function each frame; nothing lives in globals. Entity collections
//! double as the read-only render snapshot.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::emitter::Emitter;
use super::geom::point_in_circle;
use super::particle::Particle;
use crate::consts::*;
use crate::wrap_phase;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Session constructed, not yet started
    Idle,
    /// Active gameplay
    Playing,
    /// Update loop halted, entity state intact
    Paused,
    /// Run ended
    GameOver,
}

/// Power-up types, a closed set
///
/// Each variant carries its display color and label; gameplay effects are
/// consumed by the physics and collision passes, never by the kind itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    TimeSlow,
    Magnet,
    Shield,
    Multiplier,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::TimeSlow,
        PowerUpKind::Magnet,
        PowerUpKind::Shield,
        PowerUpKind::Multiplier,
    ];

    /// Stable index into per-kind effect storage
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PowerUpKind::TimeSlow => 0,
            PowerUpKind::Magnet => 1,
            PowerUpKind::Shield => 2,
            PowerUpKind::Multiplier => 3,
        }
    }

    /// Display color (RGB, 0-1) for the renderer
    pub fn color(self) -> [f32; 3] {
        match self {
            PowerUpKind::TimeSlow => [0.3, 0.8, 1.0],
            PowerUpKind::Magnet => [1.0, 0.4, 0.9],
            PowerUpKind::Shield => [0.4, 1.0, 0.5],
            PowerUpKind::Multiplier => [1.0, 0.85, 0.3],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::TimeSlow => "time-slow",
            PowerUpKind::Magnet => "magnet",
            PowerUpKind::Shield => "shield",
            PowerUpKind::Multiplier => "score x2",
        }
    }
}

/// A static hazard that destroys particles entering its radius
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub pos: Vec2,
    pub radius: f32,
    /// Visual pulse phase, wraps at 2π
    pub pulse_phase: f32,
    pub pulse_speed: f32,
    pub pulse_amount: f32,
}

impl Obstacle {
    pub fn new(pos: Vec2, radius: f32, pulse_phase: f32) -> Self {
        debug_assert!(pos.is_finite());
        debug_assert!(radius > 0.0);
        Self {
            pos,
            radius,
            pulse_phase,
            pulse_speed: 0.05,
            pulse_amount: 0.15,
        }
    }

    /// Advance the visual pulse one tick
    pub fn pulse(&mut self) {
        self.pulse_phase = wrap_phase(self.pulse_phase + self.pulse_speed);
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        point_in_circle(p, self.pos, self.radius)
    }
}

/// A scoring target; one-shot per level
#[derive(Debug, Clone)]
pub struct CollectionPoint {
    pub pos: Vec2,
    pub radius: f32,
    pub value: u32,
    pub collected: bool,
    pub pulse_phase: f32,
    pub pulse_speed: f32,
}

impl CollectionPoint {
    pub fn new(pos: Vec2, radius: f32, value: u32, pulse_phase: f32) -> Self {
        debug_assert!(pos.is_finite());
        debug_assert!(radius > 0.0);
        Self {
            pos,
            radius,
            value,
            collected: false,
            pulse_phase,
            pulse_speed: 0.08,
        }
    }

    pub fn pulse(&mut self) {
        self.pulse_phase = wrap_phase(self.pulse_phase + self.pulse_speed);
    }

    /// Claim the point's value. Returns the value on the first call and 0
    /// on every subsequent call; `collected` never reverts.
    pub fn collect(&mut self) -> u32 {
        if self.collected {
            return 0;
        }
        self.collected = true;
        self.value
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        point_in_circle(p, self.pos, self.radius)
    }
}

/// A collectible power-up spawned at runtime
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: PowerUpKind,
    pub duration_ms: f64,
    pub collected: bool,
    /// Visual rotation phase, wraps at 2π
    pub rotation: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind, duration_ms: f64) -> Self {
        debug_assert!(pos.is_finite());
        debug_assert!(duration_ms > 0.0);
        Self {
            pos,
            radius: POWER_UP_RADIUS,
            kind,
            duration_ms,
            collected: false,
            rotation: 0.0,
        }
    }

    pub fn spin(&mut self) {
        self.rotation = wrap_phase(self.rotation + 0.04);
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        !self.collected && point_in_circle(p, self.pos, self.radius)
    }
}

/// Per-kind power-up activation state
///
/// Pull-model expiry: each active kind stores an absolute wall-clock expiry
/// timestamp which the tick compares against its own `now_ms`. A re-pickup
/// while active simply overwrites the timestamp; kinds are independent.
#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    expires_at: [Option<f64>; 4],
}

impl ActiveEffects {
    /// Inactive → Active (or restart of an already-active kind)
    pub fn activate(&mut self, kind: PowerUpKind, duration_ms: f64, now_ms: f64) {
        self.expires_at[kind.index()] = Some(now_ms + duration_ms);
    }

    /// Active → Inactive for every kind whose expiry has passed
    pub fn expire(&mut self, now_ms: f64) {
        for slot in self.expires_at.iter_mut() {
            if slot.is_some_and(|at| now_ms >= at) {
                *slot = None;
            }
        }
    }

    #[inline]
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.expires_at[kind.index()].is_some()
    }

    /// Remaining duration for the UI, if the kind is active
    pub fn remaining_ms(&self, kind: PowerUpKind, now_ms: f64) -> Option<f64> {
        self.expires_at[kind.index()].map(|at| (at - now_ms).max(0.0))
    }

    pub fn active_kinds(&self) -> impl Iterator<Item = PowerUpKind> + '_ {
        PowerUpKind::ALL
            .into_iter()
            .filter(|k| self.is_active(*k))
    }

    pub fn clear(&mut self) {
        self.expires_at = [None; 4];
    }
}

/// Difficulty multipliers, compounding multiplicatively each level
#[derive(Debug, Clone)]
pub struct Difficulty {
    pub particle_speed: f32,
    pub spawn_rate: f32,
    pub power_up_chance: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            particle_speed: 1.0,
            spawn_rate: 1.0,
            power_up_chance: BASE_POWER_UP_CHANCE,
        }
    }
}

impl Difficulty {
    /// Compound the multipliers for the next level
    pub fn advance(&mut self) {
        self.particle_speed *= PARTICLE_SPEED_GROWTH;
        self.spawn_rate *= SPAWN_RATE_GROWTH;
        self.power_up_chance =
            (self.power_up_chance * POWER_UP_CHANCE_GROWTH).min(MAX_POWER_UP_CHANCE);
    }
}

/// Discrete notifications toward the audio/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Collected { value: u32 },
    PowerUpAcquired { kind: PowerUpKind, duration_ms: f64 },
    LevelComplete { level: u32 },
    GameOver { score: u32 },
}

/// Complete session state
///
/// Created at `start`, fully reset at `restart`; only the final score
/// outlives a run (the host compares it against the persisted high score).
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG (placement sampling, emission jitter, spawn rolls)
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    /// Current level, starts at 1
    pub level: u32,
    /// Canvas dimensions; re-read before each level generation
    pub bounds: Vec2,
    pub emitters: Vec<Emitter>,
    pub obstacles: Vec<Obstacle>,
    pub collection_points: Vec<CollectionPoint>,
    pub power_ups: Vec<PowerUp>,
    pub effects: ActiveEffects,
    pub difficulty: Difficulty,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ticks since the current layout was generated (game-over grace)
    pub level_age_ticks: u32,
    /// Pending notifications, drained by the host each frame
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Construct an idle session for the given canvas size
    pub fn new(seed: u64, bounds: Vec2) -> Self {
        debug_assert!(bounds.x > 0.0 && bounds.y > 0.0);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            score: 0,
            level: 1,
            bounds,
            emitters: Vec::new(),
            obstacles: Vec::new(),
            collection_points: Vec::new(),
            power_ups: Vec::new(),
            effects: ActiveEffects::default(),
            difficulty: Difficulty::default(),
            time_ticks: 0,
            level_age_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Reset all session state and enter `Playing` with a level-1 layout.
    /// `restart` is this same operation.
    pub fn start(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.score = 0;
        self.level = 1;
        self.effects.clear();
        self.difficulty = Difficulty::default();
        self.time_ticks = 0;
        self.events.clear();
        super::level::generate_level(self);
        self.phase = GamePhase::Playing;
        log::info!("session started (seed {})", self.seed);
    }

    /// Update canvas dimensions; placements pick this up at the next
    /// level generation, pruning uses it immediately.
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        debug_assert!(width > 0.0 && height > 0.0);
        self.bounds = Vec2::new(width, height);
    }

    /// End the run: expose the final score and stop ticking
    pub fn end_game(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!("game over at level {} with score {}", self.level, self.score);
    }

    /// All live particles across every emitter pool
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.emitters.iter().flat_map(|e| e.particles.iter())
    }

    pub fn live_particle_count(&self) -> usize {
        self.emitters.iter().map(|e| e.particles.len()).sum()
    }

    /// Currently active power-up kinds, for the UI
    pub fn active_power_ups(&self) -> Vec<PowerUpKind> {
        self.effects.active_kinds().collect()
    }

    /// Hand pending notifications to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
