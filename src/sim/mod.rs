//! Deterministic game simulation
//!
//! All gameplay state and logic lives here, isolated from rendering and
//! platform concerns. The host drives [`tick::tick`] once per display
//! refresh and reads entity collections back as render snapshots.

pub mod collision;
pub mod emitter;
pub mod geom;
pub mod level;
pub mod particle;
pub mod path;
pub mod state;
pub mod tick;

pub use emitter::Emitter;
pub use particle::{Forces, Particle};
pub use path::Path;
pub use state::{
    ActiveEffects, CollectionPoint, Difficulty, GameEvent, GamePhase, GameState, Obstacle,
    PowerUp, PowerUpKind,
};
pub use tick::{TickInput, tick};
