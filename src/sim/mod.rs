//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod level;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionManager, Contact};
pub use entity::{Body, Character, Collidable, Drawable, EntityKind, Motion, Obstacle};
pub use level::{LEVELS, Level, LevelManager};
pub use spawn::Spawner;
pub use state::{GamePhase, GameState, Snapshot};
pub use tick::{GameEvent, TickInput, tick};
