//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (hazards keep their build order)
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod entity;
pub mod level;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{Contact, DeathCause, in_river_band, resolve};
pub use entity::{Coin, Facing, Frog, FrogState, Hazard, HazardKind, Hop, Jaw, SnakeMode};
pub use level::build_level;
pub use rect::Rect;
pub use state::{GameEvent, GamePhase, GameState, GoalSlots};
pub use tick::{TickInput, advance_hazards, skip_transition, tick};
