//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed step only (no delta time)
//! - Seeded RNG only
//! - Stable iteration order (obstacles oldest first)
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod events;
pub mod simulation;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{flyer_ground_collision, flyer_obstacle_collision, spans_overlap};
pub use events::{CollisionKind, EventSink, GameEvent, dispatch};
pub use simulation::Simulation;
pub use snapshot::{FlyerView, ObstacleView, Rect, RenderSnapshot};
pub use state::{Flyer, GameState, Obstacle, RunPhase};
pub use tick::{TickInput, spawn_obstacle, tick};
