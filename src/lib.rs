//! Flappy Parrot - a side-scrolling one-button arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, pipes, collisions, scoring)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Best-score storage
//! - `platform`: Fixed-step scheduling for hosts
//! - `settings`: Player preferences and difficulty presets
//! - `audio`: Procedural sound effects

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Difficulty, Settings};
pub use sim::{GameEvent, RunPhase, Simulation};
pub use tuning::{Tuning, TuningError};

/// Host timing constants
pub mod consts {
    /// Fixed simulation step (one step per 60 Hz display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame time accepted before clamping (tab switches, stalls)
    pub const MAX_FRAME_DT: f32 = 0.25;
}
