//! Platform abstraction layer
//!
//! Host-side plumbing shared by the browser and native front ends:
//! - Fixed-step scheduling of simulation ticks

pub mod time;

pub use time::FixedStep;
