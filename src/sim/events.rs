//! Side-channel events emitted by the simulation
//!
//! The simulation never plays sounds or touches storage itself. Each step
//! records what happened and the host forwards it to its collaborators.

use serde::{Deserialize, Serialize};

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    /// Flyer touched the ground strip
    Ground,
    /// Flyer hit a pipe
    Obstacle { id: u32 },
}

/// Something that happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A flap impulse was applied
    Flap,
    /// The run ended
    Collision(CollisionKind),
    /// An obstacle was passed; carries the new score
    Score { score: u32 },
    /// Best score went up; the persistence collaborator should store it
    BestScoreImproved(u32),
    /// Speed/gap ramp applied
    DifficultyRaised { level: u32 },
}

/// Receiver for simulation events. All hooks default to doing nothing.
pub trait EventSink {
    fn on_flap(&mut self) {}
    fn on_collision(&mut self, _kind: CollisionKind) {}
    fn on_score(&mut self, _score: u32) {}
    /// Fire-and-forget; failures must not reach gameplay
    fn on_best_score_improved(&mut self, _value: u32) {}
    fn on_difficulty(&mut self, _level: u32) {}
}

/// Forward each event to the matching hook, in order
pub fn dispatch<S: EventSink + ?Sized>(events: &[GameEvent], sink: &mut S) {
    for event in events {
        match *event {
            GameEvent::Flap => sink.on_flap(),
            GameEvent::Collision(kind) => sink.on_collision(kind),
            GameEvent::Score { score } => sink.on_score(score),
            GameEvent::BestScoreImproved(value) => sink.on_best_score_improved(value),
            GameEvent::DifficultyRaised { level } => sink.on_difficulty(level),
        }
    }
}
