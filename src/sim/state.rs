//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; there is no ambient state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Intro screen, waiting for the first tap
    NotStarted,
    /// Active gameplay
    Running,
    /// Suspended by the host (tab hidden, window blur)
    Paused,
    /// Run ended by a collision; inert until reset
    Terminal,
}

/// The player-controlled parrot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flyer {
    /// Top-left corner. `x` never changes during a run.
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (positive is down)
    pub vel_y: f32,
}

impl Flyer {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.flyer_x, tuning.flyer_start_y),
            size: Vec2::new(tuning.flyer_width, tuning.flyer_height),
            vel_y: 0.0,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// A top/bottom pipe pair with a passable gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Height of the top barrier (y where the gap begins)
    pub gap_top: f32,
    pub gap_size: f32,
    /// Height of the bottom barrier, measured up from the bottom of the screen
    pub gap_bottom: f32,
    /// Set once the obstacle has scored
    pub passed: bool,
}

impl Obstacle {
    /// Build an obstacle whose three bands exactly fill `play_height`
    pub fn new(id: u32, x: f32, width: f32, gap_top: f32, gap_size: f32, play_height: f32) -> Self {
        Self {
            id,
            x,
            width,
            gap_top,
            gap_size,
            gap_bottom: play_height - gap_top - gap_size,
            passed: false,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Y coordinate where the bottom barrier begins
    #[inline]
    pub fn gap_end(&self) -> f32 {
        self.gap_top + self.gap_size
    }

    /// Vertical center of the gap
    #[inline]
    pub fn gap_center(&self) -> f32 {
        self.gap_top + self.gap_size / 2.0
    }
}

/// Complete run state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub flyer: Flyer,
    /// Live obstacles, oldest (leftmost) first
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Never decreases for the lifetime of the state
    pub best_score: u32,
    /// Pixels per step the obstacles scroll left
    pub obstacle_speed: f32,
    /// Gap size used for the next spawned obstacle
    pub gap_size: f32,
    /// Number of difficulty ramps applied this run
    pub difficulty_level: u32,
    /// Running steps taken this run
    pub elapsed_steps: u64,
    pub phase: RunPhase,
    /// Side-channel events produced by the most recent step
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh state on the intro screen
    pub fn new(tuning: &Tuning, best_score: u32) -> Self {
        Self {
            flyer: Flyer::new(tuning),
            obstacles: Vec::new(),
            score: 0,
            best_score,
            obstacle_speed: tuning.initial_speed,
            gap_size: tuning.initial_gap,
            difficulty_level: 0,
            elapsed_steps: 0,
            phase: RunPhase::NotStarted,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Reinitialise all run-scoped fields. `best_score` is kept.
    pub fn reset_run(&mut self, tuning: &Tuning) {
        self.flyer = Flyer::new(tuning);
        self.obstacles.clear();
        self.score = 0;
        self.obstacle_speed = tuning.initial_speed;
        self.gap_size = tuning.initial_gap;
        self.difficulty_level = 0;
        self.elapsed_steps = 0;
        self.phase = RunPhase::Running;
        self.events.clear();
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.phase == RunPhase::Terminal
    }

    /// Raise the best score if `score` beats it. Returns true on improvement.
    pub fn offer_best_score(&mut self, score: u32) -> bool {
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }
}
