//! Render snapshot
//!
//! A plain copy of what a renderer draws each frame. Hosts never need to
//! reach into [`GameState`] directly.

use serde::Serialize;

use super::state::{GameState, RunPhase};
use crate::tuning::Tuning;

/// Axis-aligned box in play-area pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlyerView {
    pub rect: Rect,
    pub vel_y: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    /// Top barrier, from y = 0 down to the gap
    pub top: Rect,
    /// Bottom barrier, from the gap to the bottom of the play area
    pub bottom: Rect,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub width: f32,
    pub height: f32,
    /// Y of the ground line
    pub floor_y: f32,
    pub flyer: FlyerView,
    pub obstacles: Vec<ObstacleView>,
    pub score: u32,
    pub best_score: u32,
    pub phase: RunPhase,
    pub terminal: bool,
    pub difficulty_level: u32,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState, tuning: &Tuning) -> Self {
        let flyer = &state.flyer;
        let obstacles = state
            .obstacles
            .iter()
            .map(|o| ObstacleView {
                id: o.id,
                top: Rect {
                    x: o.x,
                    y: 0.0,
                    w: o.width,
                    h: o.gap_top,
                },
                bottom: Rect {
                    x: o.x,
                    y: o.gap_end(),
                    w: o.width,
                    h: o.gap_bottom,
                },
                passed: o.passed,
            })
            .collect();

        Self {
            width: tuning.play_width,
            height: tuning.play_height,
            floor_y: tuning.floor_y(),
            flyer: FlyerView {
                rect: Rect {
                    x: flyer.pos.x,
                    y: flyer.pos.y,
                    w: flyer.size.x,
                    h: flyer.size.y,
                },
                vel_y: flyer.vel_y,
            },
            obstacles,
            score: state.score,
            best_score: state.best_score,
            phase: state.phase,
            terminal: state.is_terminal(),
            difficulty_level: state.difficulty_level,
        }
    }
}
