//! Fixed-step simulation tick
//!
//! Advances a run by exactly one step. There is no delta time: the host must
//! call [`tick`] at a fixed rate (see `platform::FixedStep`).

use rand::Rng;

use super::collision::{first_obstacle_hit, flyer_ground_collision};
use super::events::{CollisionKind, GameEvent};
use super::state::{GameState, Obstacle, RunPhase};
use crate::tuning::Tuning;

/// Input gathered between two steps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// At least one flap was requested since the last step
    pub flap: bool,
}

/// Advance the game state by one step.
///
/// Order within a step is fixed: flap, integrate, vertical bounds, spawn,
/// scroll, collide, score (with difficulty ramp), cleanup. A ground collision
/// ends the step before anything scrolls; an obstacle collision still lets the
/// step score and clean up. Does nothing unless the run is [`RunPhase::Running`].
pub fn tick<R: Rng>(state: &mut GameState, input: &TickInput, tuning: &Tuning, rng: &mut R) {
    state.events.clear();

    if state.phase != RunPhase::Running {
        return;
    }

    // Flap overrides velocity; gravity only applies on non-flap steps
    let flyer = &mut state.flyer;
    if input.flap {
        flyer.vel_y = tuning.lift;
        state.events.push(GameEvent::Flap);
    } else {
        flyer.vel_y += tuning.gravity;
    }
    flyer.pos.y += flyer.vel_y;

    if flyer_ground_collision(&state.flyer, tuning.floor_y()) {
        end_run(state, CollisionKind::Ground);
        return;
    }

    // Ceiling clamps instead of killing
    if state.flyer.pos.y < 0.0 {
        state.flyer.pos.y = 0.0;
        state.flyer.vel_y = 0.0;
    }

    state.elapsed_steps += 1;
    if state.elapsed_steps.is_multiple_of(u64::from(tuning.spawn_interval)) {
        spawn_obstacle(state, tuning, rng);
    }

    let speed = state.obstacle_speed;
    for obstacle in &mut state.obstacles {
        obstacle.x -= speed;
    }

    // Scoring and cleanup still see this step's positions after a hit
    if let Some(id) = first_obstacle_hit(&state.flyer, &state.obstacles) {
        end_run(state, CollisionKind::Obstacle { id });
    }

    score_passed_obstacles(state, tuning);

    state.obstacles.retain(|o| o.right() >= 0.0);
}

/// Spawn one pipe pair at the right edge with a uniformly random gap
pub fn spawn_obstacle<R: Rng>(state: &mut GameState, tuning: &Tuning, rng: &mut R) {
    let gap_size = state.gap_size;
    let (lo, hi) = tuning.gap_top_range(gap_size);
    let gap_top = if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    };

    let id = state.next_obstacle_id();
    log::debug!(
        "Spawn obstacle {} at step {}: gap {:.1}..{:.1}",
        id,
        state.elapsed_steps,
        gap_top,
        gap_top + gap_size
    );
    state.obstacles.push(Obstacle::new(
        id,
        tuning.play_width,
        tuning.obstacle_width,
        gap_top,
        gap_size,
        tuning.play_height,
    ));
}

/// Score every obstacle whose right edge has moved past the flyer.
///
/// Uses the per-obstacle `passed` flag so fast obstacles that skip over the
/// flyer's x in one step still score exactly once.
fn score_passed_obstacles(state: &mut GameState, tuning: &Tuning) {
    let flyer_x = state.flyer.left();
    let mut points = 0;
    for obstacle in &mut state.obstacles {
        if !obstacle.passed && obstacle.right() < flyer_x {
            obstacle.passed = true;
            points += 1;
        }
    }

    for _ in 0..points {
        state.score += 1;
        state.events.push(GameEvent::Score { score: state.score });

        if state.offer_best_score(state.score) {
            state
                .events
                .push(GameEvent::BestScoreImproved(state.best_score));
        }

        if state.score.is_multiple_of(tuning.ramp_every) {
            raise_difficulty(state, tuning);
        }
    }
}

/// Speed up and narrow the gap, within the tuning's bounds
fn raise_difficulty(state: &mut GameState, tuning: &Tuning) {
    state.difficulty_level += 1;
    state.obstacle_speed = (state.obstacle_speed + tuning.speed_step).min(tuning.max_speed);
    state.gap_size = (state.gap_size - tuning.gap_step).max(tuning.min_gap);
    log::info!(
        "Difficulty {}: speed {:.2}, gap {:.0}",
        state.difficulty_level,
        state.obstacle_speed,
        state.gap_size
    );
    state.events.push(GameEvent::DifficultyRaised {
        level: state.difficulty_level,
    });
}

fn end_run(state: &mut GameState, kind: CollisionKind) {
    log::info!(
        "Run over after {} steps: {:?}, score {}",
        state.elapsed_steps,
        kind,
        state.score
    );
    state.phase = RunPhase::Terminal;
    state.events.push(GameEvent::Collision(kind));
}
