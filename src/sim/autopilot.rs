//! Idle/demo mode - a simple AI that plays the game
//!
//! Keeps the flyer's bottom edge at or above an aim line inside the next gap.
//! A flap always rises by the same height (velocity is set, not added), so
//! the aim line sits low enough in the gap that the climb after a flap stays
//! clear of the top pipe.

use super::state::{GameState, RunPhase};
use crate::tuning::Tuning;

/// Height a single flap climbs before gravity turns it around
pub fn flap_rise(tuning: &Tuning) -> f32 {
    tuning.lift * tuning.lift / (2.0 * tuning.gravity)
}

/// Y the flyer's bottom edge should not drop below
pub fn aim_line(state: &GameState, tuning: &Tuning) -> f32 {
    let flyer = &state.flyer;
    let next = state
        .obstacles
        .iter()
        .find(|o| !o.passed && o.right() >= flyer.left());

    match next {
        Some(o) => {
            let slack = o.gap_size - flyer.size.y - flap_rise(tuning);
            o.gap_end() - (slack / 2.0).max(1.0)
        }
        // No pipe yet: hover where gaps are centred on average
        None => (tuning.min_top + tuning.play_height - tuning.min_bottom) / 2.0 + flyer.size.y / 2.0,
    }
}

/// Should the autopilot flap before the next step?
pub fn should_flap(state: &GameState, tuning: &Tuning) -> bool {
    if state.phase != RunPhase::Running {
        return false;
    }
    let flyer = &state.flyer;
    let predicted_bottom = flyer.bottom() + flyer.vel_y + tuning.gravity;
    predicted_bottom > aim_line(state, tuning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Simulation;
    use crate::sim::state::Obstacle;

    fn running() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning, 0);
        state.phase = RunPhase::Running;
        (state, tuning)
    }

    #[test]
    fn test_flap_rise() {
        assert!((flap_rise(&Tuning::default()) - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_aims_inside_next_gap() {
        let (mut state, tuning) = running();
        state
            .obstacles
            .push(Obstacle::new(1, 300.0, 60.0, 200.0, 150.0, 640.0));
        // slack = 150 - 40 - 60 = 50 -> aim 25 above the gap bottom
        assert!((aim_line(&state, &tuning) - 325.0).abs() < 1e-3);
    }

    #[test]
    fn test_ignores_passed_obstacles() {
        let (mut state, tuning) = running();
        let mut old = Obstacle::new(1, -20.0, 60.0, 50.0, 150.0, 640.0);
        old.passed = true;
        state.obstacles.push(old);
        state
            .obstacles
            .push(Obstacle::new(2, 300.0, 60.0, 200.0, 150.0, 640.0));
        assert!((aim_line(&state, &tuning) - 325.0).abs() < 1e-3);
    }

    #[test]
    fn test_flaps_only_when_sinking_below_aim() {
        let (mut state, tuning) = running();
        state
            .obstacles
            .push(Obstacle::new(1, 300.0, 60.0, 200.0, 150.0, 640.0));

        state.flyer.pos.y = 290.0; // bottom 330, below the 325 aim
        assert!(should_flap(&state, &tuning));

        state.flyer.pos.y = 220.0; // bottom 260
        state.flyer.vel_y = 0.0;
        assert!(!should_flap(&state, &tuning));

        state.phase = RunPhase::Terminal;
        state.flyer.pos.y = 290.0;
        assert!(!should_flap(&state, &tuning));
    }

    #[test]
    fn test_autopilot_clears_first_pipe() {
        for seed in 1..=5 {
            let mut sim = Simulation::new(Tuning::default(), 0, seed).unwrap();
            sim.start();
            for _ in 0..400 {
                if should_flap(sim.state(), sim.tuning()) {
                    sim.queue_flap();
                }
                sim.step();
            }
            assert!(sim.score() >= 1, "seed {} scored {}", seed, sim.score());
        }
    }
}
