//! Owned simulation loop
//!
//! [`Simulation`] bundles a validated [`Tuning`], the run state, the pending
//! input and the random source, and exposes the operations a host needs:
//! queue a flap, step, reset, read a snapshot and the step's events.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::events::GameEvent;
use super::snapshot::RenderSnapshot;
use super::state::{GameState, RunPhase};
use super::tick::{TickInput, tick};
use crate::tuning::{Tuning, TuningError};

/// A single game instance. Multiple instances are fully independent.
#[derive(Debug, Clone)]
pub struct Simulation<R = Pcg32> {
    tuning: Tuning,
    state: GameState,
    pending: TickInput,
    rng: R,
}

impl Simulation<Pcg32> {
    /// Create a simulation with a seeded PCG random source
    pub fn new(tuning: Tuning, best_score: u32, seed: u64) -> Result<Self, TuningError> {
        Self::with_rng(tuning, best_score, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Create a simulation with an injected random source.
    ///
    /// Rejects invalid tuning up front so `step` never has to.
    pub fn with_rng(tuning: Tuning, best_score: u32, rng: R) -> Result<Self, TuningError> {
        tuning.validate()?;
        let state = GameState::new(&tuning, best_score);
        Ok(Self {
            tuning,
            state,
            pending: TickInput::default(),
            rng,
        })
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn best_score(&self) -> u32 {
        self.state.best_score
    }

    /// Events produced by the most recent step
    pub fn events(&self) -> &[GameEvent] {
        &self.state.events
    }

    /// Leave the intro screen
    pub fn start(&mut self) {
        if self.state.phase == RunPhase::NotStarted {
            log::info!("Run started");
            self.state.phase = RunPhase::Running;
        }
    }

    /// Request an upward impulse for the next step.
    ///
    /// Several calls before one step collapse into a single flap. On the intro
    /// screen the first flap only starts the run.
    pub fn queue_flap(&mut self) {
        match self.state.phase {
            RunPhase::NotStarted => self.start(),
            RunPhase::Running => self.pending.flap = true,
            RunPhase::Paused | RunPhase::Terminal => {}
        }
    }

    /// The single "tap" action: start, flap, resume or restart depending on phase
    pub fn press(&mut self) {
        match self.state.phase {
            RunPhase::NotStarted | RunPhase::Running => self.queue_flap(),
            RunPhase::Paused => self.resume(),
            RunPhase::Terminal => self.reset(),
        }
    }

    /// Advance one step and consume pending input
    pub fn step(&mut self) {
        let input = std::mem::take(&mut self.pending);
        tick(&mut self.state, &input, &self.tuning, &mut self.rng);
    }

    /// Start a fresh run. Best score is untouched; the random stream continues.
    pub fn reset(&mut self) {
        log::info!(
            "Reset (last score {}, best {})",
            self.state.score,
            self.state.best_score
        );
        self.state.reset_run(&self.tuning);
        self.pending = TickInput::default();
    }

    pub fn pause(&mut self) {
        if self.state.phase == RunPhase::Running {
            self.state.phase = RunPhase::Paused;
            self.pending = TickInput::default();
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == RunPhase::Paused {
            self.state.phase = RunPhase::Running;
            log::info!("Resumed");
        }
    }

    /// Copy out everything a renderer needs
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state, &self.tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::CollisionKind;

    fn sim() -> Simulation {
        Simulation::new(Tuning::default(), 0, 12345).unwrap()
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let tuning = Tuning {
            initial_gap: 700.0,
            ..Default::default()
        };
        assert!(Simulation::new(tuning, 0, 1).is_err());
    }

    #[test]
    fn test_first_flap_starts_without_impulse() {
        let mut sim = sim();
        assert_eq!(sim.phase(), RunPhase::NotStarted);
        sim.step();
        assert_eq!(sim.state().flyer.pos.y, 150.0);

        sim.queue_flap();
        assert_eq!(sim.phase(), RunPhase::Running);
        sim.step();
        assert!(sim.events().is_empty());
        assert!((sim.state().flyer.vel_y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_multiple_flaps_collapse() {
        let mut sim = sim();
        sim.start();
        sim.queue_flap();
        sim.queue_flap();
        sim.queue_flap();
        sim.step();
        assert_eq!(sim.state().flyer.vel_y, -6.0);
        assert_eq!(sim.events(), &[GameEvent::Flap]);
        // Consumed: next step falls again
        sim.step();
        assert!((sim.state().flyer.vel_y - (-5.7)).abs() < 1e-5);
        assert!(sim.events().is_empty());
    }

    #[test]
    fn test_reset_after_terminal() {
        let tuning = Tuning {
            gravity: 0.6,
            ..Default::default()
        };
        let mut sim = Simulation::new(tuning, 3, 1).unwrap();
        sim.start();
        for _ in 0..200 {
            sim.step();
        }
        assert!(sim.is_terminal());

        // Inert while terminal; flaps are ignored
        let y = sim.state().flyer.pos.y;
        sim.queue_flap();
        sim.step();
        assert_eq!(sim.state().flyer.pos.y, y);

        sim.reset();
        assert_eq!(sim.phase(), RunPhase::Running);
        assert_eq!(sim.score(), 0);
        assert!(sim.state().obstacles.is_empty());
        assert_eq!(sim.best_score(), 3);
        assert_eq!(sim.state().flyer.pos.y, 150.0);
        assert_eq!(sim.state().flyer.vel_y, 0.0);
    }

    #[test]
    fn test_press_cycles_phases() {
        let tuning = Tuning {
            gravity: 0.6,
            ..Default::default()
        };
        let mut sim = Simulation::new(tuning, 0, 1).unwrap();
        sim.press();
        assert_eq!(sim.phase(), RunPhase::Running);

        sim.press();
        sim.step();
        assert_eq!(sim.events(), &[GameEvent::Flap]);

        while !sim.is_terminal() {
            sim.step();
        }
        assert_eq!(
            sim.events(),
            &[GameEvent::Collision(CollisionKind::Ground)]
        );

        sim.press();
        assert_eq!(sim.phase(), RunPhase::Running);
        assert_eq!(sim.score(), 0);
    }

    #[test]
    fn test_pause_freezes_and_drops_pending_flap() {
        let mut sim = sim();
        sim.start();
        sim.step();
        sim.queue_flap();
        sim.pause();
        let before = sim.state().clone();
        sim.step();
        assert_eq!(sim.state().flyer.pos.y, before.flyer.pos.y);
        assert_eq!(sim.state().elapsed_steps, before.elapsed_steps);

        sim.press();
        assert_eq!(sim.phase(), RunPhase::Running);
        sim.step();
        assert!(sim.events().is_empty());
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let run = |seed| {
            let mut sim = Simulation::new(Tuning::default(), 0, seed).unwrap();
            sim.start();
            let mut gaps = Vec::new();
            for _ in 0..250 {
                // Flap whenever below the start height to stay airborne
                if sim.state().flyer.pos.y > 200.0 {
                    sim.queue_flap();
                }
                sim.step();
                gaps.extend(sim.state().obstacles.iter().map(|o| (o.id, o.gap_top)));
            }
            gaps
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_independent_instances() {
        let mut a = sim();
        let b = sim();
        a.start();
        a.step();
        assert_eq!(b.phase(), RunPhase::NotStarted);
        assert_eq!(b.state().flyer.pos.y, 150.0);
    }
}
