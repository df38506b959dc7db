//! Fixed-step scheduler
//!
//! The simulation has no delta time, so it must tick at one constant rate no
//! matter how fast the display refreshes. [`FixedStep`] accumulates real frame
//! time and hands back how many ticks to run this frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedStep {
    step_dt: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step_dt: f32, max_substeps: u32) -> Self {
        Self {
            step_dt,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    /// Add a frame's elapsed seconds; returns the number of ticks to run.
    ///
    /// Long stalls (tab switch, debugger) are clamped, and leftover time
    /// beyond `max_substeps` is dropped to prevent a spiral of death.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= self.step_dt && steps < self.max_substeps {
            self.accumulator -= self.step_dt;
            steps += 1;
        }

        if steps == self.max_substeps && self.accumulator >= self.step_dt {
            log::debug!(
                "Dropping {:.1}ms of simulation time",
                self.accumulator * 1000.0
            );
            self.accumulator %= self.step_dt;
        }

        steps
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step_dt
    }

    /// Forget accumulated time (after pause or restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_step_per_matching_frame() {
        let mut clock = FixedStep::new(0.01, 4);
        // Slightly over a step to avoid float edge cases
        assert_eq!(clock.advance(0.0101), 1);
        assert_eq!(clock.advance(0.0101), 1);
    }

    #[test]
    fn test_fast_display_accumulates() {
        let mut clock = FixedStep::new(0.01, 4);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 1);
        assert!(clock.alpha() > 0.1 && clock.alpha() < 0.3);
    }

    #[test]
    fn test_substeps_capped() {
        let mut clock = FixedStep::new(0.01, 4);
        assert_eq!(clock.advance(0.09), 4);
        // Excess was dropped, not carried into the next frame
        assert!(clock.alpha() < 1.0);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_negative_and_huge_dt_clamped() {
        let mut clock = FixedStep::new(0.01, 100);
        assert_eq!(clock.advance(-1.0), 0);
        let steps = clock.advance(1000.0);
        assert!(steps <= (MAX_FRAME_DT / 0.01) as u32 + 1);
    }

    #[test]
    fn test_reset() {
        let mut clock = FixedStep::new(0.01, 4);
        clock.advance(0.005);
        clock.reset();
        assert_eq!(clock.alpha(), 0.0);
    }
}
