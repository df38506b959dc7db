//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults give the classic
//! Flappy Parrot feel: a 480x640 play area with a 100px ground strip,
//! a 40x40 parrot and pipes every 100 steps.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a tuning is rejected at construction time
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("`{field}` must be a finite number (got {value})")]
    NonFinite { field: &'static str, value: f32 },

    #[error("`{field}` must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("`{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("`{field}` must be at least one step")]
    ZeroInterval { field: &'static str },

    #[error("lift must point upward (negative), got {0}")]
    LiftNotUpward(f32),

    #[error("ground height {ground} leaves no play area in a {height}px tall screen")]
    GroundTooTall { ground: f32, height: f32 },

    #[error("flyer starting box ({x}, {y}) {w}x{h} lies outside the play area")]
    FlyerOutOfBounds { x: f32, y: f32, w: f32, h: f32 },

    #[error("max speed {max} is below the initial speed {initial}")]
    SpeedBounds { initial: f32, max: f32 },

    #[error("min gap {min_gap} must exceed the flyer height {flyer_height}")]
    GapTooNarrow { min_gap: f32, flyer_height: f32 },

    #[error("initial gap {initial} is below the min gap {min_gap}")]
    GapBounds { initial: f32, min_gap: f32 },

    #[error(
        "gap {gap} plus margins {min_top}/{min_bottom} does not fit in play height {play_height}"
    )]
    GapDoesNotFit {
        gap: f32,
        min_top: f32,
        min_bottom: f32,
        play_height: f32,
    },

    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Gameplay constants. Distances are pixels, speeds are pixels per step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play area ===
    pub play_width: f32,
    pub play_height: f32,
    /// Ground strip at the bottom; the flyer dies on touching it
    pub ground_height: f32,

    // === Flyer ===
    pub flyer_x: f32,
    pub flyer_start_y: f32,
    pub flyer_width: f32,
    pub flyer_height: f32,
    /// Downward acceleration added to velocity every step
    pub gravity: f32,
    /// Velocity set (not added) by a flap
    pub lift: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    /// Steps between obstacle spawns
    pub spawn_interval: u32,
    pub initial_speed: f32,
    pub speed_step: f32,
    pub max_speed: f32,
    pub initial_gap: f32,
    pub gap_step: f32,
    pub min_gap: f32,
    /// Smallest allowed top barrier height
    pub min_top: f32,
    /// Smallest allowed bottom barrier height (includes the ground strip)
    pub min_bottom: f32,

    // === Difficulty ===
    /// Score points between difficulty ramps
    pub ramp_every: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            play_width: 480.0,
            play_height: 640.0,
            ground_height: 100.0,

            flyer_x: 50.0,
            flyer_start_y: 150.0,
            flyer_width: 40.0,
            flyer_height: 40.0,
            gravity: 0.3,
            lift: -6.0,

            obstacle_width: 60.0,
            spawn_interval: 100,
            initial_speed: 2.0,
            speed_step: 0.5,
            max_speed: 6.0,
            initial_gap: 150.0,
            gap_step: 10.0,
            min_gap: 90.0,
            min_top: 50.0,
            min_bottom: 150.0,

            ramp_every: 5,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Y coordinate of the top of the ground strip
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.play_height - self.ground_height
    }

    /// Inclusive range a gap top may be drawn from, for a given gap size.
    ///
    /// Clamped so the range is never inverted.
    pub fn gap_top_range(&self, gap_size: f32) -> (f32, f32) {
        let lo = self.min_top;
        let hi = self.play_height - gap_size - self.min_bottom;
        (lo, hi.max(lo))
    }

    /// Check every constraint the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let floats = [
            ("play_width", self.play_width),
            ("play_height", self.play_height),
            ("ground_height", self.ground_height),
            ("flyer_x", self.flyer_x),
            ("flyer_start_y", self.flyer_start_y),
            ("flyer_width", self.flyer_width),
            ("flyer_height", self.flyer_height),
            ("gravity", self.gravity),
            ("lift", self.lift),
            ("obstacle_width", self.obstacle_width),
            ("initial_speed", self.initial_speed),
            ("speed_step", self.speed_step),
            ("max_speed", self.max_speed),
            ("initial_gap", self.initial_gap),
            ("gap_step", self.gap_step),
            ("min_gap", self.min_gap),
            ("min_top", self.min_top),
            ("min_bottom", self.min_bottom),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(TuningError::NonFinite { field, value });
            }
        }

        for (field, value) in [
            ("play_width", self.play_width),
            ("play_height", self.play_height),
            ("flyer_width", self.flyer_width),
            ("flyer_height", self.flyer_height),
            ("gravity", self.gravity),
            ("obstacle_width", self.obstacle_width),
            ("initial_speed", self.initial_speed),
        ] {
            if value <= 0.0 {
                return Err(TuningError::NonPositive { field, value });
            }
        }

        for (field, value) in [
            ("ground_height", self.ground_height),
            ("flyer_x", self.flyer_x),
            ("flyer_start_y", self.flyer_start_y),
            ("speed_step", self.speed_step),
            ("gap_step", self.gap_step),
            ("min_top", self.min_top),
            ("min_bottom", self.min_bottom),
        ] {
            if value < 0.0 {
                return Err(TuningError::Negative { field, value });
            }
        }

        if self.spawn_interval == 0 {
            return Err(TuningError::ZeroInterval {
                field: "spawn_interval",
            });
        }
        if self.ramp_every == 0 {
            return Err(TuningError::ZeroInterval {
                field: "ramp_every",
            });
        }

        if self.lift >= 0.0 {
            return Err(TuningError::LiftNotUpward(self.lift));
        }

        if self.ground_height >= self.play_height {
            return Err(TuningError::GroundTooTall {
                ground: self.ground_height,
                height: self.play_height,
            });
        }

        if self.flyer_x + self.flyer_width > self.play_width
            || self.flyer_start_y + self.flyer_height >= self.floor_y()
        {
            return Err(TuningError::FlyerOutOfBounds {
                x: self.flyer_x,
                y: self.flyer_start_y,
                w: self.flyer_width,
                h: self.flyer_height,
            });
        }

        if self.max_speed < self.initial_speed {
            return Err(TuningError::SpeedBounds {
                initial: self.initial_speed,
                max: self.max_speed,
            });
        }

        if self.min_gap <= self.flyer_height {
            return Err(TuningError::GapTooNarrow {
                min_gap: self.min_gap,
                flyer_height: self.flyer_height,
            });
        }
        if self.initial_gap < self.min_gap {
            return Err(TuningError::GapBounds {
                initial: self.initial_gap,
                min_gap: self.min_gap,
            });
        }

        // The gap only ever shrinks, so the initial gap is the widest one
        if self.min_top + self.initial_gap + self.min_bottom > self.play_height {
            return Err(TuningError::GapDoesNotFit {
                gap: self.initial_gap,
                min_top: self.min_top,
                min_bottom: self.min_bottom,
                play_height: self.play_height,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_floor_and_gap_range() {
        let t = Tuning::default();
        assert_eq!(t.floor_y(), 540.0);
        // 640 - 150 - 150 = 340
        assert_eq!(t.gap_top_range(150.0), (50.0, 340.0));
    }

    #[test]
    fn test_gap_range_never_inverts() {
        let t = Tuning::default();
        let (lo, hi) = t.gap_top_range(600.0);
        assert_eq!(lo, hi);
    }

    #[test]
    fn test_rejects_gap_larger_than_play_area() {
        let t = Tuning {
            initial_gap: 500.0,
            ..Default::default()
        };
        assert!(matches!(
            t.validate(),
            Err(TuningError::GapDoesNotFit { .. })
        ));
    }

    #[test]
    fn test_rejects_impassable_min_gap() {
        let t = Tuning {
            min_gap: 40.0,
            ..Default::default()
        };
        assert!(matches!(t.validate(), Err(TuningError::GapTooNarrow { .. })));
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let t = Tuning {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(t.validate(), Err(TuningError::NonFinite { .. })));

        let t = Tuning {
            lift: 3.0,
            ..Default::default()
        };
        assert!(matches!(t.validate(), Err(TuningError::LiftNotUpward(_))));

        let t = Tuning {
            spawn_interval: 0,
            ..Default::default()
        };
        assert!(matches!(t.validate(), Err(TuningError::ZeroInterval { .. })));

        let t = Tuning {
            max_speed: 1.0,
            ..Default::default()
        };
        assert!(matches!(t.validate(), Err(TuningError::SpeedBounds { .. })));
    }

    #[test]
    fn test_rejects_flyer_below_floor() {
        let t = Tuning {
            flyer_start_y: 520.0,
            ..Default::default()
        };
        assert!(matches!(
            t.validate(),
            Err(TuningError::FlyerOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_from_json_partial() {
        let t = Tuning::from_json(r#"{ "gravity": 0.6, "spawn_interval": 90 }"#).unwrap();
        assert_eq!(t.gravity, 0.6);
        assert_eq!(t.spawn_interval, 90);
        assert_eq!(t.play_height, 640.0);

        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
        assert!(Tuning::from_json(r#"{ "initial_gap": 900 }"#).is_err());
    }
}
