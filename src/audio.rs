//! Audio system
//!
//! Procedurally generated sound effects - no external files needed! The
//! event-to-effect mapping is platform independent; synthesis uses the Web
//! Audio API and only exists on wasm32.

use crate::sim::{CollisionKind, EventSink, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Wing flap
    Flap,
    /// Pipe passed
    Point,
    /// Hit a pipe or the ground
    Crash,
    /// Speed/gap ramp
    LevelUp,
    /// Run ended with a new best score
    HighScore,
}

impl SoundEffect {
    /// Effect for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Flap => Some(SoundEffect::Flap),
            GameEvent::Score { .. } => Some(SoundEffect::Point),
            GameEvent::Collision(_) => Some(SoundEffect::Crash),
            GameEvent::DifficultyRaised { .. } => Some(SoundEffect::LevelUp),
            // Celebrated once at game over, not on every point
            GameEvent::BestScoreImproved(_) => None,
        }
    }
}

/// Event sink that turns simulation events into sound effects.
///
/// Every hook goes through [`SoundEffect::for_event`], so hosts only decide
/// what "play" means.
pub struct SoundCues<F: FnMut(SoundEffect)>(pub F);

impl<F: FnMut(SoundEffect)> SoundCues<F> {
    fn cue(&mut self, event: GameEvent) {
        if let Some(effect) = SoundEffect::for_event(&event) {
            (self.0)(effect);
        }
    }
}

impl<F: FnMut(SoundEffect)> EventSink for SoundCues<F> {
    fn on_flap(&mut self) {
        self.cue(GameEvent::Flap);
    }

    fn on_collision(&mut self, kind: CollisionKind) {
        self.cue(GameEvent::Collision(kind));
    }

    fn on_score(&mut self, score: u32) {
        self.cue(GameEvent::Score { score });
    }

    fn on_best_score_improved(&mut self, value: u32) {
        self.cue(GameEvent::BestScoreImproved(value));
    }

    fn on_difficulty(&mut self, level: u32) {
        self.cue(GameEvent::DifficultyRaised { level });
    }
}

/// True only for the step that ended a run which beat `best_at_start`.
///
/// Steps after game over carry no events, so the fanfare plays once.
pub fn high_score_fanfare(events: &[GameEvent], best_at_start: u32, best_now: u32) -> bool {
    best_now > best_at_start && events.iter().any(|e| matches!(e, GameEvent::Collision(_)))
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        /// Set SFX volume (0.0 - 1.0)
        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Flap => self.play_flap(ctx, vol),
                SoundEffect::Point => self.play_point(ctx, vol),
                SoundEffect::Crash => self.play_crash(ctx, vol),
                SoundEffect::LevelUp => self.play_level_up(ctx, vol),
                SoundEffect::HighScore => self.play_high_score(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Flap - short upward chirp
        fn play_flap(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(600.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Point - bright two-tone ding
        fn play_point(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [880.0, 1320.0].into_iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                    return;
                };
                let t = ctx.current_time() + i as f64 * 0.07;

                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().linear_ramp_to_value_at_time(vol * 0.3, t + 0.01).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();

                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }

        /// Crash - falling sawtooth
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(400.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(80.0, t + 0.4)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }

        /// Level up - rising square sweep
        fn play_level_up(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.12, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(440.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(880.0, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// High score - major arpeggio
        fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
            let notes = [523.25, 659.25, 783.99, 1046.5]; // C5 E5 G5 C6
            for (i, freq) in notes.into_iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) else {
                    return;
                };
                let t = ctx.current_time() + i as f64 * 0.1;

                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().linear_ramp_to_value_at_time(vol * 0.3, t + 0.02).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();

                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.35).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::dispatch;

    #[test]
    fn test_event_mapping() {
        assert_eq!(SoundEffect::for_event(&GameEvent::Flap), Some(SoundEffect::Flap));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Score { score: 1 }),
            Some(SoundEffect::Point)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Collision(CollisionKind::Ground)),
            Some(SoundEffect::Crash)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::BestScoreImproved(3)), None);
    }

    #[test]
    fn test_sound_cues_follow_event_mapping() {
        let events = [
            GameEvent::Flap,
            GameEvent::Score { score: 5 },
            GameEvent::BestScoreImproved(5),
            GameEvent::DifficultyRaised { level: 1 },
            GameEvent::Collision(CollisionKind::Obstacle { id: 2 }),
        ];
        let mut played = Vec::new();
        dispatch(&events, &mut SoundCues(|effect| played.push(effect)));
        let expected: Vec<SoundEffect> = events.iter().filter_map(SoundEffect::for_event).collect();
        assert_eq!(played, expected);
        assert_eq!(
            played,
            vec![
                SoundEffect::Flap,
                SoundEffect::Point,
                SoundEffect::LevelUp,
                SoundEffect::Crash
            ]
        );
    }

    #[test]
    fn test_fanfare_only_on_the_run_ending_step() {
        let crash = [GameEvent::Collision(CollisionKind::Ground)];
        assert!(high_score_fanfare(&crash, 3, 4));
        // No new best
        assert!(!high_score_fanfare(&crash, 4, 4));
        // Later game-over frames step an inert sim with no events
        assert!(!high_score_fanfare(&[], 3, 4));
        // Best improved mid-run, run still going
        assert!(!high_score_fanfare(&[GameEvent::BestScoreImproved(4)], 3, 4));
    }
}
