//! Flappy Parrot entry point
//!
//! Handles platform-specific initialization and runs the game loop. The
//! browser build draws to a canvas; the native build runs headless with an
//! autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use flappy_parrot::audio::{AudioManager, SoundCues, SoundEffect, high_score_fanfare};
    use flappy_parrot::consts::SIM_DT;
    use flappy_parrot::persistence::{LocalStorageStore, PersistBestScore, ScoreStore};
    use flappy_parrot::platform::FixedStep;
    use flappy_parrot::sim::{RenderSnapshot, RunPhase, Simulation, dispatch};
    use flappy_parrot::Settings;

    const SKY: &str = "#70c5ce";
    const PIPE: &str = "#3cb043";
    const PIPE_CAP: &str = "#2a7d2e";
    const GRASS: &str = "#5ea83a";
    const DIRT: &str = "#ded895";
    const PARROT: &str = "#2ecc71";
    const PARROT_WING: &str = "#27ae60";
    const BEAK: &str = "#f39c12";
    const EYE: &str = "#ffffff";
    const PUPIL: &str = "#111111";

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        ctx: CanvasRenderingContext2d,
        clock: FixedStep,
        audio: AudioManager,
        store: LocalStorageStore,
        settings: Settings,
        last_time: f64,
        /// Best score when the current run began (for the game-over fanfare)
        best_at_start: u32,
        fps: f32,
    }

    impl Game {
        fn new(ctx: CanvasRenderingContext2d, settings: Settings, seed: u64) -> Self {
            let store = LocalStorageStore::default();
            let best = store.load_best_score();
            let sim = match Simulation::new(settings.tuning(), best, seed) {
                Ok(sim) => sim,
                Err(e) => {
                    log::error!("Preset tuning rejected ({}), using defaults", e);
                    Simulation::new(Default::default(), best, seed)
                        .expect("default tuning is valid")
                }
            };

            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);

            let mut game = Self {
                sim,
                ctx,
                clock: FixedStep::default(),
                audio,
                store,
                settings,
                last_time: 0.0,
                best_at_start: best,
                fps: 0.0,
            };
            if !game.settings.show_intro {
                game.sim.start();
            }
            game
        }

        /// The one input: start, flap, resume or restart
        fn press(&mut self) {
            self.audio.resume();
            if self.sim.phase() == RunPhase::Terminal {
                self.best_at_start = self.sim.best_score();
                self.clock.reset();
            }
            self.sim.press();
        }

        fn pause(&mut self, reason: &str) {
            if self.sim.phase() == RunPhase::Running {
                self.sim.pause();
                self.clock.reset();
                log::info!("Paused ({})", reason);
            }
        }

        fn auto_pause(&mut self, reason: &str) {
            if self.settings.auto_pause {
                self.pause(reason);
            }
        }

        /// Run simulation steps for this frame
        fn update(&mut self, dt: f32) {
            if dt > 0.0 {
                self.fps = self.fps * 0.9 + 0.1 / dt;
            }

            if self.sim.phase() != RunPhase::Running {
                return;
            }

            let steps = self.clock.advance(dt);
            for _ in 0..steps {
                self.sim.step();
                let audio = &self.audio;
                dispatch(self.sim.events(), &mut SoundCues(|effect| audio.play(effect)));
                dispatch(self.sim.events(), &mut PersistBestScore(&mut self.store));

                if high_score_fanfare(self.sim.events(), self.best_at_start, self.sim.best_score()) {
                    self.audio.play(SoundEffect::HighScore);
                }
                if self.sim.phase() != RunPhase::Running {
                    break;
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            let snap = self.sim.snapshot();
            let ctx = &self.ctx;
            let w = snap.width as f64;
            let h = snap.height as f64;

            ctx.set_fill_style_str(SKY);
            ctx.fill_rect(0.0, 0.0, w, h);

            if snap.phase != RunPhase::NotStarted {
                self.draw_pipes(&snap);
            }
            self.draw_ground(&snap);
            self.draw_parrot(&snap);

            match snap.phase {
                RunPhase::NotStarted => {
                    self.draw_centered("Flappy Parrot", "30px Arial", "white", h / 2.0 - 40.0);
                    self.draw_centered(
                        "Tap or Press SPACE to Start",
                        "20px Arial",
                        "white",
                        h / 2.0,
                    );
                }
                RunPhase::Running => self.draw_score(&snap),
                RunPhase::Paused => {
                    self.draw_score(&snap);
                    self.draw_centered("Paused", "40px Arial", "white", h / 2.0 - 20.0);
                    self.draw_centered("Tap or Press SPACE to Resume", "20px Arial", "white", h / 2.0 + 20.0);
                }
                RunPhase::Terminal => {
                    self.draw_score(&snap);
                    self.draw_centered("Game Over", "40px Arial", "red", h / 2.0 - 20.0);
                    self.draw_centered(
                        "Tap or Press SPACE to Restart",
                        "20px Arial",
                        "white",
                        h / 2.0 + 20.0,
                    );
                }
            }

            if self.settings.show_fps {
                ctx.set_font("12px monospace");
                ctx.set_fill_style_str("white");
                let _ = ctx.fill_text(&format!("{:.0} fps", self.fps), w - 60.0, 16.0);
            }
        }

        fn draw_pipes(&self, snap: &RenderSnapshot) {
            let ctx = &self.ctx;
            let floor = snap.floor_y as f64;
            for o in &snap.obstacles {
                let (x, pw) = (o.top.x as f64, o.top.w as f64);
                let top_h = o.top.h as f64;
                let bottom_y = o.bottom.y as f64;

                ctx.set_fill_style_str(PIPE);
                ctx.fill_rect(x, 0.0, pw, top_h);
                ctx.fill_rect(x, bottom_y, pw, (floor - bottom_y).max(0.0));

                // Caps overhang the body slightly
                ctx.set_fill_style_str(PIPE_CAP);
                ctx.fill_rect(x - 4.0, top_h - 20.0, pw + 8.0, 20.0);
                ctx.fill_rect(x - 4.0, bottom_y, pw + 8.0, 20.0);
            }
        }

        fn draw_ground(&self, snap: &RenderSnapshot) {
            let ctx = &self.ctx;
            let floor = snap.floor_y as f64;
            ctx.set_fill_style_str(GRASS);
            ctx.fill_rect(0.0, floor, snap.width as f64, 12.0);
            ctx.set_fill_style_str(DIRT);
            ctx.fill_rect(0.0, floor + 12.0, snap.width as f64, snap.height as f64 - floor - 12.0);
        }

        fn draw_parrot(&self, snap: &RenderSnapshot) {
            let ctx = &self.ctx;
            let r = &snap.flyer.rect;
            let (x, y, w, h) = (r.x as f64, r.y as f64, r.w as f64, r.h as f64);

            ctx.set_fill_style_str(PARROT);
            ctx.fill_rect(x, y, w, h);

            // Wing flips with vertical direction
            let wing_y = if snap.flyer.vel_y < 0.0 { y + h * 0.2 } else { y + h * 0.5 };
            ctx.set_fill_style_str(PARROT_WING);
            ctx.fill_rect(x + w * 0.1, wing_y, w * 0.45, h * 0.3);

            ctx.set_fill_style_str(BEAK);
            ctx.fill_rect(x + w, y + h * 0.4, w * 0.25, h * 0.2);

            ctx.set_fill_style_str(EYE);
            ctx.fill_rect(x + w * 0.6, y + h * 0.15, w * 0.25, h * 0.25);
            ctx.set_fill_style_str(PUPIL);
            ctx.fill_rect(x + w * 0.72, y + h * 0.22, w * 0.1, h * 0.12);
        }

        fn draw_score(&self, snap: &RenderSnapshot) {
            let ctx = &self.ctx;
            ctx.set_fill_style_str("white");
            ctx.set_font("20px Arial");
            ctx.set_text_align("left");
            let _ = ctx.fill_text(&format!("Score: {}", snap.score), 20.0, 30.0);
            let _ = ctx.fill_text(&format!("Best: {}", snap.best_score), 20.0, 60.0);
        }

        fn draw_centered(&self, text: &str, font: &str, color: &str, y: f64) {
            let ctx = &self.ctx;
            ctx.set_fill_style_str(color);
            ctx.set_font(font);
            ctx.set_text_align("center");
            let _ = ctx.fill_text(text, self.sim.tuning().play_width as f64 / 2.0, y);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy Parrot starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = Settings::load();
        let tuning = settings.tuning();
        // Internal resolution is the play area; CSS scales it to the window
        canvas.set_width(tuning.play_width as u32);
        canvas.set_height(tuning.play_height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(ctx, settings, seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);
        log::info!("Flappy Parrot running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.code().as_str() {
                    "Space" | "Enter" | "ArrowUp" => {
                        event.prevent_default();
                        game.borrow_mut().press();
                    }
                    "KeyP" | "Escape" => game.borrow_mut().pause("key"),
                    "KeyM" => {
                        let mut g = game.borrow_mut();
                        let muted = !g.audio.is_muted();
                        g.audio.set_muted(muted);
                        g.settings.muted = muted;
                        g.settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch / mouse
        for kind in ["touchstart", "mousedown"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                game.borrow_mut().press();
            });
            let _ = canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.auto_pause("window blur");
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus restores the configured mute state
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let muted = g.settings.muted;
                g.audio.set_muted(muted);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::Context;
    use clap::Parser;

    use flappy_parrot::audio::{SoundCues, SoundEffect, high_score_fanfare};
    use flappy_parrot::persistence::{JsonFileStore, MemoryStore, PersistBestScore, ScoreStore};
    use flappy_parrot::sim::{CollisionKind, EventSink, Simulation, autopilot, dispatch};
    use flappy_parrot::{Difficulty, Settings, Tuning};

    /// Run Flappy Parrot headless and report how the runs went
    #[derive(Debug, Parser)]
    #[command(name = "flappy-parrot", version)]
    struct Args {
        /// RNG seed for pipe placement (default: current time)
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum steps per run (60 steps = one second of play)
        #[arg(long, default_value_t = 3600)]
        steps: u64,

        /// Number of runs; best score carries over between them
        #[arg(long, default_value_t = 1)]
        runs: u32,

        /// Difficulty preset: easy, normal or hard
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,

        /// Settings JSON; supplies the difficulty when --difficulty is absent
        #[arg(long)]
        settings: Option<PathBuf>,

        /// JSON tuning file (overrides --difficulty)
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Where to keep the best score (in-memory if omitted)
        #[arg(long)]
        best_score_file: Option<PathBuf>,

        /// Never flap; the parrot just falls
        #[arg(long)]
        no_autopilot: bool,

        /// Print the final render snapshot as JSON
        #[arg(long)]
        snapshot: bool,
    }

    fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
        Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty `{}`", s))
    }

    #[derive(Default)]
    struct RunLog {
        flaps: u32,
        ended_by: Option<CollisionKind>,
    }

    impl EventSink for RunLog {
        fn on_flap(&mut self) {
            self.flaps += 1;
        }

        fn on_collision(&mut self, kind: CollisionKind) {
            self.ended_by = Some(kind);
        }

        fn on_score(&mut self, score: u32) {
            log::debug!("Score {}", score);
        }

        fn on_difficulty(&mut self, level: u32) {
            log::info!("Difficulty level {}", level);
        }
    }

    fn load_tuning(args: &Args) -> anyhow::Result<Tuning> {
        match &args.tuning {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading tuning file {}", path.display()))?;
                Tuning::from_json(&json)
                    .with_context(|| format!("invalid tuning in {}", path.display()))
            }
            None => {
                let difficulty = match (args.difficulty, &args.settings) {
                    (Some(d), _) => d,
                    (None, Some(path)) => Settings::load_from(path).difficulty,
                    (None, None) => Difficulty::default(),
                };
                log::info!("Difficulty: {}", difficulty.as_str());
                Ok(difficulty.tuning())
            }
        }
    }

    pub fn run() -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();

        let tuning = load_tuning(&args)?;
        let mut store: Box<dyn ScoreStore> = match &args.best_score_file {
            Some(path) => Box::new(JsonFileStore::new(path)),
            None => Box::new(MemoryStore::default()),
        };

        let seed = args.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        });
        log::info!("Flappy Parrot (native) starting, seed {}", seed);

        let mut sim = Simulation::new(tuning, store.load_best_score(), seed)?;
        sim.start();

        for run in 1..=args.runs {
            if run > 1 {
                sim.reset();
            }
            let best_at_start = sim.best_score();
            let mut run_log = RunLog::default();
            let mut steps = 0;

            while steps < args.steps && !sim.is_terminal() {
                if !args.no_autopilot && autopilot::should_flap(sim.state(), sim.tuning()) {
                    sim.queue_flap();
                }
                sim.step();
                steps += 1;

                dispatch(sim.events(), &mut run_log);
                // No speakers here; log what would play
                dispatch(
                    sim.events(),
                    &mut SoundCues(|effect| log::trace!("sound: {:?}", effect)),
                );
                dispatch(sim.events(), &mut PersistBestScore(store.as_mut()));
                if high_score_fanfare(sim.events(), best_at_start, sim.best_score()) {
                    log::trace!("sound: {:?}", SoundEffect::HighScore);
                }
            }

            let outcome = match run_log.ended_by {
                Some(CollisionKind::Ground) => "hit the ground".to_string(),
                Some(CollisionKind::Obstacle { id }) => format!("hit pipe #{}", id),
                None => "survived".to_string(),
            };
            println!(
                "run {}: score {} in {} steps ({} flaps), {}{}",
                run,
                sim.score(),
                steps,
                run_log.flaps,
                outcome,
                if sim.best_score() > best_at_start {
                    format!(", new best {}", sim.best_score())
                } else {
                    String::new()
                }
            );
        }

        println!("best score: {}", sim.best_score());

        if args.snapshot {
            println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
