//! Flappy Run entry point
//!
//! Native: headless demo round played by the autopilot, logged via env_logger.
//! Web: DOM/canvas wiring driven by requestAnimationFrame.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use flappy_run::audio::WebAudio;
    use flappy_run::platform::web::{CanvasRenderer, DomPresenter, WindowViewport, keyboard_input};
    use flappy_run::platform::{FixedRateClock, RawInput, Viewport};
    use flappy_run::{Collaborators, Game, Settings, Tuning};

    type SharedGame = Rc<RefCell<Game<FixedRateClock>>>;

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy Run starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        resize_canvas(&canvas);

        let settings = Settings::load();
        let tuning = Tuning::default();
        let seed = js_sys::Date::now() as u64;

        let frames: Box<dyn flappy_run::platform::FrameSink> =
            match CanvasRenderer::new(canvas.clone()) {
                Some(renderer) => Box::new(renderer),
                None => {
                    log::warn!("No 2D canvas context - rendering disabled");
                    Box::new(NoFrames)
                }
            };
        let io = Collaborators {
            frames,
            screens: Box::new(DomPresenter::new(document.clone())),
            audio: Box::new(WebAudio::new(settings.effects_volume())),
            viewport: Box::new(WindowViewport),
        };
        let clock = FixedRateClock::with_interval_ms(tuning.tick_interval_ms());
        let game = Rc::new(RefCell::new(Game::new(&tuning, settings, seed, clock, io)));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(&canvas);

        request_animation_frame(game);

        log::info!("Flappy Run running!");
    }

    struct NoFrames;

    impl flappy_run::platform::FrameSink for NoFrames {
        fn frame(&mut self, _snapshot: &flappy_run::sim::Snapshot) {}
        fn round_ended(&mut self, _final_score: u32) {}
    }

    fn resize_canvas(canvas: &HtmlCanvasElement) {
        let size = WindowViewport.size();
        canvas.set_width(size.x as u32);
        canvas.set_height(size.y as u32);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: SharedGame) {
        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().handle_input(&keyboard_input(&event));
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().handle_input(&RawInput::PointerClick);
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().handle_input(&RawInput::TouchStart);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: SharedGame) {
        let document = web_sys::window().unwrap().document().unwrap();
        for id in ["start-button", "retry-button"] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{id}");
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().handle_input(&RawInput::StartPressed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            // Takes effect for the simulation at the next round start
            resize_canvas(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: SharedGame) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: SharedGame, time: f64) {
        {
            let mut g = game.borrow_mut();
            if let Some(token) = g.clock_mut().poll(time) {
                g.on_tick(token);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flappy Run (native) starting...");
    log::info!("Native mode is a headless demo - build for wasm32 to play in the browser");

    if let Err(e) = native_demo::run(std::env::args().nth(1)) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native_demo {
    use glam::Vec2;

    use flappy_run::audio::LogAudio;
    use flappy_run::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
    use flappy_run::platform::native::{FixedViewport, FrameLog, LogPresenter, PacedDriver};
    use flappy_run::platform::FixedRateClock;
    use flappy_run::sim::autopilot_wants_jump;
    use flappy_run::{Collaborators, Game, Settings, Tuning, TuningError};

    /// Stop the demo after this many ticks even if the autopilot never crashes
    const MAX_DEMO_TICKS: u64 = 60 * 60;

    /// Play one autopiloted round. `tuning_path` optionally points at a JSON tuning file.
    pub fn run(tuning_path: Option<String>) -> Result<(), TuningError> {
        let tuning = match tuning_path {
            Some(path) => Tuning::from_json_file(path)?,
            None => Tuning::default(),
        };
        let settings = Settings::load();
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let io = Collaborators {
            frames: Box::new(FrameLog::new(u64::from(tuning.tick_hz))),
            screens: Box::new(LogPresenter),
            audio: Box::new(LogAudio::new()),
            viewport: Box::new(FixedViewport(Vec2::new(
                DEFAULT_VIEWPORT_WIDTH,
                DEFAULT_VIEWPORT_HEIGHT,
            ))),
        };
        let clock = FixedRateClock::with_interval_ms(tuning.tick_interval_ms());
        let mut game = Game::new(&tuning, settings, seed, clock, io);
        let driver = PacedDriver::new();

        game.start();
        while let Some(token) = driver.wait_for_tick(game.clock_mut()) {
            if autopilot_wants_jump(game.simulation()) {
                game.jump();
            }
            game.on_tick(token);
            if game.simulation().time_ticks() >= MAX_DEMO_TICKS {
                log::info!("Demo time limit reached");
                game.close();
            }
        }

        log::info!("Demo finished with score {}", game.simulation().score());
        Ok(())
    }
}
