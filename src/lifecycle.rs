//! Round lifecycle
//!
//! `Idle --start--> Running --collision--> Ended --start--> Running`
//!
//! [`Game`] owns the simulation and the clock, forwards ticks and input to the
//! simulation, and tells the collaborators about every transition.

use crate::audio::AudioSink;
use crate::platform::{
    Clock, Command, FrameSink, InputAdapter, Presenter, RawInput, Screen, TickToken, Viewport,
};
use crate::settings::Settings;
use crate::sim::{RoundPhase, Simulation, StepOutcome, TerminalCause};
use crate::tuning::Tuning;

/// Everything outside the core the game reports to
pub struct Collaborators {
    pub frames: Box<dyn FrameSink>,
    pub screens: Box<dyn Presenter>,
    pub audio: Box<dyn AudioSink>,
    pub viewport: Box<dyn Viewport>,
}

/// Lifecycle controller for one player
pub struct Game<C: Clock> {
    sim: Simulation,
    clock: C,
    input: InputAdapter,
    settings: Settings,
    io: Collaborators,
    /// Bumped on every start; ticks from older rounds are ignored
    round: u64,
}

impl<C: Clock> Game<C> {
    /// Create an idle game and show the start screen
    pub fn new(tuning: &Tuning, settings: Settings, seed: u64, clock: C, io: Collaborators) -> Self {
        let sim = Simulation::new(settings.apply_to(tuning), seed);
        let mut game = Self {
            sim,
            clock,
            input: InputAdapter::from_settings(&settings),
            settings,
            io,
            round: 0,
        };
        game.io.screens.show(Screen::Start);
        game
    }

    pub fn phase(&self) -> RoundPhase {
        self.sim.phase()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Number of rounds started so far
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Start a round from Idle or Ended. Ignored while a round is running.
    pub fn start(&mut self) -> bool {
        if self.sim.is_running() {
            log::debug!("Start ignored: round {} still running", self.round);
            return false;
        }

        // Stop before start so nothing from the previous round can fire
        self.clock.stop();
        self.round += 1;

        let size = self.io.viewport.size();
        self.sim.reset(size.x, size.y);

        if let Err(e) = self.io.audio.on_round_start(self.settings.theme_volume()) {
            log::warn!("Background theme failed: {e}");
        }
        self.io.screens.show(Screen::Playing);
        self.clock.start(TickToken::new(self.round));

        log::info!(
            "Round {} started ({}x{}, seed {})",
            self.round,
            size.x,
            size.y,
            self.sim.seed()
        );
        true
    }

    /// Advance one tick if `token` belongs to the current running round
    pub fn on_tick(&mut self, token: TickToken) -> StepOutcome {
        if token.round() != self.round || !self.sim.is_running() {
            log::trace!(
                "Ignoring tick for round {} (current {}, {:?})",
                token.round(),
                self.round,
                self.sim.phase()
            );
            return StepOutcome::Skipped;
        }

        let outcome = self.sim.step();
        self.io.frames.frame(&self.sim.snapshot());

        if let StepOutcome::Ended(cause) = outcome {
            self.finish_round(cause);
        }
        outcome
    }

    /// Make the bird jump. No-op unless a round is running.
    pub fn jump(&mut self) -> bool {
        if !self.sim.jump() {
            return false;
        }
        if let Err(e) = self.io.audio.on_jump() {
            log::warn!("Jump sound failed: {e}");
        }
        true
    }

    /// Translate and apply a raw input event
    pub fn handle_input(&mut self, raw: &RawInput) -> Option<Command> {
        let command = self.input.translate(raw)?;
        match command {
            Command::Jump => {
                self.jump();
            }
            Command::Start => {
                self.start();
            }
        }
        Some(command)
    }

    /// Host asked to close: stop ticking and go back to the start screen
    pub fn close(&mut self) {
        self.clock.stop();
        self.sim.halt();
        self.io.screens.show(Screen::Start);
        log::info!("Game closed after {} rounds", self.round);
    }

    fn finish_round(&mut self, cause: TerminalCause) {
        self.clock.stop();
        let final_score = self.sim.score();
        self.io.frames.round_ended(final_score);
        self.io.screens.show(Screen::Ended { final_score });
        log::info!(
            "Round {} over ({:?}), score {}",
            self.round,
            cause,
            final_score
        );
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::audio::AudioError;
    use crate::platform::FixedRateClock;
    use crate::sim::Snapshot;

    #[derive(Default)]
    struct Record {
        screens: Vec<Screen>,
        frames: Vec<Snapshot>,
        ended: Vec<u32>,
        jumps: u32,
        themes: Vec<f32>,
    }

    type Shared = Rc<RefCell<Record>>;

    struct Fake {
        record: Shared,
        size: Rc<RefCell<Vec2>>,
        fail_audio: bool,
    }

    impl FrameSink for Fake {
        fn frame(&mut self, snapshot: &Snapshot) {
            self.record.borrow_mut().frames.push(snapshot.clone());
        }

        fn round_ended(&mut self, final_score: u32) {
            self.record.borrow_mut().ended.push(final_score);
        }
    }

    impl Presenter for Fake {
        fn show(&mut self, screen: Screen) {
            self.record.borrow_mut().screens.push(screen);
        }
    }

    impl AudioSink for Fake {
        fn on_jump(&mut self) -> Result<(), AudioError> {
            self.record.borrow_mut().jumps += 1;
            if self.fail_audio {
                return Err(AudioError::Playback("blocked".into()));
            }
            Ok(())
        }

        fn on_round_start(&mut self, volume: f32) -> Result<(), AudioError> {
            self.record.borrow_mut().themes.push(volume);
            if self.fail_audio {
                return Err(AudioError::Unavailable("no theme"));
            }
            Ok(())
        }
    }

    impl Viewport for Fake {
        fn size(&self) -> Vec2 {
            *self.size.borrow()
        }
    }

    struct Harness {
        game: Game<FixedRateClock>,
        record: Shared,
        size: Rc<RefCell<Vec2>>,
    }

    fn harness(fail_audio: bool) -> Harness {
        let record: Shared = Rc::default();
        let size = Rc::new(RefCell::new(Vec2::new(400.0, 600.0)));
        let fake = || {
            Box::new(Fake {
                record: record.clone(),
                size: size.clone(),
                fail_audio,
            })
        };
        let io = Collaborators {
            frames: fake(),
            screens: fake(),
            audio: fake(),
            viewport: fake(),
        };
        let game = Game::new(
            &Tuning::default(),
            Settings::default(),
            42,
            FixedRateClock::new(60),
            io,
        );
        Harness { game, record, size }
    }

    fn current_token(game: &Game<FixedRateClock>) -> TickToken {
        game.clock().token().unwrap()
    }

    #[test]
    fn test_new_shows_start_and_is_idle() {
        let h = harness(false);
        assert_eq!(h.game.phase(), RoundPhase::Idle);
        assert!(!h.game.clock().is_running());
        assert_eq!(h.record.borrow().screens, vec![Screen::Start]);
    }

    #[test]
    fn test_start_runs_round() {
        let mut h = harness(false);
        assert!(h.game.start());
        assert_eq!(h.game.phase(), RoundPhase::Running);
        assert!(h.game.clock().is_running());
        let record = h.record.borrow();
        assert_eq!(record.screens.last(), Some(&Screen::Playing));
        assert_eq!(record.themes.len(), 1);
        assert!((record.themes[0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_start_ignored_while_running() {
        let mut h = harness(false);
        h.game.start();
        assert!(!h.game.start());
        assert_eq!(h.game.round(), 1);
    }

    #[test]
    fn test_tick_emits_frame() {
        let mut h = harness(false);
        h.game.start();
        let token = current_token(&h.game);
        assert_eq!(h.game.on_tick(token), StepOutcome::Advanced);
        let record = h.record.borrow();
        assert_eq!(record.frames.len(), 1);
        assert_eq!(record.frames[0].phase, RoundPhase::Running);
        assert!((record.frames[0].bird.y - 300.4).abs() < 1e-4);
    }

    #[test]
    fn test_idle_tick_is_ignored() {
        let mut h = harness(false);
        assert_eq!(h.game.on_tick(TickToken::new(0)), StepOutcome::Skipped);
        assert!(h.record.borrow().frames.is_empty());
    }

    #[test]
    fn test_round_ends_once_on_ground() {
        let mut h = harness(false);
        h.game.start();
        let token = current_token(&h.game);

        let mut ended = 0;
        for _ in 0..200 {
            if let StepOutcome::Ended(cause) = h.game.on_tick(token) {
                assert_eq!(cause, TerminalCause::GroundCollision);
                ended += 1;
            }
        }
        assert_eq!(ended, 1);
        assert_eq!(h.game.phase(), RoundPhase::Ended);
        assert!(!h.game.clock().is_running());

        let record = h.record.borrow();
        assert_eq!(record.ended, vec![0]);
        assert_eq!(
            record.screens.last(),
            Some(&Screen::Ended { final_score: 0 })
        );
        // Terminal tick still produced a frame, nothing after it
        assert_eq!(record.frames.last().map(|f| f.phase), Some(RoundPhase::Ended));
    }

    #[test]
    fn test_retry_after_end() {
        let mut h = harness(false);
        h.game.start();
        let token = current_token(&h.game);
        while h.game.phase() == RoundPhase::Running {
            h.game.on_tick(token);
        }

        *h.size.borrow_mut() = Vec2::new(800.0, 1000.0);
        assert!(h.game.start());
        assert_eq!(h.game.round(), 2);
        assert_eq!(h.game.simulation().score(), 0);
        assert!(h.game.simulation().pipes().is_empty());
        assert_eq!(h.game.simulation().bird().pos.y, 500.0);
        assert_eq!(h.game.simulation().viewport(), Vec2::new(800.0, 1000.0));
    }

    #[test]
    fn test_stale_tick_from_previous_round_ignored() {
        let mut h = harness(false);
        h.game.start();
        let old = current_token(&h.game);
        while h.game.phase() == RoundPhase::Running {
            h.game.on_tick(old);
        }
        h.game.start();
        let frames_before = h.record.borrow().frames.len();

        assert_eq!(h.game.on_tick(old), StepOutcome::Skipped);
        assert_eq!(h.record.borrow().frames.len(), frames_before);
        assert_eq!(h.game.simulation().time_ticks(), 0);

        let fresh = current_token(&h.game);
        assert_eq!(h.game.on_tick(fresh), StepOutcome::Advanced);
    }

    #[test]
    fn test_jump_only_while_running() {
        let mut h = harness(false);
        assert!(!h.game.jump());
        assert_eq!(h.record.borrow().jumps, 0);

        h.game.start();
        assert!(h.game.jump());
        assert_eq!(h.game.simulation().bird().velocity, -10.0);
        assert_eq!(h.record.borrow().jumps, 1);
    }

    #[test]
    fn test_input_routes_to_commands() {
        let mut h = harness(false);
        // Jump before the round starts does nothing
        assert_eq!(h.game.handle_input(&RawInput::TouchStart), Some(Command::Jump));
        assert_eq!(h.game.phase(), RoundPhase::Idle);

        assert_eq!(
            h.game.handle_input(&RawInput::StartPressed),
            Some(Command::Start)
        );
        assert_eq!(h.game.phase(), RoundPhase::Running);

        let space = RawInput::KeyDown {
            code: "Space".into(),
        };
        assert_eq!(h.game.handle_input(&space), Some(Command::Jump));
        assert_eq!(h.game.handle_input(&RawInput::PointerClick), Some(Command::Jump));
        assert_eq!(h.record.borrow().jumps, 2);

        let other = RawInput::KeyDown { code: "KeyQ".into() };
        assert_eq!(h.game.handle_input(&other), None);
    }

    #[test]
    fn test_audio_failures_do_not_stop_play() {
        let mut h = harness(true);
        assert!(h.game.start());
        assert!(h.game.jump());
        let token = current_token(&h.game);
        assert_eq!(h.game.on_tick(token), StepOutcome::Advanced);
        assert_eq!(h.game.phase(), RoundPhase::Running);
    }

    #[test]
    fn test_close_returns_to_idle() {
        let mut h = harness(false);
        h.game.start();
        let token = current_token(&h.game);
        h.game.close();
        assert_eq!(h.game.phase(), RoundPhase::Idle);
        assert!(!h.game.clock().is_running());
        assert_eq!(h.game.on_tick(token), StepOutcome::Skipped);
        assert_eq!(h.record.borrow().screens.last(), Some(&Screen::Start));
        // Can start again from idle
        assert!(h.game.start());
    }

    #[test]
    fn test_close_after_round_end_returns_to_idle() {
        let mut h = harness(false);
        h.game.start();
        let token = current_token(&h.game);
        while h.game.phase() == RoundPhase::Running {
            h.game.on_tick(token);
        }
        assert_eq!(h.game.phase(), RoundPhase::Ended);

        h.game.close();
        assert_eq!(h.game.phase(), RoundPhase::Idle);
        assert_eq!(h.record.borrow().screens.last(), Some(&Screen::Start));
        assert!(h.game.start());
        assert_eq!(h.game.round(), 2);
    }
}
