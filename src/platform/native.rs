//! Headless collaborators for native runs
//!
//! No window, no speakers: frames and screens go to the log, and a sleeping
//! driver paces the clock against wall time.

use std::time::{Duration, Instant};

use glam::Vec2;

use super::{Clock, FixedRateClock, FrameSink, Presenter, Screen, TickToken, Viewport};
use crate::sim::Snapshot;

/// Viewport of a fixed size
#[derive(Debug, Clone, Copy)]
pub struct FixedViewport(pub Vec2);

impl Viewport for FixedViewport {
    fn size(&self) -> Vec2 {
        self.0
    }
}

/// Logs screen changes
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn show(&mut self, screen: Screen) {
        match screen {
            Screen::Start => log::info!("[screen] start"),
            Screen::Playing => log::info!("[screen] playing"),
            Screen::Ended { final_score } => log::info!("[screen] game over - score {final_score}"),
        }
    }
}

/// Logs a one-line summary of the world every `every` frames
#[derive(Debug)]
pub struct FrameLog {
    every: u64,
    frames: u64,
}

impl FrameLog {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl FrameSink for FrameLog {
    fn frame(&mut self, snapshot: &Snapshot) {
        self.frames += 1;
        if self.frames % self.every == 0 {
            log::debug!(
                "frame {}: bird y={:.1} pipes={} score={}",
                self.frames,
                snapshot.bird.y,
                snapshot.pipes.len(),
                snapshot.score
            );
        }
    }

    fn round_ended(&mut self, final_score: u32) {
        log::debug!("frames this run: {}, final score {final_score}", self.frames);
    }
}

/// Drives a [`FixedRateClock`] from wall time by sleeping until each deadline
#[derive(Debug)]
pub struct PacedDriver {
    origin: Instant,
}

impl Default for PacedDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl PacedDriver {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds since the driver was created
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    /// Block until the clock hands out a tick. `None` once the clock is stopped.
    pub fn wait_for_tick(&self, clock: &mut FixedRateClock) -> Option<TickToken> {
        loop {
            if !clock.is_running() {
                return None;
            }
            let now = self.now_ms();
            if let Some(token) = clock.poll(now) {
                return Some(token);
            }
            if let Some(due) = clock.next_due_ms() {
                let wait = (due - now).max(0.0);
                std::thread::sleep(Duration::from_secs_f64(wait / 1000.0));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_stops_with_clock() {
        let driver = PacedDriver::new();
        let mut clock = FixedRateClock::new(60);
        assert_eq!(driver.wait_for_tick(&mut clock), None);
    }

    #[test]
    fn test_driver_waits_roughly_one_interval() {
        let driver = PacedDriver::new();
        let mut clock = FixedRateClock::with_interval_ms(5.0);
        clock.start(TickToken::new(1));
        let before = driver.now_ms();
        assert_eq!(driver.wait_for_tick(&mut clock), Some(TickToken::new(1)));
        assert!(driver.now_ms() - before >= 5.0);
    }

    #[test]
    fn test_frame_log_counts() {
        let mut sink = FrameLog::new(0);
        let snapshot = Snapshot {
            phase: crate::sim::RoundPhase::Running,
            bird: crate::sim::Rect::new(150.0, 300.0, 32.0, 32.0),
            pipes: Vec::new(),
            trail: Vec::new(),
            score: 0,
        };
        sink.frame(&snapshot);
        sink.frame(&snapshot);
        assert_eq!(sink.frames(), 2);
    }
}
