//! Platform abstraction layer
//!
//! Everything the game core talks to but doesn't own:
//! - Time/ticks (`clock`)
//! - Input events (`input`)
//! - Screens, frame output and viewport size (traits below)
//!
//! `native` holds headless implementations; `web` the browser ones.

pub mod clock;
pub mod input;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::Snapshot;

pub use clock::{Clock, FixedRateClock, TickToken};
pub use input::{Command, InputAdapter, RawInput};

/// Which UI surface should be visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Start,
    Playing,
    Ended { final_score: u32 },
}

/// Switches visible UI surfaces
pub trait Presenter {
    fn show(&mut self, screen: Screen);
}

/// Receives the world once per tick. Must not hold on to the snapshot.
pub trait FrameSink {
    fn frame(&mut self, snapshot: &Snapshot);

    /// Round is over; `final_score` is what the end screen shows
    fn round_ended(&mut self, final_score: u32);
}

/// Supplies the current drawable size. Read once per round at start.
pub trait Viewport {
    fn size(&self) -> Vec2;
}
