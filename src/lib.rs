//! Flappy Run - A side-scrolling pipe-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gravity, pipes, collisions, score)
//! - `lifecycle`: Round state machine wiring the clock, simulation and collaborators
//! - `platform`: Clock, input adapter and host collaborator abstractions
//! - `audio`: Sound collaborator (logging on native, Web Audio in the browser)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod audio;
pub mod lifecycle;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use lifecycle::{Collaborators, Game};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
///
/// Units are pixels and ticks; velocities are pixels/tick.
pub mod consts {
    /// Fixed simulation rate
    pub const TICK_HZ: u32 = 60;

    /// Downward acceleration applied every tick (pixels/tick²)
    pub const GRAVITY: f32 = 0.4;
    /// Velocity set by a jump (negative = upward). Overrides, never adds.
    pub const JUMP_IMPULSE: f32 = -10.0;

    /// Bird is a square of this side length
    pub const BIRD_SIZE: f32 = 32.0;
    /// Bird never moves horizontally; the world scrolls instead
    pub const BIRD_X: f32 = 150.0;

    /// Pipe defaults
    pub const PIPE_WIDTH: f32 = 50.0;
    pub const PIPE_GAP: f32 = 200.0;
    pub const PIPE_SPEED: f32 = 2.0;
    /// A new pipe spawns once the newest one is further left than `width - PIPE_SPAWN_LEAD`
    pub const PIPE_SPAWN_LEAD: f32 = 300.0;
    /// Minimum distance between the gap and the top/bottom of the viewport
    pub const GAP_MARGIN: f32 = 25.0;

    /// Maximum number of trail points kept for rendering
    pub const TRAIL_CAPACITY: usize = 200;

    /// Viewport used when the host can't tell us its size (headless runs)
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 400.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;
}
