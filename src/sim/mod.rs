//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pipes in creation order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, bird_ground_collision, bird_pipe_collision, pipe_rects};
pub use spawn::{generate_pipe, needs_spawn};
pub use state::{Bird, Pipe, PipeView, RoundPhase, Simulation, Snapshot, TerminalCause, Trail};
pub use tick::{StepOutcome, autopilot_wants_jump};
