//! Pipe generation
//!
//! Pipes enter just past the right edge with the gap at a random height that
//! always leaves `gap_margin` clear above and below.

use glam::Vec2;
use rand::Rng;

use super::state::Pipe;
use crate::tuning::Tuning;

/// Create a new pipe just off the right edge of the viewport
///
/// `gap_top` is uniform in `[margin, height - gap - margin)`. If the viewport is
/// too short for the gap plus both margins, the gap is pinned to the top margin.
pub fn generate_pipe<R: Rng + ?Sized>(rng: &mut R, viewport: Vec2, tuning: &Tuning) -> Pipe {
    let margin = tuning.gap_margin;
    let span = (viewport.y - tuning.pipe_gap - 2.0 * margin).max(0.0);
    let mut gap_top = rng.random::<f32>() * span + margin;
    if span > 0.0 {
        // random() < 1 but the product can still round up onto the bound
        let upper = viewport.y - tuning.pipe_gap - margin;
        gap_top = gap_top.min(f32::from_bits(upper.to_bits() - 1)).max(margin);
    }
    Pipe {
        x: viewport.x + tuning.pipe_width,
        gap_top,
        passed: false,
    }
}

/// True when the newest pipe has scrolled strictly past the spawn line
pub fn needs_spawn(pipes: &[Pipe], viewport_width: f32, tuning: &Tuning) -> bool {
    pipes
        .last()
        .is_none_or(|newest| newest.x < viewport_width - tuning.spawn_lead)
}
