//! Collision detection for axis-aligned rectangles
//!
//! The bird is a rectangle; a pipe is two rectangles separated by a gap.
//! A pipe is only solid where the bird is horizontally over it.

use serde::{Deserialize, Serialize};

use super::state::Pipe;

/// Axis-aligned rectangle, `(x, y)` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap on the x axis (touching edges don't count)
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.x < right && self.right() > left
    }
}

/// Whether the bird touches the pipe anywhere outside its gap
pub fn bird_pipe_collision(bird: &Rect, pipe: &Pipe, pipe_width: f32, gap: f32) -> bool {
    if !bird.overlaps_x(pipe.x, pipe.trailing_edge(pipe_width)) {
        return false;
    }
    bird.y < pipe.gap_top || bird.bottom() > pipe.gap_top + gap
}

/// Whether the bird has dropped through the bottom of the viewport
#[inline]
pub fn bird_ground_collision(bird: &Rect, viewport_height: f32) -> bool {
    bird.bottom() > viewport_height
}

/// Top and bottom pipe rectangles for rendering
pub fn pipe_rects(pipe: &Pipe, pipe_width: f32, gap: f32, viewport_height: f32) -> (Rect, Rect) {
    let gap_bottom = pipe.gap_top + gap;
    let top = Rect::new(pipe.x, 0.0, pipe_width, pipe.gap_top);
    let bottom = Rect::new(
        pipe.x,
        gap_bottom,
        pipe_width,
        (viewport_height - gap_bottom).max(0.0),
    );
    (top, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f32 = 50.0;
    const GAP: f32 = 200.0;

    fn pipe_at(x: f32, gap_top: f32) -> Pipe {
        Pipe {
            x,
            gap_top,
            passed: false,
        }
    }

    #[test]
    fn test_inside_gap_no_collision() {
        let bird = Rect::new(150.0, 200.0, 32.0, 32.0);
        assert!(!bird_pipe_collision(&bird, &pipe_at(140.0, 150.0), WIDTH, GAP));
    }

    #[test]
    fn test_hits_top_pipe() {
        let bird = Rect::new(150.0, 149.0, 32.0, 32.0);
        assert!(bird_pipe_collision(&bird, &pipe_at(140.0, 150.0), WIDTH, GAP));
    }

    #[test]
    fn test_hits_bottom_pipe() {
        // Gap spans 150..350; bird bottom at 351
        let bird = Rect::new(150.0, 319.0, 32.0, 32.0);
        assert!(bird_pipe_collision(&bird, &pipe_at(140.0, 150.0), WIDTH, GAP));
    }

    #[test]
    fn test_exact_gap_edges_are_safe() {
        let top_flush = Rect::new(150.0, 150.0, 32.0, 32.0);
        let bottom_flush = Rect::new(150.0, 318.0, 32.0, 32.0);
        let pipe = pipe_at(140.0, 150.0);
        assert!(!bird_pipe_collision(&top_flush, &pipe, WIDTH, GAP));
        assert!(!bird_pipe_collision(&bottom_flush, &pipe, WIDTH, GAP));
    }

    #[test]
    fn test_no_horizontal_overlap() {
        let bird = Rect::new(150.0, 0.0, 32.0, 32.0);
        // Pipe entirely right of the bird, and touching edges
        assert!(!bird_pipe_collision(&bird, &pipe_at(200.0, 300.0), WIDTH, GAP));
        assert!(!bird_pipe_collision(&bird, &pipe_at(182.0, 300.0), WIDTH, GAP));
        assert!(!bird_pipe_collision(&bird, &pipe_at(100.0, 300.0), WIDTH, GAP));
        // One pixel of overlap
        assert!(bird_pipe_collision(&bird, &pipe_at(181.0, 300.0), WIDTH, GAP));
    }

    #[test]
    fn test_above_viewport_over_pipe_collides() {
        let bird = Rect::new(150.0, -100.0, 32.0, 32.0);
        assert!(bird_pipe_collision(&bird, &pipe_at(140.0, 50.0), WIDTH, GAP));
    }

    #[test]
    fn test_ground_collision_is_strict() {
        assert!(!bird_ground_collision(&Rect::new(150.0, 568.0, 32.0, 32.0), 600.0));
        assert!(bird_ground_collision(&Rect::new(150.0, 568.5, 32.0, 32.0), 600.0));
    }

    #[test]
    fn test_pipe_rects_clamp_bottom() {
        let (top, bottom) = pipe_rects(&pipe_at(10.0, 500.0), WIDTH, GAP, 600.0);
        assert_eq!(top.h, 500.0);
        assert_eq!(bottom.y, 700.0);
        assert_eq!(bottom.h, 0.0);
    }
}
