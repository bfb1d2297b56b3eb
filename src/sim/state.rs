//! Game state and core simulation types
//!
//! The [`Simulation`] owns everything that changes during a round. Nothing here
//! touches a platform API, so any number of simulations can run side by side.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, pipe_rects};
use crate::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use crate::tuning::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Nothing started yet (or the host closed the round)
    #[default]
    Idle,
    /// Clock is driving steps
    Running,
    /// Round over, world frozen, last score kept for display
    Ended,
}

/// Why a round ended. Both end the round the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalCause {
    /// Bird fell through the bottom of the viewport
    GroundCollision,
    /// Bird touched a pipe outside its gap
    ObstacleCollision,
}

/// The player-controlled bird
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    pub size: f32,
    /// Vertical velocity (positive = downward)
    pub velocity: f32,
}

impl Bird {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size,
            velocity: 0.0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Leading (right) edge
    #[inline]
    pub fn front(&self) -> f32 {
        self.pos.x + self.size
    }
}

/// A pipe pair with an opening of constant height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge; decreases by the scroll speed every tick
    pub x: f32,
    /// Top of the gap, fixed at creation
    pub gap_top: f32,
    /// Already counted toward the score
    pub passed: bool,
}

impl Pipe {
    /// Right edge given the pipe width
    #[inline]
    pub fn trailing_edge(&self, width: f32) -> f32 {
        self.x + width
    }
}

/// Bounded FIFO of recent bird centers (rendering only)
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting the oldest beyond capacity
    pub fn record(&mut self, point: Vec2) {
        if self.capacity == 0 {
            return;
        }
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Scroll every point left with the world
    pub fn shift(&mut self, dx: f32) {
        for point in &mut self.points {
            point.x -= dx;
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }
}

/// A pipe as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeView {
    pub x: f32,
    /// From the top of the viewport down to the gap
    pub top: Rect,
    /// From the bottom of the gap down to the bottom of the viewport
    pub bottom: Rect,
}

/// Read-only view of the world emitted after each step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: RoundPhase,
    pub bird: Rect,
    /// Left-to-right (creation order)
    pub pipes: Vec<PipeView>,
    /// Oldest first
    pub trail: Vec<Vec2>,
    pub score: u32,
}

/// Complete game state for one round at a time
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) tuning: Tuning,
    /// Seed the RNG was created from (for logging/replay)
    seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) phase: RoundPhase,
    /// Viewport size captured at the last reset
    pub(crate) viewport: Vec2,
    pub(crate) bird: Bird,
    /// Creation order == left-to-right order
    pub(crate) pipes: Vec<Pipe>,
    pub(crate) trail: Trail,
    pub(crate) score: u32,
    /// Steps taken this round
    pub(crate) time_ticks: u64,
}

impl Simulation {
    /// Create an idle simulation with the given tuning and RNG seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let viewport = Vec2::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT);
        Self {
            bird: Bird::new(tuning.bird_x, viewport.y / 2.0, tuning.bird_size),
            trail: Trail::with_capacity(tuning.trail_capacity),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            phase: RoundPhase::Idle,
            viewport,
            pipes: Vec::new(),
            score: 0,
            time_ticks: 0,
            tuning,
        }
    }

    /// Start a fresh round in a viewport of the given size
    pub fn reset(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        self.bird = Bird::new(self.tuning.bird_x, height / 2.0, self.tuning.bird_size);
        self.pipes.clear();
        self.trail.clear();
        self.score = 0;
        self.time_ticks = 0;
        self.phase = RoundPhase::Running;
    }

    /// Set the bird's velocity to the jump impulse. Returns false (and does
    /// nothing) unless the round is running.
    pub fn jump(&mut self) -> bool {
        if self.phase != RoundPhase::Running {
            return false;
        }
        self.bird.velocity = self.tuning.jump_impulse;
        true
    }

    /// Drop back to idle without ending the round (host closed the game)
    pub fn halt(&mut self) {
        self.phase = RoundPhase::Idle;
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Owned copy of everything a renderer needs
    pub fn snapshot(&self) -> Snapshot {
        let width = self.tuning.pipe_width;
        let gap = self.tuning.pipe_gap;
        Snapshot {
            phase: self.phase,
            bird: self.bird.rect(),
            pipes: self
                .pipes
                .iter()
                .map(|pipe| {
                    let (top, bottom) = pipe_rects(pipe, width, gap, self.viewport.y);
                    PipeView {
                        x: pipe.x,
                        top,
                        bottom,
                    }
                })
                .collect(),
            trail: self.trail.iter().copied().collect(),
            score: self.score,
        }
    }
}
