//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world by exactly one step.

use serde::{Deserialize, Serialize};

use super::collision::{bird_ground_collision, bird_pipe_collision};
use super::spawn::{generate_pipe, needs_spawn};
use super::state::{RoundPhase, Simulation, TerminalCause};

/// What a single call to [`Simulation::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Round not running, nothing changed
    Skipped,
    /// World advanced one tick
    Advanced,
    /// World advanced and the round just ended. Reported once per round.
    Ended(TerminalCause),
}

impl Simulation {
    /// Advance the world by one fixed tick
    ///
    /// Order: gravity, integrate, ground check, trail, spawn, pipes (scroll,
    /// collide, score), compact. A collision ends the round immediately and the
    /// remaining pipes are left untouched for this tick.
    pub fn step(&mut self) -> StepOutcome {
        if self.phase != RoundPhase::Running {
            return StepOutcome::Skipped;
        }
        self.time_ticks += 1;

        let speed = self.tuning.pipe_speed;
        let pipe_width = self.tuning.pipe_width;
        let gap = self.tuning.pipe_gap;

        self.bird.velocity += self.tuning.gravity;
        self.bird.pos.y += self.bird.velocity;

        let bird_rect = self.bird.rect();
        if bird_ground_collision(&bird_rect, self.viewport.y) {
            return self.end_round(TerminalCause::GroundCollision);
        }

        self.trail.record(self.bird.center());
        self.trail.shift(speed);

        if needs_spawn(&self.pipes, self.viewport.x, &self.tuning) {
            let pipe = generate_pipe(&mut self.rng, self.viewport, &self.tuning);
            log::trace!("Spawned pipe at x={} gap_top={:.1}", pipe.x, pipe.gap_top);
            self.pipes.push(pipe);
        }

        let bird_front = self.bird.front();
        let mut hit = false;
        for pipe in &mut self.pipes {
            pipe.x -= speed;

            if bird_pipe_collision(&bird_rect, pipe, pipe_width, gap) {
                hit = true;
                break;
            }

            if !pipe.passed && bird_front > pipe.trailing_edge(pipe_width) {
                pipe.passed = true;
                self.score += 1;
                log::debug!("Pipe cleared, score {}", self.score);
            }
        }
        if hit {
            return self.end_round(TerminalCause::ObstacleCollision);
        }

        self.pipes.retain(|pipe| pipe.trailing_edge(pipe_width) >= 0.0);

        StepOutcome::Advanced
    }

    fn end_round(&mut self, cause: TerminalCause) -> StepOutcome {
        self.phase = RoundPhase::Ended;
        log::debug!(
            "Round ended by {:?} after {} ticks (score {})",
            cause,
            self.time_ticks,
            self.score
        );
        StepOutcome::Ended(cause)
    }
}

/// Demo-mode pilot: jump when the bird is sinking below the next gap's safe line
///
/// Targets the first pipe whose trailing edge is still ahead of the bird's tail;
/// with no pipe in sight it holds the middle of the viewport.
pub fn autopilot_wants_jump(sim: &Simulation) -> bool {
    if !sim.is_running() {
        return false;
    }
    let tuning = sim.tuning();
    let bird = sim.bird();

    let floor = sim
        .pipes()
        .iter()
        .find(|pipe| pipe.trailing_edge(tuning.pipe_width) > bird.pos.x)
        .map(|pipe| pipe.gap_top + tuning.pipe_gap * 0.85)
        .unwrap_or(sim.viewport().y / 2.0 + bird.size);

    // Only jump on the way down so jumps don't stack into the ceiling
    bird.velocity > 0.0 && bird.pos.y + bird.size > floor
}
