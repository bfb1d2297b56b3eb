//! Fixed-rate tick clock
//!
//! The clock never calls into the game. Drivers (a sleeping loop on native,
//! `requestAnimationFrame` in the browser) poll it with the current time and
//! forward any tick it hands out. Every tick carries the [`TickToken`] of the
//! round that started the clock, so a late tick from an old round can be told
//! apart from a fresh one.

/// Identifies the round a tick belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

impl TickToken {
    pub const fn new(round: u64) -> Self {
        Self(round)
    }

    pub const fn round(self) -> u64 {
        self.0
    }
}

/// Start/stop control over a periodic tick source
pub trait Clock {
    /// Begin ticking for the round identified by `token`, replacing any previous schedule
    fn start(&mut self, token: TickToken);

    /// Stop ticking. Idempotent.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Schedule {
    Stopped,
    /// Started but not yet polled; the first poll anchors the timeline
    Armed(TickToken),
    Due { token: TickToken, at_ms: f64 },
}

/// Hands out at most one tick per poll at a fixed interval
///
/// Missed intervals are dropped rather than replayed: after a stall the next
/// tick is scheduled one interval after the poll that noticed it.
#[derive(Debug, Clone)]
pub struct FixedRateClock {
    interval_ms: f64,
    schedule: Schedule,
}

impl FixedRateClock {
    pub fn new(hz: u32) -> Self {
        Self::with_interval_ms(1000.0 / f64::from(hz.max(1)))
    }

    pub fn with_interval_ms(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            schedule: Schedule::Stopped,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Token of the round currently being ticked
    pub fn token(&self) -> Option<TickToken> {
        match self.schedule {
            Schedule::Stopped => None,
            Schedule::Armed(token) | Schedule::Due { token, .. } => Some(token),
        }
    }

    /// When the next tick is due, if the timeline is anchored
    pub fn next_due_ms(&self) -> Option<f64> {
        match self.schedule {
            Schedule::Due { at_ms, .. } => Some(at_ms),
            _ => None,
        }
    }

    /// Returns a tick if one is due at `now_ms`
    pub fn poll(&mut self, now_ms: f64) -> Option<TickToken> {
        match self.schedule {
            Schedule::Stopped => None,
            Schedule::Armed(token) => {
                self.schedule = Schedule::Due {
                    token,
                    at_ms: now_ms + self.interval_ms,
                };
                None
            }
            Schedule::Due { token, at_ms } => {
                if now_ms < at_ms {
                    return None;
                }
                let mut next = at_ms + self.interval_ms;
                if next <= now_ms {
                    next = now_ms + self.interval_ms;
                }
                self.schedule = Schedule::Due { token, at_ms: next };
                Some(token)
            }
        }
    }
}

impl Clock for FixedRateClock {
    fn start(&mut self, token: TickToken) {
        self.schedule = Schedule::Armed(token);
    }

    fn stop(&mut self) {
        self.schedule = Schedule::Stopped;
    }

    fn is_running(&self) -> bool {
        self.schedule != Schedule::Stopped
    }
}
