use std::time::{Duration, Instant};

/// Round cadence right after a judged answer.
pub const SHORT_CADENCE: Duration = Duration::from_millis(2000);

/// How long the per-trial flash stays on screen.
pub const PULSE_DURATION: Duration = Duration::from_millis(300);

/// Delay before the results screen offers to go back to the settings.
pub const RESTART_AFFORDANCE_DELAY: Duration = Duration::from_millis(2000);

/// A single pending deadline.
///
/// Arming replaces whatever was pending, so a timer that has been re-armed or
/// cancelled can never fire with its old deadline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    due: Option<Instant>,
}

impl Deadline {
    pub fn arm(&mut self, now: Instant, after: Duration) {
        self.due = Some(now + after);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    pub fn due(&self) -> Option<Instant> {
        self.due
    }

    /// Disarms and returns true if the deadline has passed at `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if due <= now => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

/// Every timer a session can have outstanding
#[derive(Debug, Default, Clone, Copy)]
pub struct Timers {
    pub round: Deadline,
    pub pulse: Deadline,
    pub restart_affordance: Deadline,
}

impl Timers {
    /// Stops the timers that only make sense while playing.
    pub fn cancel_play(&mut self) {
        self.round.cancel();
        self.pulse.cancel();
    }

    pub fn cancel_all(&mut self) {
        self.cancel_play();
        self.restart_affordance.cancel();
    }

    pub fn any_armed(&self) -> bool {
        self.round.is_armed() || self.pulse.is_armed() || self.restart_affordance.is_armed()
    }
}

/// The cadence the player picked and the one currently driving the round timer.
///
/// `effective` drops to [`SHORT_CADENCE`] right after a judged answer and goes
/// back to `configured` on the following tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub configured: Duration,
    pub effective: Duration,
}

impl Cadence {
    pub fn new(configured: Duration) -> Self {
        Self {
            configured,
            effective: configured,
        }
    }

    pub fn after_answer(self) -> Self {
        Self {
            effective: SHORT_CADENCE,
            ..self
        }
    }

    pub fn after_tick(self) -> Self {
        Self {
            effective: self.configured,
            ..self
        }
    }
}
