use std::time::Duration;

use crate::error::{NbackError, Result};

pub const WINDOW_SIZE_PRESETS: [usize; 3] = [1, 2, 3];
pub const TOTAL_TRIALS_PRESETS: [usize; 3] = [5, 10, 15];
pub const CADENCE_PRESETS_MS: [u64; 4] = [2000, 3000, 5000, 8000];

pub const MAX_WINDOW_SIZE: usize = 9;
pub const MAX_TOTAL_TRIALS: usize = 100;
pub const MAX_CADENCE_MS: u64 = 60_000;

fn check_range(field: &'static str, value: u64, max: u64, reason: &'static str) -> Result<()> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(NbackError::InvalidConfig { field, value, reason })
    }
}

/// Validated parameters of one session.
///
/// Fields are private so a `SessionConfig` can only exist with every value
/// between 1 and its `MAX_*` bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    window_size: usize,
    total_trials: usize,
    cadence: Duration,
}

impl SessionConfig {
    pub fn new(window_size: usize, total_trials: usize, cadence_ms: u64) -> Result<Self> {
        check_range(
            "window_size",
            window_size as u64,
            MAX_WINDOW_SIZE as u64,
            "must be between 1 and 9",
        )?;
        check_range(
            "total_trials",
            total_trials as u64,
            MAX_TOTAL_TRIALS as u64,
            "must be between 1 and 100",
        )?;
        check_range(
            "cadence_ms",
            cadence_ms,
            MAX_CADENCE_MS,
            "must be between 1 and 60000",
        )?;

        Ok(Self {
            window_size,
            total_trials,
            cadence: Duration::from_millis(cadence_ms),
        })
    }

    pub fn with_window_size(self, window_size: usize) -> Result<Self> {
        Self::new(window_size, self.total_trials, self.cadence_ms())
    }

    pub fn with_total_trials(self, total_trials: usize) -> Result<Self> {
        Self::new(self.window_size, total_trials, self.cadence_ms())
    }

    pub fn with_cadence_ms(self, cadence_ms: u64) -> Result<Self> {
        Self::new(self.window_size, self.total_trials, cadence_ms)
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn total_trials(&self) -> usize {
        self.total_trials
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    pub fn cadence_ms(&self) -> u64 {
        self.cadence.as_millis() as u64
    }

    /// Rounds emitted before the session ends: warm-up plus scorable trials.
    pub fn last_round(&self) -> usize {
        self.total_trials + self.window_size
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            window_size: 1,
            total_trials: 10,
            cadence: Duration::from_millis(5000),
        }
    }
}

/// Next entry in `presets` after `current`, wrapping around.
///
/// Values that are not presets (e.g. from the command line) jump to the first
/// preset above them.
pub fn next_preset<T: Copy + PartialOrd>(presets: &[T], current: T) -> T {
    presets
        .iter()
        .copied()
        .find(|&p| p > current)
        .or_else(|| presets.first().copied())
        .unwrap_or(current)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionStatus {
    Configuring,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    None,
    /// Asking whether the current value repeats the n-back one
    Prompt,
    Correct,
    Incorrect,
}

impl Feedback {
    pub fn is_verdict(&self) -> bool {
        matches!(self, Feedback::Correct | Feedback::Incorrect)
    }

    pub fn text(&self, window_size: usize) -> String {
        match self {
            Feedback::None => String::new(),
            Feedback::Prompt => format!("Same as {} back?", window_size),
            Feedback::Correct => "✓ Correct!".to_string(),
            Feedback::Incorrect => "✗ Not quite!".to_string(),
        }
    }
}

/// Decorative highlight shown briefly whenever a new value appears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pulse {
    #[default]
    Rest,
    Flash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    /// Not judgeable right now: wrong status, warm-up, or already answered
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: usize,
    pub judged: usize,
    pub total_trials: usize,
    pub window_size: usize,
}

impl SessionSummary {
    pub fn is_perfect(&self) -> bool {
        self.score == self.total_trials
    }

    pub fn unanswered(&self) -> usize {
        self.total_trials.saturating_sub(self.judged)
    }
}

/// Events the game raises for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    Finished(SessionSummary),
    /// Every trial answered correctly; raised once per completed session
    PerfectScore,
}
