use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::generator::{TrialGenerator, TrialSource};
use crate::history::History;
use crate::session::{
    AnswerOutcome, Feedback, Pulse, SessionConfig, SessionSignal, SessionStatus, SessionSummary,
};
use crate::timer::{Cadence, Timers, PULSE_DURATION, RESTART_AFFORDANCE_DELAY};

/// N-back session state machine.
///
/// `Configuring -> Playing -> Finished -> Configuring`. Rounds advance when the
/// round timer fires (see [`Game::poll`]); answers are judged by comparing the
/// oldest and newest values of the bounded history. Actions that are not
/// valid for the current state are ignored.
#[derive(Debug)]
pub struct Game {
    config: SessionConfig,
    status: SessionStatus,
    history: History,
    current_number: Option<u8>,
    round: usize,
    score: usize,
    judged: usize,
    answered: bool,
    feedback: Feedback,
    cadence: Cadence,
    pulse: Pulse,
    show_restart_affordance: bool,
    celebrated: bool,
    timers: Timers,
    signals: Vec<SessionSignal>,
    source: Box<dyn TrialSource>,
}

impl Game {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_source(config, Box::new(TrialGenerator::new()))
    }

    pub fn with_source(config: SessionConfig, source: Box<dyn TrialSource>) -> Self {
        Self {
            config,
            status: SessionStatus::Configuring,
            history: History::new(config.window_size()),
            current_number: None,
            round: 0,
            score: 0,
            judged: 0,
            answered: false,
            feedback: Feedback::None,
            cadence: Cadence::new(config.cadence()),
            pulse: Pulse::Rest,
            show_restart_affordance: false,
            celebrated: false,
            timers: Timers::default(),
            signals: Vec::new(),
            source,
        }
    }

    /// Replaces the session parameters. Only honoured while configuring.
    pub fn configure(&mut self, config: SessionConfig) -> bool {
        if self.status != SessionStatus::Configuring {
            return false;
        }
        self.config = config;
        self.cadence = Cadence::new(config.cadence());
        true
    }

    pub fn select_window_size(&mut self, window_size: usize) -> Result<bool> {
        let config = self.config.with_window_size(window_size)?;
        Ok(self.configure(config))
    }

    pub fn select_total_trials(&mut self, total_trials: usize) -> Result<bool> {
        let config = self.config.with_total_trials(total_trials)?;
        Ok(self.configure(config))
    }

    pub fn select_cadence(&mut self, cadence_ms: u64) -> Result<bool> {
        let config = self.config.with_cadence_ms(cadence_ms)?;
        Ok(self.configure(config))
    }

    pub fn start(&mut self, now: Instant) -> bool {
        if self.status != SessionStatus::Configuring {
            return false;
        }

        self.history = History::new(self.config.window_size());
        self.current_number = None;
        self.round = 0;
        self.score = 0;
        self.judged = 0;
        self.answered = false;
        self.feedback = Feedback::None;
        self.cadence = Cadence::new(self.config.cadence());
        self.pulse = Pulse::Rest;
        self.show_restart_affordance = false;
        self.celebrated = false;
        self.signals.clear();

        self.timers.cancel_all();
        self.timers.round.arm(now, self.cadence.effective);
        self.status = SessionStatus::Playing;

        info!(
            window_size = self.config.window_size(),
            total_trials = self.config.total_trials(),
            cadence_ms = self.config.cadence_ms(),
            "session started"
        );
        true
    }

    /// Fires every timer that is due at `now`.
    pub fn poll(&mut self, now: Instant) {
        if self.timers.pulse.fire(now) {
            self.pulse = Pulse::Rest;
        }
        if self.timers.restart_affordance.fire(now) {
            self.show_restart_affordance = true;
        }
        if self.timers.round.fire(now) {
            self.on_tick(now);
        }
    }

    /// Emits the next trial. Called when the round timer elapses.
    pub fn on_tick(&mut self, now: Instant) {
        if self.status != SessionStatus::Playing {
            return;
        }

        let value = self.source.next_value(&self.history);
        self.history.push(value);
        self.current_number = Some(value);
        self.cadence = self.cadence.after_tick();
        self.answered = false;
        self.feedback = Feedback::Prompt;
        self.pulse = Pulse::Flash;
        self.timers.pulse.arm(now, PULSE_DURATION);
        self.round += 1;

        debug!(round = self.round, value, "trial emitted");

        if self.round > self.config.last_round() {
            self.finish(now);
        } else {
            self.timers.round.arm(now, self.cadence.effective);
        }
    }

    pub fn answer(&mut self, is_same: bool, now: Instant) -> AnswerOutcome {
        if self.status != SessionStatus::Playing || self.answered {
            return AnswerOutcome::Ignored;
        }
        let Some(is_match) = self.history.is_match() else {
            return AnswerOutcome::Ignored;
        };

        self.answered = true;
        self.judged += 1;

        let outcome = if is_same == is_match {
            self.score += 1;
            self.feedback = Feedback::Correct;
            AnswerOutcome::Correct
        } else {
            self.feedback = Feedback::Incorrect;
            AnswerOutcome::Incorrect
        };

        // answering speeds up the next round only
        self.cadence = self.cadence.after_answer();
        self.timers.round.arm(now, self.cadence.effective);

        debug!(round = self.round, ?outcome, score = self.score, "answer judged");
        outcome
    }

    pub fn restart(&mut self) -> bool {
        if self.status != SessionStatus::Finished {
            return false;
        }
        self.timers.cancel_all();
        self.show_restart_affordance = false;
        self.pulse = Pulse::Rest;
        self.status = SessionStatus::Configuring;
        true
    }

    fn finish(&mut self, now: Instant) {
        self.timers.cancel_play();
        self.pulse = Pulse::Rest;
        self.status = SessionStatus::Finished;
        self.show_restart_affordance = false;
        self.timers.restart_affordance.arm(now, RESTART_AFFORDANCE_DELAY);

        let summary = self.summary();
        info!(
            score = summary.score,
            judged = summary.judged,
            total_trials = summary.total_trials,
            "session finished"
        );
        self.signals.push(SessionSignal::Finished(summary));

        if summary.is_perfect() && !self.celebrated {
            self.celebrated = true;
            self.signals.push(SessionSignal::PerfectScore);
        }
    }

    pub fn drain_signals(&mut self) -> Vec<SessionSignal> {
        std::mem::take(&mut self.signals)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            score: self.score,
            judged: self.judged,
            total_trials: self.config.total_trials(),
            window_size: self.config.window_size(),
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current_number(&self) -> Option<u8> {
        self.current_number
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn judged(&self) -> usize {
        self.judged
    }

    pub fn total_trials(&self) -> usize {
        self.config.total_trials()
    }

    pub fn window_size(&self) -> usize {
        self.config.window_size()
    }

    pub fn has_answered(&self) -> bool {
        self.answered
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn feedback_text(&self) -> String {
        self.feedback.text(self.config.window_size())
    }

    pub fn is_judgeable(&self) -> bool {
        self.history.is_judgeable()
    }

    /// 1-based number of the question on screen; warm-up rounds have none.
    pub fn question_index(&self) -> Option<usize> {
        if self.is_judgeable() {
            Some(self.round - self.config.window_size())
        } else {
            None
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn pulse(&self) -> Pulse {
        self.pulse
    }

    pub fn show_restart_affordance(&self) -> bool {
        self.show_restart_affordance
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }
}
