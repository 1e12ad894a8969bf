use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::warn;

/// Frame rate of the TUI loop. Game timers are checked on every frame.
pub const TICK_RATE_MS: u64 = 100;

#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    /// No input within one frame
    Tick,
    /// The input source is gone and nothing more will arrive
    Closed,
}

/// Maps a terminal event to the events the game reacts to.
pub fn translate(event: CtEvent) -> Option<GameEvent> {
    match event {
        // key release events would answer twice on some terminals
        CtEvent::Key(key) if key.kind != KeyEventKind::Release => Some(GameEvent::Key(key)),
        CtEvent::Resize(_, _) => Some(GameEvent::Resize),
        _ => None,
    }
}

pub trait EventSource: Send + 'static {
    /// Waits up to `timeout` for the next event.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Events delivered over an `mpsc` channel.
///
/// [`ChannelEventSource::terminal`] feeds the channel from a reader thread;
/// tests and headless runs send events themselves.
pub struct ChannelEventSource {
    rx: Receiver<GameEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }

    /// Spawns a thread forwarding crossterm input. The channel disconnects
    /// when reading from the terminal fails.
    pub fn terminal() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let raw = match event::read() {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(error = %e, "terminal input failed");
                    break;
                }
            };
            if let Some(evt) = translate(raw) {
                if tx.send(evt).is_err() {
                    break;
                }
            }
        });

        Self::new(rx)
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Hands the app one event per frame.
pub struct Runner<E: EventSource> {
    events: E,
    tick: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(events: E, tick: Duration) -> Self {
        Self { events, tick }
    }

    pub fn at_frame_rate(events: E) -> Self {
        Self::new(events, Duration::from_millis(TICK_RATE_MS))
    }

    #[cfg(test)]
    fn tick(&self) -> Duration {
        self.tick
    }

    /// Blocks up to one frame. A quiet frame is a `Tick`; a disconnected
    /// source is `Closed`, so the caller can stop instead of spinning.
    pub fn step(&self) -> GameEvent {
        match self.events.recv_timeout(self.tick) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => GameEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => GameEvent::Closed,
        }
    }
}
