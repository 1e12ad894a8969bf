mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use nback::{
    app_dirs::AppDirs,
    celebration::CelebrationAnimation,
    config::{Config, ConfigStore, FileConfigStore},
    game::Game,
    generator::TrialGenerator,
    logging,
    runtime::{ChannelEventSource, EventSource, GameEvent, Runner},
    session::{
        next_preset, SessionSignal, SessionStatus, CADENCE_PRESETS_MS, MAX_CADENCE_MS,
        MAX_TOTAL_TRIALS, MAX_WINDOW_SIZE, TOTAL_TRIALS_PRESETS, WINDOW_SIZE_PRESETS,
    },
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};
use tracing::{info, warn};

/// n-back memory training in the terminal
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "Numbers appear one at a time. Decide whether each one matches the number shown n steps earlier. Settings you pick are remembered for the next run; scores are not."
)]
pub struct Cli {
    /// how many steps back to compare against
    #[clap(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..=MAX_WINDOW_SIZE as u64))]
    window_size: Option<u64>,

    /// number of scored questions per session
    #[clap(short = 't', long, value_parser = clap::value_parser!(u64).range(1..=MAX_TOTAL_TRIALS as u64))]
    total_trials: Option<u64>,

    /// milliseconds between numbers
    #[clap(short = 'c', long, value_parser = clap::value_parser!(u64).range(1..=MAX_CADENCE_MS as u64))]
    cadence_ms: Option<u64>,

    /// seed for a reproducible number sequence
    #[clap(long)]
    seed: Option<u64>,

    /// write logs here instead of the default state directory
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Command line values take precedence over remembered settings
    fn apply_overrides(&self, stored: Config) -> Config {
        Config {
            window_size: self
                .window_size
                .map(|v| v as usize)
                .unwrap_or(stored.window_size),
            total_trials: self
                .total_trials
                .map(|v| v as usize)
                .unwrap_or(stored.total_trials),
            cadence_ms: self.cadence_ms.unwrap_or(stored.cadence_ms),
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub celebration: CelebrationAnimation,
    store: Option<FileConfigStore>,
}

impl App {
    pub fn new(cli: &Cli, store: Option<FileConfigStore>) -> Self {
        let stored = store.as_ref().map(|s| s.load()).unwrap_or_default();
        let config = cli.apply_overrides(stored).session_config_or_default();

        let game = match cli.seed {
            Some(seed) => Game::with_source(config, Box::new(TrialGenerator::seeded(seed))),
            None => Game::new(config),
        };

        Self {
            game,
            celebration: CelebrationAnimation::new(),
            store,
        }
    }

    pub fn start(&mut self, now: Instant) {
        if !self.game.start(now) {
            return;
        }
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&Config::from(&self.game.config())) {
                warn!(error = %e, path = %store.path().display(), "could not save settings");
            }
        }
    }

    pub fn restart(&mut self) {
        if self.game.restart() {
            self.celebration.stop();
        }
    }

    /// Advances game timers and the celebration by one frame
    pub fn on_frame(&mut self, now: Instant, width: u16, height: u16) {
        self.game.poll(now);

        for signal in self.game.drain_signals() {
            match signal {
                SessionSignal::Finished(summary) => {
                    info!(
                        score = summary.score,
                        total_trials = summary.total_trials,
                        "results shown"
                    );
                }
                SessionSignal::PerfectScore => self.celebration.start_at(width, height, now),
            }
        }

        self.celebration.update_at(now);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Continue,
    Quit,
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) -> Control {
    if key.code == KeyCode::Esc
        || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
    {
        return Control::Quit;
    }

    match app.game.status() {
        SessionStatus::Configuring => {
            let config = app.game.config();
            let selected = match key.code {
                KeyCode::Char('w') => app
                    .game
                    .select_window_size(next_preset(&WINDOW_SIZE_PRESETS, config.window_size())),
                KeyCode::Char('t') => app.game.select_total_trials(next_preset(
                    &TOTAL_TRIALS_PRESETS,
                    config.total_trials(),
                )),
                KeyCode::Char('s') => app
                    .game
                    .select_cadence(next_preset(&CADENCE_PRESETS_MS, config.cadence_ms())),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    app.start(now);
                    Ok(true)
                }
                _ => Ok(false),
            };
            if let Err(e) = selected {
                warn!(error = %e, "setting rejected");
            }
        }
        SessionStatus::Playing => match key.code {
            KeyCode::Char('y') | KeyCode::Left => {
                app.game.answer(true, now);
            }
            KeyCode::Char('n') | KeyCode::Right => {
                app.game.answer(false, now);
            }
            _ => {}
        },
        SessionStatus::Finished => {
            if app.game.show_restart_affordance()
                && matches!(key.code, KeyCode::Char('r') | KeyCode::Enter)
            {
                app.restart();
            }
        }
    }

    Control::Continue
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        if let Err(e) = logging::init(&path) {
            eprintln!("logging disabled: {}", e);
        }
    }

    let mut app = App::new(&cli, Some(FileConfigStore::new()));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::at_frame_rate(ChannelEventSource::terminal());
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            GameEvent::Tick => {
                let size = terminal.size()?;
                app.on_frame(Instant::now(), size.width, size.height);
            }
            GameEvent::Resize => {}
            GameEvent::Closed => {
                warn!("terminal input closed, quitting");
                break;
            }
            GameEvent::Key(key) => {
                let now = Instant::now();
                if handle_key(app, key, now) == Control::Quit {
                    break;
                }
                app.game.poll(now);
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    ui::screen::current_screen(app.game.status()).render(app, f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use nback::{generator::ScriptedTrials, session::SessionConfig};
    use ratatui::{backend::TestBackend, Terminal};
    use std::{sync::mpsc, time::Duration};
    use tempfile::tempdir;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn scripted_app(window_size: usize, total_trials: usize, values: &[u8]) -> App {
        let config = SessionConfig::new(window_size, total_trials, 3000).unwrap();
        App {
            game: Game::with_source(config, Box::new(ScriptedTrials::new(values.to_vec()))),
            celebration: CelebrationAnimation::new(),
            store: None,
        }
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["nback"]);

        assert_eq!(cli.window_size, None);
        assert_eq!(cli.total_trials, None);
        assert_eq!(cli.cadence_ms, None);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_short_and_long_flags() {
        let cli = Cli::parse_from(["nback", "-n", "2", "-t", "15", "-c", "3000"]);
        assert_eq!(cli.window_size, Some(2));
        assert_eq!(cli.total_trials, Some(15));
        assert_eq!(cli.cadence_ms, Some(3000));

        let cli = Cli::parse_from(["nback", "--window-size", "3", "--seed", "42"]);
        assert_eq!(cli.window_size, Some(3));
        assert_eq!(cli.seed, Some(42));
    }

    #[test]
    fn test_cli_rejects_zero_values() {
        assert!(Cli::try_parse_from(["nback", "-n", "0"]).is_err());
        assert!(Cli::try_parse_from(["nback", "--total-trials", "0"]).is_err());
        assert!(Cli::try_parse_from(["nback", "--cadence-ms", "0"]).is_err());
    }

    #[test]
    fn test_cli_rejects_values_above_bounds() {
        assert!(Cli::try_parse_from(["nback", "-n", "18446744073709551615"]).is_err());
        assert!(Cli::try_parse_from(["nback", "-n", "10"]).is_err());
        assert!(Cli::try_parse_from(["nback", "-t", "101"]).is_err());
        assert!(Cli::try_parse_from(["nback", "-c", "60001"]).is_err());

        let cli = Cli::parse_from(["nback", "-n", "9", "-t", "100", "-c", "60000"]);
        let app = App::new(&cli, None);
        assert_eq!(app.game.window_size(), 9);
        assert_eq!(app.game.total_trials(), 100);
    }

    #[test]
    fn test_cli_overrides_stored_settings() {
        let stored = Config {
            window_size: 2,
            total_trials: 15,
            cadence_ms: 8000,
        };
        let cli = Cli::parse_from(["nback", "-c", "2000"]);

        let merged = cli.apply_overrides(stored);

        assert_eq!(merged.window_size, 2);
        assert_eq!(merged.total_trials, 15);
        assert_eq!(merged.cadence_ms, 2000);
    }

    #[test]
    fn test_app_new_uses_stored_settings() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        store
            .save(&Config {
                window_size: 3,
                total_trials: 5,
                cadence_ms: 2000,
            })
            .unwrap();

        let app = App::new(&Cli::default(), Some(store));

        assert_eq!(app.game.window_size(), 3);
        assert_eq!(app.game.total_trials(), 5);
        assert_eq!(app.game.config().cadence_ms(), 2000);
        assert_eq!(app.game.status(), SessionStatus::Configuring);
    }

    #[test]
    fn test_app_start_saves_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut app = App::new(
            &Cli::parse_from(["nback", "-n", "2", "--seed", "1"]),
            Some(FileConfigStore::with_path(&path)),
        );

        handle_key(&mut app, key('t'), Instant::now());
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            Instant::now(),
        );

        assert_eq!(app.game.status(), SessionStatus::Playing);
        let saved = FileConfigStore::with_path(&path).load();
        assert_eq!(saved.window_size, 2);
        assert_eq!(saved.total_trials, 15);
    }

    #[test]
    fn test_settings_keys_cycle_presets() {
        let mut app = scripted_app(1, 10, &[1]);
        let now = Instant::now();

        handle_key(&mut app, key('w'), now);
        assert_eq!(app.game.window_size(), 2);
        handle_key(&mut app, key('t'), now);
        assert_eq!(app.game.total_trials(), 15);
        handle_key(&mut app, key('s'), now);
        assert_eq!(app.game.config().cadence_ms(), 5000);
        handle_key(&mut app, key('s'), now);
        assert_eq!(app.game.config().cadence_ms(), 8000);
        handle_key(&mut app, key('s'), now);
        assert_eq!(app.game.config().cadence_ms(), 2000);
    }

    #[test]
    fn test_answer_keys_only_while_playing() {
        let t0 = Instant::now();
        let mut app = scripted_app(1, 5, &[2, 2]);

        // 'n' is not an answer on the settings screen
        handle_key(&mut app, key('n'), t0);
        assert_eq!(app.game.judged(), 0);

        handle_key(&mut app, key(' '), t0);
        app.game.on_tick(t0);
        app.game.on_tick(t0);
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Left, KeyModifiers::NONE),
            t0,
        );

        assert_eq!(app.game.score(), 1);
        assert!(app.game.has_answered());
    }

    #[test]
    fn test_escape_and_ctrl_c_quit() {
        let mut app = scripted_app(1, 5, &[1]);
        let now = Instant::now();

        assert_eq!(
            handle_key(
                &mut app,
                KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
                now
            ),
            Control::Quit
        );
        assert_eq!(
            handle_key(
                &mut app,
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                now
            ),
            Control::Quit
        );
        assert_eq!(handle_key(&mut app, key('c'), now), Control::Continue);
    }

    #[test]
    fn test_restart_key_waits_for_affordance() {
        let t0 = Instant::now();
        let mut app = scripted_app(1, 1, &[1, 1, 2]);
        app.start(t0);
        app.game.on_tick(t0);
        app.game.on_tick(t0);
        app.game.answer(true, t0);
        app.game.on_tick(t0);
        assert_eq!(app.game.status(), SessionStatus::Finished);

        handle_key(&mut app, key('r'), t0);
        assert_eq!(app.game.status(), SessionStatus::Finished);

        app.on_frame(t0 + Duration::from_millis(2000), 80, 24);
        handle_key(&mut app, key('r'), t0 + Duration::from_millis(2100));
        assert_eq!(app.game.status(), SessionStatus::Configuring);
        assert!(!app.celebration.is_active);
    }

    #[test]
    fn test_perfect_session_starts_celebration() {
        let t0 = Instant::now();
        let mut app = scripted_app(1, 1, &[5, 5, 1]);
        app.start(t0);
        app.game.on_tick(t0);
        app.game.on_tick(t0);
        app.game.answer(true, t0);
        app.game.on_tick(t0);

        app.on_frame(t0, 80, 24);
        assert!(app.celebration.is_active);
    }

    #[test]
    fn test_imperfect_session_has_no_celebration() {
        let t0 = Instant::now();
        let mut app = scripted_app(1, 1, &[5, 5, 1]);
        app.start(t0);
        app.game.on_tick(t0);
        app.game.on_tick(t0);
        app.game.answer(false, t0);
        app.game.on_tick(t0);

        app.on_frame(t0, 80, 24);
        assert!(!app.celebration.is_active);
    }

    #[test]
    fn test_ui_renders_every_status() {
        let t0 = Instant::now();
        let mut app = scripted_app(1, 1, &[3, 3, 4]);
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|f| ui(&mut app, f)).unwrap();
        let content: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Settings"));

        app.start(t0);
        app.game.on_tick(t0);
        terminal.draw(|f| ui(&mut app, f)).unwrap();

        app.game.on_tick(t0);
        app.game.on_tick(t0);
        assert_eq!(app.game.status(), SessionStatus::Finished);
        terminal.draw(|f| ui(&mut app, f)).unwrap();
        let content: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("0 / 1"));
    }

    #[test]
    fn test_start_tui_quits_on_escape() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Resize).unwrap();
        tx.send(GameEvent::Key(key('w'))).unwrap();
        tx.send(GameEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))
            .unwrap();
        let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(1));

        let mut app = scripted_app(1, 5, &[1]);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        start_tui(&mut terminal, &mut app, &runner).unwrap();

        assert_eq!(app.game.window_size(), 2);
    }

    #[test]
    fn test_start_tui_stops_when_input_closes() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Key(key(' '))).unwrap();
        drop(tx);
        let runner = Runner::at_frame_rate(ChannelEventSource::new(rx));

        let mut app = scripted_app(1, 5, &[1]);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        let t0 = Instant::now();
        start_tui(&mut terminal, &mut app, &runner).unwrap();

        // returns on the disconnect instead of redrawing forever
        assert!(t0.elapsed() < Duration::from_secs(5));
        assert_eq!(app.game.status(), SessionStatus::Playing);
    }
}
