use ratatui::Frame;

use nback::session::SessionStatus;

use crate::{
    ui::{render_confetti, render_play, render_results, render_settings},
    App,
};

/// A UI Screen boundary: one per session status
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Settings screen shown while configuring
pub struct SettingsScreen;

impl Screen for SettingsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let area = f.area();
        render_settings(&app.game, area, f.buffer_mut());
    }
}

/// The running trial sequence
pub struct PlayScreen;

impl Screen for PlayScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let area = f.area();
        render_play(&app.game, area, f.buffer_mut());
    }
}

/// Final score, plus confetti on a perfect run
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let area = f.area();
        render_results(&app.game, area, f.buffer_mut());
        if app.celebration.is_active {
            render_confetti(&app.celebration, area, f.buffer_mut());
        }
    }
}

/// Helper to construct the appropriate screen for the current status
pub fn current_screen(status: SessionStatus) -> Box<dyn Screen> {
    match status {
        SessionStatus::Configuring => Box::new(SettingsScreen),
        SessionStatus::Playing => Box::new(PlayScreen),
        SessionStatus::Finished => Box::new(ResultsScreen),
    }
}
