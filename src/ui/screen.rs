use ratatui::Frame;
use wordfall::Phase;

use crate::{
    ui::{render_field, render_menu, render_paused, render_results},
    App,
};

/// A UI Screen boundary: one per game phase
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Difficulty/language selection before a session
pub struct MenuScreen;

impl Screen for MenuScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_menu(app, f);
    }
}

/// The field with its HUD and input box
pub struct PlayingScreen;

impl Screen for PlayingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_field(app, f);
    }
}

/// The frozen field under a pause notice
pub struct PausedScreen;

impl Screen for PausedScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_field(app, f);
        render_paused(f);
    }
}

pub struct GameOverScreen;

impl Screen for GameOverScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_results(app, f);
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: Phase) -> Box<dyn Screen> {
    match phase {
        Phase::Idle => Box::new(MenuScreen),
        Phase::Playing => Box::new(PlayingScreen),
        Phase::Paused => Box::new(PausedScreen),
        Phase::GameOver => Box::new(GameOverScreen),
    }
}
