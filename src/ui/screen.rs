use ratatui::Frame;

use crate::{
    ui::{render_quiz, render_results, render_start},
    App, AppState,
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Start screen - bank status, question count menu and mode choice
pub struct StartScreen;

impl Screen for StartScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_start(app, f);
    }
}

/// Quiz screen - the question in view and its options
pub struct QuizScreen;

impl Screen for QuizScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_quiz(app, f);
    }
}

/// Results screen - score and per-question review
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_results(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Start => Box::new(StartScreen),
        AppState::Quiz => Box::new(QuizScreen),
        AppState::Results => Box::new(ResultsScreen),
    }
}
