use ratatui::Frame;

use crate::{
    ui::{exam::render_exam, home::render_home, results::render_results},
    App, AppView,
};

/// A UI Screen boundary: responsible for rendering one view
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Exam set picker
pub struct HomeScreen;

impl Screen for HomeScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_home(app, f);
    }
}

/// Question view, used both while answering and while reviewing
pub struct ExamScreen;

impl Screen for ExamScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_exam(app, f);
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_results(app, f);
    }
}

/// Helper to construct the appropriate screen for the current view
pub fn current_screen(view: &AppView) -> Box<dyn Screen> {
    match view {
        AppView::Home => Box::new(HomeScreen),
        AppView::Exam => Box::new(ExamScreen),
        AppView::Results => Box::new(ResultsScreen),
    }
}
