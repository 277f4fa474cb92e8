pub mod exam;
pub mod home;
pub mod results;
pub mod screen;

use examr::{
    bank::QuestionKind,
    scoring::{OptionState, PaletteStatus},
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    Frame,
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(&app.view).render(app, f);
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn legend_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

pub fn option_style(state: OptionState) -> Style {
    match state {
        OptionState::Default => Style::default(),
        OptionState::Selected => bold().fg(Color::Cyan),
        OptionState::Correct => bold().fg(Color::Green),
        OptionState::IncorrectSelected => bold().fg(Color::Red),
        OptionState::NeutralDimmed => dim(),
    }
}

pub fn option_marker(kind: QuestionKind, state: OptionState) -> &'static str {
    match (state, kind) {
        (OptionState::Correct, _) => " ✓ ",
        (OptionState::IncorrectSelected, _) => " ✗ ",
        (OptionState::NeutralDimmed, _) => "   ",
        (OptionState::Selected, QuestionKind::Single) => "(•)",
        (OptionState::Default, QuestionKind::Single) => "( )",
        (OptionState::Selected, QuestionKind::Multiple) => "[x]",
        (OptionState::Default, QuestionKind::Multiple) => "[ ]",
    }
}

pub fn palette_style(status: PaletteStatus) -> Style {
    match status {
        PaletteStatus::Unanswered => dim(),
        PaletteStatus::Answered => bold().fg(Color::Cyan),
        PaletteStatus::Correct => bold().fg(Color::Green),
        PaletteStatus::Incorrect => bold().fg(Color::Red),
        PaletteStatus::Skipped => Style::default().fg(Color::Yellow),
    }
}

pub fn percentage_color(percentage: u32) -> Color {
    if percentage >= 70 {
        Color::Green
    } else if percentage >= 40 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// A `width` x `height` rect centered in `area`, clamped to it.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
