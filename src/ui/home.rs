use examr::util::count_noun;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::{bold, dim, legend_style, HORIZONTAL_MARGIN, VERTICAL_MARGIN};
use crate::App;

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

pub fn render_home(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(0),    // exam sets
            Constraint::Length(4), // settings + legend
        ])
        .split(f.area());

    let title = Paragraph::new("examr: pick an exam set")
        .block(Block::default().borders(Borders::ALL))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = app
        .bank
        .sets()
        .iter()
        .map(|set| {
            ListItem::new(Text::from(vec![
                Line::from(vec![
                    Span::styled(set.name.clone(), bold()),
                    Span::styled(
                        format!(
                            "  {} · {} min",
                            count_noun(set.questions.len(), "question"),
                            set.duration_minutes
                        ),
                        dim(),
                    ),
                ]),
                Line::from(Span::styled(
                    set.description.clone(),
                    Style::default().add_modifier(Modifier::ITALIC),
                )),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Exam sets"))
        .highlight_style(Style::default().fg(Color::Yellow))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.home_cursor));
    f.render_stateful_widget(list, chunks[1], &mut state);

    let footer = Paragraph::new(vec![
        Line::from(format!(
            "Timer: {} | Confirm submit: {}",
            on_off(app.settings.timed),
            on_off(app.settings.confirm_submit)
        )),
        Line::from("(↑/↓) select / (enter) start / (t) timer / (c) confirm / (esc) quit"),
    ])
    .style(legend_style())
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(footer, chunks[2]);
}
