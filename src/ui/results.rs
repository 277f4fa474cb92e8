use examr::util::format_time;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use super::{
    bold, legend_style, palette_style, percentage_color, HORIZONTAL_MARGIN, VERTICAL_MARGIN,
};
use crate::App;

pub fn render_results(app: &App, f: &mut Frame) {
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let score = session.score();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(3), // gauge
            Constraint::Length(3), // stats
            Constraint::Min(0),    // breakdown
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    let title = Paragraph::new(format!("Results: {}", session.exam.name))
        .block(Block::default().borders(Borders::ALL))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Score"))
        .gauge_style(Style::default().fg(percentage_color(score.percentage)))
        .percent(score.percentage.min(100) as u16)
        .label(format!("{}%", score.percentage));
    f.render_widget(gauge, chunks[1]);

    let stats = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(
                "{}/{} correct ({}%)",
                score.correct, score.total, score.percentage
            ),
            bold(),
        )),
        Line::from(format!(
            "answered {}/{}   time {}",
            session.answered_count(),
            score.total,
            format_time(session.elapsed_secs())
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(stats, chunks[2]);

    let breakdown = session
        .exam
        .questions
        .iter()
        .enumerate()
        .flat_map(|(idx, q)| {
            let eval = session.evaluate(q);
            let mark = if eval.is_skipped {
                "–"
            } else if eval.is_correct {
                "✓"
            } else {
                "✗"
            };
            [
                Span::styled(
                    format!(" Q{} {mark} ", idx + 1),
                    palette_style(session.palette_status(q)),
                ),
                Span::raw(" "),
            ]
        })
        .collect::<Vec<Span>>();
    let breakdown = Paragraph::new(Line::from(breakdown))
        .block(Block::default().borders(Borders::ALL).title("Questions"))
        .wrap(Wrap { trim: true });
    f.render_widget(breakdown, chunks[3]);

    let legend = Paragraph::new(Span::styled(
        "(r)eview answers / (h)ome / (esc)ape",
        legend_style(),
    ));
    f.render_widget(legend, chunks[4]);
}
