use examr::{bank::QuestionKind, exam::ExamSession, util::format_time};
use itertools::Itertools;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::{
    bold, centered_rect, dim, legend_style, option_marker, option_style, palette_style,
    HORIZONTAL_MARGIN,
};
use crate::App;

const SNIPPET_GUTTER: &str = "  │ ";
const MAX_PALETTE_ROWS: u16 = 6;

pub fn render_exam(app: &App, f: &mut Frame) {
    let Some(session) = app.session.as_ref() else {
        return;
    };

    let palette_rows = palette_height(
        session.question_count(),
        f.area().width.saturating_sub(HORIZONTAL_MARGIN * 2),
    )
    .min(MAX_PALETTE_ROWS);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(1),            // header
            Constraint::Length(1),            // padding
            Constraint::Min(1),               // question
            Constraint::Length(palette_rows), // palette
            Constraint::Length(1),            // legend
        ])
        .split(f.area());

    f.render_widget(header(app, session), chunks[0]);
    f.render_widget(question_body(session), chunks[2]);
    f.render_widget(palette(app, session), chunks[3]);
    f.render_widget(
        Paragraph::new(Span::styled(legend(app, session), legend_style())),
        chunks[4],
    );

    if let Some(prompt) = app.pending_submit {
        let area = centered_rect(f.area().width.saturating_sub(20).max(30), 7, f.area());
        let dialog = Paragraph::new(vec![
            Line::from(prompt.message()),
            Line::from(""),
            Line::from(Span::styled("(y)es / (n)o", bold())),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Submit")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }
}

fn header<'a>(app: &App, session: &'a ExamSession) -> Paragraph<'a> {
    let total = session.question_count();
    let mut spans = vec![
        Span::styled(session.exam.name.as_str(), bold().fg(Color::Cyan)),
        Span::raw(format!(
            "   Question {}/{}   Answered {}/{}",
            session.current_index() + 1,
            total,
            session.answered_count(),
            total
        )),
    ];

    if session.is_review() {
        let score = session.score();
        spans.push(Span::styled(
            format!(
                "   REVIEW {}/{} ({}%)",
                score.correct, score.total, score.percentage
            ),
            bold().fg(Color::Magenta),
        ));
    }

    if app.settings.timed {
        let elapsed = session.elapsed_secs();
        let limit = u64::from(session.exam.duration_minutes) * 60;
        let style = if elapsed > limit {
            bold().fg(Color::Red)
        } else {
            dim()
        };
        spans.push(Span::styled(
            format!("   {} / {}", format_time(elapsed), format_time(limit)),
            style,
        ));
    }

    Paragraph::new(Line::from(spans))
}

fn question_body(session: &ExamSession) -> Paragraph<'_> {
    let question = session.current_question();
    let mut lines = vec![
        Line::from(Span::styled(question.question_text.as_str(), bold())),
        Line::from(Span::styled(
            match question.kind {
                QuestionKind::Single => "(choose one)",
                QuestionKind::Multiple => "(choose all that apply)",
            },
            dim(),
        )),
        Line::from(""),
    ];

    if let Some(snippet) = &question.code_snippet {
        let code_style = Style::default().fg(Color::LightBlue);
        lines.extend(snippet.lines().map(|code| {
            Line::from(vec![
                Span::styled(SNIPPET_GUTTER, dim()),
                Span::styled(code, code_style),
            ])
        }));
        lines.push(Line::from(""));
    }

    for option in &question.options {
        let state = session.option_state(question, &option.id);
        let style = option_style(state);
        lines.push(Line::from(vec![
            Span::styled(option_marker(question.kind, state), style),
            Span::styled(format!(" {}. ", option.id), style),
            Span::styled(option.text.as_str(), style),
        ]));
    }

    if session.is_review() && !question.explanation.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Explanation: ", bold().fg(Color::Magenta)),
            Span::styled(
                question.explanation.as_str(),
                Style::default().add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    Paragraph::new(lines).wrap(Wrap { trim: false })
}

fn palette<'a>(app: &App, session: &'a ExamSession) -> Paragraph<'a> {
    let current = session.current_index();
    let spans = session
        .exam
        .questions
        .iter()
        .enumerate()
        .map(|(idx, q)| {
            let mut style = palette_style(session.palette_status(q));
            if idx == current {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            if app.palette_cursor == Some(idx) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Span::styled(format!(" {} ", idx + 1), style)
        })
        .interleave_shortest(std::iter::repeat(Span::raw(" ")))
        .collect::<Vec<Span>>();

    let title = if app.palette_cursor.is_some() {
        "Questions (←/→ move, enter jump, esc close)"
    } else {
        "Questions"
    };

    Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true })
}

fn legend(app: &App, session: &ExamSession) -> String {
    if app.pending_submit.is_some() {
        return String::from("(y) submit / (n) keep answering");
    }
    if app.palette_cursor.is_some() {
        return String::from("(←/→) move / (enter) jump / (esc) close palette");
    }
    if session.is_review() {
        String::from("(←/→) navigate / (p)alette / (r)esults / (esc) home")
    } else {
        let picks = session.current_question().options.len().min(9);
        format!("(←/→) navigate / (1-{picks}) choose / (p)alette / (s)ubmit / (esc) home")
    }
}

/// Rows (borders included) needed to show every palette entry in `width` columns.
pub fn palette_height(question_count: usize, width: u16) -> u16 {
    let labels: usize = (1..=question_count)
        .map(|n| format!(" {n} ").width() + 1)
        .sum();
    let inner = usize::from(width.saturating_sub(2)).max(1);
    (labels.div_ceil(inner) as u16) + 2
}
