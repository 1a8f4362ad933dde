pub mod screen;

use quizr::{
    review::{Report, ReviewEntry},
    selector::{SessionLimit, LIMIT_MENU},
    session::{Mode, QuestionView},
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Per-mode visuals. The session only reports state; how a mode looks is
/// decided here.
struct ModeStyle {
    badge: &'static str,
    badge_style: Style,
    /// the user's pick while it can still change (test mode)
    selected: Style,
    gauge: Color,
}

fn mode_style(mode: Mode) -> ModeStyle {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match mode {
        Mode::Practice => ModeStyle {
            badge: " PRACTICE ",
            badge_style: bold.fg(Color::Black).bg(Color::LightBlue),
            selected: bold.fg(Color::LightBlue),
            gauge: Color::LightBlue,
        },
        Mode::Test => ModeStyle {
            badge: " TEST MODE ",
            badge_style: bold.fg(Color::Black).bg(Color::Magenta),
            selected: bold.fg(Color::Black).bg(Color::Magenta),
            gauge: Color::Magenta,
        },
    }
}

fn option_label(idx: usize) -> char {
    (b'A' + (idx % 26) as u8) as char
}

/// Rows a piece of text needs once wrapped to `width` columns
fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    text.lines()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum::<usize>()
        .max(1) as u16
}

fn legend(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
}

pub fn render_start(app: &App, f: &mut Frame) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(2), // bank status
            Constraint::Length(4), // limit menu
            Constraint::Length(4), // mode
            Constraint::Length(2), // notice
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled("quizr", bold.fg(Color::Cyan)))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let bank_len = app.controller.bank().len();
    let status = &app.bank_status;
    let status_line = match &status.error {
        Some(err) => Line::from(Span::styled(
            format!("Could not load {}: {err}", status.source),
            bold.fg(Color::Red),
        )),
        None => {
            let mut spans = vec![Span::styled(
                format!("{bank_len} questions loaded from {}", status.source),
                dim,
            )];
            if status.rejected > 0 {
                spans.push(Span::styled(
                    format!(" ({} malformed skipped)", status.rejected),
                    Style::default().fg(Color::Yellow),
                ));
            }
            Line::from(spans)
        }
    };
    f.render_widget(
        Paragraph::new(status_line)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    let limit = app.controller.limit();
    let menu: Vec<Span> = LIMIT_MENU
        .iter()
        .flat_map(|l| {
            let text = match l {
                SessionLimit::All => format!(" all ({bank_len}) "),
                SessionLimit::Count(n) => format!(" {n} "),
            };
            let style = if *l == limit {
                bold.fg(Color::Black).bg(Color::Cyan)
            } else {
                dim
            };
            [Span::styled(text, style), Span::raw(" ")]
        })
        .collect();
    let limit_widget = Paragraph::new(Line::from(menu))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Questions"));
    f.render_widget(limit_widget, chunks[2]);

    let mode = app.controller.mode();
    let mode_spans: Vec<Span> = [Mode::Practice, Mode::Test]
        .into_iter()
        .flat_map(|m| {
            let style = if m == mode {
                mode_style(m).badge_style
            } else {
                dim
            };
            [Span::styled(format!(" {m} "), style), Span::raw("   ")]
        })
        .collect();
    let description = match mode {
        Mode::Practice => "answers are checked as soon as you pick one",
        Mode::Test => "answers can change until you move on; results at the end",
    };
    let mode_widget = Paragraph::new(vec![
        Line::from(mode_spans),
        Line::from(Span::styled(description, dim)),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Mode"));
    f.render_widget(mode_widget, chunks[3]);

    if let Some(notice) = &app.notice {
        let notice = Paragraph::new(Span::styled(notice.as_str(), bold.fg(Color::Red)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(notice, chunks[4]);
    }

    f.render_widget(
        legend("(←/→) questions / (tab) mode / (enter) start / (esc)ape"),
        chunks[6],
    );
}

pub fn render_quiz(app: &App, f: &mut Frame) {
    let Some(view) = app.display.view.as_ref() else {
        return;
    };
    render_question(view, app.display.feedback, f);
}

fn option_style(view: &QuestionView, feedback: Option<bool>, option: &str) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let picked = view.selected.as_deref() == Some(option);

    match (view.mode, feedback) {
        (Mode::Practice, Some(_)) => {
            if view.question.is_correct(option) {
                bold.fg(Color::Green)
            } else if picked {
                bold.fg(Color::Red)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            }
        }
        _ if picked => mode_style(view.mode).selected,
        _ => Style::default(),
    }
}

fn render_question(view: &QuestionView, feedback: Option<bool>, f: &mut Frame) {
    let area = f.area();
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let style = mode_style(view.mode);

    let text_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2);
    let question_lines = wrapped_height(view.question.text(), text_width);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),              // badge + counter
            Constraint::Length(1),              // progress
            Constraint::Length(1),              // padding
            Constraint::Length(question_lines), // question
            Constraint::Length(1),              // padding
            Constraint::Min(1),                 // options
            Constraint::Length(1),              // feedback
            Constraint::Length(1),              // legend
        ])
        .split(area);

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);
    f.render_widget(
        Paragraph::new(Span::styled(style.badge, style.badge_style)),
        header[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            format!("{} / {}", view.number, view.total),
            bold,
        ))
        .alignment(Alignment::Right),
        header[1],
    );

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(style.gauge))
        .ratio(view.progress.clamp(0.0, 1.0))
        .label("");
    f.render_widget(gauge, chunks[1]);

    f.render_widget(
        Paragraph::new(Span::styled(view.question.text(), bold)).wrap(Wrap { trim: true }),
        chunks[3],
    );

    let options: Vec<Line> = view
        .question
        .options()
        .iter()
        .enumerate()
        .map(|(idx, option)| {
            let style = option_style(view, feedback, option);
            Line::from(vec![
                Span::styled(format!(" {} ", option_label(idx)), style.add_modifier(Modifier::BOLD)),
                Span::styled(option.as_str(), style),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(options).wrap(Wrap { trim: false }),
        chunks[5],
    );

    let feedback_line = match (view.mode, feedback) {
        (Mode::Practice, Some(true)) => Line::from(Span::styled("Correct!", bold.fg(Color::Green))),
        (Mode::Practice, Some(false)) => Line::from(vec![
            Span::styled("Wrong. ", bold.fg(Color::Red)),
            Span::raw(format!("Answer: {}", view.question.correct_option())),
        ]),
        (Mode::Test, _) if view.selected.is_some() => Line::from(Span::styled(
            "You can change your answer until you continue",
            Style::default().add_modifier(Modifier::DIM),
        )),
        _ => Line::default(),
    };
    f.render_widget(
        Paragraph::new(feedback_line).alignment(Alignment::Center),
        chunks[6],
    );

    let hint = match (view.can_advance, view.is_last) {
        (true, true) => "(enter) see results / (esc)ape",
        (true, false) => "(enter) next / (esc)ape",
        (false, _) => "(a-z or 1-9) choose an answer / (esc)ape",
    };
    f.render_widget(legend(hint), chunks[7]);
}

fn review_lines(index: usize, entry: &ReviewEntry) -> Vec<Line<'_>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let (mark, mark_style) = if entry.is_correct {
        ("✓", bold.fg(Color::Green))
    } else {
        ("✗", bold.fg(Color::Red))
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("Q{} ", index + 1), Style::default().fg(Color::Gray)),
        Span::styled(format!("{mark} "), mark_style),
        Span::styled(entry.question.text(), bold),
    ])];
    if !entry.is_correct {
        lines.push(Line::from(Span::styled(
            format!(
                "    You: {}",
                entry.selected.as_deref().unwrap_or("Skipped")
            ),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("    Correct: {}", entry.question.correct_option()),
        Style::default().fg(Color::Green),
    )));
    lines
}

pub fn render_results(app: &App, f: &mut Frame) {
    let Some(report) = app.display.report.as_ref() else {
        return;
    };
    render_report(report, app.display.review_scroll, f.area(), f);
}

fn render_report(report: &Report, scroll: usize, area: Rect, f: &mut Frame) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let summary = &report.summary;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // percent
            Constraint::Length(1), // counts
            Constraint::Length(1), // padding
            Constraint::Min(3),    // review
            Constraint::Length(1), // legend
        ])
        .split(area);

    let percent_color = match summary.percent {
        p if p >= 80 => Color::Green,
        p if p >= 50 => Color::Yellow,
        _ => Color::Red,
    };
    f.render_widget(
        Paragraph::new(Span::styled(
            format!("{}%", summary.percent),
            bold.fg(percent_color),
        ))
        .alignment(Alignment::Center),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{} correct", summary.correct), bold.fg(Color::Green)),
            Span::raw("   "),
            Span::styled(format!("{} wrong", summary.wrong), bold.fg(Color::Red)),
            Span::raw("   "),
            Span::styled(format!("{} total", summary.total), bold),
        ]))
        .alignment(Alignment::Center),
        chunks[1],
    );

    let lines: Vec<Line> = report
        .review
        .iter()
        .enumerate()
        .skip(scroll)
        .flat_map(|(i, entry)| review_lines(i, entry))
        .collect();
    let scroll_info = if report.review.len() > 1 {
        format!(" ({}/{})", scroll + 1, report.review.len())
    } else {
        String::new()
    };
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Review{scroll_info}")),
            ),
        chunks[3],
    );

    f.render_widget(
        legend("(r)estart / (n)ew session / (↑/↓) scroll / (esc)ape"),
        chunks[4],
    );
}
