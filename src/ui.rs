pub mod digits;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use nback::{
    celebration::CelebrationAnimation,
    game::Game,
    session::{
        Feedback, Pulse, CADENCE_PRESETS_MS, TOTAL_TRIALS_PRESETS, WINDOW_SIZE_PRESETS,
    },
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

const GOLD: Color = Color::Rgb(255, 215, 0);
const GREEN: Color = Color::Rgb(46, 204, 113);
const RED: Color = Color::Rgb(232, 95, 79);
const SKY: Color = Color::Rgb(79, 195, 247);

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn option_line<T: Copy + PartialEq>(
    label: &str,
    key: char,
    presets: &[T],
    current: T,
    show: impl Fn(T) -> String,
) -> Line<'static> {
    let selected = Style::default()
        .fg(Color::Black)
        .bg(GOLD)
        .add_modifier(Modifier::BOLD);
    let idle = Style::default().add_modifier(Modifier::DIM);

    let mut spans = vec![Span::styled(
        format!("({}) {:<10}", key, label),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for &preset in presets {
        let style = if preset == current { selected } else { idle };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} ", show(preset)), style));
    }
    // value from the command line that is not one of the presets
    if !presets.contains(&current) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} ", show(current)), selected));
    }
    Line::from(spans)
}

pub fn render_settings(game: &Game, area: Rect, buf: &mut Buffer) {
    let config = game.config();
    let panel = centered(area, 56, 12);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GOLD))
        .title(" 🧠 N-Back Settings ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(panel);
    block.render(panel, buf);

    let lines = vec![
        Line::from(""),
        option_line(
            "n back",
            'w',
            &WINDOW_SIZE_PRESETS,
            config.window_size(),
            |v| v.to_string(),
        ),
        Line::from(""),
        option_line(
            "questions",
            't',
            &TOTAL_TRIALS_PRESETS,
            config.total_trials(),
            |v| v.to_string(),
        ),
        Line::from(""),
        option_line(
            "speed",
            's',
            &CADENCE_PRESETS_MS,
            config.cadence_ms(),
            format_cadence,
        ),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "(enter) start / (esc)ape",
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center),
    ];

    Paragraph::new(lines)
        .block(Block::default().padding(ratatui::widgets::Padding::horizontal(2)))
        .render(inner, buf);
}

fn format_cadence(ms: u64) -> String {
    if ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}

pub fn render_play(game: &Game, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Gray);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let number_height = digits::HEIGHT as u16;
    let free = area
        .height
        .saturating_sub(number_height + 6 + VERTICAL_MARGIN * 2);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),             // question counter
            Constraint::Length(free / 2),      // padding
            Constraint::Length(number_height), // the number
            Constraint::Length(1),             // padding
            Constraint::Length(1),             // prompt / verdict
            Constraint::Min(1),                // padding
            Constraint::Length(1),             // legend
        ])
        .split(area);

    let header = match game.question_index() {
        Some(index) => format!("Question {} / {}", index, game.total_trials()),
        None => "Memorize the numbers!".to_string(),
    };
    Paragraph::new(Span::styled(header, dim_style))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    if let Some(value) = game.current_number() {
        let number_style = match game.pulse() {
            Pulse::Flash => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            Pulse::Rest => Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        };
        let rows: Vec<Line> = digits::big_number(value as u32)
            .into_iter()
            .map(|row| Line::from(Span::styled(row, number_style)))
            .collect();
        Paragraph::new(rows)
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }

    if !game.is_judgeable() {
        return;
    }

    let feedback_style = match game.feedback() {
        Feedback::Correct => bold_style.fg(GREEN),
        Feedback::Incorrect => bold_style.fg(RED),
        Feedback::Prompt | Feedback::None => bold_style,
    };
    Paragraph::new(Span::styled(game.feedback_text(), feedback_style))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    let legend = if game.has_answered() {
        Line::from(Span::styled("(esc)ape", italic_style))
    } else {
        Line::from(vec![
            Span::styled("(y/←) same", italic_style.fg(GREEN)),
            Span::raw("   "),
            Span::styled("(n/→) different", italic_style.fg(RED)),
            Span::raw("   "),
            Span::styled("(esc)ape", italic_style),
        ])
    };
    Paragraph::new(legend)
        .alignment(Alignment::Center)
        .render(chunks[6], buf);
}

pub fn render_results(game: &Game, area: Rect, buf: &mut Buffer) {
    let summary = game.summary();
    let perfect = summary.is_perfect();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // padding
            Constraint::Length(1), // headline
            Constraint::Length(1), // padding
            Constraint::Length(1), // score
            Constraint::Length(1), // details
            Constraint::Min(1),    // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let (headline, headline_color, score_color) = if perfect {
        ("Perfect score ✨", GOLD, Color::Rgb(255, 250, 205))
    } else {
        ("Nice work 🍵", Color::White, SKY)
    };

    Paragraph::new(Span::styled(headline, bold_style.fg(headline_color)))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        format!("{} / {}", summary.score, summary.total_trials),
        bold_style.fg(score_color),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        format!(
            "{}-back   {} answered   {} skipped",
            summary.window_size,
            summary.judged,
            summary.unanswered()
        ),
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[4], buf);

    if game.show_restart_affordance() {
        Paragraph::new(Span::styled(
            "(r) back to settings / (esc)ape",
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);
    }
}

/// Render confetti particles on top of the results screen
pub fn render_confetti(celebration: &CelebrationAnimation, area: Rect, buf: &mut Buffer) {
    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;
        if x >= area.width || y >= area.height {
            continue;
        }

        let (r, g, b) = particle.color;
        let alpha = particle.alpha();
        let style = if alpha > 0.7 {
            Style::default()
                .fg(Color::Rgb(r, g, b))
                .add_modifier(Modifier::BOLD)
        } else if alpha > 0.3 {
            Style::default().fg(Color::Rgb(r, g, b))
        } else {
            Style::default()
                .fg(Color::Rgb(r, g, b))
                .add_modifier(Modifier::DIM)
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(style);
        }
    }
}
