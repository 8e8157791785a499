use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, BorderType, Gauge, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use punchcard_core::{format_clock, format_duration, AttendanceRepository, DayEntry, DayStatus};

use crate::month::session_log;
use crate::tui::app::App;

const BAR_CELLS: usize = 16;
const DATE_WIDTH: usize = 18;

/// Cuts `s` to at most `width` terminal columns, marking the cut with '…'.
pub fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    // Leave one cell for the ellipsis
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

fn status_style(status: DayStatus) -> Style {
    match status {
        DayStatus::Present => Style::default().fg(Color::Green),
        DayStatus::Late => Style::default().fg(Color::Yellow),
        DayStatus::Absent => Style::default().fg(Color::Red),
        DayStatus::WeekendWork | DayStatus::HolidayWork => Style::default().fg(Color::Magenta),
        DayStatus::WeekOff | DayStatus::Holiday | DayStatus::Pending => Style::default().fg(Color::DarkGray),
    }
}

pub fn draw<R: AttendanceRepository>(f: &mut Frame, app: &mut App<R>) {
    let size = f.area();

    // Header and Main Content Split
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" < ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.view.month.label(), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", Style::default().fg(Color::DarkGray)),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().title(" PUNCHCARD ").borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(65),
            Constraint::Percentage(35),
        ])
        .split(main_chunks[1]);

    draw_day_table(f, app, content_chunks[0]);
    draw_side_panel(f, app, content_chunks[1]);

    let help = app.message.clone().unwrap_or_else(|| {
        "j/k: Day | h/l: Month | i: Check in | o: Check out | r: Refresh | q: Quit".to_string()
    });
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[2]);
}

fn draw_day_table<R: AttendanceRepository>(f: &mut Frame, app: &mut App<R>, area: Rect) {
    let window = app.service_timeline();
    let now = app.now;
    let rows: Vec<Row> = app.view.days.iter().map(|day| {
        let mut date = day.date.format("%d %b %a").to_string();
        if let Some(name) = &day.holiday_name {
            date = truncate(&format!("{} {}", date, name), DATE_WIDTH);
        }
        let visual = if day.has_sessions() {
            Span::styled(window.render(&day.sessions, now, BAR_CELLS), Style::default().fg(Color::Blue))
        } else {
            Span::styled(day.idle_label(), Style::default().fg(Color::DarkGray))
        };

        let row_style = if day.status.is_rest() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Row::new(vec![
            Span::raw(date),
            Span::styled(day.status.label(), status_style(day.status)),
            visual,
            Span::raw(format_duration(day.effective_hours)),
            Span::raw(format_duration(day.gross_hours)),
            Span::raw(day.arrival_label()),
        ])
        .style(row_style)
    }).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(DATE_WIDTH as u16), // Date
            Constraint::Length(12),                // Status
            Constraint::Length(BAR_CELLS as u16),  // Visual
            Constraint::Length(8),                 // Effective
            Constraint::Length(8),                 // Gross
            Constraint::Min(7),                    // Arrival
        ]
    )
    .header(Row::new(vec!["Date", "Status", "Visual", "Eff.", "Gross", "Arrival"]).style(Style::default().fg(Color::Yellow)))
    .block(Block::default().title(" Attendance Log ").borders(Borders::ALL).border_type(BorderType::Rounded))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn day_detail(day: &DayEntry) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(day.date.format("%A, %d %B %Y").to_string(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::Blue)),
            Span::styled(day.status.label(), status_style(day.status)),
        ]),
    ];
    if let Some(name) = &day.holiday_name {
        lines.push(Line::from(vec![
            Span::styled("Holiday: ", Style::default().fg(Color::Blue)),
            Span::raw(name.clone()),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("First in: ", Style::default().fg(Color::Blue)),
        Span::raw(format_clock(day.first_in)),
        Span::styled("  Last out: ", Style::default().fg(Color::Blue)),
        Span::raw(format_clock(day.last_out)),
    ]));
    if day.has_sessions() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Sessions:", Style::default().fg(Color::Blue))));
        lines.extend(session_log(day).into_iter().map(Line::from));
    }
    lines
}

fn draw_side_panel<R: AttendanceRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Detail
            Constraint::Length(7), // Summary
            Constraint::Length(3), // Punctuality
        ])
        .split(area);

    let detail = app.selected_day().map(day_detail).unwrap_or_default();
    let detail_block = Paragraph::new(detail)
        .block(Block::default().title(" Detail ").borders(Borders::ALL).border_type(BorderType::Rounded))
        .wrap(Wrap { trim: true });
    f.render_widget(detail_block, chunks[0]);

    let summary = &app.view.summary;
    let stats = &app.view.stats;
    let summary_text = vec![
        Line::from(vec![
            Span::styled("Avg Hrs / Day: ", Style::default().fg(Color::DarkGray)),
            Span::styled(format_duration(stats.average_hours), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Working Days:  ", Style::default().fg(Color::DarkGray)),
            Span::raw(summary.working_days.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Effective:     ", Style::default().fg(Color::DarkGray)),
            Span::raw(format_duration(summary.total_effective_hours)),
        ]),
        Line::from(vec![
            Span::styled("Absent / Late: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{} / {}", summary.absent_days, summary.late_flagged_days)),
        ]),
    ];
    let summary_block = Paragraph::new(summary_text)
        .block(Block::default().title(" My Stats ").borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(summary_block, chunks[1]);

    let percent = stats.punctuality_percent().min(100);
    let gauge = Gauge::default()
        .block(Block::default().title(" On Time Arrival ").borders(Borders::ALL).border_type(BorderType::Rounded))
        .gauge_style(Style::default().fg(if percent >= 80 { Color::Green } else { Color::Yellow }))
        .percent(percent as u16);
    f.render_widget(gauge, chunks[2]);
}
