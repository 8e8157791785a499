use chrono::NaiveDateTime;
use punchcard_core::{format_clock, format_duration, DayEntry, MonthView, TimelineWindow};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

const TIMELINE_CELLS: usize = 24;

// Helper struct for Table Row
#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Attendance Visual")]
    visual: String,
    #[tabled(rename = "Effective")]
    effective: String,
    #[tabled(rename = "Gross")]
    gross: String,
    #[tabled(rename = "Arrival")]
    arrival: String,
    #[tabled(rename = "Log")]
    log: String,
}

pub fn session_log(day: &DayEntry) -> Vec<String> {
    day.sessions
        .iter()
        .map(|s| {
            let end = if s.end.is_some() { format_clock(s.end) } else { "Active".to_string() };
            format!("{} - {} ({})", format_clock(Some(s.start)), end, format_duration(s.duration_hours))
        })
        .collect()
}

fn day_row(day: &DayEntry, window: &TimelineWindow, now: NaiveDateTime) -> DayRow {
    let mut date = day.date.format("%d %b (%a)").to_string();
    if let Some(name) = &day.holiday_name {
        date = format!("{}\n{}", date, name);
    }

    let visual = if day.has_sessions() {
        window.render(&day.sessions, now, TIMELINE_CELLS)
    } else {
        day.idle_label().to_string()
    };

    DayRow {
        date,
        status: day.status.label().to_string(),
        visual,
        effective: format_duration(day.effective_hours),
        gross: format_duration(day.gross_hours),
        arrival: day.arrival_label().to_string(),
        log: session_log(day).join("\n"),
    }
}

pub fn show_month(view: &MonthView, window: &TimelineWindow, now: NaiveDateTime) {
    println!("\n\x1b[1;36m{}\x1b[0m", view.month.label());
    println!(
        "Avg Hrs / Day: {}   Punctuality: {}%   Working Days: {} (excl. weekends/holidays)",
        format_duration(view.stats.average_hours),
        view.stats.punctuality_percent(),
        view.summary.working_days
    );

    let rows: Vec<DayRow> = view.days.iter().map(|d| day_row(d, window, now)).collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color

    println!("{}", table);
    println!(
        "Effective: {}   Gross: {}   Absent: {}   Late: {}",
        format_duration(view.summary.total_effective_hours),
        format_duration(view.summary.total_gross_hours),
        view.summary.absent_days,
        view.summary.late_days
    );
}
