mod month;
mod requests;
mod tui;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::Local;
use clap::Parser;
use punchcard_core::model::request::RequestStatus;
use punchcard_core::{
    format_clock, format_duration, resolve_data_dir, AttendanceService, Config, FileAttendanceRepository, YearMonth,
};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser)]
#[command(name = "punchcard")]
#[command(about = "Attendance calendar and punch clock", long_about = None)]
struct Cli {
    /// Data directory (default: ~/.punchcard)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level written to <data-dir>/logs
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show the attendance table for a month (usage: month 2024-03)
    Month {
        /// Month as YYYY-MM, defaults to the current month
        month: Option<String>,
    },
    /// Check in now
    In,
    /// Check out now
    Out,
    /// Show today's punch state
    Today,
    /// List holidays
    Holidays {
        /// Only holidays in this month (YYYY-MM)
        month: Option<String>,
    },
    /// List work-from-home requests
    Requests,
    /// Approve a pending request
    Approve { id: String },
    /// Reject a pending request
    Reject { id: String },
    /// Open the Terminal User Interface
    Tui {
        /// Month to open on (YYYY-MM)
        month: Option<String>,
    },
}

fn init_logging(data_dir: &std::path::Path, level: &str) -> Result<WorkerGuard> {
    let level = tracing::Level::from_str(level).map_err(|_| anyhow!("Invalid log level: {}", level))?;

    // Rolling daily log; stdout belongs to the tables and the TUI
    let file_appender = tracing_appender::rolling::daily(data_dir.join("logs"), "punchcard.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(guard)
}

fn parse_month(arg: Option<&str>, fallback: YearMonth) -> Result<YearMonth> {
    match arg {
        Some(s) => Ok(YearMonth::from_str(s)?),
        None => Ok(fallback),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir)?;
    let _guard = init_logging(&data_dir, &cli.log_level)?;

    let config = Config::load(&data_dir)?;
    let repo = FileAttendanceRepository::new(&data_dir)?;
    let service = AttendanceService::new(repo, config);

    let now = Local::now().naive_local();
    let this_month = YearMonth::of(now.date());
    info!(data_dir = %data_dir.display(), "punchcard started");

    match cli.command {
        Some(Commands::Month { month }) => {
            let month = parse_month(month.as_deref(), this_month)?;
            let view = service.month_view(month, now)?;
            month::show_month(&view, &service.config().timeline(), now);
        },
        Some(Commands::In) => {
            let record = service.check_in(now)?;
            println!("Checked in at {}", format_clock(Some(record.check_in)));
            if record.is_late {
                println!("  Marked late (shift starts {})", service.config().shift_start);
            }
        },
        Some(Commands::Out) => {
            let record = service.check_out(now)?;
            println!(
                "Checked out at {} ({})",
                format_clock(record.check_out),
                format_duration(record.total_hours)
            );
        },
        Some(Commands::Today) => {
            let status = service.today_status(now)?;
            let state = if status.is_checked_in() {
                "Checked in"
            } else if status.checked_out {
                "Checked out"
            } else {
                "Not checked in"
            };
            println!("{}: {}", now.format("%A, %B %-d, %Y"), state);
        },
        Some(Commands::Holidays { month }) => {
            let month = month.as_deref().map(YearMonth::from_str).transpose()?;
            let mut holidays = service.holidays()?;
            holidays.retain(|h| month.map(|m| m.contains(h.date)).unwrap_or(true));
            holidays.sort_by_key(|h| h.date);
            if holidays.is_empty() {
                println!("No holidays found.");
            } else {
                for h in holidays {
                    println!("{}  {:<9} {}", h.date.format("%Y-%m-%d (%a)"), format!("{:?}", h.kind), h.name);
                }
            }
        },
        Some(Commands::Requests) => {
            requests::show_requests(&service.work_from_home_requests()?);
        },
        Some(Commands::Approve { id }) => {
            service.decide_request(&id, RequestStatus::Approved)?;
            println!("Request {} approved", id);
        },
        Some(Commands::Reject { id }) => {
            service.decide_request(&id, RequestStatus::Rejected)?;
            println!("Request {} rejected", id);
        },
        Some(Commands::Tui { month }) => {
            let month = parse_month(month.as_deref(), this_month)?;
            tui::run(&service, month)?;
        },
        None => {
            tui::run(&service, this_month)?;
        }
    }
    Ok(())
}
