pub mod app;
pub mod ui;

use std::io;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use chrono::Local;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use punchcard_core::{AttendanceRepository, AttendanceService, YearMonth};

use crate::tui::app::App;

pub fn run<R: AttendanceRepository>(service: &AttendanceService<R>, month: YearMonth) -> Result<()> {
    // Load before touching the terminal so errors print normally
    let mut app = App::new(service, month, Local::now().naive_local())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend, R: AttendanceRepository>(terminal: &mut Terminal<B>, app: &mut App<R>) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if event::poll(std::time::Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Left | KeyCode::Char('h') => app.previous_month(),
                    KeyCode::Right | KeyCode::Char('l') => app.next_month(),
                    KeyCode::Char('i') => app.check_in(),
                    KeyCode::Char('o') => app.check_out(),
                    KeyCode::Char('r') => app.refresh(),
                    _ => {}
                }
            }
        } else {
            app.tick();
        }
    }
}
