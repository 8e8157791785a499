use anyhow::Result;
use chrono::{Local, NaiveDateTime, Timelike};
use ratatui::widgets::TableState;
use punchcard_core::{AttendanceRepository, AttendanceService, DayEntry, MonthView, TimelineWindow, YearMonth};

pub struct App<'a, R: AttendanceRepository> {
    service: &'a AttendanceService<R>,
    pub view: MonthView,
    pub state: TableState,
    pub now: NaiveDateTime,
    pub message: Option<String>,
}

impl<'a, R: AttendanceRepository> App<'a, R> {
    pub fn new(service: &'a AttendanceService<R>, month: YearMonth, now: NaiveDateTime) -> Result<Self> {
        let view = service.month_view(month, now)?;
        let mut app = App {
            service,
            view,
            state: TableState::default(),
            now,
            message: None,
        };
        app.select_default();
        Ok(app)
    }

    /// Today when it is in view, else the first day.
    fn select_default(&mut self) {
        let today = self.now.date();
        let index = self.view.days.iter().position(|d| d.date == today).unwrap_or(0);
        self.state.select(if self.view.days.is_empty() { None } else { Some(index) });
    }

    pub fn service_timeline(&self) -> TimelineWindow {
        self.service.config().timeline()
    }

    pub fn selected_day(&self) -> Option<&DayEntry> {
        self.state.selected().and_then(|i| self.view.days.get(i))
    }

    pub fn next(&mut self) {
        if self.view.days.is_empty() { return; }
        let i = match self.state.selected() {
            Some(i) if i >= self.view.days.len() - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.view.days.is_empty() { return; }
        let i = match self.state.selected() {
            Some(0) => self.view.days.len() - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn next_month(&mut self) {
        self.load(self.view.month.next());
    }

    pub fn previous_month(&mut self) {
        self.load(self.view.month.prev());
    }

    pub fn refresh(&mut self) {
        self.reload_at(Local::now().naive_local());
    }

    /// Advances the clock. The view is rebuilt once the minute changes so
    /// open sessions keep growing on screen.
    pub fn tick(&mut self) {
        self.tick_at(Local::now().naive_local());
    }

    fn tick_at(&mut self, now: NaiveDateTime) {
        let same_minute = now.date() == self.now.date()
            && now.hour() == self.now.hour()
            && now.minute() == self.now.minute();
        if !same_minute {
            self.reload_at(now);
        }
    }

    /// Rebuilds the current month at `now`, keeping the selected row.
    fn reload_at(&mut self, now: NaiveDateTime) {
        let selected = self.state.selected();
        self.load_at(self.view.month, now);
        if let Some(i) = selected {
            self.state.select(Some(i.min(self.view.days.len().saturating_sub(1))));
        }
    }

    fn load(&mut self, month: YearMonth) {
        self.load_at(month, Local::now().naive_local());
    }

    fn load_at(&mut self, month: YearMonth, now: NaiveDateTime) {
        self.now = now;
        match self.service.month_view(month, now) {
            Ok(view) => {
                self.view = view;
                self.select_default();
            }
            Err(e) => self.message = Some(format!("Error: {}", e)),
        }
    }

    pub fn check_in(&mut self) {
        let now = Local::now().naive_local();
        self.message = Some(match self.service.check_in(now) {
            Ok(_) => "Checked in successfully!".to_string(),
            Err(e) => format!("Error: {}", e),
        });
        self.refresh();
    }

    pub fn check_out(&mut self) {
        let now = Local::now().naive_local();
        self.message = Some(match self.service.check_out(now) {
            Ok(_) => "Checked out successfully!".to_string(),
            Err(e) => format!("Error: {}", e),
        });
        self.refresh();
    }
}
