use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::record::Session;
use crate::time::clock_hours;

const FILLED: char = '█';
const EMPTY: char = '·';

/// Fixed clock window that session bars are drawn against.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TimelineWindow {
    pub start_hour: f64,
    pub span_hours: f64,
    pub min_width_percent: f64,
}

impl Default for TimelineWindow {
    fn default() -> Self {
        Self {
            start_hour: 8.0,
            span_hours: 12.0,
            min_width_percent: 2.0,
        }
    }
}

/// Position of one session inside the window, in percent of its width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSpan {
    pub left_percent: f64,
    pub width_percent: f64,
    pub active: bool,
}

impl TimelineWindow {
    pub fn new(start_hour: f64, span_hours: f64) -> Self {
        Self {
            start_hour,
            span_hours,
            ..Self::default()
        }
    }

    /// Open sessions run until `now`'s clock time.
    pub fn span(&self, session: &Session, now: NaiveDateTime) -> SessionSpan {
        let start_h = clock_hours(session.start);
        let end_h = clock_hours(session.end.unwrap_or(now));

        let max_left = 100.0 - self.min_width_percent;
        let left = ((start_h - self.start_hour) / self.span_hours * 100.0).clamp(0.0, max_left);
        let width = ((end_h - start_h) / self.span_hours * 100.0)
            .max(self.min_width_percent)
            .min(100.0 - left);

        SessionSpan {
            left_percent: left,
            width_percent: width,
            active: session.is_active(),
        }
    }

    pub fn spans(&self, sessions: &[Session], now: NaiveDateTime) -> Vec<SessionSpan> {
        sessions.iter().map(|s| self.span(s, now)).collect()
    }

    /// Text bar `cells` characters wide with every covered cell filled.
    pub fn render(&self, sessions: &[Session], now: NaiveDateTime, cells: usize) -> String {
        let mut bar = vec![EMPTY; cells];
        if cells == 0 {
            return String::new();
        }
        for span in self.spans(sessions, now) {
            let from = (span.left_percent / 100.0 * cells as f64).floor() as usize;
            let to = ((span.left_percent + span.width_percent) / 100.0 * cells as f64).ceil() as usize;
            let from = from.min(cells - 1);
            let to = to.clamp(from + 1, cells);
            for cell in &mut bar[from..to] {
                *cell = FILLED;
            }
        }
        bar.into_iter().collect()
    }
}
