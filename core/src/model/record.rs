use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::time::hours_between;

/// One check-in/check-out cycle. `check_out` is `None` while the session is open.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub check_in: NaiveDateTime,
    pub check_out: Option<NaiveDateTime>,
    pub total_hours: f64,
    pub is_late: bool,
}

impl AttendanceRecord {
    /// Opens a session on the check-in's own date.
    pub fn open(check_in: NaiveDateTime, is_late: bool) -> Self {
        Self {
            date: check_in.date(),
            check_in,
            check_out: None,
            total_hours: 0.0,
            is_late,
        }
    }

    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }

    /// Closes the session and records the span as its worked hours.
    pub fn close(&mut self, check_out: NaiveDateTime) {
        self.check_out = Some(check_out);
        self.total_hours = hours_between(self.check_in, check_out);
    }

    pub fn session(&self) -> Session {
        Session {
            start: self.check_in,
            end: self.check_out,
            duration_hours: self.total_hours,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Session {
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub duration_hours: f64,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.end.is_none()
    }
}
