use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::model::record::Session;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayStatus {
    Present,
    Late,
    Absent,
    WeekOff,
    Holiday,
    WeekendWork,
    HolidayWork,
    /// A future working day with nothing recorded yet.
    Pending,
}

impl DayStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DayStatus::Present => "Present",
            DayStatus::Late => "Late",
            DayStatus::Absent => "Absent",
            DayStatus::WeekOff => "Week Off",
            DayStatus::Holiday => "Holiday",
            DayStatus::WeekendWork => "Weekend Work",
            DayStatus::HolidayWork => "Holiday Work",
            DayStatus::Pending => "--",
        }
    }

    /// True for statuses that can only come from at least one record.
    pub fn is_worked(&self) -> bool {
        matches!(
            self,
            DayStatus::Present | DayStatus::Late | DayStatus::WeekendWork | DayStatus::HolidayWork
        )
    }

    /// Rest days are rendered muted in tables.
    pub fn is_rest(&self) -> bool {
        matches!(self, DayStatus::WeekOff | DayStatus::Holiday)
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-day summary derived from the month's records. Rebuilt on every recomputation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub effective_hours: f64,
    pub gross_hours: f64,
    pub first_in: Option<NaiveDateTime>,
    pub last_out: Option<NaiveDateTime>,
    pub sessions: Vec<Session>,
    pub holiday_name: Option<String>,
    pub is_weekend: bool,
    /// Any session that day was late. Kept even when the status is overridden.
    pub is_late: bool,
}

impl DayEntry {
    pub fn has_sessions(&self) -> bool {
        !self.sessions.is_empty()
    }

    /// Arrival column: "Late", "On Time", or "-".
    pub fn arrival_label(&self) -> &'static str {
        match self.status {
            DayStatus::Late => "Late",
            DayStatus::Present => "On Time",
            _ => "-",
        }
    }

    /// Placeholder for the timeline column on days without sessions.
    pub fn idle_label(&self) -> &'static str {
        match self.status {
            DayStatus::WeekOff => "Weekly Off",
            DayStatus::Holiday => "Holiday",
            DayStatus::Pending => "",
            _ => "Absent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        assert!(DayStatus::HolidayWork.is_worked());
        assert!(!DayStatus::Pending.is_worked());
        assert!(DayStatus::WeekOff.is_rest());
        assert!(!DayStatus::WeekendWork.is_rest());
        assert_eq!(DayStatus::WeekOff.to_string(), "Week Off");
        assert_eq!(DayStatus::Pending.label(), "--");
    }
}
