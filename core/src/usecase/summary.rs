use serde::{Deserialize, Serialize};

use crate::model::day::{DayEntry, DayStatus};

/// Month totals shown above the attendance table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MonthSummary {
    /// Days that are neither rest days nor holidays.
    pub working_days: u32,
    pub present_days: u32,
    pub late_days: u32,
    pub absent_days: u32,
    pub week_off_days: u32,
    pub holiday_days: u32,
    pub weekend_work_days: u32,
    pub holiday_work_days: u32,
    pub pending_days: u32,
    /// Days with any late session, whatever their label.
    pub late_flagged_days: u32,
    pub total_effective_hours: f64,
    pub total_gross_hours: f64,
    /// Effective hours per day that has at least one session.
    pub average_hours: f64,
}

impl MonthSummary {
    pub fn from_days(days: &[DayEntry]) -> Self {
        let mut summary = MonthSummary::default();
        let mut worked = 0u32;

        for day in days {
            if !day.is_weekend && day.holiday_name.is_none() {
                summary.working_days += 1;
            }
            match day.status {
                DayStatus::Present => summary.present_days += 1,
                DayStatus::Late => summary.late_days += 1,
                DayStatus::Absent => summary.absent_days += 1,
                DayStatus::WeekOff => summary.week_off_days += 1,
                DayStatus::Holiday => summary.holiday_days += 1,
                DayStatus::WeekendWork => summary.weekend_work_days += 1,
                DayStatus::HolidayWork => summary.holiday_work_days += 1,
                DayStatus::Pending => summary.pending_days += 1,
            }
            if day.has_sessions() {
                worked += 1;
            }
            if day.is_late {
                summary.late_flagged_days += 1;
            }
            summary.total_effective_hours += day.effective_hours;
            summary.total_gross_hours += day.gross_hours;
        }

        if worked > 0 {
            summary.average_hours = summary.total_effective_hours / worked as f64;
        }
        summary
    }

    /// Days with any session, whatever their label.
    pub fn attended_days(&self) -> u32 {
        self.present_days + self.late_days + self.weekend_work_days + self.holiday_work_days
    }
}
