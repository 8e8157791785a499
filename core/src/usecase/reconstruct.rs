use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use tracing::debug;

use crate::model::day::{DayEntry, DayStatus};
use crate::model::holiday::{find_holiday, Holiday};
use crate::model::month::YearMonth;
use crate::model::record::{AttendanceRecord, Session};
use crate::time::hours_between;

pub const DEFAULT_WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

/// Builds the per-day calendar for a month from raw sessions and holidays.
///
/// Record dates, holiday dates and `now` must share one local reference frame.
/// Nothing here converts between time zones.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthReconstructor {
    weekend: Vec<Weekday>,
}

impl Default for MonthReconstructor {
    fn default() -> Self {
        Self {
            weekend: DEFAULT_WEEKEND.to_vec(),
        }
    }
}

impl MonthReconstructor {
    pub fn new(weekend: Vec<Weekday>) -> Self {
        Self { weekend }
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.weekend.contains(&date.weekday())
    }

    /// One entry per calendar day of `month`, ascending. Records dated outside
    /// the month are ignored.
    pub fn reconstruct(
        &self,
        records: &[AttendanceRecord],
        holidays: &[Holiday],
        month: YearMonth,
        now: NaiveDateTime,
    ) -> Vec<DayEntry> {
        let mut by_date: HashMap<NaiveDate, Vec<&AttendanceRecord>> = HashMap::new();
        for record in records.iter().filter(|r| month.contains(r.date)) {
            by_date.entry(record.date).or_default().push(record);
        }

        let days: Vec<DayEntry> = month
            .days()
            .map(|date| {
                let day_records = by_date.get(&date).map(Vec::as_slice).unwrap_or(&[]);
                self.build_day(date, day_records, holidays, now)
            })
            .collect();

        debug!(
            month = %month,
            records = records.len(),
            bucketed = by_date.values().map(Vec::len).sum::<usize>(),
            "reconstructed month"
        );
        days
    }

    fn build_day(
        &self,
        date: NaiveDate,
        records: &[&AttendanceRecord],
        holidays: &[Holiday],
        now: NaiveDateTime,
    ) -> DayEntry {
        let is_weekend = self.is_weekend(date);
        let holiday = find_holiday(holidays, date);
        let today = now.date();

        if records.is_empty() {
            let status = if is_weekend {
                DayStatus::WeekOff
            } else if holiday.is_some() {
                DayStatus::Holiday
            } else if date > today {
                DayStatus::Pending
            } else {
                DayStatus::Absent
            };
            return DayEntry {
                date,
                status,
                effective_hours: 0.0,
                gross_hours: 0.0,
                first_in: None,
                last_out: None,
                sessions: Vec::new(),
                holiday_name: holiday.map(|h| h.name.clone()),
                is_weekend,
                is_late: false,
            };
        }

        let effective_hours: f64 = records.iter().map(|r| r.total_hours).sum();
        let is_late = records.iter().any(|r| r.is_late);
        let sessions: Vec<Session> = records.iter().map(|r| r.session()).collect();

        // Stable sort: equal check-ins keep input order.
        let mut by_check_in: Vec<&AttendanceRecord> = records.to_vec();
        by_check_in.sort_by_key(|r| r.check_in);
        let first_in = by_check_in.first().map(|r| r.check_in);
        // Checkout of the latest-starting session, not the latest checkout overall.
        let last_out = by_check_in.last().and_then(|r| r.check_out);

        let mut status = if is_late { DayStatus::Late } else { DayStatus::Present };
        if is_weekend {
            status = DayStatus::WeekendWork;
        }
        if holiday.is_some() {
            status = DayStatus::HolidayWork;
        }

        let gross_hours = match (first_in, last_out) {
            (Some(first), Some(last)) => hours_between(first, last),
            (Some(first), None) if date == today => hours_between(first, now),
            _ => 0.0,
        };

        DayEntry {
            date,
            status,
            effective_hours,
            gross_hours,
            first_in,
            last_out,
            sessions,
            holiday_name: holiday.map(|h| h.name.clone()),
            is_weekend,
            is_late,
        }
    }
}

/// [`MonthReconstructor::reconstruct`] with Saturday and Sunday as rest days.
pub fn reconstruct_month(
    records: &[AttendanceRecord],
    holidays: &[Holiday],
    month: YearMonth,
    now: NaiveDateTime,
) -> Vec<DayEntry> {
    MonthReconstructor::default().reconstruct(records, holidays, month, now)
}
