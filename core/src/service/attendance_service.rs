use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::model::day::DayEntry;
use crate::model::holiday::Holiday;
use crate::model::month::YearMonth;
use crate::model::record::AttendanceRecord;
use crate::model::request::{RequestStatus, WorkRequest};
use crate::repository::AttendanceRepository;
use crate::service::dto::{parse_records, AttendanceRecordDto, AttendanceStats, TodayStatus};
use crate::usecase::summary::MonthSummary;

#[derive(Debug, Error, PartialEq)]
pub enum PunchError {
    #[error("already checked in since {0}")]
    AlreadyCheckedIn(NaiveDateTime),
    #[error("not checked in")]
    NotCheckedIn,
}

/// Everything the month screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthView {
    pub month: YearMonth,
    pub days: Vec<DayEntry>,
    pub summary: MonthSummary,
    pub stats: AttendanceStats,
}

pub struct AttendanceService<R: AttendanceRepository> {
    repo: R,
    config: Config,
}

impl<R: AttendanceRepository> AttendanceService<R> {
    pub fn new(repo: R, config: Config) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn records(&self) -> Result<Vec<AttendanceRecord>> {
        Ok(parse_records(&self.repo.list_records()?))
    }

    pub fn holidays(&self) -> Result<Vec<Holiday>> {
        self.repo.list_holidays()
    }

    pub fn month_view(&self, month: YearMonth, now: NaiveDateTime) -> Result<MonthView> {
        let records = self.records()?;
        let holidays = self.holidays()?;
        let days = self.config.reconstructor()?.reconstruct(&records, &holidays, month, now);
        let summary = MonthSummary::from_days(&days);
        let stats = AttendanceStats::from(&summary);
        Ok(MonthView {
            month,
            days,
            summary,
            stats,
        })
    }

    pub fn today_status(&self, now: NaiveDateTime) -> Result<TodayStatus> {
        let todays = self.records_on(now.date())?;
        Ok(TodayStatus {
            checked_in: !todays.is_empty(),
            checked_out: !todays.is_empty() && todays.iter().all(|r| !r.is_open()),
        })
    }

    /// Opens a session at `now`. Only the day's first check-in can be late.
    pub fn check_in(&self, now: NaiveDateTime) -> Result<AttendanceRecord> {
        let todays = self.records_on(now.date())?;

        if let Some(open) = todays.iter().find(|r| r.is_open()) {
            return Err(PunchError::AlreadyCheckedIn(open.check_in).into());
        }

        let is_late = todays.is_empty() && now.time() > self.config.late_after()?;
        let record = AttendanceRecord::open(now, is_late);
        self.repo.append_record(&AttendanceRecordDto::from(&record))?;

        info!(at = %now, is_late, "checked in");
        Ok(record)
    }

    /// Closes today's open session at `now`.
    pub fn check_out(&self, now: NaiveDateTime) -> Result<AttendanceRecord> {
        let mut record = self
            .records_on(now.date())?
            .into_iter()
            .rev()
            .find(AttendanceRecord::is_open)
            .ok_or(PunchError::NotCheckedIn)?;

        record.close(now);
        self.repo.close_record(&record)?;

        info!(at = %now, hours = record.total_hours, "checked out");
        Ok(record)
    }

    fn records_on(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>> {
        Ok(self.records()?.into_iter().filter(|r| r.date == date).collect())
    }

    pub fn work_from_home_requests(&self) -> Result<Vec<WorkRequest>> {
        Ok(self
            .repo
            .list_requests()?
            .into_iter()
            .filter(WorkRequest::is_work_from_home)
            .collect())
    }

    pub fn decide_request(&self, id: &str, status: RequestStatus) -> Result<()> {
        self.repo.update_request_status(id, status)?;
        info!(id, status = status.label(), "request updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::day::DayStatus;
    use crate::repository::FileAttendanceRepository;
    use crate::repository::file::{ATTENDANCE_FILE_NAME, HOLIDAYS_FILE_NAME, REQUESTS_FILE_NAME};
    use serde_json::json;
    use std::fs;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn service() -> (tempfile::TempDir, AttendanceService<FileAttendanceRepository>) {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileAttendanceRepository::new(dir.path()).unwrap();
        (dir, AttendanceService::new(repo, Config::default()))
    }

    #[test]
    fn test_check_in_and_out() {
        let (_dir, service) = service();
        let record = service.check_in(at(12, 8, 55)).unwrap();
        assert!(!record.is_late);
        assert!(service.today_status(at(12, 9, 0)).unwrap().is_checked_in());

        let err = service.check_in(at(12, 9, 30)).unwrap_err();
        assert_eq!(err.downcast_ref::<PunchError>(), Some(&PunchError::AlreadyCheckedIn(at(12, 8, 55))));

        let closed = service.check_out(at(12, 17, 25)).unwrap();
        assert_eq!(closed.total_hours, 8.5);
        let status = service.today_status(at(12, 18, 0)).unwrap();
        assert!(status.checked_in && status.checked_out);

        let err = service.check_out(at(12, 18, 0)).unwrap_err();
        assert_eq!(err.downcast_ref::<PunchError>(), Some(&PunchError::NotCheckedIn));
    }

    #[test]
    fn test_late_only_on_first_check_in() {
        let (_dir, service) = service();
        assert!(service.check_in(at(12, 9, 20)).unwrap().is_late);
        service.check_out(at(12, 12, 0)).unwrap();
        assert!(!service.check_in(at(12, 13, 0)).unwrap().is_late);
    }

    #[test]
    fn test_open_session_from_yesterday_is_not_closed() {
        let (_dir, service) = service();
        service.check_in(at(11, 9, 0)).unwrap();
        let err = service.check_out(at(12, 10, 0)).unwrap_err();
        assert_eq!(err.downcast_ref::<PunchError>(), Some(&PunchError::NotCheckedIn));
        // a new day can still be started
        service.check_in(at(12, 10, 0)).unwrap();
    }

    #[test]
    fn test_month_view() {
        let (dir, service) = service();
        fs::write(
            dir.path().join(HOLIDAYS_FILE_NAME),
            json!([{"date": "2024-03-08", "name": "Company Day", "type": "company"}]).to_string(),
        )
        .unwrap();
        service.check_in(at(5, 8, 55)).unwrap();
        service.check_out(at(5, 18, 10)).unwrap();
        service.check_in(at(12, 9, 0)).unwrap();

        let view = service.month_view(YearMonth::new(2024, 3).unwrap(), at(12, 14, 0)).unwrap();
        assert_eq!(view.days.len(), 31);
        assert_eq!(view.days[4].status, DayStatus::Present);
        assert_eq!(view.days[7].status, DayStatus::Holiday);
        assert_eq!(view.days[11].gross_hours, 5.0);
        assert_eq!(view.summary.working_days, 20);
        assert_eq!(view.stats.present_days, 2);
    }

    #[test]
    fn test_requests() {
        let (dir, service) = service();
        fs::write(
            dir.path().join(REQUESTS_FILE_NAME),
            json!([
                {"_id": "r1", "request_type": "work_from_home", "reason": "x"},
                {"_id": "r2", "request_type": "regularization", "reason": "y"}
            ])
            .to_string(),
        )
        .unwrap();
        let wfh = service.work_from_home_requests().unwrap();
        assert_eq!(wfh.len(), 1);
        service.decide_request("r1", RequestStatus::Rejected).unwrap();
        assert_eq!(service.work_from_home_requests().unwrap()[0].status, RequestStatus::Rejected);
    }

    #[test]
    fn test_punches_and_decisions_keep_stored_data() {
        let (dir, service) = service();
        let attendance = json!({"records": [
            {"_id": "a1", "employee_id": "e7", "date": "2024-03-11",
             "check_in_time": "2024-03-11T09:00:00", "total_hours": "8.0"},
            {"_id": "a2", "employee_id": "e7", "date": "2024-03-05",
             "check_in_time": "2024-03-05T09:00:00", "check_out_time": "2024-03-05T17:00:00",
             "total_hours": 8.0, "is_late": false}
        ]});
        let requests = json!([
            {"_id": "r1", "employee_id": "e7", "request_type": "work_from_home", "reason": "x"},
            {"_id": "r2", "employee_id": "e7", "request_type": 7}
        ]);
        fs::write(dir.path().join(ATTENDANCE_FILE_NAME), attendance.to_string()).unwrap();
        fs::write(dir.path().join(REQUESTS_FILE_NAME), requests.to_string()).unwrap();

        service.check_in(at(12, 9, 0)).unwrap();
        service.check_out(at(12, 17, 0)).unwrap();
        service.decide_request("r1", RequestStatus::Approved).unwrap();

        let read = |name: &str| -> serde_json::Value {
            serde_json::from_str(&fs::read_to_string(dir.path().join(name)).unwrap()).unwrap()
        };
        let stored = read(ATTENDANCE_FILE_NAME);
        let records = stored["records"].as_array().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[..2], attendance["records"].as_array().unwrap()[..]);
        assert_eq!(records[2]["check_out_time"], "2024-03-12T17:00:00");

        let stored = read(REQUESTS_FILE_NAME);
        assert_eq!(stored[0]["_id"], "r1");
        assert_eq!(stored[0]["employee_id"], "e7");
        assert_eq!(stored[0]["status"], "approved");
        assert_eq!(stored[1], requests[1]);
    }
}
