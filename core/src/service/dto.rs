//! Wire shapes of the backend payloads and their conversion to domain types.
//!
//! Payload collections are read leniently: a missing or non-array collection
//! is treated as empty, and a malformed element is dropped on its own.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::model::holiday::{Holiday, HolidayType};
use crate::model::record::AttendanceRecord;
use crate::model::request::WorkRequest;
use crate::time::{parse_date_prefix, parse_timestamp};
use crate::usecase::summary::MonthSummary;

const WIRE_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("record has no date")]
    MissingDate,
    #[error("unparsable record date '{0}'")]
    InvalidDate(String),
    #[error("record has no check-in time")]
    MissingCheckIn,
    #[error("unparsable check-in time '{0}'")]
    InvalidCheckIn(String),
    #[error("unparsable check-out time '{0}'")]
    InvalidCheckOut(String),
    #[error("unparsable holiday date '{0}'")]
    InvalidHolidayDate(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AttendanceRecordDto {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub check_in_time: Option<String>,
    #[serde(default)]
    pub check_out_time: Option<String>,
    #[serde(default)]
    pub total_hours: Option<f64>,
    #[serde(default)]
    pub is_late: Option<bool>,
}

impl TryFrom<&AttendanceRecordDto> for AttendanceRecord {
    type Error = RecordError;

    fn try_from(dto: &AttendanceRecordDto) -> Result<Self, Self::Error> {
        let raw_date = dto.date.as_deref().ok_or(RecordError::MissingDate)?;
        let date = parse_date_prefix(raw_date).ok_or_else(|| RecordError::InvalidDate(raw_date.to_string()))?;

        let raw_in = dto.check_in_time.as_deref().ok_or(RecordError::MissingCheckIn)?;
        let check_in = parse_timestamp(raw_in).ok_or_else(|| RecordError::InvalidCheckIn(raw_in.to_string()))?;

        let check_out = match dto.check_out_time.as_deref() {
            None => None,
            Some(raw) => Some(parse_timestamp(raw).ok_or_else(|| RecordError::InvalidCheckOut(raw.to_string()))?),
        };

        Ok(AttendanceRecord {
            date,
            check_in,
            check_out,
            total_hours: dto.total_hours.unwrap_or(0.0),
            is_late: dto.is_late.unwrap_or(false),
        })
    }
}

impl From<&AttendanceRecord> for AttendanceRecordDto {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            id: None,
            date: Some(record.date.format("%Y-%m-%d").to_string()),
            check_in_time: Some(record.check_in.format(WIRE_TIMESTAMP).to_string()),
            check_out_time: record.check_out.map(|t| t.format(WIRE_TIMESTAMP).to_string()),
            total_hours: Some(record.total_hours),
            is_late: Some(record.is_late),
        }
    }
}

/// `{"records": [...]}` as returned for a date range.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AttendanceListDto {
    pub records: Vec<AttendanceRecordDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HolidayDto {
    pub date: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: HolidayType,
}

impl TryFrom<&HolidayDto> for Holiday {
    type Error = RecordError;

    fn try_from(dto: &HolidayDto) -> Result<Self, Self::Error> {
        let date = parse_date_prefix(&dto.date).ok_or_else(|| RecordError::InvalidHolidayDate(dto.date.clone()))?;
        Ok(Holiday::new(date, dto.name.clone(), dto.kind))
    }
}

/// Monthly stats as reported by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AttendanceStats {
    #[serde(default)]
    pub average_hours: f64,
    #[serde(default)]
    pub present_days: u32,
    #[serde(default)]
    pub late_days: u32,
    #[serde(default)]
    pub total_days: u32,
}

impl AttendanceStats {
    /// Share of counted days that started on time, rounded to a whole percent.
    pub fn punctuality_percent(&self) -> u32 {
        if self.total_days == 0 {
            return 0;
        }
        let on_time = self.present_days.saturating_sub(self.late_days) as f64;
        (on_time / self.total_days as f64 * 100.0).round() as u32
    }
}

impl From<&MonthSummary> for AttendanceStats {
    fn from(summary: &MonthSummary) -> Self {
        let attended = summary.attended_days();
        // a late day can also be a weekend or holiday day, so count from the flag
        Self {
            average_hours: summary.average_hours,
            present_days: attended,
            late_days: summary.late_flagged_days,
            total_days: attended + summary.absent_days,
        }
    }
}

/// `/attendance/today` payload.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct TodayStatus {
    #[serde(default)]
    pub checked_in: bool,
    #[serde(default)]
    pub checked_out: bool,
}

impl TodayStatus {
    pub fn is_checked_in(&self) -> bool {
        self.checked_in && !self.checked_out
    }
}

fn array_elements<'a>(value: Option<&'a Value>, what: &str) -> &'a [Value] {
    match value.and_then(Value::as_array) {
        Some(items) => items.as_slice(),
        None => {
            if value.is_some_and(|v| !v.is_null()) {
                warn!(what, "expected an array, treating as empty");
            }
            &[]
        }
    }
}

fn decode_elements<T: serde::de::DeserializeOwned>(items: &[Value], what: &str) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(what, error = %e, "dropping malformed element");
                None
            }
        })
        .collect()
}

/// Records from a `{"records": [...]}` payload.
pub fn records_from_value(value: &Value) -> Vec<AttendanceRecordDto> {
    decode_elements(array_elements(value.get("records"), "records"), "record")
}

/// Holidays from an array payload.
pub fn holidays_from_value(value: &Value) -> Vec<Holiday> {
    let dtos: Vec<HolidayDto> = decode_elements(array_elements(Some(value), "holidays"), "holiday");
    dtos.iter()
        .filter_map(|dto| match Holiday::try_from(dto) {
            Ok(h) => Some(h),
            Err(e) => {
                warn!(error = %e, "skipping holiday");
                None
            }
        })
        .collect()
}

/// Requests from an array payload.
pub fn requests_from_value(value: &Value) -> Vec<WorkRequest> {
    decode_elements(array_elements(Some(value), "requests"), "request")
}

/// Converts wire records, dropping the ones that cannot be placed on a day.
pub fn parse_records(dtos: &[AttendanceRecordDto]) -> Vec<AttendanceRecord> {
    dtos.iter()
        .filter_map(|dto| match AttendanceRecord::try_from(dto) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(id = dto.id.as_deref().unwrap_or("-"), error = %e, "skipping attendance record");
                None
            }
        })
        .collect()
}

/// Human-readable message from a backend error body.
///
/// `detail` may be a string, or a list of validation errors with a `loc`
/// path and a `msg`.
pub fn error_message(body: &Value) -> String {
    if let Some(s) = body.as_str() {
        return s.to_string();
    }
    match body.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                let field = item
                    .get("loc")
                    .and_then(Value::as_array)
                    .and_then(|loc| loc.last())
                    .map(|last| match last {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .unwrap_or_default();
                let msg = item.get("msg").and_then(Value::as_str).unwrap_or_default();
                if field.is_empty() {
                    msg.to_string()
                } else {
                    format!("{}: {}", field, msg)
                }
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_record_conversion() {
        let dto: AttendanceRecordDto = serde_json::from_value(json!({
            "_id": "66a",
            "date": "2024-03-05T00:00:00",
            "check_in_time": "2024-03-05T08:55:00",
            "check_out_time": "2024-03-05T18:10:00",
            "total_hours": 8.5,
            "is_late": false
        }))
        .unwrap();
        let record = AttendanceRecord::try_from(&dto).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(record.total_hours, 8.5);
        assert!(record.check_out.is_some());

        let back = AttendanceRecordDto::from(&record);
        assert_eq!(back.date.as_deref(), Some("2024-03-05"));
        assert_eq!(back.check_in_time.as_deref(), Some("2024-03-05T08:55:00"));
    }

    #[test]
    fn test_record_defaults_for_open_session() {
        let dto: AttendanceRecordDto = serde_json::from_value(json!({
            "date": "2024-03-05",
            "check_in_time": "2024-03-05T09:00:00",
            "check_out_time": null,
            "total_hours": null
        }))
        .unwrap();
        let record = AttendanceRecord::try_from(&dto).unwrap();
        assert!(record.is_open());
        assert_eq!(record.total_hours, 0.0);
        assert!(!record.is_late);
    }

    #[test]
    fn test_record_errors() {
        let mut dto = AttendanceRecordDto::default();
        assert_eq!(AttendanceRecord::try_from(&dto), Err(RecordError::MissingDate));
        dto.date = Some("05/03/2024".to_string());
        assert!(matches!(AttendanceRecord::try_from(&dto), Err(RecordError::InvalidDate(_))));
        dto.date = Some("2024-03-05".to_string());
        assert_eq!(AttendanceRecord::try_from(&dto), Err(RecordError::MissingCheckIn));
        dto.check_in_time = Some("2024-03-05T09:00:00".to_string());
        dto.check_out_time = Some("later".to_string());
        assert!(matches!(AttendanceRecord::try_from(&dto), Err(RecordError::InvalidCheckOut(_))));
    }

    #[test]
    fn test_records_payload_is_lenient() {
        assert!(records_from_value(&json!({})).is_empty());
        assert!(records_from_value(&json!({"records": "nope"})).is_empty());
        assert!(records_from_value(&json!(null)).is_empty());

        let dtos = records_from_value(&json!({"records": [
            {"date": "2024-03-05", "check_in_time": "2024-03-05T09:00:00", "total_hours": 1.0},
            {"date": 42},
            {"date": "garbage", "check_in_time": "2024-03-05T09:00:00"}
        ]}));
        // the numeric date fails to decode, the garbage date decodes but won't convert
        assert_eq!(dtos.len(), 2);
        assert_eq!(parse_records(&dtos).len(), 1);
    }

    #[test]
    fn test_holidays_payload() {
        let holidays = holidays_from_value(&json!([
            {"date": "2024-03-08T00:00:00", "name": "Company Day", "type": "company"},
            {"date": "bad", "name": "Broken"},
            {"name": "No date"}
        ]));
        assert_eq!(holidays.len(), 1);
        assert_eq!(holidays[0].kind, HolidayType::Company);
        assert!(holidays_from_value(&json!({"detail": "x"})).is_empty());
    }

    #[test]
    fn test_punctuality() {
        let stats = AttendanceStats { average_hours: 8.0, present_days: 10, late_days: 2, total_days: 12 };
        assert_eq!(stats.punctuality_percent(), 67);
        assert_eq!(AttendanceStats::default().punctuality_percent(), 0);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(&json!("boom")), "boom");
        assert_eq!(error_message(&json!({"detail": "Already checked in"})), "Already checked in");
        assert_eq!(
            error_message(&json!({"detail": [
                {"loc": ["body", "date"], "msg": "field required"},
                {"loc": [], "msg": "bad value"}
            ]})),
            "date: field required, bad value"
        );
        assert_eq!(error_message(&json!({"error": 1})), r#"{"error":1}"#);
    }

    #[test]
    fn test_today_status() {
        let status: TodayStatus = serde_json::from_value(json!({"checked_in": true})).unwrap();
        assert!(status.is_checked_in());
        let status: TodayStatus = serde_json::from_value(json!({"checked_in": true, "checked_out": true})).unwrap();
        assert!(!status.is_checked_in());
    }
}
