use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use serde_json::{json, Value};

use crate::model::holiday::Holiday;
use crate::model::record::AttendanceRecord;
use crate::model::request::{RequestStatus, WorkRequest};
use crate::repository::traits::AttendanceRepository;
use crate::time::parse_timestamp;
use crate::service::dto::{
    error_message, holidays_from_value, records_from_value, requests_from_value, AttendanceListDto,
    AttendanceRecordDto,
};

pub const ATTENDANCE_FILE_NAME: &str = "attendance.json";
pub const HOLIDAYS_FILE_NAME: &str = "holidays.json";
pub const REQUESTS_FILE_NAME: &str = "requests.json";

/// JSON files in a data directory, laid out like the backend's responses.
#[derive(Clone)]
pub struct FileAttendanceRepository {
    base_dir: PathBuf,
}

impl FileAttendanceRepository {
    pub fn new(base_dir: &Path) -> Result<Self> {
        fs::create_dir_all(base_dir)?;
        let repo = FileAttendanceRepository {
            base_dir: base_dir.to_path_buf(),
        };

        // Ensure the attendance file exists so punches have somewhere to go
        let path = repo.path(ATTENDANCE_FILE_NAME);
        if !path.exists() {
            repo.write_json(&path, &AttendanceListDto::default())?;
        }
        Ok(repo)
    }

    fn path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing files read as `null`. A saved backend error body becomes an error.
    fn read_value(&self, name: &str) -> Result<Value> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(Value::Null);
        }
        let reader = BufReader::new(File::open(&path)?);
        let value: Value = serde_json::from_reader(reader)?;
        if value.get("detail").is_some() {
            return Err(anyhow!("{}: {}", name, error_message(&value)));
        }
        Ok(value)
    }

    /// Applies `edit` to the stored document and writes it back. Elements the
    /// edit does not touch are written out as they were read.
    fn edit_value<F>(&self, name: &str, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Value) -> Result<()>,
    {
        let mut value = self.read_value(name)?;
        edit(&mut value)?;
        self.write_json(&self.path(name), &value)
    }

    fn write_json<T: serde::Serialize + ?Sized>(&self, path: &Path, data: &T) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, data)?;
        writer.flush()?;
        Ok(())
    }
}

impl AttendanceRepository for FileAttendanceRepository {
    fn list_records(&self) -> Result<Vec<AttendanceRecordDto>> {
        Ok(records_from_value(&self.read_value(ATTENDANCE_FILE_NAME)?))
    }

    fn append_record(&self, record: &AttendanceRecordDto) -> Result<()> {
        self.edit_value(ATTENDANCE_FILE_NAME, |value| {
            if value.is_null() {
                *value = json!({ "records": [] });
            }
            let body = value
                .as_object_mut()
                .ok_or_else(|| anyhow!("{}: expected an object", ATTENDANCE_FILE_NAME))?;
            let records = body.entry("records").or_insert_with(|| json!([]));
            let records = records
                .as_array_mut()
                .ok_or_else(|| anyhow!("{}: records is not an array", ATTENDANCE_FILE_NAME))?;
            records.push(serde_json::to_value(record)?);
            Ok(())
        })
    }

    fn close_record(&self, record: &AttendanceRecord) -> Result<()> {
        let closed = AttendanceRecordDto::from(record);
        self.edit_value(ATTENDANCE_FILE_NAME, |value| {
            let stored = value
                .get_mut("records")
                .and_then(Value::as_array_mut)
                .and_then(|items| {
                    items
                        .iter_mut()
                        .rev()
                        .find(|item| is_open_session_started_at(item, record.check_in))
                })
                .ok_or_else(|| anyhow!("No open session started at {}", record.check_in))?;
            let fields = stored
                .as_object_mut()
                .ok_or_else(|| anyhow!("{}: record is not an object", ATTENDANCE_FILE_NAME))?;
            fields.insert("check_out_time".to_string(), json!(closed.check_out_time));
            fields.insert("total_hours".to_string(), json!(closed.total_hours));
            Ok(())
        })
    }

    fn list_holidays(&self) -> Result<Vec<Holiday>> {
        Ok(holidays_from_value(&self.read_value(HOLIDAYS_FILE_NAME)?))
    }

    fn list_requests(&self) -> Result<Vec<WorkRequest>> {
        Ok(requests_from_value(&self.read_value(REQUESTS_FILE_NAME)?))
    }

    fn update_request_status(&self, id: &str, status: RequestStatus) -> Result<()> {
        self.edit_value(REQUESTS_FILE_NAME, |value| {
            let request = value
                .as_array_mut()
                .and_then(|items| items.iter_mut().find(|item| element_id(item) == Some(id)))
                .and_then(Value::as_object_mut)
                .ok_or_else(|| anyhow!("Request with ID {} not found", id))?;
            request.insert("status".to_string(), Value::String(status.label().to_string()));
            Ok(())
        })
    }
}

fn element_id(item: &Value) -> Option<&str> {
    item.get("_id").or_else(|| item.get("id")).and_then(Value::as_str)
}

fn is_open_session_started_at(item: &Value, check_in: NaiveDateTime) -> bool {
    let started = item
        .get("check_in_time")
        .and_then(Value::as_str)
        .and_then(parse_timestamp);
    let open = item.get("check_out_time").filter(|v| !v.is_null()).is_none();
    open && started == Some(check_in)
}
