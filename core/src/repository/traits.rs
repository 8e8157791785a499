use anyhow::Result;

use crate::model::holiday::Holiday;
use crate::model::record::AttendanceRecord;
use crate::model::request::{RequestStatus, WorkRequest};
use crate::service::dto::AttendanceRecordDto;

/// Source of the payloads the attendance views are built from.
pub trait AttendanceRepository {
    fn list_records(&self) -> Result<Vec<AttendanceRecordDto>>;
    /// Adds a record after the stored ones.
    fn append_record(&self, record: &AttendanceRecordDto) -> Result<()>;
    /// Stores the checkout of the open session that started at `record.check_in`.
    fn close_record(&self, record: &AttendanceRecord) -> Result<()>;
    fn list_holidays(&self) -> Result<Vec<Holiday>>;
    fn list_requests(&self) -> Result<Vec<WorkRequest>>;
    fn update_request_status(&self, id: &str, status: RequestStatus) -> Result<()>;
}
