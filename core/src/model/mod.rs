pub mod day;
pub mod holiday;
pub mod month;
pub mod record;
pub mod request;

pub use day::{DayEntry, DayStatus};
pub use holiday::{Holiday, HolidayType};
pub use month::{MonthError, YearMonth};
pub use record::{AttendanceRecord, Session};
pub use request::{RequestStatus, WorkRequest};
