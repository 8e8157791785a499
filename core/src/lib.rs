pub mod config;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::{resolve_data_dir, Config};
pub use model::{AttendanceRecord, DayEntry, DayStatus, Holiday, HolidayType, Session, YearMonth};
pub use repository::{AttendanceRepository, FileAttendanceRepository};
pub use service::attendance_service::{AttendanceService, MonthView, PunchError};
pub use time::{format_clock, format_duration};
pub use usecase::reconstruct::{reconstruct_month, MonthReconstructor};
pub use usecase::summary::MonthSummary;
pub use usecase::timeline::TimelineWindow;
