use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::time::parse_timestamp;

pub const WORK_FROM_HOME: &str = "work_from_home";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkRequest {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    pub request_type: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub approver_id: Option<String>,
}

/// Fields recovered from a request's free-text reason.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDetails {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub reason: String,
}

impl WorkRequest {
    pub fn is_work_from_home(&self) -> bool {
        self.request_type == WORK_FROM_HOME
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    /// "work_from_home" -> "work from home"
    pub fn type_label(&self) -> String {
        self.request_type.replace('_', " ")
    }

    /// The reason is written as labelled lines:
    /// `From: YYYY-MM-DD`, `To: YYYY-MM-DD`, and `Reason: ...` (which runs to the end).
    /// Without a `Reason:` line the whole text is the reason.
    pub fn details(&self) -> RequestDetails {
        let lines: Vec<&str> = self.reason.split('\n').collect();
        let date_after = |prefix: &str| {
            lines
                .iter()
                .find_map(|l| l.strip_prefix(prefix))
                .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
        };

        let reason = match lines.iter().position(|l| l.starts_with("Reason: ")) {
            Some(idx) => lines[idx..].join("\n").replacen("Reason: ", "", 1),
            None => self.reason.clone(),
        };

        RequestDetails {
            from: date_after("From: "),
            to: date_after("To: "),
            reason,
        }
    }

    /// Inclusive day count between the requested dates, "1 Day" when unknown.
    pub fn duration_label(&self) -> String {
        let details = self.details();
        let days = match (details.from, details.to) {
            (Some(from), Some(to)) => (to - from).num_days().abs() + 1,
            _ => 1,
        };
        format!("{} Day{}", days, if days > 1 { "s" } else { "" })
    }
}
