use punchcard_core::model::request::WorkRequest;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Request Type")]
    kind: String,
    #[tabled(rename = "Requested On")]
    requested_on: String,
    #[tabled(rename = "Note")]
    note: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn request_row(req: &WorkRequest) -> RequestRow {
    let details = req.details();
    let date = match details.from {
        Some(from) => format!("{}\n{}", from.format("%-d %b %Y"), req.duration_label()),
        None => format!("N/A\n{}", req.duration_label()),
    };
    let requested_on = req
        .created_at()
        .map(|t| t.format("%-d %b %Y\n%I:%M %p").to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut status = req.status.label().to_string();
    if let Some(approver) = &req.approver_id {
        status = format!("{}\nApprover: {}", status, approver);
    }

    RequestRow {
        id: req.id.clone(),
        date,
        kind: req.type_label(),
        requested_on,
        note: details.reason,
        status,
    }
}

pub fn show_requests(requests: &[WorkRequest]) {
    if requests.is_empty() {
        println!("No Work From Home requests found.");
        return;
    }
    let rows: Vec<RequestRow> = requests.iter().map(request_row).collect();
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

#[cfg(test)]
mod tests {
    use super::*;
    use punchcard_core::model::request::RequestStatus;

    #[test]
    fn test_request_row() {
        let req = WorkRequest {
            id: "r1".to_string(),
            request_type: "work_from_home".to_string(),
            reason: "Work From Home Request\nFrom: 2024-03-04\nTo: 2024-03-05\nReason: Parcel".to_string(),
            status: RequestStatus::Approved,
            created_at: Some("2024-03-01T10:30:00".to_string()),
            approver_id: Some("hr-7".to_string()),
        };
        let row = request_row(&req);
        assert_eq!(row.date, "4 Mar 2024\n2 Days");
        assert_eq!(row.kind, "work from home");
        assert_eq!(row.requested_on, "1 Mar 2024\n10:30 AM");
        assert_eq!(row.note, "Parcel");
        assert_eq!(row.status, "approved\nApprover: hr-7");
    }
}
