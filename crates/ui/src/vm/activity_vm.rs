use chrono::DateTime;
use storage::repository::ReportRow;

use crate::vm::time_fmt::format_datetime;

/// One row on the dashboard's recent-activity card.
#[derive(Clone, Debug, PartialEq)]
pub struct RecentActivityVm {
    pub test_id: String,
    /// RFC 3339 completion time when the id carries one.
    pub completed_at: Option<String>,
    pub total_questions: u32,
    pub accuracy_percent: f64,
}

/// Map stored rows (already newest-first) into dashboard rows.
#[must_use]
pub fn map_recent_activity(rows: &[ReportRow]) -> Vec<RecentActivityVm> {
    rows.iter()
        .map(|row| {
            let completed_at = row
                .test_id
                .millis()
                .and_then(DateTime::from_timestamp_millis)
                .map(format_datetime);

            RecentActivityVm {
                test_id: row.test_id.to_string(),
                completed_at,
                total_questions: row.record.data.total_questions,
                accuracy_percent: row.record.data.accuracy_percent(),
            }
        })
        .collect()
}
