use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{Report, TestId, UserEmail};
use storage::repository::{ReportRecord, ReportRepository, StorageError};

/// Persists a completed session report under the signed-in user's record.
///
/// The user identity is passed in explicitly; the sink holds no global
/// auth state. Failure handling is the caller's business — the workflow
/// logs and swallows, so the completion view shows either way.
#[derive(Clone)]
pub struct ReportSink {
    clock: Clock,
    reports: Arc<dyn ReportRepository>,
}

impl ReportSink {
    #[must_use]
    pub fn new(clock: Clock, reports: Arc<dyn ReportRepository>) -> Self {
        Self { clock, reports }
    }

    /// Write one report record keyed by a timestamp-derived test id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the write fails. At-most-once: the
    /// caller does not retry.
    pub async fn persist(
        &self,
        user: &UserEmail,
        report: &Report,
    ) -> Result<TestId, StorageError> {
        let test_id = TestId::generate(self.clock.now());
        let record = ReportRecord::new(report.clone());
        self.reports.put_report(user, &test_id, &record).await?;
        tracing::info!(user = %user, test_id = %test_id, "session report persisted");
        Ok(test_id)
    }
}
