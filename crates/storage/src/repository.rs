use async_trait::async_trait;
use quiz_core::model::{Report, TestId, UserEmail, UserProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for a completed session report.
///
/// This mirrors the document written under `users/{email}/tests/{testId}`:
/// `{"type": "report", "data": <Report>}`. The discriminator is stored so
/// other record kinds can share the collection later without a migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Report,
}

impl ReportRecord {
    pub const KIND: &'static str = "report";

    #[must_use]
    pub fn new(report: Report) -> Self {
        Self {
            kind: Self::KIND.to_owned(),
            data: report,
        }
    }

    /// True when the discriminator marks this as a report record.
    #[must_use]
    pub fn is_report(&self) -> bool {
        self.kind == Self::KIND
    }
}

/// A stored record together with its document id.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub test_id: TestId,
    pub record: ReportRecord,
}

/// Repository contract for per-user session reports.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Write a report record under the user's tests collection.
    ///
    /// An existing record with the same id is overwritten.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn put_report(
        &self,
        user: &UserEmail,
        test_id: &TestId,
        record: &ReportRecord,
    ) -> Result<(), StorageError>;

    /// Fetch one report record by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_report(
        &self,
        user: &UserEmail,
        test_id: &TestId,
    ) -> Result<ReportRecord, StorageError>;

    /// List the user's most recent report records, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn list_recent_reports(
        &self,
        user: &UserEmail,
        limit: u32,
    ) -> Result<Vec<ReportRow>, StorageError>;
}

/// Repository contract for user profile documents.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create the user's profile document if it does not exist yet.
    ///
    /// An existing profile is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be read or written.
    async fn ensure_user(&self, profile: &UserProfile) -> Result<(), StorageError>;

    /// Fetch a profile by address.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn get_user(&self, email: &UserEmail) -> Result<Option<UserProfile>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    reports: Arc<Mutex<HashMap<(UserEmail, TestId), ReportRecord>>>,
    users: Arc<Mutex<HashMap<UserEmail, UserProfile>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportRepository for InMemoryRepository {
    async fn put_report(
        &self,
        user: &UserEmail,
        test_id: &TestId,
        record: &ReportRecord,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .reports
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert((user.clone(), test_id.clone()), record.clone());
        Ok(())
    }

    async fn get_report(
        &self,
        user: &UserEmail,
        test_id: &TestId,
    ) -> Result<ReportRecord, StorageError> {
        let guard = self
            .reports
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(&(user.clone(), test_id.clone()))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_recent_reports(
        &self,
        user: &UserEmail,
        limit: u32,
    ) -> Result<Vec<ReportRow>, StorageError> {
        let guard = self
            .reports
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows: Vec<ReportRow> = guard
            .iter()
            .filter(|((email, _), _)| email == user)
            .map(|((_, test_id), record)| ReportRow {
                test_id: test_id.clone(),
                record: record.clone(),
            })
            .collect();

        // Generated ids embed completion millis; foreign ids sort last.
        rows.sort_by_key(|row| std::cmp::Reverse(row.test_id.millis().unwrap_or(i64::MIN)));
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn ensure_user(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let mut guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .entry(profile.email.clone())
            .or_insert_with(|| profile.clone());
        Ok(())
    }

    async fn get_user(&self, email: &UserEmail) -> Result<Option<UserProfile>, StorageError> {
        let guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(email).cloned())
    }
}

/// Aggregates report and user repositories behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub reports: Arc<dyn ReportRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let reports: Arc<dyn ReportRepository> = Arc::new(repo.clone());
        let users: Arc<dyn UserRepository> = Arc::new(repo);
        Self { reports, users }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::Report;
    use quiz_core::time::fixed_now;

    fn build_report(total_correct: u32) -> Report {
        serde_json::from_str(&format!(
            r#"{{
                "total_questions": 15,
                "total_correct": {total_correct},
                "total_wrong": {},
                "overall_accuracy": 0.5,
                "average_time": 2.0
            }}"#,
            15 - total_correct
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn round_trips_report_record() {
        let repo = InMemoryRepository::new();
        let user = UserEmail::new("ada@example.com");
        let test_id = TestId::generate(fixed_now());
        let record = ReportRecord::new(build_report(11));

        repo.put_report(&user, &test_id, &record).await.unwrap();

        let fetched = repo.get_report(&user, &test_id).await.unwrap();
        assert!(fetched.is_report());
        assert_eq!(fetched.data.total_correct, 11);
    }

    #[tokio::test]
    async fn missing_report_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo
            .get_report(&UserEmail::new("ada@example.com"), &TestId::new("test0"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn recent_reports_are_newest_first_and_limited() {
        let repo = InMemoryRepository::new();
        let user = UserEmail::new("ada@example.com");

        for offset in 0..4 {
            let at = fixed_now() + Duration::minutes(offset);
            repo.put_report(
                &user,
                &TestId::generate(at),
                &ReportRecord::new(build_report(offset as u32)),
            )
            .await
            .unwrap();
        }

        let rows = repo.list_recent_reports(&user, 2).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].record.data.total_correct, 3);
        assert_eq!(rows[1].record.data.total_correct, 2);
    }

    #[tokio::test]
    async fn recent_reports_are_scoped_per_user() {
        let repo = InMemoryRepository::new();
        let ada = UserEmail::new("ada@example.com");
        let bob = UserEmail::new("bob@example.com");

        repo.put_report(
            &ada,
            &TestId::generate(fixed_now()),
            &ReportRecord::new(build_report(1)),
        )
        .await
        .unwrap();

        assert!(repo.list_recent_reports(&bob, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ensure_user_leaves_existing_profile_untouched() {
        let repo = InMemoryRepository::new();
        let email = UserEmail::new("ada@example.com");
        let first = UserProfile::from_email(email.clone(), fixed_now());
        repo.ensure_user(&first).await.unwrap();

        let later = UserProfile::from_email(email.clone(), fixed_now() + Duration::days(1));
        repo.ensure_user(&later).await.unwrap();

        let stored = repo.get_user(&email).await.unwrap().unwrap();
        assert_eq!(stored.created_at, fixed_now());
    }
}
