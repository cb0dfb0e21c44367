//! Adapter for the external document database.
//!
//! The database itself is a black box; this module only assumes a minimal
//! REST convention over the mandated document paths:
//!
//! - `PUT  users/{email}`                 — write a profile document
//! - `GET  users/{email}`                 — read a profile document
//! - `PUT  users/{email}/tests/{testId}`  — write a report record
//! - `GET  users/{email}/tests/{testId}`  — read a report record
//! - `GET  users/{email}/tests?limit=N&order=desc` — list recent records

use async_trait::async_trait;
use quiz_core::model::{TestId, UserEmail, UserProfile};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::repository::{
    ReportRecord, ReportRepository, ReportRow, Storage, StorageError, UserRepository,
};

#[derive(Clone, Debug)]
pub struct DocumentStore {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentStoreInitError {
    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("unsupported base url scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

impl DocumentStore {
    /// Build a store client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns `DocumentStoreInitError` if the URL does not parse, is not
    /// http(s), or the HTTP client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, DocumentStoreInitError> {
        let base_url = Url::parse(base_url)?;
        match base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(DocumentStoreInitError::UnsupportedScheme {
                    scheme: other.to_owned(),
                });
            }
        }

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client, base_url })
    }

    fn doc_url(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StorageError::Connection("base url cannot hold paths".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn connection(e: reqwest::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn status_error(status: StatusCode) -> StorageError {
    match status {
        StatusCode::NOT_FOUND => StorageError::NotFound,
        StatusCode::CONFLICT => StorageError::Conflict,
        other => StorageError::Connection(format!("unexpected status {other}")),
    }
}

/// List row as returned by the tests collection endpoint.
#[derive(Debug, Deserialize)]
struct ReportDocRow {
    id: String,
    #[serde(flatten)]
    record: ReportRecord,
}

#[async_trait]
impl ReportRepository for DocumentStore {
    async fn put_report(
        &self,
        user: &UserEmail,
        test_id: &TestId,
        record: &ReportRecord,
    ) -> Result<(), StorageError> {
        let url = self.doc_url(&["users", user.as_str(), "tests", test_id.as_str()])?;
        tracing::debug!(test_id = %test_id, "writing report record");

        let response = self
            .client
            .put(url)
            .json(record)
            .send()
            .await
            .map_err(connection)?;

        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }
        Ok(())
    }

    async fn get_report(
        &self,
        user: &UserEmail,
        test_id: &TestId,
    ) -> Result<ReportRecord, StorageError> {
        let url = self.doc_url(&["users", user.as_str(), "tests", test_id.as_str()])?;
        let response = self.client.get(url).send().await.map_err(connection)?;

        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }

        response
            .json::<ReportRecord>()
            .await
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn list_recent_reports(
        &self,
        user: &UserEmail,
        limit: u32,
    ) -> Result<Vec<ReportRow>, StorageError> {
        let mut url = self.doc_url(&["users", user.as_str(), "tests"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("order", "desc");

        let response = self.client.get(url).send().await.map_err(connection)?;
        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }

        let rows: Vec<ReportDocRow> = response
            .json()
            .await
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| ReportRow {
                test_id: TestId::new(row.id),
                record: row.record,
            })
            .collect())
    }
}

#[async_trait]
impl UserRepository for DocumentStore {
    async fn ensure_user(&self, profile: &UserProfile) -> Result<(), StorageError> {
        if self.get_user(&profile.email).await?.is_some() {
            return Ok(());
        }

        let url = self.doc_url(&["users", profile.email.as_str()])?;
        tracing::debug!(user = %profile.email, "creating profile document");

        let response = self
            .client
            .put(url)
            .json(profile)
            .send()
            .await
            .map_err(connection)?;

        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }
        Ok(())
    }

    async fn get_user(&self, email: &UserEmail) -> Result<Option<UserProfile>, StorageError> {
        let url = self.doc_url(&["users", email.as_str()])?;
        let response = self.client.get(url).send().await.map_err(connection)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }

        response
            .json::<UserProfile>()
            .await
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

impl Storage {
    /// Build a `Storage` backed by the external document database.
    ///
    /// # Errors
    ///
    /// Returns `DocumentStoreInitError` if the base URL is unusable.
    pub fn document_store(base_url: &str) -> Result<Self, DocumentStoreInitError> {
        let store = DocumentStore::new(base_url)?;
        let reports: Arc<dyn ReportRepository> = Arc::new(store.clone());
        let users: Arc<dyn UserRepository> = Arc::new(store);
        Ok(Self { reports, users })
    }
}
