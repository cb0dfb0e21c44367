//! Client for the upload/generation endpoint: a multipart form with an
//! optional source document, answered with a status message.

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::error::UploadError;

/// A source document to upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct UploadService {
    client: Client,
    base_url: String,
}

impl UploadService {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Post the form and return the server's status message.
    ///
    /// The file is optional on the wire; the endpoint rejects a missing
    /// one with a message of its own, which surfaces as
    /// `UploadError::Rejected`.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Rejected` for non-success statuses and
    /// `UploadError::Http` for transport failures.
    pub async fn upload(&self, file: Option<UploadFile>) -> Result<String, UploadError> {
        let url = format!("{}/upload", self.base_url.trim_end_matches('/'));

        let mut form = Form::new();
        if let Some(file) = file {
            form = form.part("file", Part::bytes(file.bytes).file_name(file.name));
        }

        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        let reply = response.json::<UploadReply>().await.ok();
        let message = reply
            .map(|r| r.message)
            .unwrap_or_else(|| "no message".to_owned());

        if !status.is_success() {
            return Err(UploadError::Rejected { status, message });
        }

        tracing::info!(%message, "upload accepted");
        Ok(message)
    }
}

#[derive(Debug, Deserialize)]
struct UploadReply {
    message: String,
}
