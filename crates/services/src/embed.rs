//! Per-question video embed lookup.
//!
//! Each incoming question's related topics are posted to the embed
//! endpoint; a failure clears the link locally and never disturbs the
//! question flow. Results can arrive after the card they belong to is
//! gone, so callers tag each lookup with a [`LookupGeneration`] token and
//! drop results whose token is stale.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use quiz_core::model::EmbedLink;

use crate::error::EmbedError;

#[derive(Clone)]
pub struct EmbedLinkService {
    client: Client,
    base_url: String,
}

impl EmbedLinkService {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Look up an embed link for the given topic keywords.
    ///
    /// # Errors
    ///
    /// Returns `EmbedError::NoVideo` when the endpoint reports no match,
    /// `EmbedError::HttpStatus`/`Http` for transport-level failures, and
    /// `EmbedError::InvalidLink` when the returned link does not parse.
    pub async fn lookup(&self, keywords: &[String]) -> Result<EmbedLink, EmbedError> {
        let url = format!("{}/get_embed_link", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .json(&EmbedRequest { keywords })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Failure bodies carry {"message": ...} (no match) or
            // {"error": ...} (endpoint fault).
            return Err(match response.json::<EmbedFailure>().await {
                Ok(failure) => EmbedError::NoVideo(failure.message),
                Err(_) => EmbedError::HttpStatus(status),
            });
        }

        let body: EmbedResponse = response.json().await?;
        EmbedLink::parse(&body.embed_link).map_err(|_| EmbedError::InvalidLink(body.embed_link))
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    keywords: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embed_link: String,
}

#[derive(Debug, Deserialize)]
struct EmbedFailure {
    #[serde(alias = "error")]
    message: String,
}

//
// ─── LATE-RESULT GUARD ─────────────────────────────────────────────────────────
//

/// Generation counter for in-flight lookups.
///
/// `begin()` stamps a new lookup and invalidates every earlier token, so a
/// response that outlives its card (or the whole view) is recognized as
/// stale and discarded instead of being applied to the wrong question.
#[derive(Debug, Default)]
pub struct LookupGeneration(u64);

impl LookupGeneration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new lookup, invalidating all outstanding tokens.
    pub fn begin(&mut self) -> LookupToken {
        self.0 += 1;
        LookupToken(self.0)
    }

    /// Invalidate all outstanding tokens without starting a lookup
    /// (e.g. on view teardown).
    pub fn invalidate(&mut self) {
        self.0 += 1;
    }

    #[must_use]
    pub fn is_current(&self, token: LookupToken) -> bool {
        self.0 == token.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupToken(u64);
