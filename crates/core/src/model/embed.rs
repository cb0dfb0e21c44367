use thiserror::Error;
use url::Url;

/// A validated video embed URL for the back of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedLink(Url);

impl EmbedLink {
    /// Parse and validate a link returned by the embed-lookup endpoint.
    ///
    /// # Errors
    ///
    /// Returns `EmbedLinkError` for anything that is not an absolute
    /// http(s) URL.
    pub fn parse(raw: &str) -> Result<Self, EmbedLinkError> {
        let url = Url::parse(raw)?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(EmbedLinkError::UnsupportedScheme {
                scheme: other.to_owned(),
            }),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmbedLinkError {
    #[error(transparent)]
    Invalid(#[from] url::ParseError),

    #[error("unsupported embed scheme: {scheme}")]
    UnsupportedScheme { scheme: String },
}
