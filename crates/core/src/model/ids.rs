use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a Question, assigned by the question server.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(u64);

impl QuestionId {
    /// Creates a new `QuestionId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Key of one answer option ("A", "B", ...).
///
/// The question server compares answers case-insensitively, so keys are
/// normalized to uppercase at construction.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct OptionKey(String);

impl OptionKey {
    #[must_use]
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(key.as_ref().trim().to_uppercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OptionKey {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<OptionKey> for String {
    fn from(key: OptionKey) -> Self {
        key.0
    }
}

/// Identifier of one persisted quiz run under a user's record.
///
/// The wire format is the literal `"test"` followed by the epoch
/// milliseconds at which the run completed.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestId(String);

impl TestId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive a fresh id from the completion timestamp.
    #[must_use]
    pub fn generate(completed_at: chrono::DateTime<chrono::Utc>) -> Self {
        Self(format!("test{}", completed_at.timestamp_millis()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Epoch milliseconds embedded in the id, if the id follows the
    /// generated format. Used to order records newest-first.
    #[must_use]
    pub fn millis(&self) -> Option<i64> {
        self.0.strip_prefix("test")?.parse().ok()
    }
}

/// Address of the signed-in user, as provided by the auth layer.
///
/// This is read-only shared context: it is set once at sign-in and passed
/// explicitly into the components that need it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserEmail(String);

impl UserEmail {
    #[must_use]
    pub fn new(email: impl AsRef<str>) -> Self {
        Self(email.as_ref().trim().to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local part of the address, used as a default username.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionKey({})", self.0)
    }
}

impl fmt::Debug for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestId({})", self.0)
    }
}

impl fmt::Debug for UserEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserEmail({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn option_key_normalizes_to_uppercase() {
        assert_eq!(OptionKey::new(" b ").as_str(), "B");
        assert_eq!(OptionKey::new("b"), OptionKey::new("B"));
    }

    #[test]
    fn test_id_embeds_completion_millis() {
        let id = TestId::generate(fixed_now());
        assert_eq!(id.as_str(), format!("test{}", fixed_now().timestamp_millis()));
        assert_eq!(id.millis(), Some(fixed_now().timestamp_millis()));
    }

    #[test]
    fn test_id_millis_rejects_foreign_format() {
        assert_eq!(TestId::new("run-42").millis(), None);
        assert_eq!(TestId::new("testxyz").millis(), None);
    }

    #[test]
    fn user_email_local_part() {
        assert_eq!(UserEmail::new("ada@example.com").local_part(), "ada");
        assert_eq!(UserEmail::new("no-at-sign").local_part(), "no-at-sign");
    }
}
