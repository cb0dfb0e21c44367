use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::UserEmail;

/// Per-user profile document, created once at first sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: UserEmail,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Build a profile with the default username (the address's local part).
    #[must_use]
    pub fn from_email(email: UserEmail, now: DateTime<Utc>) -> Self {
        let username = email.local_part().to_owned();
        Self {
            email,
            username,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn default_username_is_local_part() {
        let profile = UserProfile::from_email(UserEmail::new("ada@example.com"), fixed_now());
        assert_eq!(profile.username, "ada");
        assert_eq!(profile.created_at, profile.updated_at);
    }
}
