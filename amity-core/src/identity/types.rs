//! Core types for user identity.

use serde::{Deserialize, Serialize};

/// Minimum username length.
pub const MIN_USERNAME_LEN: usize = 3;

/// Maximum username length.
pub const MAX_USERNAME_LEN: usize = 32;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Unique identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user record as shown to other users.
///
/// Credentials are stored alongside the record but never leave the
/// storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique handle (case-insensitive).
    pub username: String,
    /// Image reference (URL or data URL).
    pub avatar: Option<String>,
    /// Free-form profile text.
    pub bio: Option<String>,
    /// When the user registered (Unix timestamp).
    pub created_at: i64,
}

/// Registration input.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Requested handle.
    pub username: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
    /// Contact address for account recovery.
    #[serde(default)]
    pub email: Option<String>,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

impl NewUser {
    /// Creates registration input without an e-mail address.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            password: password.into(),
            email: None,
        }
    }

    /// Sets the e-mail address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Partial profile edit.
///
/// `None` leaves a field unchanged. For `avatar` and `bio`, an empty
/// string clears the field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New avatar reference.
    #[serde(default)]
    pub avatar: Option<String>,
    /// New bio.
    #[serde(default)]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    /// Applies the edit to a user record.
    pub(crate) fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name.trim().to_string();
        }
        if let Some(avatar) = self.avatar {
            user.avatar = non_empty(avatar);
        }
        if let Some(bio) = self.bio {
            user.bio = non_empty(bio);
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Returns whether `username` is an acceptable handle.
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    (MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: UserId(1),
            name: "Alice".to_string(),
            username: "alice".to_string(),
            avatar: Some("https://example.com/a.png".to_string()),
            bio: Some("Hiker".to_string()),
            created_at: 1_000,
        }
    }

    #[test]
    fn username_validation() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("a.b_c9"));
        assert!(!is_valid_username("al"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("émile"));
        assert!(!is_valid_username(&"x".repeat(MAX_USERNAME_LEN + 1)));
    }

    #[test]
    fn user_serializes_camel_case() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["createdAt"], 1_000);
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn new_user_debug_redacts_password() {
        let input = NewUser::new("Alice", "alice", "hunter22").with_email("a@example.com");
        let debug_str = format!("{input:?}");
        assert!(debug_str.contains("<redacted>"));
        assert!(!debug_str.contains("hunter22"));
        assert!(debug_str.contains("a@example.com"));
    }

    #[test]
    fn profile_update_applies_and_clears() {
        let mut user = sample_user();
        ProfileUpdate {
            name: Some("  Alice B ".to_string()),
            avatar: Some(String::new()),
            bio: None,
        }
        .apply(&mut user);

        assert_eq!(user.name, "Alice B");
        assert!(user.avatar.is_none());
        assert_eq!(user.bio, Some("Hiker".to_string()));
    }
}
