//! UserName Value Object
//!
//! Login/display identifier. The charset excludes `@` so a username can
//! never be mistaken for an email during login resolution.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const USER_NAME_MIN_LENGTH: usize = 3;
const USER_NAME_MAX_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    /// Create a new username with validation.
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into().trim().to_string();

        if name.len() < USER_NAME_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Username must be at least {USER_NAME_MIN_LENGTH} characters"
            )));
        }
        if name.len() > USER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Username must be at most {USER_NAME_MAX_LENGTH} characters"
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(AppError::bad_request(
                "Username may only contain letters, digits, '_', '-' and '.'",
            ));
        }

        Ok(Self(name))
    }

    /// Create from a backend row value (assumed already validated).
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_valid() {
        assert!(UserName::new("alice").is_ok());
        assert!(UserName::new("book_worm-42").is_ok());
        assert!(UserName::new("a.b.c").is_ok());
    }

    #[test]
    fn test_user_name_invalid() {
        assert!(UserName::new("").is_err());
        assert!(UserName::new("ab").is_err());
        assert!(UserName::new("a".repeat(33)).is_err());
        assert!(UserName::new("alice smith").is_err());
        // '@' would shadow email login resolution
        assert!(UserName::new("alice@example.com").is_err());
    }

    #[test]
    fn test_user_name_trimmed() {
        let name = UserName::new("  alice  ").unwrap();
        assert_eq!(name.as_str(), "alice");
    }
}
