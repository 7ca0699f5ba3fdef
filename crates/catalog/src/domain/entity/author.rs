//! Author Entity

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// An author row. The backing column is `authorname`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    #[serde(rename = "authorname")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Payload for creating an author
#[derive(Debug, Clone, Serialize)]
pub struct NewAuthor {
    #[serde(rename = "authorname")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl NewAuthor {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::bad_request("author name must not be empty"));
        }
        Ok(())
    }
}

/// Partial update payload for an author
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuthorPatch {
    #[serde(rename = "authorname", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl AuthorPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none()
    }
}
