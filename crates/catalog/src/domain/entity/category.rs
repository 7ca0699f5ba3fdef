//! Category Entity

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// A category row. The backing column is `categoryname`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "categoryname")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for creating a category
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    #[serde(rename = "categoryname")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewCategory {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::bad_request("category name must not be empty"));
        }
        Ok(())
    }
}

/// Partial update payload for a category
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryPatch {
    #[serde(rename = "categoryname", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}
