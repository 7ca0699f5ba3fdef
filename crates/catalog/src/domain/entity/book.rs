//! Book Entity
//!
//! `Book` is the flattened read model: the embedded author and category
//! relations are collapsed into plain display names before the entity
//! leaves the repository. Write models (`NewBook`, `BookPatch`) carry the
//! foreign keys instead.

use chrono::NaiveDate;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// A book with its relations flattened to display names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub published_date: Option<NaiveDate>,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Flattened author display name
    pub author: String,
    /// Flattened category display name
    pub category: String,
}

/// Payload for creating a book
#[derive(Debug, Clone, Serialize)]
pub struct NewBook {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

impl NewBook {
    /// Copy counts must be coherent before the row is sent anywhere
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::bad_request("title must not be empty"));
        }
        validate_copies(self.total_copies, self.available_copies)
    }
}

/// Partial update payload for a book
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_copies: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_copies: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.isbn.is_none()
            && self.published_date.is_none()
            && self.cover_image.is_none()
            && self.total_copies.is_none()
            && self.available_copies.is_none()
            && self.status.is_none()
            && self.author_id.is_none()
            && self.category_id.is_none()
    }

    /// Validates whatever copy counts the patch carries. A patch that
    /// touches only one of the two counts is checked against zero alone;
    /// cross-field coherence needs both.
    pub fn validate(&self) -> AppResult<()> {
        match (self.total_copies, self.available_copies) {
            (Some(total), Some(available)) => validate_copies(total, available),
            (Some(total), None) if total < 0 => {
                Err(AppError::bad_request("total_copies must not be negative"))
            }
            (None, Some(available)) if available < 0 => Err(AppError::bad_request(
                "available_copies must not be negative",
            )),
            _ => Ok(()),
        }
    }
}

fn validate_copies(total: i32, available: i32) -> AppResult<()> {
    if total < 0 {
        return Err(AppError::bad_request("total_copies must not be negative"));
    }
    if available < 0 {
        return Err(AppError::bad_request(
            "available_copies must not be negative",
        ));
    }
    if available > total {
        return Err(AppError::bad_request(
            "available_copies must not exceed total_copies",
        ));
    }
    Ok(())
}
