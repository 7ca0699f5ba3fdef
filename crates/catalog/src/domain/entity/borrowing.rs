//! Borrowing Entity
//!
//! A borrowing links a user to a book copy for a period of time and
//! carries the loan state machine ([`BorrowStatus`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_object::BorrowStatus;

/// Book summary embedded in a borrowing listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowedBook {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub cover_image: Option<String>,
}

/// A loan of one book copy to one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borrowing {
    pub id: i64,
    pub user_id: Uuid,
    pub book_id: i64,
    pub borrow_date: DateTime<Utc>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub return_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: BorrowStatus,
    /// Present when the listing embeds the book relation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<BorrowedBook>,
}

/// Payload for creating a borrowing
#[derive(Debug, Clone, Serialize)]
pub struct NewBorrowing {
    pub user_id: Uuid,
    pub book_id: i64,
    pub borrow_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub status: BorrowStatus,
}

impl NewBorrowing {
    /// New loans start in the borrowed state at the current instant
    pub fn start_now(user_id: Uuid, book_id: i64, due_date: Option<DateTime<Utc>>) -> Self {
        Self {
            user_id,
            book_id,
            borrow_date: Utc::now(),
            due_date,
            status: BorrowStatus::Borrowed,
        }
    }
}

/// Partial update payload for a borrowing
#[derive(Debug, Clone, Default, Serialize)]
pub struct BorrowingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BorrowStatus>,
}

impl BorrowingPatch {
    pub fn is_empty(&self) -> bool {
        self.due_date.is_none() && self.return_date.is_none() && self.status.is_none()
    }
}
