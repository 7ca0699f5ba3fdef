//! Borrowing Status
//!
//! Lifecycle of a loan. The only legal transitions go out of `Borrowed`;
//! `Returned` and `Overdue` are terminal for the purposes of this module.

use serde::{Deserialize, Serialize};

/// Status of a borrowing record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    #[default]
    Borrowed,
    Returned,
    Overdue,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Borrowed => "borrowed",
            BorrowStatus::Returned => "returned",
            BorrowStatus::Overdue => "overdue",
        }
    }

    /// Whether a transition from `self` to `next` is allowed
    pub fn is_valid_transition(&self, next: BorrowStatus) -> bool {
        matches!(
            (self, next),
            (BorrowStatus::Borrowed, BorrowStatus::Returned)
                | (BorrowStatus::Borrowed, BorrowStatus::Overdue)
        )
    }
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
