//! Catalog Error Types

use kernel::error::app_error::AppError;
use kernel::error::kind::ErrorKind;
use platform::postgrest::BackendError;
use thiserror::Error;

use crate::domain::value_object::BorrowStatus;

/// Catalog-specific result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-specific error variants
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Relational backend fault
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// An operation required a row that does not exist
    #[error("record not found")]
    NotFound,

    /// Borrowing state machine rejected the transition
    #[error("invalid borrowing transition from '{0}'")]
    InvalidTransition(BorrowStatus),

    /// Input failed validation
    #[error(transparent)]
    Invalid(#[from] AppError),
}

impl CatalogError {
    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Backend(BackendError::NotFound) | CatalogError::NotFound => {
                ErrorKind::NotFound
            }
            CatalogError::Backend(_) => ErrorKind::InternalServerError,
            CatalogError::InvalidTransition(_) => ErrorKind::UnprocessableEntity,
            CatalogError::Invalid(err) => err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(CatalogError::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            CatalogError::InvalidTransition(BorrowStatus::Returned).kind(),
            ErrorKind::UnprocessableEntity
        );
        assert_eq!(
            CatalogError::Backend(BackendError::NotFound).kind(),
            ErrorKind::NotFound
        );
    }
}
