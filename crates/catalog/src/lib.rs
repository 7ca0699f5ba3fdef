//! Catalog - Library Inventory Module
//!
//! Clean Architecture structure:
//! - `domain/` - Book/Author/Category/Borrowing entities and repository
//!   ports
//! - `application/` - The media asset service (cover images)
//! - `infra/` - Backend-backed repository implementations
//!
//! ## Responsibilities
//! - Entity CRUD and search with consistent ordering and pattern-search
//!   semantics
//! - Flattening embedded author/category relations so callers never see
//!   nested row shapes
//! - The three-step media lifecycle (upload / delete / replace) with
//!   stable storage keys and canonical public URLs

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::media::{MediaError, MediaService};
pub use error::{CatalogError, CatalogResult};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}
