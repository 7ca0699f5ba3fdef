//! Accounts - Identity & Profile Module
//!
//! Clean Architecture structure:
//! - `domain/` - Profile entity, value objects, repository/gateway ports
//! - `application/` - Use cases (register, login, logout, current user,
//!   profile update)
//! - `infra/` - Backend-, provider- and filesystem-backed implementations
//!
//! ## Responsibilities
//! - Registration: duplicate-email guard, provider sign-up, profile row
//!   creation, local session persistence (in that order)
//! - Login by username or email, normalized to the provider's email login
//! - Logout that never drops local session state for a provider session
//!   that failed to terminate
//! - Session resolution: provider session + profile lookup
//!
//! ## Consistency model
//! The provider owns credentials; the backend owns profiles; the local
//! session slot mirrors the most recent successful auth outcome. Ordering
//! is load-bearing and enforced by the use cases; there is no rollback for
//! a profile-creation failure after a successful provider sign-up (the
//! identity is orphaned and the failure surfaces to the caller).

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use error::{AuthError, AuthResult};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}
