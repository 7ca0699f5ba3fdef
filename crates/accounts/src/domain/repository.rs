//! Repository Traits
//!
//! Ports for profile persistence and the local session slot.
//! Implementations live in the infrastructure layer.

use uuid::Uuid;

use crate::domain::entity::{NewProfile, Profile, ProfilePatch};
use crate::domain::value_object::{Email, UserName};
use crate::error::AuthResult;

/// Profile repository trait.
///
/// Single-entity lookups normalize the backend's "no row matched" signal
/// to `Ok(None)`; errors are reserved for genuine backend faults.
#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    /// Insert a profile row and return the stored row.
    async fn create(&self, profile: &NewProfile) -> AuthResult<Profile>;

    /// Find a profile by identity id.
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Profile>>;

    /// Find a profile by email.
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Profile>>;

    /// Find a profile by username.
    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<Profile>>;

    /// Administrative listing, unfiltered.
    async fn list_all(&self) -> AuthResult<Vec<Profile>>;

    /// Apply a partial update and return the stored row.
    async fn update(&self, id: Uuid, patch: &ProfilePatch) -> AuthResult<Profile>;

    /// Delete a profile row.
    async fn delete(&self, id: Uuid) -> AuthResult<()>;
}

/// Local session slot trait.
///
/// Holds at most one profile: the currently authenticated user. Written on
/// register/login success, removed on logout success, read on app start.
/// Last writer wins; there is at most one auth flow in flight.
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Persist `profile` as the current session.
    async fn persist(&self, profile: &Profile) -> AuthResult<()>;

    /// The cached session, if any.
    async fn load(&self) -> AuthResult<Option<Profile>>;

    /// Drop the cached session. Idempotent.
    async fn clear(&self) -> AuthResult<()>;
}
