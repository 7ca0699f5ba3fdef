//! Profile Entity
//!
//! Application-level user record. One-to-one with an identity at the
//! external provider: `id` IS the provider's identity id, assigned there
//! and never generated locally. Credentials are not part of this entity;
//! the provider owns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_object::{Email, UserName, UserRole};

/// A stored profile row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Identity id issued by the provider during sign-up
    pub id: Uuid,
    /// Unique login/display name
    pub username: UserName,
    /// Unique email, shared with the identity
    pub email: Email,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for a profile row, created immediately after the
/// provider issued the identity id.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: Uuid,
    pub username: UserName,
    pub email: Email,
    pub role: UserRole,
}

/// Partial update for a profile row. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<UserName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.role.is_none()
    }
}
