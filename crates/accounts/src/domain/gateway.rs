//! Identity Gateway Trait
//!
//! Domain-typed port over the external identity provider. Implementations
//! translate provider outcomes into [`AuthError`]; no retries, a failed
//! call is terminal for that invocation.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::value_object::Email;
use crate::error::AuthResult;

/// Provider-side metadata attached to a sign-up.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpMetadata {
    pub is_admin_registration: bool,
}

/// The provider's view of the authenticated identity, reduced to what this
/// layer needs: the identity id and the email to resolve a profile with.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentitySession {
    pub user_id: Uuid,
    pub email: String,
}

#[trait_variant::make(IdentityGateway: Send)]
pub trait LocalIdentityGateway {
    /// Create an identity; returns the provider-issued id.
    async fn sign_up(
        &self,
        email: &Email,
        password: &str,
        metadata: SignUpMetadata,
    ) -> AuthResult<Uuid>;

    /// Authenticate with email and password.
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &str,
    ) -> AuthResult<IdentitySession>;

    /// Terminate the provider session.
    async fn sign_out(&self) -> AuthResult<()>;

    /// The active provider session, if any.
    async fn session(&self) -> AuthResult<Option<IdentitySession>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_uses_provider_key_casing() {
        let value = serde_json::to_value(SignUpMetadata {
            is_admin_registration: true,
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({ "isAdminRegistration": true }));
    }
}
