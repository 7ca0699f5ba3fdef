//! Login Use Case
//!
//! Authenticates by username or email. A username (no `@`) resolves to its
//! profile's email first; the provider only ever sees emails. Provider
//! rejections are normalized to [`AuthError::InvalidCredentials`] so the
//! caller cannot distinguish a wrong password from an unknown account.

use std::sync::Arc;

use crate::domain::entity::Profile;
use crate::domain::gateway::IdentityGateway;
use crate::domain::repository::{ProfileRepository, SessionStore};
use crate::domain::value_object::{Email, UserName};
use crate::error::{AuthError, AuthResult};

/// Login use case
pub struct LoginUseCase<P, G, S>
where
    P: ProfileRepository,
    G: IdentityGateway,
    S: SessionStore,
{
    profiles: Arc<P>,
    identity: Arc<G>,
    session: Arc<S>,
}

impl<P, G, S> LoginUseCase<P, G, S>
where
    P: ProfileRepository,
    G: IdentityGateway,
    S: SessionStore,
{
    pub fn new(profiles: Arc<P>, identity: Arc<G>, session: Arc<S>) -> Self {
        Self {
            profiles,
            identity,
            session,
        }
    }

    pub async fn execute(&self, identifier: &str, password: &str) -> AuthResult<Profile> {
        let email = if identifier.contains('@') {
            Email::new(identifier).map_err(|_| AuthError::InvalidCredentials)?
        } else {
            let username =
                UserName::new(identifier).map_err(|_| AuthError::InvalidCredentials)?;
            match self.profiles.find_by_username(&username).await? {
                Some(profile) => profile.email,
                None => {
                    tracing::warn!(username = %username, "Login attempt for unknown username");
                    return Err(AuthError::InvalidCredentials);
                }
            }
        };

        // Provider detail is deliberately discarded here.
        self.identity
            .sign_in_with_password(&email, password)
            .await
            .map_err(|_| AuthError::InvalidCredentials)?;

        let profile = self
            .profiles
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.session.persist(&profile).await?;

        tracing::info!(profile_id = %profile.id, username = %profile.username, "User logged in");

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{MockGateway, MockProfiles, profile};
    use crate::infra::session::MemorySessionStore;

    fn use_case(
        profiles: Arc<MockProfiles>,
        gateway: Arc<MockGateway>,
        session: Arc<MemorySessionStore>,
    ) -> LoginUseCase<MockProfiles, MockGateway, MemorySessionStore> {
        LoginUseCase::new(profiles, gateway, session)
    }

    #[tokio::test]
    async fn test_username_resolves_to_profile_email() {
        let profiles = Arc::new(MockProfiles::with_rows(vec![profile("alice", "a@x.com")]));
        let gateway = Arc::new(MockGateway::new());
        let session = Arc::new(MemorySessionStore::new());
        let use_case = use_case(profiles, Arc::clone(&gateway), session);

        use_case.execute("alice", "pw").await.unwrap();

        let calls = gateway.sign_in_calls.lock().await;
        assert_eq!(calls.as_slice(), &[("a@x.com".to_string(), "pw".to_string())]);
    }

    #[tokio::test]
    async fn test_unknown_username_never_reaches_provider() {
        let profiles = Arc::new(MockProfiles::with_rows(Vec::new()));
        let gateway = Arc::new(MockGateway::new());
        let session = Arc::new(MemorySessionStore::new());
        let use_case = use_case(profiles, Arc::clone(&gateway), session);

        let err = use_case.execute("ghost", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(gateway.sign_in_calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_provider_rejection_is_normalized() {
        let profiles = Arc::new(MockProfiles::with_rows(vec![profile("alice", "a@x.com")]));
        let gateway = Arc::new(MockGateway {
            fail_sign_in: true,
            ..MockGateway::new()
        });
        let session = Arc::new(MemorySessionStore::new());
        let use_case = use_case(profiles, gateway, Arc::clone(&session));

        let err = use_case.execute("a@x.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(session.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticated_identity_without_profile_is_user_not_found() {
        // The provider knows the email but the backend has no row for it.
        let profiles = Arc::new(MockProfiles::with_rows(Vec::new()));
        let gateway = Arc::new(MockGateway::new());
        let session = Arc::new(MemorySessionStore::new());
        let use_case = use_case(profiles, gateway, session);

        let err = use_case.execute("b@x.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_successful_login_caches_profile() {
        let stored = profile("alice", "a@x.com");
        let profiles = Arc::new(MockProfiles::with_rows(vec![stored.clone()]));
        let gateway = Arc::new(MockGateway::new());
        let session = Arc::new(MemorySessionStore::new());
        let use_case = use_case(profiles, gateway, Arc::clone(&session));

        let returned = use_case.execute("a@x.com", "pw").await.unwrap();
        assert_eq!(returned, stored);
        assert_eq!(session.load().await.unwrap(), Some(stored));
    }
}
