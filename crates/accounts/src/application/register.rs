//! Register Use Case
//!
//! Creates an identity at the provider and the matching profile row, then
//! caches the session. The duplicate-email check runs strictly before the
//! provider call; an email already bound to a profile never reaches the
//! provider.

use std::sync::Arc;

use crate::domain::entity::{NewProfile, Profile};
use crate::domain::gateway::{IdentityGateway, SignUpMetadata};
use crate::domain::repository::{ProfileRepository, SessionStore};
use crate::domain::value_object::{Email, UserName, UserRole};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

/// Register use case
pub struct RegisterUseCase<P, G, S>
where
    P: ProfileRepository,
    G: IdentityGateway,
    S: SessionStore,
{
    profiles: Arc<P>,
    identity: Arc<G>,
    session: Arc<S>,
}

impl<P, G, S> RegisterUseCase<P, G, S>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<Profile> {
        let username = UserName::new(input.username)?;
        let email = Email::new(input.email)?;

        if self.profiles.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let identity_id = self
            .identity
            .sign_up(
                &email,
                &input.password,
                SignUpMetadata {
                    is_admin_registration: input.is_admin,
                },
            )
            .await?;

        let new_profile = NewProfile {
            id: identity_id,
            username,
            email,
            role: UserRole::for_registration(input.is_admin),
        };
        let profile = match self.profiles.create(&new_profile).await {
            Ok(profile) => profile,
            Err(err) => {
                // The identity exists but has no profile row. There is no
                // compensating delete; the failure surfaces to the caller.
                tracing::error!(
                    identity_id = %identity_id,
                    error = %err,
                    "Profile creation failed after provider sign-up; identity is orphaned"
                );
                return Err(err);
            }
        };

        self.session.persist(&profile).await?;

        tracing::info!(
            profile_id = %profile.id,
            username = %profile.username,
            role = %profile.role,
            "User registered"
        );

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{MockGateway, MockProfiles, profile};
    use crate::infra::session::MemorySessionStore;
    use std::sync::atomic::Ordering;

    fn input(username: &str, email: &str) -> RegisterInput {
        RegisterInput {
            username: username.to_string(),
            email: email.to_string(),
            password: "hunter2-hunter2".to_string(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_never_reaches_provider() {
        let profiles = Arc::new(MockProfiles::with_rows(vec![profile("alice", "a@x.com")]));
        let gateway = Arc::new(MockGateway::new());
        let session = Arc::new(MemorySessionStore::new());
        let use_case = RegisterUseCase::new(profiles, Arc::clone(&gateway), session);

        let err = use_case.execute(input("bob", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
        assert!(gateway.sign_up_calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_register_persists_session_and_returns_profile() {
        let profiles = Arc::new(MockProfiles::with_rows(Vec::new()));
        let gateway = Arc::new(MockGateway::new());
        let session = Arc::new(MemorySessionStore::new());
        let use_case = RegisterUseCase::new(
            Arc::clone(&profiles),
            Arc::clone(&gateway),
            Arc::clone(&session),
        );

        let profile = use_case.execute(input("bob", "b@x.com")).await.unwrap();
        assert_eq!(profile.id, gateway.identity_id);
        assert_eq!(profile.role, UserRole::User);
        assert_eq!(session.load().await.unwrap(), Some(profile));

        let calls = gateway.sign_up_calls.lock().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].email, "b@x.com");
        assert!(!calls[0].is_admin);
    }

    #[tokio::test]
    async fn test_admin_registration_sets_role_and_metadata() {
        let profiles = Arc::new(MockProfiles::with_rows(Vec::new()));
        let gateway = Arc::new(MockGateway::new());
        let session = Arc::new(MemorySessionStore::new());
        let use_case =
            RegisterUseCase::new(profiles, Arc::clone(&gateway), Arc::clone(&session));

        let mut admin_input = input("root", "root@x.com");
        admin_input.is_admin = true;
        let profile = use_case.execute(admin_input).await.unwrap();

        assert_eq!(profile.role, UserRole::Admin);
        assert!(gateway.sign_up_calls.lock().await[0].is_admin);
    }

    #[tokio::test]
    async fn test_profile_creation_failure_leaves_no_session() {
        let profiles = Arc::new(MockProfiles::failing_create(Vec::new()));
        let gateway = Arc::new(MockGateway::new());
        let session = Arc::new(MemorySessionStore::new());
        let use_case = RegisterUseCase::new(
            Arc::clone(&profiles),
            Arc::clone(&gateway),
            Arc::clone(&session),
        );

        let err = use_case.execute(input("bob", "b@x.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::Backend(_)));
        // Sign-up happened, so the identity is orphaned; the local session
        // must not claim an authenticated user.
        assert_eq!(gateway.sign_up_calls.lock().await.len(), 1);
        assert!(session.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_email_rejected_before_any_call() {
        let profiles = Arc::new(MockProfiles::with_rows(Vec::new()));
        let gateway = Arc::new(MockGateway::new());
        let session = Arc::new(MemorySessionStore::new());
        let use_case = RegisterUseCase::new(
            Arc::clone(&profiles),
            Arc::clone(&gateway),
            session,
        );

        let err = use_case
            .execute(input("bob", "not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Invalid(_)));
        assert_eq!(profiles.lookup_count.load(Ordering::SeqCst), 0);
        assert!(gateway.sign_up_calls.lock().await.is_empty());
    }
}
