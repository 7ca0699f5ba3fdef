//! Current User Use Case
//!
//! Session resolution on app start: the provider's session is the source
//! of truth, the profile row supplies the application-level record. No
//! provider session means no user, and no profile lookup happens.

use std::sync::Arc;

use crate::domain::entity::Profile;
use crate::domain::gateway::IdentityGateway;
use crate::domain::repository::ProfileRepository;
use crate::domain::value_object::Email;
use crate::error::AuthResult;

/// Current user use case
pub struct CurrentUserUseCase<P, G>
where
    P: ProfileRepository,
    G: IdentityGateway,
{
    profiles: Arc<P>,
    identity: Arc<G>,
}

impl<P, G> CurrentUserUseCase<P, G>
where
    P: ProfileRepository,
    G: IdentityGateway,
{
    pub fn new(profiles: Arc<P>, identity: Arc<G>) -> Self {
        Self { profiles, identity }
    }

    pub async fn execute(&self) -> AuthResult<Option<Profile>> {
        let Some(session) = self.identity.session().await? else {
            tracing::debug!("No active provider session");
            return Ok(None);
        };

        self.profiles
            .find_by_email(&Email::from_db(session.email))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{MockGateway, MockProfiles, profile};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_no_session_means_no_lookup() {
        let profiles = Arc::new(MockProfiles::with_rows(vec![profile("alice", "a@x.com")]));
        let gateway = Arc::new(MockGateway::new());
        let use_case = CurrentUserUseCase::new(Arc::clone(&profiles), gateway);

        let current = use_case.execute().await.unwrap();
        assert!(current.is_none());
        assert_eq!(profiles.lookup_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_session_resolves_profile_by_email() {
        let stored = profile("alice", "a@x.com");
        let profiles = Arc::new(MockProfiles::with_rows(vec![stored.clone()]));
        let gateway = Arc::new(MockGateway::with_session("a@x.com"));
        let use_case = CurrentUserUseCase::new(profiles, gateway);

        let current = use_case.execute().await.unwrap();
        assert_eq!(current, Some(stored));
    }

    #[tokio::test]
    async fn test_session_without_profile_resolves_to_none() {
        let profiles = Arc::new(MockProfiles::with_rows(Vec::new()));
        let gateway = Arc::new(MockGateway::with_session("gone@x.com"));
        let use_case = CurrentUserUseCase::new(profiles, gateway);

        assert!(use_case.execute().await.unwrap().is_none());
    }
}
