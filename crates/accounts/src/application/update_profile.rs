//! Update Profile Use Case

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entity::{Profile, ProfilePatch};
use crate::domain::repository::ProfileRepository;
use crate::error::AuthResult;

/// Update profile use case
pub struct UpdateProfileUseCase<P>
where
    P: ProfileRepository,
{
    profiles: Arc<P>,
}

impl<P> UpdateProfileUseCase<P>
where
    P: ProfileRepository,
{
    pub fn new(profiles: Arc<P>) -> Self {
        Self { profiles }
    }

    pub async fn execute(&self, id: Uuid, patch: ProfilePatch) -> AuthResult<Profile> {
        let profile = self.profiles.update(id, &patch).await?;
        tracing::info!(profile_id = %profile.id, "Profile updated");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{MockProfiles, profile};
    use crate::domain::value_object::UserName;

    #[tokio::test]
    async fn test_patch_applies_to_stored_row() {
        let stored = profile("alice", "a@x.com");
        let profiles = Arc::new(MockProfiles::with_rows(vec![stored.clone()]));
        let use_case = UpdateProfileUseCase::new(profiles);

        let patch = ProfilePatch {
            username: Some(UserName::from_db("alice2")),
            ..Default::default()
        };
        let updated = use_case.execute(stored.id, patch).await.unwrap();
        assert_eq!(updated.username.as_str(), "alice2");
        assert_eq!(updated.email, stored.email);
    }
}
