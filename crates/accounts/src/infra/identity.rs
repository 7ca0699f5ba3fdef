//! Provider-backed Identity Gateway
//!
//! Thin typed wrapper translating identity-provider outcomes into domain
//! errors. Provider messages are preserved verbatim in
//! [`AuthError::Provider`]; the use cases decide how much of that detail
//! survives (login discards it entirely).

use std::sync::Arc;

use uuid::Uuid;

use platform::identity::IdentityApi;

use crate::domain::gateway::{IdentityGateway, IdentitySession, SignUpMetadata};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

pub struct ProviderIdentityGateway<I>
where
    I: IdentityApi,
{
    api: Arc<I>,
}

impl<I> ProviderIdentityGateway<I>
where
    I: IdentityApi,
{
    pub fn new(api: Arc<I>) -> Self {
        Self { api }
    }
}

impl<I> IdentityGateway for ProviderIdentityGateway<I>
where
    I: IdentityApi + Sync,
{
    async fn sign_up(
        &self,
        email: &Email,
        password: &str,
        metadata: SignUpMetadata,
    ) -> AuthResult<Uuid> {
        let metadata =
            serde_json::to_value(metadata).map_err(|e| AuthError::Provider(e.to_string()))?;
        let user = self
            .api
            .sign_up(email.as_str(), password, metadata)
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        Ok(user.id)
    }

    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &str,
    ) -> AuthResult<IdentitySession> {
        let session = self
            .api
            .sign_in_with_password(email.as_str(), password)
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        Ok(IdentitySession {
            user_id: session.user.id,
            email: session.user.email,
        })
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.api
            .sign_out()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))
    }

    async fn session(&self) -> AuthResult<Option<IdentitySession>> {
        let session = self
            .api
            .session()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        Ok(session.map(|s| IdentitySession {
            user_id: s.user.id,
            email: s.user.email,
        }))
    }
}
