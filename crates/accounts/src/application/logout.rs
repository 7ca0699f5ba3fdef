//! Logout Use Case
//!
//! Provider sign-out strictly precedes clearing the local slot: a cached
//! session is never dropped for a provider session that failed to
//! terminate.

use std::sync::Arc;

use crate::domain::gateway::IdentityGateway;
use crate::domain::repository::SessionStore;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<G, S>
where
    G: IdentityGateway,
    S: SessionStore,
{
    identity: Arc<G>,
    session: Arc<S>,
}

impl<G, S> LogoutUseCase<G, S>
where
    G: IdentityGateway,
    S: SessionStore,
{
    pub fn new(identity: Arc<G>, session: Arc<S>) -> Self {
        Self { identity, session }
    }

    pub async fn execute(&self) -> AuthResult<()> {
        self.identity.sign_out().await?;
        self.session.clear().await?;

        tracing::info!("User logged out");
        Ok(())
    }
}
