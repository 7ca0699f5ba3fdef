//! Identity provider client (GoTrue dialect)
//!
//! Credential custody lives entirely in the external provider; this client
//! only exchanges email/password for an opaque session and keeps the
//! current session in an in-process slot. Durable session state is the
//! domain's session store, not this client.

use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::RemoteConfig;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider rejected the call.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never completed.
    #[error("identity provider transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected shape.
    #[error("identity provider response decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The provider's view of an authenticated account.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdentityUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: String,
}

/// An active provider session.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub user: IdentityUser,
}

/// Port for the external identity provider.
#[trait_variant::make(IdentityApi: Send)]
pub trait LocalIdentityApi {
    /// Create an account; `metadata` travels as provider-side user metadata.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Value,
    ) -> Result<IdentityUser, ProviderError>;

    /// Exchange email/password for a session.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, ProviderError>;

    /// Terminate the current session.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// The current session, if any.
    async fn session(&self) -> Result<Option<ProviderSession>, ProviderError>;
}

/// HTTP implementation of [`IdentityApi`].
pub struct GoTrueClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: Mutex<Option<ProviderSession>>,
}

impl GoTrueClient {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            anon_key: config.anon_key.clone(),
            session: Mutex::new(None),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    async fn check(&self, response: reqwest::Response) -> Result<Value, ProviderError> {
        let status = response.status();
        if status.is_success() {
            if status == reqwest::StatusCode::NO_CONTENT {
                return Ok(Value::Null);
            }
            return Ok(response.json().await?);
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = ["msg", "message", "error_description", "error"]
            .iter()
            .find_map(|key| body.get(key).and_then(Value::as_str))
            .unwrap_or("unknown identity provider error")
            .to_string();

        tracing::warn!(status = status.as_u16(), message = %message, "Identity provider call rejected");
        Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl IdentityApi for GoTrueClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Value,
    ) -> Result<IdentityUser, ProviderError> {
        let response = self
            .http
            .post(self.endpoint("signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": metadata,
            }))
            .send()
            .await?;

        let body = self.check(response).await?;
        // Depending on confirmation settings the provider returns either the
        // bare user object or a session wrapping it.
        let user_value = body.get("user").cloned().unwrap_or(body);
        let user: IdentityUser = serde_json::from_value(user_value)?;
        Ok(user)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, ProviderError> {
        let response = self
            .http
            .post(self.endpoint("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body = self.check(response).await?;
        let session: ProviderSession = serde_json::from_value(body)?;
        *self.session.lock().await = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let access_token = {
            let slot = self.session.lock().await;
            match &*slot {
                Some(session) => session.access_token.clone(),
                // Nothing to terminate.
                None => return Ok(()),
            }
        };

        let response = self
            .http
            .post(self.endpoint("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        self.check(response).await?;
        // The slot is cleared only after the provider confirmed termination.
        *self.session.lock().await = None;
        Ok(())
    }

    async fn session(&self) -> Result<Option<ProviderSession>, ProviderError> {
        Ok(self.session.lock().await.clone())
    }
}
