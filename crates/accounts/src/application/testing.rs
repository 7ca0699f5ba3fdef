//! Recording mocks shared by the use-case tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entity::{NewProfile, Profile, ProfilePatch};
use crate::domain::gateway::{IdentityGateway, IdentitySession, SignUpMetadata};
use crate::domain::repository::ProfileRepository;
use crate::domain::value_object::{Email, UserName, UserRole};
use crate::error::{AuthError, AuthResult};

pub(crate) fn profile(username: &str, email: &str) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        username: UserName::from_db(username),
        email: Email::from_db(email),
        role: UserRole::User,
        created_at: None,
    }
}

/// In-memory profile repository that counts lookups and records inserts.
#[derive(Default)]
pub(crate) struct MockProfiles {
    rows: Mutex<Vec<Profile>>,
    pub lookup_count: AtomicUsize,
    pub created: Mutex<Vec<NewProfile>>,
    pub fail_create: bool,
}

impl MockProfiles {
    pub fn with_rows(rows: Vec<Profile>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn failing_create(rows: Vec<Profile>) -> Self {
        Self {
            rows: Mutex::new(rows),
            fail_create: true,
            ..Default::default()
        }
    }
}

impl ProfileRepository for MockProfiles {
    async fn create(&self, profile: &NewProfile) -> AuthResult<Profile> {
        self.created.lock().await.push(profile.clone());
        if self.fail_create {
            return Err(AuthError::Backend(
                platform::postgrest::BackendError::Api {
                    status: 500,
                    code: "XX000".to_string(),
                    message: "insert failed".to_string(),
                },
            ));
        }
        let stored = Profile {
            id: profile.id,
            username: profile.username.clone(),
            email: profile.email.clone(),
            role: profile.role,
            created_at: None,
        };
        self.rows.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Profile>> {
        self.lookup_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().await.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Profile>> {
        self.lookup_count.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|p| &p.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<Profile>> {
        self.lookup_count.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|p| &p.username == username)
            .cloned())
    }

    async fn list_all(&self) -> AuthResult<Vec<Profile>> {
        Ok(self.rows.lock().await.clone())
    }

    async fn update(&self, id: Uuid, patch: &ProfilePatch) -> AuthResult<Profile> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AuthError::UserNotFound)?;
        if let Some(username) = &patch.username {
            row.username = username.clone();
        }
        if let Some(email) = &patch.email {
            row.email = email.clone();
        }
        if let Some(role) = patch.role {
            row.role = role;
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> AuthResult<()> {
        self.rows.lock().await.retain(|p| p.id != id);
        Ok(())
    }
}

pub(crate) struct SignUpCall {
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

/// Identity gateway recording every call; failures are scripted per
/// operation.
#[derive(Default)]
pub(crate) struct MockGateway {
    pub identity_id: Uuid,
    pub fail_sign_up: bool,
    pub fail_sign_in: bool,
    pub fail_sign_out: bool,
    pub sign_up_calls: Mutex<Vec<SignUpCall>>,
    pub sign_in_calls: Mutex<Vec<(String, String)>>,
    pub sign_out_count: AtomicUsize,
    pub active_session: Mutex<Option<IdentitySession>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            identity_id: Uuid::new_v4(),
            ..Default::default()
        }
    }

    pub fn with_session(email: &str) -> Self {
        let gateway = Self::new();
        let session = IdentitySession {
            user_id: gateway.identity_id,
            email: email.to_string(),
        };
        Self {
            active_session: Mutex::new(Some(session)),
            ..gateway
        }
    }
}

impl IdentityGateway for MockGateway {
    async fn sign_up(
        &self,
        email: &Email,
        password: &str,
        metadata: SignUpMetadata,
    ) -> AuthResult<Uuid> {
        self.sign_up_calls.lock().await.push(SignUpCall {
            email: email.as_str().to_string(),
            password: password.to_string(),
            is_admin: metadata.is_admin_registration,
        });
        if self.fail_sign_up {
            return Err(AuthError::Provider("email rate limit exceeded".to_string()));
        }
        Ok(self.identity_id)
    }

    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &str,
    ) -> AuthResult<IdentitySession> {
        self.sign_in_calls
            .lock()
            .await
            .push((email.as_str().to_string(), password.to_string()));
        if self.fail_sign_in {
            return Err(AuthError::Provider("invalid login credentials".to_string()));
        }
        Ok(IdentitySession {
            user_id: self.identity_id,
            email: email.as_str().to_string(),
        })
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.sign_out_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out {
            return Err(AuthError::Provider("network unreachable".to_string()));
        }
        *self.active_session.lock().await = None;
        Ok(())
    }

    async fn session(&self) -> AuthResult<Option<IdentitySession>> {
        Ok(self.active_session.lock().await.clone())
    }
}
