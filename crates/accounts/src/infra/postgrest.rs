//! Backend-backed Profile Repository

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use platform::postgrest::{BackendError, BackendExecutor, QuerySpec};

use crate::domain::entity::{NewProfile, Profile, ProfilePatch};
use crate::domain::repository::ProfileRepository;
use crate::domain::value_object::{Email, UserName};
use crate::error::{AuthError, AuthResult};
use kernel::error::app_error::AppError;

const TABLE: &str = "users";
const COLUMNS: &str = "id,username,email,role,created_at";

/// Profile repository over the relational backend's `users` collection.
#[derive(Clone)]
pub struct PostgrestProfileRepository<E>
where
    E: BackendExecutor,
{
    backend: Arc<E>,
}

impl<E> PostgrestProfileRepository<E>
where
    E: BackendExecutor,
{
    pub fn new(backend: Arc<E>) -> Self {
        Self { backend }
    }

    /// Run a single-row lookup, normalizing "no row matched" to `None`.
    async fn lookup(&self, spec: QuerySpec) -> AuthResult<Option<Profile>> {
        match self.backend.fetch_single(spec).await {
            Ok(row) => Ok(Some(decode_profile(row)?)),
            Err(BackendError::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Decode a backend row into a [`Profile`].
fn decode_profile(row: Value) -> AuthResult<Profile> {
    serde_json::from_value(scrub_sensitive(row)).map_err(|e| BackendError::Decode(e).into())
}

/// Remove sensitive columns a row may still carry (legacy schemas kept a
/// `password` column) before the row leaves this module.
fn scrub_sensitive(mut row: Value) -> Value {
    if let Some(object) = row.as_object_mut() {
        object.remove("password");
    }
    row
}

impl<E> ProfileRepository for PostgrestProfileRepository<E>
where
    E: BackendExecutor + Sync,
{
    async fn create(&self, profile: &NewProfile) -> AuthResult<Profile> {
        let payload = serde_json::to_value(profile).map_err(BackendError::Decode)?;
        let row = self
            .backend
            .fetch_single(QuerySpec::insert(TABLE, payload).columns(COLUMNS))
            .await?;
        decode_profile(row)
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Profile>> {
        self.lookup(QuerySpec::select(TABLE).columns(COLUMNS).eq("id", id))
            .await
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Profile>> {
        self.lookup(
            QuerySpec::select(TABLE)
                .columns(COLUMNS)
                .eq("email", email.as_str()),
        )
        .await
    }

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<Profile>> {
        self.lookup(
            QuerySpec::select(TABLE)
                .columns(COLUMNS)
                .eq("username", username.as_str()),
        )
        .await
    }

    async fn list_all(&self) -> AuthResult<Vec<Profile>> {
        let rows = self
            .backend
            .fetch_rows(QuerySpec::select(TABLE).columns(COLUMNS))
            .await?;
        rows.into_iter().map(decode_profile).collect()
    }

    async fn update(&self, id: Uuid, patch: &ProfilePatch) -> AuthResult<Profile> {
        if patch.is_empty() {
            return Err(AppError::bad_request("profile patch is empty").into());
        }
        let payload = serde_json::to_value(patch).map_err(BackendError::Decode)?;
        let row = self
            .backend
            .fetch_single(QuerySpec::update(TABLE, payload).eq("id", id).columns(COLUMNS))
            .await?;
        decode_profile(row)
    }

    async fn delete(&self, id: Uuid) -> AuthResult<()> {
        self.backend
            .execute(QuerySpec::delete(TABLE).eq("id", id))
            .await?;
        Ok(())
    }
}
