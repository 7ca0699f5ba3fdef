//! Session Stores
//!
//! The single locally cached authenticated profile. [`FileSessionStore`]
//! is the durable slot (one JSON document on disk);
//! [`MemorySessionStore`] backs tests and short-lived tools.

use std::path::PathBuf;

use tokio::sync::Mutex;

use crate::domain::entity::Profile;
use crate::domain::repository::SessionStore;
use crate::error::{AuthError, AuthResult};

/// JSON slot on disk. A missing file means "no session"; `clear` on a
/// missing file is a no-op.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn slot_error(err: impl std::fmt::Display) -> AuthError {
        AuthError::Session(err.to_string())
    }
}

impl SessionStore for FileSessionStore {
    async fn persist(&self, profile: &Profile) -> AuthResult<()> {
        let bytes = serde_json::to_vec_pretty(profile).map_err(Self::slot_error)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(Self::slot_error)?;
        tracing::debug!(path = %self.path.display(), "Session slot written");
        Ok(())
    }

    async fn load(&self) -> AuthResult<Option<Profile>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let profile = serde_json::from_slice(&bytes).map_err(Self::slot_error)?;
                Ok(Some(profile))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::slot_error(err)),
        }
    }

    async fn clear(&self) -> AuthResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::slot_error(err)),
        }
    }
}

/// In-memory slot.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Profile>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    async fn persist(&self, profile: &Profile) -> AuthResult<()> {
        *self.slot.lock().await = Some(profile.clone());
        Ok(())
    }

    async fn load(&self) -> AuthResult<Option<Profile>> {
        Ok(self.slot.lock().await.clone())
    }

    async fn clear(&self) -> AuthResult<()> {
        *self.slot.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{Email, UserName, UserRole};
    use uuid::Uuid;

    fn profile() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            username: UserName::from_db("alice"),
            email: Email::from_db("a@x.com"),
            role: UserRole::User,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert!(store.load().await.unwrap().is_none());

        let profile = profile();
        store.persist(&profile).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(profile));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_last_writer_wins() {
        let store = MemorySessionStore::new();
        let first = profile();
        let second = profile();

        store.persist(&first).await.unwrap();
        store.persist(&second).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(second));
    }
}
