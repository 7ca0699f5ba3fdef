//! Object storage client
//!
//! Stores media objects under a single named bucket and derives canonical
//! public URLs for them. The inverse mapping ([`ObjectStore::object_key`])
//! only recognizes URLs rooted at this bucket's namespace; foreign URLs map
//! to `None` so callers can treat them as not-ours.

use serde_json::{Value, json};
use thiserror::Error;

use crate::config::RemoteConfig;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage service rejected the call.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never completed.
    #[error("object storage transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Port for the object-storage service.
#[trait_variant::make(ObjectStore: Send)]
pub trait LocalObjectStore {
    /// Store `bytes` under `key` in the bucket.
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StorageError>;

    /// Remove the given keys. Missing keys are not an error.
    async fn remove(&self, keys: &[String]) -> Result<(), StorageError>;

    /// Canonical public URL for `key`.
    fn public_url(&self, key: &str) -> String;

    /// Inverse of [`Self::public_url`]: the storage key for a URL inside
    /// this bucket's namespace, or `None` for foreign URLs.
    fn object_key(&self, public_url: &str) -> Option<String>;
}

/// HTTP implementation of [`ObjectStore`].
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    bucket: String,
}

impl StorageClient {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            anon_key: config.anon_key.clone(),
            bucket: config.bucket.clone(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn check(&self, response: reqwest::Response) -> Result<(), StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = ["message", "error"]
            .iter()
            .find_map(|key| body.get(key).and_then(Value::as_str))
            .unwrap_or("unknown object storage error")
            .to_string();

        tracing::error!(status = status.as_u16(), message = %message, "Object storage call failed");
        Err(StorageError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl ObjectStore for StorageClient {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        let url = format!("{}/storage/v1/object/{}/{key}", self.base_url, self.bucket);
        let mut request = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .body(bytes);
        if let Some(content_type) = content_type {
            request = request.header("Content-Type", content_type);
        }

        let response = request.send().await?;
        self.check(response).await
    }

    async fn remove(&self, keys: &[String]) -> Result<(), StorageError> {
        let url = format!("{}/storage/v1/object/{}", self.base_url, self.bucket);
        let response = self
            .http
            .delete(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&json!({ "prefixes": keys }))
            .send()
            .await?;
        self.check(response).await
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{key}",
            self.base_url, self.bucket
        )
    }

    fn object_key(&self, public_url: &str) -> Option<String> {
        let marker = format!("{}/", self.bucket);
        match public_url.split_once(&marker) {
            Some((_, key)) if !key.is_empty() => Some(key.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StorageClient {
        StorageClient::new(&RemoteConfig::new("https://example.supabase.co", "key"))
    }

    #[test]
    fn test_public_url_shape() {
        let url = ObjectStore::public_url(&client(), "1712000000-ab12cd34.png");
        assert_eq!(
            url,
            "https://example.supabase.co/storage/v1/object/public/book-covers/1712000000-ab12cd34.png"
        );
    }

    #[test]
    fn test_object_key_roundtrip() {
        let client = client();
        let url = ObjectStore::public_url(&client, "1712000000-ab12cd34.png");
        assert_eq!(
            ObjectStore::object_key(&client, &url).as_deref(),
            Some("1712000000-ab12cd34.png")
        );
    }

    #[test]
    fn test_object_key_rejects_foreign_urls() {
        let client = client();
        assert_eq!(
            ObjectStore::object_key(&client, "https://cdn.example.com/covers/x.png"),
            None
        );
        assert_eq!(
            ObjectStore::object_key(
                &client,
                "https://example.supabase.co/storage/v1/object/public/book-covers/"
            ),
            None
        );
    }
}
