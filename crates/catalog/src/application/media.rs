//! Cover Media Service
//!
//! Three-step lifecycle for cover images: upload a new object under a
//! fresh key, delete the object behind a public URL, or replace one URL
//! with another source. Keys are generated here, never by callers, so
//! every object in the bucket follows the same naming scheme.

use std::sync::Arc;

use rand::Rng;
use thiserror::Error;

use platform::fetch::{ByteFetcher, FetchError};
use platform::storage::ObjectStore;

/// Length of the random portion of a storage key
const KEY_TOKEN_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum MediaError {
    /// The object could not be stored.
    #[error("cover upload failed: {0}")]
    Upload(String),

    /// The object could not be removed.
    #[error("cover delete failed: {0}")]
    Delete(String),

    /// The source bytes could not be acquired.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Coordinates byte acquisition and object storage for cover images.
pub struct MediaService<S, F>
where
    S: ObjectStore,
    F: ByteFetcher,
{
    store: Arc<S>,
    fetcher: Arc<F>,
}

impl<S, F> MediaService<S, F>
where
    S: ObjectStore,
    F: ByteFetcher,
{
    pub fn new(store: Arc<S>, fetcher: Arc<F>) -> Self {
        Self { store, fetcher }
    }

    /// Fetch the bytes behind `source_uri`, store them under a fresh key
    /// and return the public URL of the stored object.
    pub async fn upload(&self, source_uri: &str) -> Result<String, MediaError> {
        let bytes = self.fetcher.fetch(source_uri).await?;
        let extension = extension_of(source_uri);
        let key = storage_key(&extension);

        self.store
            .upload(&key, bytes, Some(content_type_for(&extension)))
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        let url = self.store.public_url(&key);
        tracing::info!(key = %key, "Cover image uploaded");
        Ok(url)
    }

    /// Remove the object behind `public_url`. URLs outside the bucket's
    /// namespace are silently ignored so stale external links never fail
    /// an entity update.
    pub async fn delete(&self, public_url: &str) -> Result<(), MediaError> {
        let Some(key) = self.store.object_key(public_url) else {
            tracing::debug!(url = %public_url, "URL is not in the cover bucket, nothing to delete");
            return Ok(());
        };

        self.store
            .remove(&[key.clone()])
            .await
            .map_err(|e| MediaError::Delete(e.to_string()))?;
        tracing::info!(key = %key, "Cover image deleted");
        Ok(())
    }

    /// Swap a cover: delete the previous object (when there is one) and
    /// upload the new source. The old object goes first so a failed
    /// deletion never leaves two live objects for one book.
    pub async fn replace(
        &self,
        old_url: Option<&str>,
        source_uri: &str,
    ) -> Result<String, MediaError> {
        if let Some(old) = old_url {
            self.delete(old).await?;
        }
        self.upload(source_uri).await
    }
}

/// `{millis}-{token}.{ext}`, unique per upload
fn storage_key(extension: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let token: String = rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(KEY_TOKEN_LEN)
        .map(char::from)
        .collect();
    format!("{millis}-{}.{extension}", token.to_lowercase())
}

/// File extension of the last path segment, query string stripped.
/// Falls back to `jpg` when the segment has none.
fn extension_of(source_uri: &str) -> String {
    let path = source_uri.split(['?', '#']).next().unwrap_or(source_uri);
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rsplit_once('.') {
        Some((_, ext))
            if !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext.to_ascii_lowercase()
        }
        _ => "jpg".to_string(),
    }
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::storage::StorageError;
    use tokio::sync::Mutex;

    /// Records storage operations in order.
    #[derive(Debug, PartialEq)]
    enum Op {
        Upload { key: String, content_type: String },
        Remove { keys: Vec<String> },
    }

    #[derive(Default)]
    struct RecordingStore {
        ops: Mutex<Vec<Op>>,
    }

    impl ObjectStore for RecordingStore {
        async fn upload(
            &self,
            key: &str,
            _bytes: Vec<u8>,
            content_type: Option<&str>,
        ) -> Result<(), StorageError> {
            self.ops.lock().await.push(Op::Upload {
                key: key.to_string(),
                content_type: content_type.unwrap_or("").to_string(),
            });
            Ok(())
        }

        async fn remove(&self, keys: &[String]) -> Result<(), StorageError> {
            self.ops.lock().await.push(Op::Remove {
                keys: keys.to_vec(),
            });
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            format!("https://store.test/object/public/covers/{key}")
        }

        fn object_key(&self, public_url: &str) -> Option<String> {
            match public_url.split_once("covers/") {
                Some((_, key)) if !key.is_empty() => Some(key.to_string()),
                _ => None,
            }
        }
    }

    struct StaticFetcher;

    impl ByteFetcher for StaticFetcher {
        async fn fetch(&self, _uri: &str) -> Result<Vec<u8>, FetchError> {
            Ok(b"image bytes".to_vec())
        }
    }

    fn service(store: Arc<RecordingStore>) -> MediaService<RecordingStore, StaticFetcher> {
        MediaService::new(store, Arc::new(StaticFetcher))
    }

    #[tokio::test]
    async fn test_upload_derives_key_and_content_type() {
        let store = Arc::new(RecordingStore::default());
        let media = service(Arc::clone(&store));

        let url = media
            .upload("https://example.com/images/cover.PNG?width=200")
            .await
            .unwrap();

        let ops = store.ops.lock().await;
        let Op::Upload { key, content_type } = &ops[0] else {
            panic!("expected an upload");
        };
        assert!(key.ends_with(".png"), "key was {key}");
        assert!(key.contains('-'));
        assert_eq!(content_type, "image/png");
        assert_eq!(url, store.public_url(key));
    }

    #[tokio::test]
    async fn test_extensionless_source_falls_back_to_jpg() {
        let store = Arc::new(RecordingStore::default());
        let media = service(Arc::clone(&store));

        media
            .upload("https://example.com/camera-roll/IMG0001")
            .await
            .unwrap();

        let ops = store.ops.lock().await;
        let Op::Upload { key, content_type } = &ops[0] else {
            panic!("expected an upload");
        };
        assert!(key.ends_with(".jpg"));
        assert_eq!(content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_delete_foreign_url_is_a_no_op() {
        let store = Arc::new(RecordingStore::default());
        let media = service(Arc::clone(&store));

        media
            .delete("https://cdn.elsewhere.com/assets/cover.png")
            .await
            .unwrap();

        assert!(store.ops.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_uploaded_url_deletes_its_own_key() {
        let store = Arc::new(RecordingStore::default());
        let media = service(Arc::clone(&store));

        let url = media.upload("file:///tmp/cover.webp").await.unwrap();
        media.delete(&url).await.unwrap();

        let ops = store.ops.lock().await;
        let Op::Upload { key, .. } = &ops[0] else {
            panic!("expected an upload");
        };
        assert_eq!(
            ops[1],
            Op::Remove {
                keys: vec![key.clone()]
            }
        );
    }

    #[tokio::test]
    async fn test_replace_deletes_old_before_uploading() {
        let store = Arc::new(RecordingStore::default());
        let media = service(Arc::clone(&store));

        let old = store.public_url("1700000000000-aaaaaaaa.png");
        media
            .replace(Some(&old), "https://example.com/new.png")
            .await
            .unwrap();

        let ops = store.ops.lock().await;
        assert_eq!(
            ops[0],
            Op::Remove {
                keys: vec!["1700000000000-aaaaaaaa.png".to_string()]
            }
        );
        assert!(matches!(&ops[1], Op::Upload { .. }));
    }

    #[tokio::test]
    async fn test_replace_without_old_url_only_uploads() {
        let store = Arc::new(RecordingStore::default());
        let media = service(Arc::clone(&store));

        media
            .replace(None, "https://example.com/new.png")
            .await
            .unwrap();

        let ops = store.ops.lock().await;
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], Op::Upload { .. }));
    }
}
