//! Uniform byte acquisition
//!
//! Media sources arrive as URIs that may point at a remote host or at a
//! local device resource. Both resolve through the same step so callers
//! never branch on the URI shape.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// A remote source answered with a non-success status.
    #[error("source responded with status {0}")]
    Status(u16),

    /// A remote request never completed.
    #[error("fetch transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A local source could not be read.
    #[error("local source unreadable: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for turning a source URI into bytes.
#[trait_variant::make(ByteFetcher: Send)]
pub trait LocalByteFetcher {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, FetchError>;
}

/// Resolves `http(s)://` URIs over the network and anything else (including
/// `file://`) through the local filesystem.
#[derive(Clone, Default)]
pub struct UriFetcher {
    http: reqwest::Client,
}

impl UriFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ByteFetcher for UriFetcher {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, FetchError> {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            let response = self.http.get(uri).send().await?;
            if !response.status().is_success() {
                return Err(FetchError::Status(response.status().as_u16()));
            }
            return Ok(response.bytes().await?.to_vec());
        }

        let path = uri.strip_prefix("file://").unwrap_or(uri);
        Ok(tokio::fs::read(path).await?)
    }
}
