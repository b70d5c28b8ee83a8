//! Where canonical content documents come from.
//!
//! In production the stores fetch `GET <base>/content/<name>.json` over HTTP,
//! the same files the storefront serves from its content directory. The CLI
//! reads the directory directly, and tests hand documents in from memory.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use fratelli_core::ContentKind;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Errors fetching a canonical document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("failed to load {file}: HTTP {status}")]
    Status { file: String, status: u16 },

    /// Reading the file from disk failed.
    #[error("failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory source has no such document.
    #[error("no document named {0}")]
    Missing(String),

    /// The base URL could not be joined with the document path.
    #[error("invalid content URL: {0}")]
    Url(#[from] url::ParseError),

    /// The body is not valid JSON for the expected shape.
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Provider of canonical JSON documents.
#[derive(Debug, Clone)]
pub enum ContentSource {
    /// `GET <base_url>/content/<name>.json`.
    Http { client: reqwest::Client, base_url: Url },
    /// `<dir>/<name>.json` on the local filesystem.
    Directory(PathBuf),
    /// Raw JSON bodies keyed by document kind.
    Memory(Arc<HashMap<ContentKind, String>>),
}

impl ContentSource {
    /// HTTP source rooted at the site origin.
    #[must_use]
    pub fn http(base_url: Url) -> Self {
        Self::Http {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Filesystem source reading from a content directory.
    #[must_use]
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        Self::Directory(dir.into())
    }

    /// In-memory source from `(kind, json)` pairs.
    #[must_use]
    pub fn memory(documents: impl IntoIterator<Item = (ContentKind, String)>) -> Self {
        Self::Memory(Arc::new(documents.into_iter().collect()))
    }

    /// Fetch the raw JSON body of a document.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success HTTP status, a
    /// missing file, or a missing in-memory entry.
    #[instrument(skip(self), fields(file = %kind.file_name()))]
    pub async fn fetch_raw(&self, kind: ContentKind) -> Result<String, FetchError> {
        let file = kind.file_name();
        match self {
            Self::Http { client, base_url } => {
                let url = base_url.join(&format!("content/{file}"))?;
                debug!(%url, "Fetching canonical document");

                let response = client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        file,
                        status: status.as_u16(),
                    });
                }
                Ok(response.text().await?)
            }
            Self::Directory(dir) => tokio::fs::read_to_string(dir.join(&file))
                .await
                .map_err(|source| FetchError::Io { file, source }),
            Self::Memory(documents) => documents
                .get(&kind)
                .cloned()
                .ok_or(FetchError::Missing(file)),
        }
    }

    /// Fetch and parse a document into `T`.
    ///
    /// # Errors
    ///
    /// Returns any [`fetch_raw`](Self::fetch_raw) error, or `FetchError::Parse`
    /// if the body does not match `T`.
    pub async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        kind: ContentKind,
    ) -> Result<T, FetchError> {
        let body = self.fetch_raw(kind).await?;
        serde_json::from_str(&body).map_err(|source| FetchError::Parse {
            file: kind.file_name(),
            source,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_source() {
        let source = ContentSource::memory([(ContentKind::Site, "{\"a\":1}".to_string())]);

        let value: serde_json::Value = source.fetch(ContentKind::Site).await.unwrap();
        assert_eq!(value["a"], 1);

        let err = source.fetch_raw(ContentKind::B2b).await.unwrap_err();
        assert!(matches!(err, FetchError::Missing(ref f) if f == "b2b.json"));
    }

    #[tokio::test]
    async fn test_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("promos.json"), "[1, 2]").unwrap();
        let source = ContentSource::directory(dir.path());

        let value: Vec<u8> = source.fetch(ContentKind::Promos).await.unwrap();
        assert_eq!(value, vec![1, 2]);

        let err = source.fetch_raw(ContentKind::Reviews).await.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[tokio::test]
    async fn test_parse_error_names_file() {
        let source = ContentSource::memory([(ContentKind::Contact, "{not json".to_string())]);
        let err = source
            .fetch::<serde_json::Value>(ContentKind::Contact)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("contact.json"));
    }
}
