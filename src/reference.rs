//! Lookup of reference transcriptions by text identifier.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::ReferenceError;

pub type Result<T> = std::result::Result<T, ReferenceError>;

/// Source of reference phonetic transcriptions.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn transcription(&self, text_id: Uuid) -> Result<String>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryReferences {
    texts: HashMap<Uuid, String>,
}

impl InMemoryReferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, text_id: Uuid, transcription: impl Into<String>) -> Option<String> {
        self.texts.insert(text_id, transcription.into())
    }
}

impl FromIterator<(Uuid, String)> for InMemoryReferences {
    fn from_iter<I: IntoIterator<Item = (Uuid, String)>>(iter: I) -> Self {
        Self {
            texts: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ReferenceSource for InMemoryReferences {
    async fn transcription(&self, text_id: Uuid) -> Result<String> {
        self.texts
            .get(&text_id)
            .cloned()
            .ok_or(ReferenceError::NotFound(text_id))
    }
}

/// Text record as returned by the text service and stored on disk.
/// Other fields of the record are ignored.
#[derive(Debug, Deserialize)]
struct TextRecord {
    transcription: String,
}

/// Client of the text-storage service: `GET {base_url}/{text_id}`.
#[derive(Debug, Clone)]
pub struct HttpReferences {
    client: Client,
    base_url: String,
}

impl HttpReferences {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    fn text_url(&self, text_id: Uuid) -> String {
        format!("{}/{}", self.base_url, text_id.hyphenated())
    }
}

#[async_trait]
impl ReferenceSource for HttpReferences {
    async fn transcription(&self, text_id: Uuid) -> Result<String> {
        let url = self.text_url(text_id);
        debug!(%url, "fetching reference text");
        let upstream = |source: reqwest::Error| ReferenceError::Upstream { id: text_id, source };

        let response = self.client.get(&url).send().await.map_err(upstream)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ReferenceError::NotFound(text_id));
        }
        let record: TextRecord = response
            .error_for_status()
            .map_err(upstream)?
            .json()
            .await
            .map_err(upstream)?;
        Ok(record.transcription)
    }
}

/// Reads `<root>/<text_id>.json` records of the form `{"transcription": "..."}`.
#[derive(Debug, Clone)]
pub struct DirectoryReferences {
    root: PathBuf,
}

impl DirectoryReferences {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn record_path(&self, text_id: Uuid) -> PathBuf {
        self.root.join(format!("{}.json", text_id.hyphenated()))
    }
}

#[async_trait]
impl ReferenceSource for DirectoryReferences {
    async fn transcription(&self, text_id: Uuid) -> Result<String> {
        let path = self.record_path(text_id);
        debug!(?path, "loading reference text");
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ReferenceError::NotFound(text_id));
            }
            Err(source) => return Err(ReferenceError::Io { id: text_id, source }),
        };
        let record: TextRecord = serde_json::from_str(&content)
            .map_err(|source| ReferenceError::Malformed { id: text_id, source })?;
        Ok(record.transcription)
    }
}
