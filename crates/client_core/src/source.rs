//! Task sources: where the controller gets its initial collection from.

use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::Client;
use shared::domain::Task;
use thiserror::Error;
use url::Url;

pub type SourceResult<T> = Result<T, SourceError>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid task source url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("task source request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("task source returned malformed records: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read task file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("task source unavailable: {0}")]
    Unavailable(String),
}

/// Read-only collaborator supplying the full task collection.
///
/// The controller calls [`TaskSource::fetch_all`] once; nothing is ever
/// written back.
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn fetch_all(&self) -> SourceResult<Vec<Task>>;

    /// Short human-readable origin, used in diagnostics.
    fn describe(&self) -> String;
}

/// `GET {base}/todos` returning a JSON array of tasks.
pub struct HttpTaskSource {
    http: Client,
    endpoint: Url,
}

impl HttpTaskSource {
    pub fn new(base_url: &Url, timeout: Option<Duration>) -> SourceResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: todos_endpoint(base_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Joins `todos` onto `base` without dropping its last path segment.
pub fn todos_endpoint(base: &Url) -> SourceResult<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join("todos")?)
}

#[async_trait]
impl TaskSource for HttpTaskSource {
    async fn fetch_all(&self) -> SourceResult<Vec<Task>> {
        let body = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}

/// Local JSON file with the same shape the remote API serves.
pub struct JsonFileTaskSource {
    path: PathBuf,
}

impl JsonFileTaskSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TaskSource for JsonFileTaskSource {
    async fn fetch_all(&self) -> SourceResult<Vec<Task>> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_slice(&raw)?)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// In-memory source with a fixed answer. Counts how often it was asked.
pub struct StaticTaskSource {
    answer: Result<Vec<Task>, String>,
    fetches: AtomicUsize,
}

impl StaticTaskSource {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            answer: Ok(tasks),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            answer: Err(reason.into()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskSource for StaticTaskSource {
    async fn fetch_all(&self) -> SourceResult<Vec<Task>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().map_err(SourceError::Unavailable)
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
