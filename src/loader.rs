//! Fetch-and-replace cycle for the directory.
//!
//! A `DirectorySource` produces the raw JSON payload; `DirectoryLoader`
//! filters, normalizes and swaps it into the store. Every load takes a
//! ticket and only the most recent ticket may write, so a slow response to
//! an older request can never overwrite a newer one. Failures never escape:
//! they clear the store and come back as `LoadOutcome::Failed`.

use crate::directory::{ActivityRule, DirectoryStore, parse_directory_payload};
use serde_json::Value;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a load produced no data.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("falta configurar la URL JSON del directorio")]
    ConfigMissing,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Error HTTP {status}")]
    HttpStatus { status: u16 },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Somewhere a directory payload can be read from.
pub trait DirectorySource {
    /// Short human description used in logs.
    fn describe(&self) -> String;

    /// Read the raw payload; shape validation happens later.
    fn fetch(&self) -> impl Future<Output = Result<Value, LoadError>>;
}

/// Remote JSON endpoint read with a single GET.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DirectorySource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Value, LoadError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Local JSON file holding a payload in the endpoint's format.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DirectorySource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Value, LoadError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

/// Either built-in source, chosen at startup by the binaries.
#[derive(Debug, Clone)]
pub enum AnySource {
    Http(HttpSource),
    File(FileSource),
}

impl DirectorySource for AnySource {
    fn describe(&self) -> String {
        match self {
            AnySource::Http(source) => source.describe(),
            AnySource::File(source) => source.describe(),
        }
    }

    async fn fetch(&self) -> Result<Value, LoadError> {
        match self {
            AnySource::Http(source) => source.fetch().await,
            AnySource::File(source) => source.fetch().await,
        }
    }
}

/// Result of one load call.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The store now holds `count` records.
    Applied {
        count: usize,
        last_updated: Option<String>,
    },
    /// The store was cleared.
    Failed(LoadError),
    /// A newer load started before this one finished; the store was not touched.
    Superseded,
}

#[derive(Debug)]
pub struct LoadReport {
    pub ticket: u64,
    pub outcome: LoadOutcome,
}

/// User-facing load state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded {
        count: usize,
    },
    Failed {
        reason: String,
    },
    NotConfigured,
}

impl LoadStatus {
    pub fn message(&self) -> String {
        match self {
            LoadStatus::Idle => String::new(),
            LoadStatus::Loading => "Cargando directorio…".to_string(),
            LoadStatus::Loaded { count } => format!("✅ Directorio cargado: {count} entradas."),
            LoadStatus::Failed { reason } => {
                format!("❌ No se pudo cargar el directorio ({reason}).")
            }
            LoadStatus::NotConfigured => {
                "⚠️ Falta configurar la URL JSON del directorio.".to_string()
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadStatus::Failed { .. } | LoadStatus::NotConfigured)
    }
}

/// Serializes loads from one source into a store, last request wins.
pub struct DirectoryLoader<S> {
    source: S,
    rule: ActivityRule,
    latest: AtomicU64,
}

impl<S: DirectorySource> DirectoryLoader<S> {
    pub fn new(source: S, rule: ActivityRule) -> Self {
        Self {
            source,
            rule,
            latest: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch, filter and normalize, then replace the store if still current.
    pub async fn load(&self, store: &Mutex<DirectoryStore>) -> LoadReport {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            "[directorio:load] request {ticket}: fetching {}",
            self.source.describe()
        );
        let fetched = self.source.fetch().await;

        let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
        if self.latest.load(Ordering::SeqCst) != ticket {
            debug!("[directorio:load] request {ticket} superseded; response discarded");
            return LoadReport {
                ticket,
                outcome: LoadOutcome::Superseded,
            };
        }

        let outcome = match fetched {
            Ok(payload) => {
                let parsed = parse_directory_payload(&payload, &self.rule);
                let count = parsed.records.len();
                info!(
                    "[directorio:load] request {ticket}: {count} active of {} records",
                    parsed.total_raw
                );
                guard.replace_snapshot(parsed.records);
                LoadOutcome::Applied {
                    count,
                    last_updated: parsed.last_updated,
                }
            }
            Err(err) => {
                warn!(
                    "[directorio:load] request {ticket} from {} failed: {err}",
                    self.source.describe()
                );
                guard.clear();
                LoadOutcome::Failed(err)
            }
        };
        LoadReport { ticket, outcome }
    }
}
