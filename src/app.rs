//! Application context: the store plus the current query, category and
//! load status, driven by explicit commands.
//!
//! `dispatch` applies one command and returns the recomputed view. Refresh
//! is the only command that suspends.

use crate::config::DirectoryConfig;
use crate::directory::{DirectoryRecord, DirectoryStore};
use crate::filter::{CategoryFilter, filter_records};
use crate::links::IssueFormConfig;
use crate::loader::{
    AnySource, DirectoryLoader, DirectorySource, FileSource, HttpSource, LoadError, LoadOutcome,
    LoadStatus,
};
use crate::render::{CardContext, ViewState, last_updated_label, render_cards};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// Input events from the UI layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    SetQuery(String),
    SetCategory(CategoryFilter),
    TriggerRefresh,
}

/// Pick the payload source: a local `--input` file wins over the configured endpoint.
pub fn source_from_config(
    config: &DirectoryConfig,
    input: Option<&Path>,
) -> Result<AnySource, LoadError> {
    if let Some(path) = input {
        return Ok(AnySource::File(FileSource::new(path)));
    }
    let endpoint = config.endpoint().ok_or(LoadError::ConfigMissing)?;
    Ok(AnySource::Http(HttpSource::new(
        endpoint,
        config.request_timeout(),
    )?))
}

/// State behind one directory page.
pub struct DirectoryApp<S> {
    loader: Result<DirectoryLoader<S>, LoadError>,
    store: Mutex<DirectoryStore>,
    query: String,
    category: CategoryFilter,
    status: LoadStatus,
    last_updated: Option<String>,
    form: IssueFormConfig,
    page_url: String,
}

impl DirectoryApp<AnySource> {
    /// Wire an app from configuration and an optional local payload file.
    pub fn from_config(config: &DirectoryConfig, input: Option<&Path>) -> Self {
        let loader = source_from_config(config, input)
            .map(|source| DirectoryLoader::new(source, config.activity_rule()));
        Self::new(loader, config.issue_form.clone(), config.page_url())
    }
}

impl<S: DirectorySource> DirectoryApp<S> {
    pub fn new(
        loader: Result<DirectoryLoader<S>, LoadError>,
        form: IssueFormConfig,
        page_url: impl Into<String>,
    ) -> Self {
        Self {
            loader,
            store: Mutex::new(DirectoryStore::new()),
            query: String::new(),
            category: CategoryFilter::All,
            status: LoadStatus::Idle,
            last_updated: None,
            form,
            page_url: page_url.into(),
        }
    }

    /// Apply one command and return the resulting view.
    pub async fn dispatch(&mut self, command: Command) -> ViewState {
        debug!("[directorio:app] dispatch {command:?}");
        match command {
            Command::SetQuery(query) => self.query = query,
            Command::SetCategory(category) => self.category = category,
            Command::TriggerRefresh => self.refresh().await,
        }
        self.view()
    }

    /// Reload the directory, replacing or clearing the store.
    pub async fn refresh(&mut self) {
        let loader = match &self.loader {
            Ok(loader) => loader,
            Err(err) => {
                self.status = match err {
                    LoadError::ConfigMissing => LoadStatus::NotConfigured,
                    other => LoadStatus::Failed {
                        reason: other.to_string(),
                    },
                };
                self.last_updated = None;
                self.lock_store().clear();
                return;
            }
        };

        self.status = LoadStatus::Loading;
        let report = loader.load(&self.store).await;
        match report.outcome {
            LoadOutcome::Applied {
                count,
                last_updated,
            } => {
                self.status = LoadStatus::Loaded { count };
                self.last_updated = last_updated;
                self.keep_category_if_present();
            }
            LoadOutcome::Failed(err) => {
                self.status = LoadStatus::Failed {
                    reason: err.to_string(),
                };
                self.last_updated = None;
            }
            LoadOutcome::Superseded => {}
        }
    }

    fn keep_category_if_present(&mut self) {
        if let CategoryFilter::Exact(category) = &self.category {
            if !self.lock_store().has_category(category) {
                info!("[directorio:app] category '{category}' no longer present; showing all");
                self.category = CategoryFilter::All;
            }
        }
    }

    fn lock_store(&self) -> std::sync::MutexGuard<'_, DirectoryStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn form(&self) -> &IssueFormConfig {
        &self.form
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    /// Run `f` over the records passing the current filters, in snapshot order.
    pub fn with_visible<R>(&self, f: impl FnOnce(&[&DirectoryRecord]) -> R) -> R {
        let snapshot = self.lock_store().current_snapshot();
        let visible = filter_records(&snapshot, &self.category, &self.query);
        f(&visible)
    }

    /// Recompute everything the page shows.
    pub fn view(&self) -> ViewState {
        let (categories, total) = {
            let store = self.lock_store();
            (store.current_categories().to_vec(), store.len())
        };
        let ctx = CardContext {
            form: &self.form,
            page_url: &self.page_url,
        };
        let (visible_names, markup) = self.with_visible(|records| {
            let names: Vec<String> = records.iter().map(|r| r.name().to_string()).collect();
            (names, render_cards(records, ctx))
        });
        ViewState {
            status: self.status.message(),
            status_is_error: self.status.is_error(),
            last_updated: last_updated_label(self.last_updated.as_deref()),
            categories,
            selected_category: self.category.clone(),
            query: self.query.clone(),
            total,
            visible: visible_names.len(),
            visible_names,
            markup,
        }
    }
}
