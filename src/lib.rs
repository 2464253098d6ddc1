//! Shared library for the directorio viewer.
//!
//! The crate loads a JSON list of service records, normalizes and indexes
//! them in memory, and renders filterable cards with pre-built action links
//! (call, directions, email, report-an-error form). The binaries under
//! `src/bin/` are thin shells over `DirectoryApp`: they parse flags, load
//! configuration, dispatch commands and print what the app renders.

use anyhow::{Context, Result};
use std::future::Future;

pub mod app;
pub mod config;
pub mod directory;
pub mod filter;
pub mod links;
pub mod loader;
pub mod logging;
pub mod render;
pub mod text;

pub use app::{Command, DirectoryApp, source_from_config};
pub use config::{CONFIG_ENV, DirectoryConfig, is_configured, load_config, load_or_default};
pub use directory::{
    ActivityRule, DirectoryPayload, DirectoryRecord, DirectorySnapshot, DirectoryStore,
    RawRecord, RecordFields, build_search_index, normalize_record, parse_directory_payload,
};
pub use filter::{ALL_CATEGORIES, CategoryFilter, filter_records};
pub use links::{
    DISABLED_LINK, DialLink, IssueFormConfig, ReportField, build_dial_links,
    build_directions_url, build_issue_report_url, build_mail_link,
};
pub use loader::{
    AnySource, DirectoryLoader, DirectorySource, FileSource, HttpSource, LoadError, LoadOutcome,
    LoadReport, LoadStatus,
};
pub use logging::{LogFormat, init_logging};
pub use render::{CardContext, ViewState, render_cards, render_page};
pub use text::{
    clean_phone_for_dialing, escape_markup_text, normalize_for_search, normalize_web_url,
    safe_text, slugify, split_multi_value,
};

/// Drive a future to completion on a single-threaded runtime.
///
/// The viewer is event-driven with one suspension point (the fetch), so the
/// binaries never need a multi-threaded scheduler.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    Ok(runtime.block_on(future))
}

/// Split comma- or whitespace-delimited flag values into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
