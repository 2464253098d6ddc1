//! Runtime configuration for the directory viewer.
//!
//! Configuration lives in a JSON file validated against
//! `schema/directory_config.schema.json` before deserialization. The path
//! comes from `--config`, else `DIRECTORIO_CONFIG`; with neither, defaults
//! apply and the endpoint is left unconfigured.
//!
//! Template placeholders (`PEGA_AQUI_…`, `ENTRY_ID_…`) shipped in
//! `config/directorio.example.json` count as "not configured".

use crate::directory::{ActivityRule, DEFAULT_ACTIVE_VALUES};
use crate::links::IssueFormConfig;
use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "DIRECTORIO_CONFIG";

const CONFIG_SCHEMA: &str = include_str!("../schema/directory_config.schema.json");
const PLACEHOLDER_PREFIXES: &[&str] = &["PEGA_AQUI_", "ENTRY_ID_"];
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Whether a configured string carries a real value.
pub fn is_configured(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && !PLACEHOLDER_PREFIXES
            .iter()
            .any(|prefix| trimmed.starts_with(prefix))
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_active_values() -> Vec<String> {
    DEFAULT_ACTIVE_VALUES.iter().map(|v| v.to_string()).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Endpoint, activity rule and report-form settings.
pub struct DirectoryConfig {
    #[serde(default)]
    pub directory_json_url: Option<String>,
    /// Public URL of the page showing the directory, sent with reports.
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_active_values")]
    pub active_values: Vec<String>,
    #[serde(default)]
    pub issue_form: IssueFormConfig,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            directory_json_url: None,
            page_url: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            active_values: default_active_values(),
            issue_form: IssueFormConfig::default(),
        }
    }
}

impl DirectoryConfig {
    /// Directory endpoint, if one is really configured.
    pub fn endpoint(&self) -> Option<&str> {
        self.directory_json_url
            .as_deref()
            .map(str::trim)
            .filter(|url| is_configured(url))
    }

    pub fn activity_rule(&self) -> ActivityRule {
        ActivityRule::from_values(&self.active_values)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn page_url(&self) -> &str {
        self.page_url.as_deref().unwrap_or_default()
    }
}

/// Parse and validate configuration from JSON text.
pub fn parse_config(raw: &str, label: &str) -> Result<DirectoryConfig> {
    let value: Value =
        serde_json::from_str(raw).with_context(|| format!("parsing config {label}"))?;
    validate_against_schema(&value, label)?;
    serde_json::from_value(value).with_context(|| format!("decoding config {label}"))
}

/// Read, validate and decode a config file.
pub fn load_config(path: &Path) -> Result<DirectoryConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&raw, &path.display().to_string())
}

/// Pick the config path: explicit flag first, then `DIRECTORIO_CONFIG`.
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }
    env::var(CONFIG_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

/// Load the resolved config file, or defaults when none is named.
pub fn load_or_default(cli_path: Option<&Path>) -> Result<DirectoryConfig> {
    match resolve_config_path(cli_path) {
        Some(path) => load_config(&path),
        None => Ok(DirectoryConfig::default()),
    }
}

fn validate_against_schema(value: &Value, label: &str) -> Result<()> {
    let schema: Value =
        serde_json::from_str(CONFIG_SCHEMA).context("parsing embedded config schema")?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| anyhow!("compiling config schema: {err}"))?;
    if let Err(errors) = compiled.validate(value) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!("config {label} failed schema validation:\n{details}");
    }
    Ok(())
}
