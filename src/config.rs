//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (or an explicit path), then applies `SPAMCHECK_LOG_LEVEL` and
//! `SPAMCHECK_MODEL_PATH` env overrides.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::classifier::Label;
use crate::error::AppError;
use crate::logger;

/// Default preview truncation length, in characters.
pub const DEFAULT_PREVIEW_LEN: usize = 30;
/// Default number of rows the console shows for `/history`.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Session behaviour.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Characters kept in a record preview before `"..."` is appended.
    pub preview_len: usize,
    /// Rows shown by the console when `/history` has no explicit count.
    pub history_limit: usize,
    /// Record the classifier call duration on each entry.
    pub track_duration: bool,
}

/// `[classifier.lexicon]`
#[derive(Debug, Clone)]
pub struct LexiconConfig {
    /// Model artifact path (already expanded, no `~`).
    pub model_path: PathBuf,
}

/// `[classifier.fixed]`
#[derive(Debug, Clone)]
pub struct FixedConfig {
    pub label: Label,
}

/// Classifier selection.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Active backend (`"lexicon"`, `"fixed"`). Maps to `default` in `[classifier]`.
    pub backend: String,
    pub lexicon: LexiconConfig,
    pub fixed: FixedConfig,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    pub log_level: String,
    pub session: SessionConfig,
    pub classifier: ClassifierConfig,
}

/// Raw TOML shape, `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    app: RawApp,
    #[serde(default)]
    session: RawSession,
    #[serde(default)]
    classifier: RawClassifier,
}

#[derive(Deserialize)]
struct RawApp {
    #[serde(default = "default_app_name")]
    name: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

#[derive(Deserialize)]
struct RawSession {
    #[serde(default = "default_preview_len")]
    preview_len: usize,
    #[serde(default = "default_history_limit")]
    history_limit: usize,
    #[serde(default = "default_true")]
    track_duration: bool,
}

impl Default for RawSession {
    fn default() -> Self {
        Self {
            preview_len: default_preview_len(),
            history_limit: default_history_limit(),
            track_duration: true,
        }
    }
}

#[derive(Deserialize)]
struct RawClassifier {
    /// Maps to `default = "..."` in `[classifier]`.
    #[serde(rename = "default", default = "default_backend")]
    backend: String,
    #[serde(default)]
    lexicon: RawLexicon,
    #[serde(default)]
    fixed: RawFixed,
}

impl Default for RawClassifier {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            lexicon: RawLexicon::default(),
            fixed: RawFixed::default(),
        }
    }
}

#[derive(Deserialize)]
struct RawLexicon {
    #[serde(default = "default_model_path")]
    model_path: String,
}

impl Default for RawLexicon {
    fn default() -> Self {
        Self { model_path: default_model_path() }
    }
}

#[derive(Deserialize)]
struct RawFixed {
    #[serde(default = "default_fixed_label")]
    label: String,
}

impl Default for RawFixed {
    fn default() -> Self {
        Self { label: default_fixed_label() }
    }
}

fn default_app_name() -> String { "spamcheck".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_preview_len() -> usize { DEFAULT_PREVIEW_LEN }
fn default_history_limit() -> usize { DEFAULT_HISTORY_LIMIT }
fn default_backend() -> String { "lexicon".to_string() }
fn default_model_path() -> String { "models/lexicon.json".to_string() }
fn default_fixed_label() -> String { "not_spam".to_string() }

fn default_true() -> bool {
    true
}

/// Load config from `path` (default `config/default.toml`), then apply
/// env-var overrides.
pub fn load(path: Option<&str>) -> Result<Config, AppError> {
    let log_level_override = env::var("SPAMCHECK_LOG_LEVEL").ok();
    let model_path_override = env::var("SPAMCHECK_MODEL_PATH").ok();
    load_from(
        Path::new(path.unwrap_or(DEFAULT_CONFIG_PATH)),
        log_level_override.as_deref(),
        model_path_override.as_deref(),
    )
}

/// Internal loader. Accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    log_level_override: Option<&str>,
    model_path_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let session = parsed.session;
    if session.preview_len == 0 {
        return Err(AppError::Config("[session].preview_len must be greater than 0".into()));
    }
    if session.history_limit == 0 {
        return Err(AppError::Config("[session].history_limit must be greater than 0".into()));
    }

    let fixed_label: Label = parsed
        .classifier
        .fixed
        .label
        .parse()
        .map_err(|e| AppError::Config(format!("[classifier.fixed].label: {e}")))?;

    let log_level = log_level_override.unwrap_or(&parsed.app.log_level).to_string();
    logger::parse_level(&log_level)
        .map_err(|e| AppError::Config(format!("[app].log_level: {e}")))?;

    let model_path = model_path_override.unwrap_or(&parsed.classifier.lexicon.model_path);

    Ok(Config {
        app_name: parsed.app.name,
        log_level,
        session: SessionConfig {
            preview_len: session.preview_len,
            history_limit: session.history_limit,
            track_duration: session.track_duration,
        },
        classifier: ClassifierConfig {
            backend: parsed.classifier.backend,
            lexicon: LexiconConfig { model_path: expand_home(model_path) },
            fixed: FixedConfig { label: fixed_label },
        },
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
