//! # Application Configuration
//!
//! This module defines the configuration structure for the `spotter-server` and
//! provides the logic for loading it from a `config.yml` file and environment
//! variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use spotter::constants::{
    ALLOWED_EXTENSIONS, DEFAULT_MODEL, DEFAULT_OLLAMA_GENERATE_URL, DEFAULT_OLLAMA_TAGS_URL,
    DEFAULT_UPLOAD_DIR, MAX_UPLOAD_BYTES,
};
use std::env;
use std::fs;
use std::sync::LazyLock;
use tracing::info;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").expect("valid env var regex"));

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory uploaded images are written to. Loaded from `UPLOAD_DIR` env var.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Lowercase file extensions `/upload` accepts.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Where the Ollama inference service lives and how to talk to it.
#[derive(Debug, Deserialize, Clone)]
pub struct OllamaConfig {
    #[serde(default = "default_generate_url")]
    pub generate_url: String,
    #[serde(default = "default_tags_url")]
    pub tags_url: String,
    /// Timeout for the model listing call. Generation has none.
    #[serde(default = "default_list_timeout_secs")]
    pub list_timeout_secs: u64,
    /// Model used when an `/analyze` request does not name one.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Models reported by `/models` when Ollama cannot be asked.
    #[serde(default = "default_fallback_models")]
    pub fallback_models: Vec<String>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            generate_url: default_generate_url(),
            tags_url: default_tags_url(),
            list_timeout_secs: default_list_timeout_secs(),
            default_model: default_model(),
            fallback_models: default_fallback_models(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions(),
            ollama: OllamaConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    5000
}

fn default_upload_dir() -> String {
    DEFAULT_UPLOAD_DIR.to_string()
}

fn default_max_upload_bytes() -> usize {
    MAX_UPLOAD_BYTES
}

fn default_allowed_extensions() -> Vec<String> {
    ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_generate_url() -> String {
    DEFAULT_OLLAMA_GENERATE_URL.to_string()
}

fn default_tags_url() -> String {
    DEFAULT_OLLAMA_TAGS_URL.to_string()
}

fn default_list_timeout_secs() -> u64 {
    5
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_fallback_models() -> Vec<String> {
    vec![DEFAULT_MODEL.to_string()]
}

// Reads a file and substitutes `${VAR}` references from the environment.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let expanded = ENV_VAR_RE.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// - Every key has a default, so the server runs without any `config.yml`.
/// - An explicit `config_path_override` must exist; the default
///   `config.yml` next to the crate is optional.
/// - Top-level keys like `port` and `upload_dir` are overridden by `PORT` and `UPLOAD_DIR`.
/// - Nested keys are overridden by `SPOTTER_...` variables (e.g., `SPOTTER_OLLAMA__TAGS_URL`).
/// - The legacy `OLLAMA_API_URL` and `OLLAMA_LIST_MODELS_URL` variables win over everything.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            let default_path = format!("{}/config.yml", env!("CARGO_MANIFEST_DIR"));
            if let Some(content) = read_and_substitute(&default_path)? {
                info!("Loading user-defined configuration from '{default_path}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            }
        }
    }

    let settings = builder
        .add_source(Environment::default().try_parsing(true))
        .add_source(
            Environment::with_prefix("SPOTTER")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    if let Some(url) = non_empty_env("OLLAMA_API_URL") {
        config.ollama.generate_url = url;
    }
    if let Some(url) = non_empty_env("OLLAMA_LIST_MODELS_URL") {
        config.ollama.tags_url = url;
    }
    config.allowed_extensions = config
        .allowed_extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    Ok(config)
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
