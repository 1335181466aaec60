//! Configuration loading, validation, and management for SmallTalk.
//!
//! Loads configuration from `~/.smalltalk/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.smalltalk/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Number of most recent messages (user and bot) kept per dialog
    #[serde(default = "default_max_context_len")]
    pub max_context_len: usize,

    /// Dialog store configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Reply backend configuration
    #[serde(default)]
    pub reply: ReplyConfig,

    /// Profile source configuration
    #[serde(default)]
    pub profiles: ProfileConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_max_context_len() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// How many users' dialogs are kept before the least recently used is dropped
    #[serde(default = "default_max_dialogs")]
    pub max_dialogs: usize,
}

fn default_max_dialogs() -> usize {
    100
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_dialogs: default_max_dialogs(),
        }
    }
}

/// Which reply generator answers free-text messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyBackend {
    /// Repeat the user's last message back (no model needed)
    #[default]
    Echo,
    /// Any OpenAI-compatible `/chat/completions` endpoint
    OpenaiCompat,
}

impl std::str::FromStr for ReplyBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "echo" => Ok(Self::Echo),
            "openai_compat" | "openai" => Ok(Self::OpenaiCompat),
            other => Err(ConfigError::ValidationError(format!(
                "unknown reply backend '{other}' (expected 'echo' or 'openai_compat')"
            ))),
        }
    }
}

impl std::fmt::Display for ReplyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Echo => "echo",
            Self::OpenaiCompat => "openai_compat",
        })
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ReplyConfig {
    #[serde(default)]
    pub backend: ReplyBackend,

    /// API base URL for the OpenAI-compatible backend
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Instruction prepended to every request, ahead of the profile
    #[serde(default = "default_instruction")]
    pub instruction: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_instruction() -> String {
    "Instruction: given a dialog context and related knowledge, you need to response empathically."
        .into()
}
fn default_temperature() -> f32 {
    0.9
}
fn default_max_tokens() -> u32 {
    64
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            backend: ReplyBackend::default(),
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            instruction: default_instruction(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ReplyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyConfig")
            .field("backend", &self.backend)
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("instruction", &self.instruction)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Where new dialog profiles come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    /// Pick one of the profile files in `profiles.dir`
    Static,
    /// Synthesize a persona from built-in word lists
    #[default]
    Random,
}

impl std::str::FromStr for ProfileSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Self::Static),
            "random" => Ok(Self::Random),
            other => Err(ConfigError::ValidationError(format!(
                "unknown profile source '{other}' (expected 'static' or 'random')"
            ))),
        }
    }
}

impl std::fmt::Display for ProfileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Static => "static",
            Self::Random => "random",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub source: ProfileSource,

    /// Directory of profile text files, one profile per file
    #[serde(default = "default_profiles_dir")]
    pub dir: PathBuf,
}

fn default_profiles_dir() -> PathBuf {
    AppConfig::config_dir().join("profiles")
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            source: ProfileSource::default(),
            dir: default_profiles_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Cookie carrying the caller's user id
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Mark the identity cookie `Secure` (HTTPS only)
    #[serde(default = "default_true")]
    pub secure_cookie: bool,
}

fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_cookie_name() -> String {
    "user_id".into()
}
fn default_true() -> bool {
    true
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            cookie_name: default_cookie_name(),
            secure_cookie: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.smalltalk/config.toml).
    ///
    /// Environment overrides:
    /// - `SMALLTALK_API_KEY`, then `OPENAI_API_KEY` (only when no key is configured)
    /// - `SMALLTALK_REPLY_BACKEND`
    /// - `SMALLTALK_MODEL`
    /// - `SMALLTALK_PROFILES_DIR` (implies the static source)
    /// - `SMALLTALK_PROFILE_SOURCE`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if self.reply.api_key.is_none() {
            self.reply.api_key = var("SMALLTALK_API_KEY").or_else(|| var("OPENAI_API_KEY"));
        }

        if let Some(backend) = var("SMALLTALK_REPLY_BACKEND") {
            self.reply.backend = backend.parse()?;
        }

        if let Some(model) = var("SMALLTALK_MODEL") {
            self.reply.model = model;
        }

        if let Some(dir) = var("SMALLTALK_PROFILES_DIR") {
            self.profiles.dir = PathBuf::from(dir);
            self.profiles.source = ProfileSource::Static;
        }

        if let Some(source) = var("SMALLTALK_PROFILE_SOURCE") {
            self.profiles.source = source.parse()?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".smalltalk")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_context_len == 0 {
            return Err(ConfigError::ValidationError(
                "max_context_len must be at least 1".into(),
            ));
        }

        if self.storage.max_dialogs == 0 {
            return Err(ConfigError::ValidationError(
                "storage.max_dialogs must be at least 1".into(),
            ));
        }

        if !(0.0..=2.0).contains(&self.reply.temperature) {
            return Err(ConfigError::ValidationError(
                "reply.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.gateway.cookie_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gateway.cookie_name must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Render the configuration as TOML with the API key removed.
    pub fn to_redacted_toml(&self) -> String {
        let mut config = self.clone();
        if config.reply.api_key.is_some() {
            config.reply.api_key = Some("[REDACTED]".into());
        }
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_context_len: default_max_context_len(),
            storage: StorageConfig::default(),
            reply: ReplyConfig::default(),
            profiles: ProfileConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
