//! Client configuration
//!
//! Read from `config.yaml` in the working directory, then overridden by
//! `VA_*` environment variables.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Path of the talk endpoint below the configured server
pub const TALK_PATH: &str = "/api/virtual-assistant/v2/talk";

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Pre-shared development identity sent with every request
pub const DEFAULT_IDENTITY: &str = "eyJpZGVudGl0eSI6IHsiYWNjb3VudF9udW1iZXIiOiJhY2NvdW50MTIzIiwib3JnX2lkIjoib3JnMTIzIiwidHlwZSI6IlVzZXIiLCJ1c2VyIjp7ImlzX29yZ19hZG1pbiI6dHJ1ZSwgInVzZXJfaWQiOiIxMjM0NTY3ODkwIiwidXNlcm5hbWUiOiJhc3RybyIsICJpc19pbnRlcm5hbCI6dHJ1ZX0sImludGVybmFsIjp7Im9yZ19pZCI6Im9yZzEyMyJ9fX0=";

/// Fatal startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("fatal error config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("fatal error config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("no server configured (set `server` in the config file or VA_SERVER)")]
    MissingServer,
    #[error("invalid server URL {url:?}: {source}")]
    InvalidServer {
        url: String,
        source: url::ParseError,
    },
    #[error("invalid value {value:?} for {key}: expected a boolean")]
    InvalidFlag { key: &'static str, value: String },
}

/// Debug output flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
    pub include_assistant: bool,
    pub include_response: bool,
}

/// Raw file contents, before overrides
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    server: Option<String>,
    identity: Option<String>,
    log_file: Option<PathBuf>,
    debug: DebugConfig,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Full URL of the talk endpoint
    pub endpoint: Url,
    pub identity: String,
    pub debug: DebugConfig,
    pub log_file: PathBuf,
}

impl Config {
    /// Load from `VA_CONFIG` (or `config.yaml`) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os("VA_CONFIG")
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        Self::load_from(&path, |key| std::env::var(key).ok())
    }

    /// Load from an explicit file with a pluggable environment lookup
    pub fn load_from(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = if raw.trim().is_empty() {
            FileConfig::default()
        } else {
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        };
        Self::resolve(file, env)
    }

    fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let server = env("VA_SERVER")
            .or(file.server)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingServer)?;
        let endpoint = talk_endpoint(&server)?;

        let identity = env("VA_IDENTITY")
            .or(file.identity)
            .unwrap_or_else(|| DEFAULT_IDENTITY.to_string());

        let mut debug = file.debug;
        if let Some(enabled) = env_flag(&env, "VA_DEBUG")? {
            debug.enabled = enabled;
        }
        if let Some(include) = env_flag(&env, "VA_DEBUG_INCLUDE_ASSISTANT")? {
            debug.include_assistant = include;
        }
        if let Some(include) = env_flag(&env, "VA_DEBUG_INCLUDE_RESPONSE")? {
            debug.include_response = include;
        }

        let log_file = env("VA_LOG_FILE")
            .map(PathBuf::from)
            .or(file.log_file)
            .unwrap_or_else(|| std::env::temp_dir().join("virtual-assistant.log"));

        Ok(Self {
            endpoint,
            identity,
            debug,
            log_file,
        })
    }
}

/// `{server}/api/virtual-assistant/v2/talk`, tolerating a trailing slash
pub fn talk_endpoint(server: &str) -> Result<Url, ConfigError> {
    let joined = format!("{}{TALK_PATH}", server.trim().trim_end_matches('/'));
    Url::parse(&joined).map_err(|source| ConfigError::InvalidServer {
        url: server.to_string(),
        source,
    })
}

fn env_flag(
    env: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<bool>, ConfigError> {
    let Some(value) = env(key) else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidFlag { key, value }),
    }
}
