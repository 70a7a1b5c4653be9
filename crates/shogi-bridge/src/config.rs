//! Bridge configuration.
//!
//! Settings come from an optional `shogi.toml` and are then overridden by
//! environment variables:
//!
//! - `YANEURAOU_PATH` or `SHOGI_ENGINE_PATH`: engine executable
//! - `USI_EVAL_ENABLED`: `true` or `1` enables evaluation requests

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "shogi.toml";

/// Environment variables naming the engine, in priority order.
pub const ENGINE_PATH_VARS: [&str; 2] = ["YANEURAOU_PATH", "SHOGI_ENGINE_PATH"];

pub const EVAL_ENABLED_VAR: &str = "USI_EVAL_ENABLED";

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Engine bridge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Path to the USI engine executable. Unset means no bridge.
    pub engine_path: Option<PathBuf>,
    /// Whether evaluation requests may start the engine.
    pub eval_enabled: bool,
    /// Deadline for `usiok` and `readyok`.
    pub handshake_timeout_ms: u64,
    /// Added to the movetime to get the `bestmove` deadline.
    pub bestmove_grace_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            engine_path: None,
            eval_enabled: false,
            handshake_timeout_ms: 8_000,
            bestmove_grace_ms: 8_000,
        }
    }
}

impl BridgeConfig {
    /// Loads `path` (or `shogi.toml` if present) and applies the process
    /// environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(Path::new(CONFIG_FILE))?,
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Parses a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Applies environment overrides read through `var`.
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = ENGINE_PATH_VARS
            .iter()
            .filter_map(|key| var(key))
            .find(|v| !v.trim().is_empty())
        {
            self.engine_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(flag) = var(EVAL_ENABLED_VAR) {
            self.eval_enabled = matches!(flag.trim(), "true" | "1");
        }
        self
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }

    pub fn bestmove_grace(&self) -> Duration {
        Duration::from_millis(self.bestmove_grace_ms)
    }
}
