//! Process-wide settings: a TOML file with env overrides.
//!
//! The file lives at `$ASKPIPE_CONFIG`, else `~/.askpipe/config.toml`.
//! A missing file is not an error; defaults apply. Settings are loaded
//! once per invocation and passed by parameter, never looked up globally.

use askpipe_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchConfig,
    pub llm: LlmConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search engine name; `duckduckgo` is the only built-in.
    pub provider: String,
    /// Result count when the caller does not pass `-n`.
    pub num_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: "duckduckgo".to_string(),
            num_results: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend name: `gemini` or `groq`.
    pub provider: String,
    /// Model for the configured provider. `ASKPIPE_LLM_MODEL` overrides.
    pub model: String,
    /// Total context budget, counted in characters of extracted page text.
    pub max_context_tokens: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: crate::gemini::DEFAULT_MODEL.to_string(),
            max_context_tokens: 8_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub use_web_by_default: bool,
    /// Per-request timeout for search and page fetches.
    pub timeout_seconds: u64,
    /// Accepted so existing config files parse; no cache exists.
    pub cache_enabled: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            use_web_by_default: true,
            timeout_seconds: 20,
            cache_enabled: true,
        }
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(p) = env("ASKPIPE_CONFIG") {
        return Some(PathBuf::from(p));
    }
    dirs::home_dir().map(|h| h.join(".askpipe").join("config.toml"))
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    fn load_from(path: Option<PathBuf>) -> Result<Self> {
        let mut settings = match path {
            Some(p) if p.exists() => {
                let raw = std::fs::read_to_string(&p)
                    .map_err(|e| Error::Config(format!("read {}: {e}", p.display())))?;
                toml::from_str(&raw)
                    .map_err(|e| Error::Config(format!("parse {}: {e}", p.display())))?
            }
            _ => Self::default(),
        };
        if let Some(model) = env("ASKPIPE_LLM_MODEL") {
            settings.llm.model = model;
        }
        Ok(settings)
    }
}
