//! LLM backend selection.
//!
//! A closed registry maps configuration strings to constructors; adding a
//! backend means one arm here and one client module, call sites untouched.

use crate::config::Settings;
use crate::gemini::{self, GeminiClient};
use crate::groq::{self, GroqClient};
use askpipe_core::{Error, LlmBackend, Result};
use std::time::Duration;

/// Low and fixed: answers should be reproducible, not creative.
pub(crate) const TEMPERATURE: f64 = 0.1;
pub(crate) const MAX_COMPLETION_TOKENS: u64 = 2_000;
/// Completions take longer than page fetches; bounded independently.
pub(crate) const LLM_TIMEOUT: Duration = Duration::from_secs(60);

/// The configured model only applies to the configured provider; a flag
/// override selects that backend's own default model instead.
fn model_for(settings: &Settings, provider: &str, default: &str) -> String {
    if settings.llm.provider == provider && !settings.llm.model.trim().is_empty() {
        settings.llm.model.clone()
    } else {
        default.to_string()
    }
}

/// Unknown names fail here, before any credential lookup.
pub fn llm_backend_from_settings(
    client: &reqwest::Client,
    settings: &Settings,
    provider_override: Option<&str>,
) -> Result<Box<dyn LlmBackend>> {
    let provider = provider_override.unwrap_or(settings.llm.provider.as_str());
    match provider {
        "gemini" => {
            let model = model_for(settings, "gemini", gemini::DEFAULT_MODEL);
            Ok(Box::new(GeminiClient::from_env(client.clone(), model)?))
        }
        "groq" => {
            let model = model_for(settings, "groq", groq::DEFAULT_MODEL);
            Ok(Box::new(GroqClient::from_env(client.clone(), model)?))
        }
        other => Err(Error::Config(format!("unknown llm provider: {other}"))),
    }
}
