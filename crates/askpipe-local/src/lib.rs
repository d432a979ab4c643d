//! Local implementations for the askpipe pipeline: DuckDuckGo search,
//! page fetch + extraction, context assembly, prompts, and LLM clients.

use askpipe_core::{Error, Result};
use std::time::Duration;

pub mod config;
pub mod extract;
pub mod fetch;
pub mod gemini;
pub mod groq;
pub mod llm;
pub mod prompts;
pub mod search;

/// Shared HTTP client for every network call in one invocation.
///
/// The 30s client timeout is a hard cap so a stalled DNS/TLS handshake or
/// body read cannot hang an invocation; per-request timeouts (from
/// `Settings.behavior.timeout_seconds`) override it per call.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent("askpipe/0.1")
        .redirect(reqwest::redirect::Policy::limited(10))
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| Error::Fetch(e.to_string()))
}
