//! The query-answering pipeline: search -> per-page extraction under a
//! character budget -> prompt assembly -> one LLM call -> rendering.

use crate::render;
use anyhow::Result;
use askpipe_core::{PageContent, SearchResult};
use askpipe_local::config::Settings;
use askpipe_local::fetch::PageFetcher;
use askpipe_local::llm::llm_backend_from_settings;
use askpipe_local::prompts::{build_user_prompt, SYSTEM_PROMPT};
use askpipe_local::search::search_provider_from_settings;
use std::time::Duration;

pub struct QueryRequest<'a> {
    pub query: &'a str,
    pub num_results: Option<usize>,
    pub use_web: bool,
    pub debug: bool,
    pub as_json: bool,
    pub llm_provider: Option<&'a str>,
}

pub async fn handle_query(req: &QueryRequest<'_>, settings: &Settings) -> Result<String> {
    let client = askpipe_local::http_client()?;

    // Configuration errors (unknown names, missing credentials) surface
    // here, before any network activity.
    let llm = llm_backend_from_settings(&client, settings, req.llm_provider)?;

    let mut search_results: Vec<SearchResult> = Vec::new();
    let mut pages: Vec<PageContent> = Vec::new();

    if req.use_web {
        let provider = search_provider_from_settings(&client, settings)?;
        let n = req.num_results.unwrap_or(settings.search.num_results);
        match provider.search(req.query, n).await {
            Ok(results) => {
                let fetcher = PageFetcher::new(
                    client.clone(),
                    Duration::from_secs(settings.behavior.timeout_seconds),
                );
                pages = fetcher
                    .gather_context(&results, settings.llm.max_context_tokens)
                    .await;
                search_results = results;
            }
            // Search failure is recoverable: continue LLM-only.
            Err(e) => {
                tracing::warn!(error = %e, "web search failed, falling back to LLM-only");
                if req.debug {
                    eprintln!("Web search failed, falling back to LLM-only: {e}");
                }
            }
        }
    }

    if req.debug {
        println!("{}", render::debug_report(&search_results, &pages));
        println!();
    }

    let user_prompt = build_user_prompt(req.query, &pages);
    let answer_markdown = llm.answer(SYSTEM_PROMPT, &user_prompt).await?;

    if req.as_json {
        Ok(render::to_json(&answer_markdown, &search_results)?)
    } else {
        Ok(render::render_markdown(&answer_markdown))
    }
}
