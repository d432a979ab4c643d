use crate::extract;
use askpipe_core::{PageContent, SearchResult};
use std::time::Duration;

/// Per-page extraction ceiling, independent of the total context budget.
pub const MAX_PAGE_CHARS: usize = 4_000;

/// Fetches search-result pages and assembles budget-bounded context.
///
/// Fetching is best-effort: a page that cannot be fetched or extracted
/// contributes an empty text and is dropped from context, never an error.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Raw HTML for `url`, or an empty string on any failure.
    pub async fn fetch_page(&self, url: &str) -> String {
        let parsed = match url::Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                tracing::debug!(url, error = %e, "invalid page url");
                return String::new();
            }
        };
        let resp = match self
            .client
            .get(parsed)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(url, error = %e, "page fetch failed");
                return String::new();
            }
        };
        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(url, %status, "page fetch returned non-success");
            return String::new();
        }
        resp.text().await.unwrap_or_default()
    }

    /// Fetch + extract one result, truncated to [`MAX_PAGE_CHARS`].
    pub async fn page_content(&self, result: &SearchResult) -> PageContent {
        let html = self.fetch_page(&result.url).await;
        let text = if html.is_empty() {
            String::new()
        } else {
            extract::truncate_chars(&extract::extract_main_text(&html), MAX_PAGE_CHARS)
        };
        PageContent {
            url: result.url.clone(),
            title: result.title.clone(),
            text,
        }
    }

    /// Greedy, order-preserving accumulation under a total character budget.
    ///
    /// Pages with empty text are skipped without consuming budget. The first
    /// page whose text would overflow the budget stops the scan outright; a
    /// smaller later page is never considered in its place.
    pub async fn gather_context(
        &self,
        results: &[SearchResult],
        max_total_chars: usize,
    ) -> Vec<PageContent> {
        let mut pages = Vec::new();
        let mut used = 0usize;
        for result in results {
            let page = self.page_content(result).await;
            let len = page.text.chars().count();
            if len == 0 {
                continue;
            }
            if used + len > max_total_chars {
                break;
            }
            used += len;
            pages.push(page);
        }
        pages
    }
}
