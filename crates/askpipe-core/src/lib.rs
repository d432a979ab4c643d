use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("search failed: {0}")]
    Search(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("llm failed: {0}")]
    Llm(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// One entry from a search engine, in relevance order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: Option<String>,
}

/// Readable text extracted from one search result's page.
///
/// An empty `text` means the fetch or extraction failed; such pages are
/// excluded from context downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    pub url: String,
    pub title: String,
    pub text: String,
}

#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns at most `n` results in the engine's relevance order.
    async fn search(&self, query: &str, n: usize) -> Result<Vec<SearchResult>>;
}

#[async_trait::async_trait]
pub trait LlmBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// One synchronous chat-completion round trip. Backends never surface
    /// failure any other way than `Err`; callers see one uniform contract.
    async fn answer(&self, system: &str, user: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_roundtrips_optional_snippet() {
        let r = SearchResult {
            title: "Example".to_string(),
            url: "https://example.com".to_string(),
            snippet: None,
        };
        let js = serde_json::to_string(&r).unwrap();
        let back: SearchResult = serde_json::from_str(&js).unwrap();
        assert_eq!(back.title, "Example");
        assert!(back.snippet.is_none());
    }

    #[test]
    fn error_display_includes_kind() {
        let e = Error::Config("unknown llm provider: bogus".to_string());
        assert_eq!(
            e.to_string(),
            "configuration error: unknown llm provider: bogus"
        );
    }
}
