use crate::config::Settings;
use askpipe_core::{Error, Result, SearchProvider, SearchResult};
use scraper::{Html, Selector};
use std::time::Duration;

fn duckduckgo_endpoint_from_env() -> Option<String> {
    std::env::var("ASKPIPE_DUCKDUCKGO_ENDPOINT")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn norm_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The HTML (no-JS) DuckDuckGo frontend, parsed with CSS selectors.
#[derive(Debug, Clone)]
pub struct DuckDuckGoProvider {
    client: reqwest::Client,
    timeout: Duration,
}

impl DuckDuckGoProvider {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn endpoint() -> String {
        duckduckgo_endpoint_from_env()
            .unwrap_or_else(|| "https://html.duckduckgo.com/html/".to_string())
    }
}

/// Result links come wrapped in a `/l/?uddg=<percent-encoded>` redirect;
/// unwrap to the destination URL. Direct http(s) links pass through.
fn resolve_result_url(href: &str) -> Option<String> {
    let absolute = if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        href.to_string()
    };
    let parsed = url::Url::parse(&absolute).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    if let Some((_, dest)) = parsed.query_pairs().find(|(k, _)| k == "uddg") {
        let dest = dest.into_owned();
        return url::Url::parse(&dest).ok().map(|_| dest);
    }
    Some(absolute)
}

fn parse_results(html: &str, n: usize) -> Vec<SearchResult> {
    let (Ok(result_sel), Ok(title_sel), Ok(snippet_sel)) = (
        Selector::parse("div.result"),
        Selector::parse("a.result__a"),
        Selector::parse(".result__snippet"),
    ) else {
        return Vec::new();
    };

    let doc = Html::parse_document(html);
    let mut out = Vec::new();
    for el in doc.select(&result_sel) {
        if out.len() >= n {
            break;
        }
        let Some(anchor) = el.select(&title_sel).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_result_url(href) else {
            continue;
        };
        let title = norm_ws(&anchor.text().collect::<String>());
        if title.is_empty() {
            continue;
        }
        let snippet = el
            .select(&snippet_sel)
            .next()
            .map(|s| norm_ws(&s.text().collect::<String>()))
            .filter(|s| !s.is_empty());
        out.push(SearchResult {
            title,
            url,
            snippet,
        });
    }
    out
}

#[async_trait::async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, n: usize) -> Result<Vec<SearchResult>> {
        let resp = self
            .client
            .get(Self::endpoint())
            .query(&[("q", query)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::Search(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Search(format!("duckduckgo search HTTP {status}")));
        }
        let body = resp.text().await.map_err(|e| Error::Search(e.to_string()))?;
        Ok(parse_results(&body, n))
    }
}

/// Closed registry: configuration string -> provider. Unknown names are a
/// fatal configuration error, raised before any network activity.
pub fn search_provider_from_settings(
    client: &reqwest::Client,
    settings: &Settings,
) -> Result<Box<dyn SearchProvider>> {
    match settings.search.provider.as_str() {
        "duckduckgo" => Ok(Box::new(DuckDuckGoProvider::new(
            client.clone(),
            Duration::from_secs(settings.behavior.timeout_seconds),
        ))),
        other => Err(Error::Config(format!("unknown search provider: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::Router;
    use std::net::SocketAddr;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const FIXTURE: &str = r#"
    <html><body>
      <div class="result results_links">
        <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Flopa&rut=abc">What is LOPA?</a>
        <div class="result__snippet">Layer of protection analysis.</div>
      </div>
      <div class="result results_links">
        <a class="result__a" href="https://direct.example.org/page">  Direct   link  </a>
      </div>
      <div class="result">
        <a class="result__a" href="javascript:void(0)">Not a web link</a>
      </div>
      <div class="result">
        <div class="result__snippet">No anchor here.</div>
      </div>
    </body></html>
    "#;

    #[test]
    fn parses_titles_urls_and_snippets_in_page_order() {
        let rs = parse_results(FIXTURE, 10);
        assert_eq!(rs.len(), 2);
        assert_eq!(rs[0].title, "What is LOPA?");
        assert_eq!(rs[0].url, "https://example.com/lopa");
        assert_eq!(rs[0].snippet.as_deref(), Some("Layer of protection analysis."));
        assert_eq!(rs[1].title, "Direct link");
        assert_eq!(rs[1].url, "https://direct.example.org/page");
        assert!(rs[1].snippet.is_none());
    }

    #[test]
    fn result_count_is_capped_at_n() {
        let rs = parse_results(FIXTURE, 1);
        assert_eq!(rs.len(), 1);
        assert_eq!(rs[0].url, "https://example.com/lopa");
    }

    #[test]
    fn redirect_urls_are_unwrapped() {
        assert_eq!(
            resolve_result_url("//duckduckgo.com/l/?uddg=https%3A%2F%2Fa.example%2Fx%3Fy%3D1&rut=zz").as_deref(),
            Some("https://a.example/x?y=1")
        );
        assert_eq!(
            resolve_result_url("https://plain.example/").as_deref(),
            Some("https://plain.example/")
        );
        assert!(resolve_result_url("javascript:void(0)").is_none());
        assert!(resolve_result_url("not a url").is_none());
    }

    #[test]
    fn unknown_provider_name_is_a_config_error() {
        let mut settings = Settings::default();
        settings.search.provider = "bing".to_string();
        let client = reqwest::Client::new();
        // `.err()` because the Ok side is a trait object without Debug.
        let err = search_provider_from_settings(&client, &settings).err().unwrap();
        assert!(err.to_string().contains("unknown search provider: bing"));
    }

    #[tokio::test]
    #[allow(clippy::await_holding_lock)]
    async fn search_parses_a_served_result_page() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let app = Router::new().route("/html/", get(|| async { FIXTURE }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        std::env::set_var(
            "ASKPIPE_DUCKDUCKGO_ENDPOINT",
            format!("http://{addr}/html/"),
        );
        let provider =
            DuckDuckGoProvider::new(reqwest::Client::new(), Duration::from_secs(5));
        let rs = provider.search("what is lopa", 5).await.unwrap();
        std::env::remove_var("ASKPIPE_DUCKDUCKGO_ENDPOINT");

        assert_eq!(rs.len(), 2);
        assert_eq!(rs[0].url, "https://example.com/lopa");
    }
}
