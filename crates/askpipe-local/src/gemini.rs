use crate::llm::{LLM_TIMEOUT, MAX_COMPLETION_TOKENS, TEMPERATURE};
use askpipe_core::{Error, LlmBackend, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

fn env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn gemini_api_key_from_env() -> Option<String> {
    env("ASKPIPE_GEMINI_API_KEY").or_else(|| env("GEMINI_API_KEY"))
}

fn gemini_endpoint_from_env() -> Option<String> {
    // Override for testing/debugging (do not include secrets here).
    env("ASKPIPE_GEMINI_ENDPOINT")
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn from_env(client: reqwest::Client, model: String) -> Result<Self> {
        let api_key = gemini_api_key_from_env().ok_or_else(|| {
            Error::Config("missing ASKPIPE_GEMINI_API_KEY (or GEMINI_API_KEY)".to_string())
        })?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    fn endpoint(&self) -> String {
        let base = gemini_endpoint_from_env()
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string());
        format!(
            "{}/models/{}:generateContent",
            base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait::async_trait]
impl LlmBackend for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn answer(&self, system: &str, user: &str) -> Result<String> {
        // Gemini has no system role on this endpoint shape; prepend the
        // system instructions to the single user turn.
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: format!("{system}\n\n{user}"),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_COMPLETION_TOKENS,
            },
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&body)
            .timeout(LLM_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::Llm(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Llm(format!("gemini generateContent HTTP {status}")));
        }

        let parsed: GenerateContentResponse =
            resp.json().await.map_err(|e| Error::Llm(e.to_string()))?;
        let text = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        if text.is_empty() {
            return Err(Error::Llm("gemini returned an empty completion".to_string()));
        }
        Ok(text)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    // Absent when the candidate was blocked; treated as empty.
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}
