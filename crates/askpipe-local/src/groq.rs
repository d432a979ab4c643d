use crate::llm::{LLM_TIMEOUT, MAX_COMPLETION_TOKENS, TEMPERATURE};
use askpipe_core::{Error, LlmBackend, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "qwen/qwen3-32b";

fn env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn groq_api_key_from_env() -> Option<String> {
    env("ASKPIPE_GROQ_API_KEY").or_else(|| env("GROQ_API_KEY"))
}

fn groq_endpoint_from_env() -> Option<String> {
    // Override for testing/debugging (do not include secrets here).
    env("ASKPIPE_GROQ_ENDPOINT")
}

/// Groq speaks the OpenAI chat.completions dialect.
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn from_env(client: reqwest::Client, model: String) -> Result<Self> {
        let api_key = groq_api_key_from_env().ok_or_else(|| {
            Error::Config("missing ASKPIPE_GROQ_API_KEY (or GROQ_API_KEY)".to_string())
        })?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    fn endpoint() -> String {
        groq_endpoint_from_env()
            .unwrap_or_else(|| "https://api.groq.com/openai/v1/chat/completions".to_string())
    }
}

#[async_trait::async_trait]
impl LlmBackend for GroqClient {
    fn name(&self) -> &'static str {
        "groq"
    }

    async fn answer(&self, system: &str, user: &str) -> Result<String> {
        let body = ChatCompletionsRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_COMPLETION_TOKENS,
            stream: false,
        };

        let resp = self
            .client
            .post(Self::endpoint())
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&body)
            .timeout(LLM_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::Llm(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Llm(format!("groq chat.completions HTTP {status}")));
        }

        let parsed: ChatCompletionsResponse =
            resp.json().await.map_err(|e| Error::Llm(e.to_string()))?;
        let text = parsed
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(Error::Llm("groq returned an empty completion".to_string()));
        }
        Ok(text)
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionsRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    max_tokens: u64,
    stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct EnvGuard {
        k: &'static str,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn set(k: &'static str, v: &str) -> Self {
            let prev = std::env::var(k).ok();
            std::env::set_var(k, v);
            Self { k, prev }
        }

        fn unset(k: &'static str) -> Self {
            let prev = std::env::var(k).ok();
            std::env::remove_var(k);
            Self { k, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(v) = self.prev.take() {
                std::env::set_var(self.k, v);
            } else {
                std::env::remove_var(self.k);
            }
        }
    }

    #[test]
    fn missing_key_is_a_config_error_at_construction() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let _g1 = EnvGuard::unset("ASKPIPE_GROQ_API_KEY");
        let _g2 = EnvGuard::unset("GROQ_API_KEY");
        let err =
            GroqClient::from_env(reqwest::Client::new(), DEFAULT_MODEL.to_string()).unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn parses_minimal_chat_completions_shape() {
        // The fixture text contains `"#`, so the raw string needs longer guards.
        let js = r###"
        {
          "choices": [
            { "index": 0, "message": { "role": "assistant", "content": "## TL;DR\n- hi" } }
          ],
          "usage": { "total_tokens": 10 }
        }
        "###;
        let parsed: ChatCompletionsResponse = serde_json::from_str(js).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].message.content, "## TL;DR\n- hi");
    }

    #[test]
    fn request_pins_low_temperature_and_no_streaming() {
        let body = ChatCompletionsRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![],
            temperature: TEMPERATURE,
            max_tokens: MAX_COMPLETION_TOKENS,
            stream: false,
        };
        let js = serde_json::to_string(&body).unwrap();
        assert!(js.contains("\"temperature\":0.1"));
        assert!(js.contains("\"stream\":false"));
    }
}
