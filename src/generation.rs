use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ScoutConfig;
use crate::http_client::http_client;

const HEALTH_TIMEOUT_SECS: u64 = 5;
const EMPTY_REPLY: &str = "No response generated";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.85,
            top_k: 35,
            max_output_tokens: 900,
        }
    }
}

/// Failure of the answer service. `Display` is the text shown to the user.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Error: LLM returned status {0}")]
    Status(u16),
    #[error("Error calling LLM: {0}")]
    Transport(String),
    #[error("Error calling LLM: unreadable response ({0})")]
    Decode(String),
}

/// Turns a rendered prompt into answer text. One attempt per call, no retries.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    num_predict: u32,
    stop: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Client for an Ollama-compatible `/api/generate` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    timeout: Duration,
    sampling: SamplingConfig,
}

impl OllamaClient {
    pub fn new(cfg: &ScoutConfig) -> Self {
        Self {
            base_url: cfg.llm_url.trim_end_matches('/').to_string(),
            model: cfg.llm_model.clone(),
            timeout: cfg.llm_timeout,
            sampling: cfg.sampling,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Quick check of `/api/tags`; false on any transport error or non-200.
    pub fn is_available(&self) -> bool {
        let Ok(client) = http_client() else {
            return false;
        };
        match client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .send()
        {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!("generation service returned status {}", resp.status());
                false
            }
            Err(err) => {
                warn!("generation service unreachable: {err}");
                false
            }
        }
    }
}

impl Generator for OllamaClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let client = http_client().map_err(|err| GenerationError::Transport(format!("{err:#}")))?;
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.sampling.temperature,
                top_p: self.sampling.top_p,
                top_k: self.sampling.top_k,
                num_predict: self.sampling.max_output_tokens,
                stop: Vec::new(),
            },
        };

        let resp = client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .map_err(|err| GenerationError::Transport(describe_reqwest_error(&err)))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16()));
        }
        let parsed: GenerateResponse = resp
            .json()
            .map_err(|err| GenerationError::Decode(describe_reqwest_error(&err)))?;
        Ok(parsed
            .response
            .as_deref()
            .unwrap_or(EMPTY_REPLY)
            .trim()
            .to_string())
    }
}

/// `reqwest` keeps the root cause (timeouts, refused connections) in the source
/// chain, not in its own `Display`.
fn describe_reqwest_error(err: &reqwest::Error) -> String {
    let mut msg = error_chain(err);
    if err.is_timeout() && !msg.contains("timed out") {
        msg.push_str(": timed out");
    }
    msg
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !msg.contains(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
        source = cause.source();
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_generate_api() {
        let body = GenerateRequest {
            model: "qwen2.5:7b",
            prompt: "hi",
            stream: false,
            options: GenerateOptions {
                temperature: 0.2,
                top_p: 0.85,
                top_k: 35,
                num_predict: 900,
                stop: Vec::new(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["top_k"], 35);
        assert_eq!(json["options"]["num_predict"], 900);
        assert!(json["options"]["stop"].as_array().unwrap().is_empty());
    }

    #[test]
    fn error_text_names_the_cause() {
        assert_eq!(
            GenerationError::Status(503).to_string(),
            "Error: LLM returned status 503"
        );
        assert!(
            GenerationError::Transport("timed out".into())
                .to_string()
                .contains("timed out")
        );
    }

    #[derive(Debug)]
    struct Layer(&'static str, Option<Box<Layer>>);

    impl std::fmt::Display for Layer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    impl std::error::Error for Layer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.1.as_deref().map(|e| e as &(dyn std::error::Error + 'static))
        }
    }

    #[test]
    fn error_chain_appends_each_distinct_cause() {
        let err = Layer(
            "error sending request",
            Some(Box::new(Layer(
                "client error (SendRequest)",
                Some(Box::new(Layer("operation timed out", None))),
            ))),
        );
        assert_eq!(
            error_chain(&err),
            "error sending request: client error (SendRequest): operation timed out"
        );
    }

    #[test]
    fn stalled_service_reports_a_timeout() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept the connection and never answer.
        let holder = std::thread::spawn(move || {
            let conn = listener.accept();
            std::thread::sleep(Duration::from_secs(3));
            drop(conn);
        });

        let cfg = ScoutConfig {
            llm_url: format!("http://{addr}"),
            llm_timeout: Duration::from_secs(1),
            ..ScoutConfig::default()
        };
        let err = OllamaClient::new(&cfg).generate("hello").unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
        let text = err.to_string();
        assert!(text.starts_with("Error calling LLM: "), "{text}");
        assert!(text.contains("timed out"), "{text}");
        holder.join().unwrap();
    }
}
