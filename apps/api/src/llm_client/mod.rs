/// Generation client — the single point of entry for all calls to the text
/// generation backend (an Ollama-style HTTP model server).
///
/// ARCHITECTURAL RULE: No other module may call the backend directly.
/// All generation MUST go through the `TextGenerator` trait, so the
/// enrichment pipeline can run against a scripted generator in tests.
///
/// Failures are a closed set (`GenerationError`); the user-safe fallback
/// strings live on the error type and are applied once, at the boundary
/// where results are persisted — never inside this module.
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

/// Request ceiling. The backend is a local model server; a clinical note can
/// take minutes on modest hardware, so callers must not assume low latency.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(500);

/// Token budget when the caller gives no character budget.
const DEFAULT_NUM_PREDICT: u32 = 500;

/// Response fields checked for the completion, in order.
const RESPONSE_FIELDS: &[&str] = &["response", "text", "output", "result"];

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("backend returned status {status}")]
    Backend { status: u16 },

    #[error("could not connect to the generation backend")]
    Connection,

    #[error("generation request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(String),

    #[error("backend returned an empty completion")]
    EmptyCompletion,
}

impl GenerationError {
    /// User-safe text stored in place of a completion. Distinct per failure
    /// class so a stored placeholder still identifies the cause.
    pub fn fallback_text(&self) -> &'static str {
        match self {
            GenerationError::Backend { .. } => {
                "The text generation service is temporarily unavailable. Please try again later."
            }
            GenerationError::Connection => {
                "Text generation service unreachable. Check that the model server is running."
            }
            GenerationError::Timeout => {
                "The text generation request timed out. Please try again."
            }
            GenerationError::Request(_) => {
                "An error occurred while generating text. Please try again later."
            }
            GenerationError::EmptyCompletion => "Generation unavailable at the moment.",
        }
    }
}

/// The generation seam used by the enrichment pipeline. Production code uses
/// `OllamaClient`; pipeline tests use scripted implementations.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates text for `prompt`. `max_chars` is the caller's soft output
    /// budget, used to derive the backend token budget.
    async fn generate(
        &self,
        prompt: &str,
        max_chars: Option<u32>,
        temperature: f32,
    ) -> Result<String, GenerationError>;
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
    num_predict: u32,
}

/// Client for an Ollama-style `/api/generate` endpoint.
#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
            model,
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        max_chars: Option<u32>,
        temperature: f32,
    ) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature,
                num_predict: requested_tokens(max_chars),
            },
        };

        let response = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Generation backend returned status {status}: {body}");
            return Err(GenerationError::Backend {
                status: status.as_u16(),
            });
        }

        let payload: Value = response.json().await.map_err(classify_transport_error)?;
        let cleaned = clean_completion(&extract_completion(&payload));

        if cleaned.is_empty() {
            return Err(GenerationError::EmptyCompletion);
        }

        debug!("Generation succeeded ({} chars)", cleaned.len());
        Ok(cleaned)
    }
}

/// Token budget heuristic: roughly two tokens per requested output character.
fn requested_tokens(max_chars: Option<u32>) -> u32 {
    max_chars.map(|c| c * 2).unwrap_or(DEFAULT_NUM_PREDICT)
}

/// Connect failures are checked before timeouts so a connect-phase timeout
/// classifies as a connection problem, not a slow generation.
fn classify_transport_error(e: reqwest::Error) -> GenerationError {
    if e.is_connect() {
        error!("Could not connect to the generation backend: {e}");
        GenerationError::Connection
    } else if e.is_timeout() {
        error!("Generation request timed out: {e}");
        GenerationError::Timeout
    } else {
        error!("Generation request failed: {e}");
        GenerationError::Request(e.to_string())
    }
}

/// Pulls the completion out of a backend payload: the first populated field
/// among the known names, arrays joined with spaces, everything else
/// stringified, then trimmed.
fn extract_completion(payload: &Value) -> String {
    let value = match payload.as_object() {
        Some(map) => RESPONSE_FIELDS
            .iter()
            .find_map(|key| map.get(*key).filter(|v| !is_blank(v)))
            .cloned()
            .unwrap_or(Value::Null),
        None => payload.clone(),
    };

    let text = match value {
        Value::String(s) => s,
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(" "),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    text.trim().to_string()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Compile-once cleanup patterns via OnceLock.

/// Pass 1: generic meta prefixes models emit before the actual answer.
fn meta_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:your answer[:\-\s]*|model response[:\-\s]*|answer[:\-\s]*|response[:\-\s]*|output[:\-\s]*|>\s*)+",
        )
        .unwrap()
    })
}

/// Pass 2: clinical-note introductions the note prompts explicitly forbid
/// but smaller models still produce.
fn clinical_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:here is the (?:clinical note|assessment|analysis)[:\-\s]*|here's the (?:clinical note|assessment|analysis)[:\-\s]*|below is[:\-\s]*|the assessment is[:\-\s]*|clinical note[:\-\s]*)+",
        )
        .unwrap()
    })
}

fn leading_punctuation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^['"«\s\-\x{2022}>]+"#).unwrap()
    })
}

/// Strips introductory boilerplate from a completion: generic meta prefixes,
/// then clinical-note introductions, then leading quote/bullet characters.
pub fn clean_completion(raw: &str) -> String {
    let text = raw.trim();
    let text = meta_prefix_regex().replace(text, "");
    let text = clinical_prefix_regex().replace(&text, "");
    let text = leading_punctuation_regex().replace(&text, "");
    text.trim().to_string()
}
