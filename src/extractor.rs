// src/extractor.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ModelError;
use crate::pipeline::FieldExtractor;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Cost/latency bound on the page content sent to the model, not a
/// correctness guarantee. Fields past the cutoff are simply lost.
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// The original call had no bound at all and would hang on a stuck model.
const MODEL_TIMEOUT_SECS: u64 = 120;

const EXTRACTION_PROMPT: &str = r#"Extract the following information from this job posting and format it as JSON:
{
    "title": "job title here",
    "companyName": "company name here",
    "location": "location here",
    "description": "full job description on the page"
}

Job Content: "#;

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Default)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

/// Gemini REST client. Deterministic (temperature 0) single-prompt
/// extraction; returns the model's trimmed raw text without validating
/// whether it is JSON.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// The key is read from `GOOGLE_API_KEY` but not validated here; a
    /// missing or invalid key surfaces when the first call fails.
    pub fn from_env() -> Result<Self, ModelError> {
        let api_key = std::env::var("GOOGLE_API_KEY").unwrap_or_default();
        Self::new(api_key)
    }

    pub fn new(api_key: String) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(MODEL_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }
}

#[async_trait]
impl FieldExtractor for GeminiClient {
    async fn extract(&self, content: &str) -> Result<String, ModelError> {
        let content = truncate_chars(content, MAX_CONTENT_CHARS);
        let prompt = format!("{}{}\n", EXTRACTION_PROMPT, content);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, GEMINI_MODEL);
        info!("Requesting field extraction from {}", GEMINI_MODEL);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api { status, body });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(ModelError::EmptyResponse)?;

        Ok(text.trim().to_string())
    }
}

/// Strip the markdown code fences models wrap JSON in despite instructions
/// not to. Text without fence markers passes through unchanged.
pub fn sanitize_response(text: &str) -> String {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    }
    if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim().to_string()
}

fn truncate_chars(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}
