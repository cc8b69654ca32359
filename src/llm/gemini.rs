//! Google Gemini `generateContent` client.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, TranslateError};
use crate::llm::{GenerationParams, ModelClient};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Blocking Gemini client
///
/// Blocking on purpose: the translation pipeline is synchronous end to end.
/// Callers inside an async runtime should run it on a blocking task.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

/// Gemini API response
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key
    /// * `model` - Model name (e.g., "gemini-2.0-flash-lite")
    /// * `timeout` - Per-request timeout, covering connect and body read
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                TranslateError::CollaboratorFailure(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        })
    }

    /// Point the client at another API root (proxies, regional endpoints)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl ModelClient for GeminiClient {
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        tracing::debug!("Calling Gemini model {}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&json!({
                "contents": [
                    {"role": "user", "parts": [{"text": prompt}]}
                ],
                "generationConfig": {
                    "temperature": params.temperature,
                    "maxOutputTokens": params.max_output_tokens,
                    "topP": params.top_p,
                    "topK": params.top_k
                }
            }))
            .send()
            .map_err(|e| TranslateError::CollaboratorFailure(format!("Gemini API error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| {
                TranslateError::CollaboratorFailure(format!("Failed to read response: {}", e))
            })?;

        if !status.is_success() {
            return Err(TranslateError::CollaboratorFailure(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        extract_text(&body)
    }
}

/// Pull the generated text out of a `generateContent` response body
fn extract_text(body: &str) -> Result<String> {
    let parsed: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        TranslateError::CollaboratorFailure(format!("Failed to parse Gemini response: {}", e))
    })?;

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| {
            TranslateError::CollaboratorFailure("No candidates in Gemini response".to_string())
        })?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(TranslateError::CollaboratorFailure(format!(
            "Gemini returned no text (finish reason: {})",
            reason
        )));
    }

    Ok(text.trim().to_string())
}
