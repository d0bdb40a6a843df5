/// Gemini-backed [`PackSource`] over the Generative Language REST API.

use std::time::Duration;
use tracing::debug;

use super::external::{build_prompt, parse_response, ExternalError, PackSource};
use crate::schema::pack::ExternalArtifacts;
use crate::schema::request::GenerationRequest;

pub const ENGINE_ID: &str = "gemini";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    /// Fails with [`ExternalError::MissingApiKey`] on a blank key.
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Result<Self, ExternalError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ExternalError::MissingApiKey);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(http_error)?;
        Ok(Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        })
    }

    fn generate_text(&self, prompt: &str) -> Result<String, ExternalError> {
        let url = format!("{API_BASE}/{}:generateContent", self.model);
        let body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": 0.7
            }
        });

        debug!(model = %self.model, "calling generateContent");
        let resp = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(http_error)?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().unwrap_or_default();
            return Err(ExternalError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: serde_json::Value = resp.json().map_err(http_error)?;
        candidate_text(&json)
    }
}

fn http_error(e: reqwest::Error) -> ExternalError {
    ExternalError::Http(e.to_string())
}

/// First candidate's first text part.
fn candidate_text(json: &serde_json::Value) -> Result<String, ExternalError> {
    json["candidates"]
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|c| c["content"]["parts"].as_array())
        .and_then(|parts| parts.first())
        .and_then(|p| p["text"].as_str())
        .map(str::to_string)
        .ok_or_else(|| ExternalError::InvalidResponse("Missing content".to_string()))
}

impl PackSource for GeminiClient {
    fn engine_id(&self) -> &str {
        ENGINE_ID
    }

    fn fetch(&self, request: &GenerationRequest) -> Result<ExternalArtifacts, ExternalError> {
        let text = self.generate_text(&build_prompt(request))?;
        parse_response(&text)
    }
}
