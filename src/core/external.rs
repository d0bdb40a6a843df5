/// External pack producers (hosted language models) and the fallback to the
/// offline engine.

use thiserror::Error;
use tracing::{info, warn};

use crate::core::pipeline::{now_stamp, PackEngine};
use crate::schema::mode::Mode;
use crate::schema::pack::{ExternalArtifacts, MediaPack};
use crate::schema::request::GenerationRequest;

#[derive(Debug, Error)]
pub enum ExternalError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that can produce the four artifacts for a request.
pub trait PackSource {
    /// Engine identifier recorded in the pack metadata.
    fn engine_id(&self) -> &str;

    fn fetch(&self, request: &GenerationRequest) -> Result<ExternalArtifacts, ExternalError>;
}

/// The instruction sent to a model: request parameters plus the exact JSON
/// shape expected back.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let modes = Mode::ALL
        .iter()
        .map(|m| m.label())
        .collect::<Vec<_>>()
        .join(" | ");
    let schema = serde_json::json!({
        "mode": modes,
        "outline": "string",
        "script": "string",
        "shotlist": "string (exactly 5 shots, S1..S5)",
        "prompts": "string (global + per-shot prompts)",
    });

    format!(
        "You are an applied AI workflow engine. Return ONLY valid JSON. No markdown.\n\
         \n\
         Topic: \"{}\"\n\
         Language: {}\n\
         Platform: {}\n\
         Target duration: ~{}s\n\
         Audience: {}\n\
         Style preset: {}\n\
         \n\
         Requirements:\n\
         - Make outputs highly topic-specific (avoid generic templates).\n\
         - Outline: 5 beats, clear and practical.\n\
         - Script: short sentences, production-ready pacing.\n\
         - Shotlist: exactly 5 shots, label S1..S5 with camera+action.\n\
         - Prompt pack: global look + per-shot prompts; avoid readable text artifacts.\n\
         \n\
         Return JSON with keys exactly:\n\
         {}\n\
         \n\
         Now output the JSON:\n",
        request.topic,
        request.language.code(),
        request.platform.label(),
        request.duration_sec,
        request.audience.label(),
        request.style_preset,
        schema,
    )
}

/// Parse a model reply into artifacts.
///
/// Accepts bare JSON or JSON wrapped in a Markdown code fence. Missing keys
/// come back empty and a missing mode comes back as `General`.
pub fn parse_response(text: &str) -> Result<ExternalArtifacts, ExternalError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExternalError::InvalidResponse("empty response".to_string()));
    }
    match serde_json::from_str(trimmed) {
        Ok(artifacts) => Ok(artifacts),
        Err(_) => {
            let unfenced = trimmed.replace("```json", "").replace("```", "");
            Ok(serde_json::from_str(unfenced.trim())?)
        }
    }
}

/// Ask `source` for a pack and fall back to the offline engine when it is
/// absent or fails. The fallback uses the same request, seed included.
pub fn generate_with_fallback(
    engine: &PackEngine,
    source: Option<&dyn PackSource>,
    request: &GenerationRequest,
) -> MediaPack {
    if let Some(source) = source {
        match source.fetch(request) {
            Ok(artifacts) => {
                info!(engine = source.engine_id(), "external pack received");
                return MediaPack::from_external(request, artifacts, source.engine_id(), now_stamp());
            }
            Err(e) => {
                warn!(engine = source.engine_id(), error = %e, "external generation failed, using offline engine");
            }
        }
    }
    engine.generate(request)
}
