//! WASM bindings for glowmini: powers the browser studio.
//!
//! Everything crosses the boundary as JSON strings: requests in, packs out.

use wasm_bindgen::prelude::*;

use glowmini::core::export::{self, ExportedDocument};
use glowmini::core::external::{
    build_prompt, generate_with_fallback, parse_response, ExternalError, PackSource,
};
use glowmini::core::pipeline::PackEngine;
use glowmini::schema::pack::{ExternalArtifacts, MediaPack};
use glowmini::schema::request::{
    validate_topic, Audience, GenerationRequest, Platform, DEFAULT_DURATION_SEC, MAX_DURATION_SEC,
    MIN_DURATION_SEC,
};

/// Engine id recorded for packs built from a host-supplied model reply.
const HOST_ENGINE: &str = "external";

#[derive(serde::Serialize)]
struct DurationRange {
    min: u32,
    max: u32,
    default: u32,
}

/// A model reply obtained by the host page, replayed as a pack source.
struct HostResponse<'a>(&'a str);

impl PackSource for HostResponse<'_> {
    fn engine_id(&self) -> &str {
        HOST_ENGINE
    }

    fn fetch(&self, _request: &GenerationRequest) -> Result<ExternalArtifacts, ExternalError> {
        parse_response(self.0)
    }
}

// ---------------------------------------------------------------------------
// GlowStudio, the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct GlowStudio {
    engine: PackEngine,
}

#[wasm_bindgen]
impl GlowStudio {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<GlowStudio, JsError> {
        let engine = PackEngine::with_builtin_catalogs()
            .map_err(|e| JsError::new(&format!("Catalog error: {e}")))?;
        Ok(GlowStudio { engine })
    }

    /// Generate a pack from a request described by a JSON string.
    ///
    /// Expected JSON shape (everything but `topic` optional):
    /// ```json
    /// {
    ///   "topic": "Tự động hóa quy trình tạo video AI",
    ///   "language": "vi",
    ///   "platform": "YouTube Shorts",
    ///   "duration_sec": 35,
    ///   "audience": "General",
    ///   "style_preset": "Cinematic 3D",
    ///   "seed": 42
    /// }
    /// ```
    pub fn generate(&self, request_json: &str) -> Result<String, JsError> {
        self.generate_json(request_json).map_err(|e| JsError::new(&e))
    }

    /// The instruction a host should send to a language model for this
    /// request.
    pub fn model_prompt(&self, request_json: &str) -> Result<String, JsError> {
        parse_request(request_json)
            .map(|req| build_prompt(&req))
            .map_err(|e| JsError::new(&e))
    }

    /// Build a pack from a model reply fetched by the host. Falls back to
    /// the offline engine when the reply cannot be used.
    pub fn generate_from_reply(&self, request_json: &str, reply: &str) -> Result<String, JsError> {
        self.generate_from_reply_json(request_json, reply)
            .map_err(|e| JsError::new(&e))
    }

    /// Render a pack (as returned by `generate`) into the Markdown document.
    pub fn render_document(pack_json: &str) -> Result<String, JsError> {
        render_document_inner(pack_json).map_err(|e| JsError::new(&e))
    }

    /// Suggested download filename for a pack.
    pub fn file_name(pack_json: &str) -> Result<String, JsError> {
        parse_pack(pack_json)
            .map(|pack| export::file_name(&pack))
            .map_err(|e| JsError::new(&e))
    }

    /// Split a previously downloaded document back into its sections.
    /// Returns a JSON object with `outline`, `script`, `shotlist`, `prompts`.
    pub fn read_document(document: &str) -> Result<String, JsError> {
        read_document_inner(document).map_err(|e| JsError::new(&e))
    }

    /// Return JSON array of language codes.
    pub fn languages() -> String {
        serde_json::to_string(&["vi", "en"]).unwrap_or_else(|_| "[]".to_string())
    }

    /// Return JSON array of platform labels.
    pub fn platforms() -> String {
        let labels: Vec<&str> = Platform::ALL.iter().map(|p| p.label()).collect();
        serde_json::to_string(&labels).unwrap_or_else(|_| "[]".to_string())
    }

    /// Return JSON array of audience labels.
    pub fn audiences() -> String {
        let labels: Vec<&str> = Audience::ALL.iter().map(|a| a.label()).collect();
        serde_json::to_string(&labels).unwrap_or_else(|_| "[]".to_string())
    }

    /// Return JSON object with the duration slider bounds.
    pub fn duration_range() -> String {
        serde_json::to_string(&DurationRange {
            min: MIN_DURATION_SEC,
            max: MAX_DURATION_SEC,
            default: DEFAULT_DURATION_SEC,
        })
        .unwrap_or_else(|_| "{}".to_string())
    }

    /// Return JSON array of style preset names, in catalog order.
    pub fn style_presets(&self) -> String {
        let names: Vec<&str> = self.engine.styles().preset_names().collect();
        serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
    }
}

// Private helpers
impl GlowStudio {
    fn generate_json(&self, request_json: &str) -> Result<String, String> {
        let request = parse_request(request_json)?;
        let pack = self.engine.generate(&request);
        to_json(&pack)
    }

    fn generate_from_reply_json(&self, request_json: &str, reply: &str) -> Result<String, String> {
        let request = parse_request(request_json)?;
        let source = HostResponse(reply);
        let pack = generate_with_fallback(&self.engine, Some(&source), &request);
        to_json(&pack)
    }
}

/// Parse a request and normalize its topic; an empty topic is rejected.
fn parse_request(request_json: &str) -> Result<GenerationRequest, String> {
    let mut request: GenerationRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid request JSON: {e}"))?;
    let topic = validate_topic(&request.topic)
        .map_err(|_| "Please enter a topic.".to_string())?
        .to_string();
    request.topic = topic;
    Ok(request)
}

fn parse_pack(pack_json: &str) -> Result<MediaPack, String> {
    serde_json::from_str(pack_json).map_err(|e| format!("Invalid pack JSON: {e}"))
}

fn to_json(pack: &MediaPack) -> Result<String, String> {
    serde_json::to_string(pack).map_err(|e| format!("Serialization error: {e}"))
}

fn render_document_inner(pack_json: &str) -> Result<String, String> {
    let pack = parse_pack(pack_json)?;
    export::render(&pack).map_err(|e| format!("Render error: {e}"))
}

fn read_document_inner(document: &str) -> Result<String, String> {
    let doc = ExportedDocument::parse(document).map_err(|e| format!("Document error: {e}"))?;
    serde_json::to_string(&serde_json::json!({
        "outline": doc.outline,
        "script": doc.script,
        "shotlist": doc.shotlist,
        "prompts": doc.prompts,
    }))
    .map_err(|e| format!("Serialization error: {e}"))
}
