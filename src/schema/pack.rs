use serde::{Deserialize, Serialize};

use super::mode::Mode;
use super::request::{Audience, GenerationRequest, Language, Platform};

/// Engine identifier stamped on packs built by the offline assembler.
pub const OFFLINE_ENGINE: &str = "offline_mock_adaptive";

/// Metadata recorded alongside the four artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackMetadata {
    /// Local time of generation, `%Y%m%d_%H%M%S`.
    pub generated_at: String,
    /// Which producer built the pack (`offline_mock_adaptive`, `gemini`, ...).
    pub engine: String,
    pub detected_mode: Mode,
    pub seed: Option<u64>,
    pub style_preset: String,
    pub platform: Platform,
    pub duration_sec: u32,
    pub audience: Audience,
}

/// One generated media pack.
///
/// Built once per generation call and never edited afterwards; new
/// parameters mean a new pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPack {
    pub topic: String,
    pub language: Language,
    pub platform: Platform,
    pub duration_sec: u32,
    pub audience: Audience,
    pub style_preset: String,
    pub mode: Mode,
    pub outline: String,
    pub script: String,
    pub shotlist: String,
    pub prompts: String,
    pub meta: PackMetadata,
}

/// The four artifacts plus a mode label, as supplied by an external
/// producer such as a hosted language model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalArtifacts {
    #[serde(default = "general_label")]
    pub mode: String,
    #[serde(default)]
    pub outline: String,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub shotlist: String,
    #[serde(default)]
    pub prompts: String,
}

fn general_label() -> String {
    Mode::General.label().to_string()
}

impl MediaPack {
    /// Wrap externally produced artifacts in the same pack shape the
    /// offline engine returns.
    pub fn from_external(
        request: &GenerationRequest,
        artifacts: ExternalArtifacts,
        engine: &str,
        generated_at: String,
    ) -> MediaPack {
        let mode = Mode::from_label(&artifacts.mode);
        MediaPack {
            topic: request.topic.clone(),
            language: request.language,
            platform: request.platform,
            duration_sec: request.duration_sec,
            audience: request.audience,
            style_preset: request.style_preset.clone(),
            mode,
            outline: artifacts.outline,
            script: artifacts.script,
            shotlist: artifacts.shotlist,
            prompts: artifacts.prompts,
            meta: PackMetadata {
                generated_at,
                engine: engine.to_string(),
                detected_mode: mode,
                seed: request.seed,
                style_preset: request.style_preset.clone(),
                platform: request.platform,
                duration_sec: request.duration_sec,
                audience: request.audience,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_artifacts_default_missing_keys() {
        let a: ExternalArtifacts = serde_json::from_str(r#"{"outline": "o"}"#).unwrap();
        assert_eq!(a.mode, "General");
        assert_eq!(a.outline, "o");
        assert!(a.script.is_empty());
    }

    #[test]
    fn from_external_echoes_request() {
        let req = GenerationRequest::new("Bán hàng online")
            .language(Language::En)
            .seed(Some(9));
        let artifacts = ExternalArtifacts {
            mode: "Business Growth".to_string(),
            outline: "outline".to_string(),
            script: "script".to_string(),
            shotlist: "shots".to_string(),
            prompts: "prompts".to_string(),
        };
        let pack = MediaPack::from_external(&req, artifacts, "gemini", "20260101_000000".into());
        assert_eq!(pack.mode, Mode::BusinessGrowth);
        assert_eq!(pack.meta.engine, "gemini");
        assert_eq!(pack.meta.seed, Some(9));
        assert_eq!(pack.language, Language::En);
        assert_eq!(pack.outline, "outline");
    }

    #[test]
    fn metadata_json_keys() {
        let req = GenerationRequest::new("x");
        let pack = MediaPack::from_external(&req, ExternalArtifacts::default(), OFFLINE_ENGINE, "t".into());
        let value = serde_json::to_value(&pack.meta).unwrap();
        assert_eq!(value["engine"], "offline_mock_adaptive");
        assert_eq!(value["platform"], "YouTube Shorts");
        assert_eq!(value["audience"], "General");
        assert_eq!(value["detected_mode"], "General");
        assert!(value["seed"].is_null());
    }
}
