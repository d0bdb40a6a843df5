/// The pack pipeline: request → mode → phrase/style lookups → four artifacts.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::catalog::CatalogError;
use crate::core::classifier::classify;
use crate::core::phrase_bank::{PhraseBank, BEAT_COUNT};
use crate::core::style::{StyleBundle, StyleCatalog};
use crate::schema::mode::Mode;
use crate::schema::pack::{MediaPack, PackMetadata, OFFLINE_ENGINE};
use crate::schema::request::GenerationRequest;

/// `generated_at` format, also the filename prefix on export.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn now_stamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// The five shots every pack is cut into, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shot {
    Hook,
    Problem,
    Insight,
    Action,
    Close,
}

impl Shot {
    pub const ALL: [Shot; 5] = [
        Shot::Hook,
        Shot::Problem,
        Shot::Insight,
        Shot::Action,
        Shot::Close,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hook => "Hook",
            Self::Problem => "Problem",
            Self::Insight => "Insight",
            Self::Action => "Action",
            Self::Close => "Close",
        }
    }
}

/// Everything drawn from the random source for one pack's shots.
#[derive(Debug, Clone)]
struct ShotDraws<'a> {
    camera_moves: [&'a str; 5],
    prop: &'a str,
    metaphor: &'a str,
}

/// The offline media-pack engine. Built via `PackEngine::builder()`.
///
/// Catalogs are read-only once built, so one engine can serve any number of
/// `generate` calls; each call owns its own random source.
#[derive(Debug, Clone)]
pub struct PackEngine {
    phrases: PhraseBank,
    styles: StyleCatalog,
}

/// Builder for constructing a `PackEngine`.
#[derive(Debug, Default)]
pub struct PackEngineBuilder {
    phrase_bank_path: Option<PathBuf>,
    styles_path: Option<PathBuf>,
    /// Directly provided phrase bank (for testing without files).
    phrase_bank: Option<PhraseBank>,
    /// Directly provided style catalog (for testing without files).
    styles: Option<StyleCatalog>,
}

impl PackEngine {
    pub fn builder() -> PackEngineBuilder {
        PackEngineBuilder::default()
    }

    /// An engine over the built-in catalogs.
    pub fn with_builtin_catalogs() -> Result<PackEngine, CatalogError> {
        Self::builder().build()
    }

    pub fn phrases(&self) -> &PhraseBank {
        &self.phrases
    }

    pub fn styles(&self) -> &StyleCatalog {
        &self.styles
    }

    /// Build a media pack, stamped with the current local time.
    pub fn generate(&self, request: &GenerationRequest) -> MediaPack {
        self.generate_at(request, now_stamp())
    }

    /// Build a media pack with an explicit `generated_at` stamp.
    ///
    /// Random draws happen in a fixed order (hook, camera moves S1..S5,
    /// shot-1 prop, shot-1 metaphor), so a seeded request always yields the
    /// same artifacts.
    pub fn generate_at(&self, request: &GenerationRequest, generated_at: String) -> MediaPack {
        let mut rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mode = classify(&request.topic);
        let style = self.styles.style_for(&request.style_preset);
        debug!(
            mode = mode.label(),
            seed = ?request.seed,
            style = %request.style_preset,
            "assembling pack"
        );

        let duration = request.duration_sec.to_string();
        let hook = self
            .phrases
            .hooks_for(mode, request.language)
            .choose(&mut rng)
            .map(|t| t.render(&[("topic", request.topic.as_str()), ("duration", duration.as_str())]))
            .unwrap_or_default();

        let draws = self.draw_shots(&mut rng);
        let insight = self.phrases.insight_visual(mode);

        let outline = self.render_outline(request, mode, &hook);
        let script = self.render_script(request, mode, &hook);
        let shotlist = render_shotlist(&draws, insight);
        let prompts = render_prompts(request, mode, style, &draws, insight);

        MediaPack {
            topic: request.topic.clone(),
            language: request.language,
            platform: request.platform,
            duration_sec: request.duration_sec,
            audience: request.audience,
            style_preset: request.style_preset.clone(),
            mode,
            outline,
            script,
            shotlist,
            prompts,
            meta: PackMetadata {
                generated_at,
                engine: OFFLINE_ENGINE.to_string(),
                detected_mode: mode,
                seed: request.seed,
                style_preset: request.style_preset.clone(),
                platform: request.platform,
                duration_sec: request.duration_sec,
                audience: request.audience,
            },
        }
    }

    fn draw_shots(&self, rng: &mut StdRng) -> ShotDraws<'_> {
        let mut camera_moves = [""; 5];
        for slot in camera_moves.iter_mut() {
            *slot = pick(&self.phrases.camera_moves, rng);
        }
        let prop = pick(&self.phrases.props, rng);
        let metaphor = pick(&self.phrases.metaphors, rng);
        ShotDraws {
            camera_moves,
            prop,
            metaphor,
        }
    }

    fn render_outline(&self, request: &GenerationRequest, mode: Mode, hook: &str) -> String {
        let mut out = format!("MODE: {}\nHOOK: {}\n\nSTRUCTURE ({} beats):\n", mode, hook, BEAT_COUNT);
        for (i, beat) in self.phrases.beats_for(mode, request.language).iter().enumerate() {
            out.push_str(&format!("{}) {}\n", i + 1, beat));
        }
        out.push_str(&format!(
            "\nTARGET: {} | Duration: ~{}s | Audience: {}\n",
            request.platform.label(),
            request.duration_sec,
            request.audience.label()
        ));
        out
    }

    fn render_script(&self, request: &GenerationRequest, mode: Mode, hook: &str) -> String {
        let cta = self.phrases.cta(request.language);
        let mut out = format!(
            "[{} SCRIPT — ~{}s | {}]\n{}\n\n",
            request.language.code().to_uppercase(),
            request.duration_sec,
            request.platform.label(),
            hook
        );
        for (i, line) in self.phrases.spine_for(mode, request.language).iter().enumerate() {
            let line = line.render(&[("topic", request.topic.as_str()), ("cta", cta)]);
            out.push_str(&format!("({}) {}\n", i + 1, line));
        }
        out
    }
}

fn pick<'a>(items: &'a [String], rng: &mut StdRng) -> &'a str {
    items.choose(rng).map_or("", String::as_str)
}

fn render_shotlist(draws: &ShotDraws<'_>, insight: &str) -> String {
    let mut out = String::from("SHOTLIST (5 shots)\n");
    for (i, (shot, camera)) in Shot::ALL.iter().zip(draws.camera_moves).enumerate() {
        let (framing, detail) = match shot {
            Shot::Hook => (
                "close-up",
                format!("prop: {} | metaphor: {}", draws.prop, draws.metaphor),
            ),
            Shot::Problem => ("medium", "show friction clearly (simple, non-violent)".to_string()),
            Shot::Insight => ("insert", insight.to_string()),
            Shot::Action => ("hands-on", "demonstrate the main step (clear and calm)".to_string()),
            Shot::Close => ("wide", "calm workspace, hopeful mood, subtle smile".to_string()),
        };
        out.push_str(&format!(
            "S{} {}: {} | {} | {}\n",
            i + 1,
            shot.name(),
            camera,
            framing,
            detail
        ));
    }
    out
}

fn render_prompts(
    request: &GenerationRequest,
    mode: Mode,
    style: &StyleBundle,
    draws: &ShotDraws<'_>,
    insight: &str,
) -> String {
    let mut out = format!(
        "[PROMPT PACK — Offline draft, tool-ready]\n\
         GLOBAL LOOK:\n\
         - {}\n\
         - lighting: {}\n\
         - lens: {}\n\
         - family-friendly, professional, no gore, no explicit content\n\
         - avoid readable text artifacts, avoid watermark artifacts\n\
         - consistent style across shots\n\
         \n\
         SCENE CONTEXT:\n\
         - Topic: \"{}\"\n\
         - Mode: {}\n\
         - Platform: {} | Duration: ~{}s | Audience: {}\n",
        style.global,
        style.lighting,
        style.lens,
        request.topic,
        mode,
        request.platform.label(),
        request.duration_sec,
        request.audience.label()
    );

    for (i, (shot, camera)) in Shot::ALL.iter().zip(draws.camera_moves).enumerate() {
        let tail = match shot {
            Shot::Hook => format!(
                "close-up, {}, expressive but subtle, clean background",
                draws.prop
            ),
            Shot::Problem => {
                "medium shot, show the friction/bottleneck visually, clear storytelling".to_string()
            }
            Shot::Insight => format!("insert shot, {}", insight),
            Shot::Action => {
                "hands arranging steps, one clear action, confident pacing".to_string()
            }
            Shot::Close => "wide shot, calm workspace, warm hopeful mood, gentle smile".to_string(),
        };
        out.push_str(&format!(
            "\nSHOT {} ({}):\n{}, {}, {}, {}\n",
            i + 1,
            shot.name(),
            style.global,
            style.lighting,
            camera,
            tail
        ));
    }
    out
}

impl PackEngineBuilder {
    /// Replace the built-in phrase bank with one loaded from a RON file.
    pub fn phrase_bank_file(mut self, path: impl AsRef<Path>) -> Self {
        self.phrase_bank_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Merge style presets from a RON file over the built-in catalog.
    pub fn styles_file(mut self, path: impl AsRef<Path>) -> Self {
        self.styles_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Provide a phrase bank directly (for testing without files).
    pub fn with_phrase_bank(mut self, bank: PhraseBank) -> Self {
        self.phrase_bank = Some(bank);
        self
    }

    /// Provide a style catalog directly (for testing without files).
    pub fn with_styles(mut self, styles: StyleCatalog) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn build(self) -> Result<PackEngine, CatalogError> {
        let phrases = match (self.phrase_bank, self.phrase_bank_path) {
            (Some(bank), _) => bank,
            (None, Some(path)) => PhraseBank::load_from_ron(&path)?,
            (None, None) => PhraseBank::builtin()?,
        };

        let mut styles = match self.styles {
            Some(styles) => styles,
            None => StyleCatalog::builtin()?,
        };
        if let Some(ref path) = self.styles_path {
            styles.merge(StyleCatalog::load_from_ron(path)?);
        }

        Ok(PackEngine { phrases, styles })
    }
}
