/// Phrase bank: per-mode, per-language hooks, beats and script spines, plus
/// the shared camera, prop and metaphor pools.

use serde::Deserialize;
use std::path::Path;

use super::catalog::{data, CatalogError};
use super::template::Template;
use crate::schema::mode::Mode;
use crate::schema::request::Language;

/// Every beat list and script spine has exactly this many entries.
pub const BEAT_COUNT: usize = 5;

const HOOK_PLACEHOLDERS: &[&str] = &["topic", "duration"];
const SPINE_PLACEHOLDERS: &[&str] = &["topic", "cta"];

/// Phrases for one (mode, language) pair.
#[derive(Debug, Clone)]
pub struct PhraseSet {
    pub hooks: Vec<Template>,
    pub beats: Vec<String>,
    pub spine: Vec<Template>,
}

/// Phrases for one mode in both languages.
#[derive(Debug, Clone)]
pub struct ModePhrases {
    /// Shot-3 visual, shared verbatim by the shotlist and the prompt pack.
    pub insight_visual: String,
    pub vi: PhraseSet,
    pub en: PhraseSet,
}

impl ModePhrases {
    pub fn for_language(&self, language: Language) -> &PhraseSet {
        match language {
            Language::Vi => &self.vi,
            Language::En => &self.en,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PhraseBank {
    pub camera_moves: Vec<String>,
    pub props: Vec<String>,
    pub metaphors: Vec<String>,
    cta_vi: String,
    cta_en: String,
    business_growth: ModePhrases,
    process_optimization: ModePhrases,
    ai_system: ModePhrases,
    education: ModePhrases,
    general: ModePhrases,
}

// RON deserialization shapes. Templates are kept as strings here and
// parsed (and checked) while converting.

#[derive(Debug, Deserialize)]
struct RonPhraseSet {
    hooks: Vec<String>,
    beats: Vec<String>,
    spine: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RonModePhrases {
    insight_visual: String,
    vi: RonPhraseSet,
    en: RonPhraseSet,
}

#[derive(Debug, Deserialize)]
struct RonModes {
    business_growth: RonModePhrases,
    process_optimization: RonModePhrases,
    ai_system: RonModePhrases,
    education: RonModePhrases,
    general: RonModePhrases,
}

#[derive(Debug, Deserialize)]
struct RonCta {
    vi: String,
    en: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "PhraseBank")]
struct RonPhraseBank {
    camera_moves: Vec<String>,
    props: Vec<String>,
    metaphors: Vec<String>,
    cta: RonCta,
    modes: RonModes,
}

impl PhraseBank {
    /// The phrase bank compiled into the library.
    pub fn builtin() -> Result<PhraseBank, CatalogError> {
        Self::parse_ron(data::PHRASE_BANK)
    }

    /// Load a phrase bank from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<PhraseBank, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse and validate a phrase bank from a RON string.
    pub fn parse_ron(input: &str) -> Result<PhraseBank, CatalogError> {
        let raw: RonPhraseBank = ron::from_str(input)?;

        non_empty("camera_moves", &raw.camera_moves)?;
        non_empty("props", &raw.props)?;
        non_empty("metaphors", &raw.metaphors)?;

        let modes = raw.modes;
        Ok(PhraseBank {
            camera_moves: raw.camera_moves,
            props: raw.props,
            metaphors: raw.metaphors,
            cta_vi: raw.cta.vi,
            cta_en: raw.cta.en,
            business_growth: convert_mode("business_growth", modes.business_growth)?,
            process_optimization: convert_mode("process_optimization", modes.process_optimization)?,
            ai_system: convert_mode("ai_system", modes.ai_system)?,
            education: convert_mode("education", modes.education)?,
            general: convert_mode("general", modes.general)?,
        })
    }

    pub fn mode(&self, mode: Mode) -> &ModePhrases {
        match mode {
            Mode::BusinessGrowth => &self.business_growth,
            Mode::ProcessOptimization => &self.process_optimization,
            Mode::AiSystem => &self.ai_system,
            Mode::Education => &self.education,
            Mode::General => &self.general,
        }
    }

    /// Hook templates for a mode and language, in catalog order.
    pub fn hooks_for(&self, mode: Mode, language: Language) -> &[Template] {
        &self.mode(mode).for_language(language).hooks
    }

    /// The fixed five beats for a mode and language.
    pub fn beats_for(&self, mode: Mode, language: Language) -> &[String] {
        &self.mode(mode).for_language(language).beats
    }

    /// The five script spine lines for a mode and language.
    pub fn spine_for(&self, mode: Mode, language: Language) -> &[Template] {
        &self.mode(mode).for_language(language).spine
    }

    pub fn insight_visual(&self, mode: Mode) -> &str {
        &self.mode(mode).insight_visual
    }

    /// Closing call-to-action sentence.
    pub fn cta(&self, language: Language) -> &str {
        match language {
            Language::Vi => &self.cta_vi,
            Language::En => &self.cta_en,
        }
    }
}

fn non_empty(location: &str, items: &[String]) -> Result<(), CatalogError> {
    if items.is_empty() {
        return Err(CatalogError::Invalid(format!("{location} must not be empty")));
    }
    Ok(())
}

fn convert_mode(location: &str, raw: RonModePhrases) -> Result<ModePhrases, CatalogError> {
    Ok(ModePhrases {
        insight_visual: raw.insight_visual,
        vi: convert_set(&format!("{location}.vi"), raw.vi)?,
        en: convert_set(&format!("{location}.en"), raw.en)?,
    })
}

fn convert_set(location: &str, raw: RonPhraseSet) -> Result<PhraseSet, CatalogError> {
    non_empty(&format!("{location}.hooks"), &raw.hooks)?;
    for (field, len) in [("beats", raw.beats.len()), ("spine", raw.spine.len())] {
        if len != BEAT_COUNT {
            return Err(CatalogError::Invalid(format!(
                "{location}.{field} has {len} entries, expected {BEAT_COUNT}"
            )));
        }
    }

    Ok(PhraseSet {
        hooks: parse_templates(&format!("{location}.hooks"), &raw.hooks, HOOK_PLACEHOLDERS)?,
        beats: raw.beats,
        spine: parse_templates(&format!("{location}.spine"), &raw.spine, SPINE_PLACEHOLDERS)?,
    })
}

fn parse_templates(
    location: &str,
    sources: &[String],
    allowed: &[&str],
) -> Result<Vec<Template>, CatalogError> {
    sources
        .iter()
        .enumerate()
        .map(|(i, src)| {
            Template::parse(src)
                .and_then(|t| t.check_placeholders(allowed).map(|_| t))
                .map_err(|source| CatalogError::Template {
                    location: format!("{location}[{i}]"),
                    source,
                })
        })
        .collect()
}
