use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Shortest recommended clip length, in seconds.
pub const MIN_DURATION_SEC: u32 = 15;
/// Longest recommended clip length, in seconds.
pub const MAX_DURATION_SEC: u32 = 60;
pub const DEFAULT_DURATION_SEC: u32 = 35;
/// Preset every unknown style name degrades to.
pub const DEFAULT_STYLE_PRESET: &str = "Cinematic 3D";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown language '{0}': expected vi or en")]
    Language(String),
    #[error("unknown platform '{0}'")]
    Platform(String),
    #[error("unknown audience '{0}'")]
    Audience(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("topic must not be empty")]
    EmptyTopic,
}

/// Output language of the hook, beats, script and call-to-action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "vi")]
    Vi,
    #[serde(rename = "en")]
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Vi => "vi",
            Self::En => "en",
        }
    }
}

impl FromStr for Language {
    type Err = ParseError;

    /// Accepts any tag starting with `vi` or `en` (`vi-VN`, `en_US`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower.starts_with("vi") {
            Ok(Self::Vi)
        } else if lower.starts_with("en") {
            Ok(Self::En)
        } else {
            Err(ParseError::Language(s.to_string()))
        }
    }
}

/// Surface the pack is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Platform {
    #[default]
    #[serde(rename = "YouTube Shorts", alias = "youtube_shorts")]
    YouTubeShorts,
    #[serde(rename = "TikTok", alias = "tiktok")]
    TikTok,
    #[serde(rename = "Facebook Reels", alias = "facebook_reels")]
    FacebookReels,
    #[serde(rename = "Website/Blog", alias = "website_blog")]
    WebsiteBlog,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::YouTubeShorts,
        Platform::TikTok,
        Platform::FacebookReels,
        Platform::WebsiteBlog,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::YouTubeShorts => "YouTube Shorts",
            Self::TikTok => "TikTok",
            Self::FacebookReels => "Facebook Reels",
            Self::WebsiteBlog => "Website/Blog",
        }
    }
}

impl FromStr for Platform {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "youtubeshorts" | "youtube" | "shorts" => Ok(Self::YouTubeShorts),
            "tiktok" => Ok(Self::TikTok),
            "facebookreels" | "facebook" | "reels" => Ok(Self::FacebookReels),
            "websiteblog" | "website" | "blog" => Ok(Self::WebsiteBlog),
            _ => Err(ParseError::Platform(s.to_string())),
        }
    }
}

/// Who the pack is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Audience {
    #[default]
    #[serde(rename = "General", alias = "general")]
    General,
    #[serde(rename = "Kids/Family", alias = "kids_family")]
    KidsFamily,
    #[serde(rename = "Business", alias = "business")]
    Business,
    #[serde(rename = "Education", alias = "education")]
    Education,
}

impl Audience {
    pub const ALL: [Audience; 4] = [
        Audience::General,
        Audience::KidsFamily,
        Audience::Business,
        Audience::Education,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::General => "General",
            Self::KidsFamily => "Kids/Family",
            Self::Business => "Business",
            Self::Education => "Education",
        }
    }
}

impl FromStr for Audience {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "general" => Ok(Self::General),
            "kidsfamily" | "kids" | "family" => Ok(Self::KidsFamily),
            "business" => Ok(Self::Business),
            "education" => Ok(Self::Education),
            _ => Err(ParseError::Audience(s.to_string())),
        }
    }
}

/// Lower-case and drop everything but letters and digits, so
/// "Kids/Family", "kids-family" and "KIDS FAMILY" compare equal.
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Everything needed to produce one media pack.
///
/// The engine trusts `topic` to be non-empty; front-ends run
/// [`validate_topic`] before building a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default = "default_duration")]
    pub duration_sec: u32,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default = "default_style")]
    pub style_preset: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_SEC
}

fn default_style() -> String {
    DEFAULT_STYLE_PRESET.to_string()
}

impl GenerationRequest {
    /// A request with the stock defaults: Vietnamese, YouTube Shorts, 35s,
    /// general audience, "Cinematic 3D", unseeded.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            language: Language::default(),
            platform: Platform::default(),
            duration_sec: DEFAULT_DURATION_SEC,
            audience: Audience::default(),
            style_preset: default_style(),
            seed: None,
        }
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn duration_sec(mut self, duration_sec: u32) -> Self {
        self.duration_sec = duration_sec;
        self
    }

    pub fn audience(mut self, audience: Audience) -> Self {
        self.audience = audience;
        self
    }

    pub fn style_preset(mut self, preset: impl Into<String>) -> Self {
        self.style_preset = preset.into();
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// Trim a user-supplied topic and reject it if nothing is left.
pub fn validate_topic(topic: &str) -> Result<&str, RequestError> {
    let trimmed = topic.trim();
    if trimmed.is_empty() {
        Err(RequestError::EmptyTopic)
    } else {
        Ok(trimmed)
    }
}
