use serde::{Deserialize, Serialize};

/// The content category a topic is routed to.
///
/// The mode decides which hooks, beats, script spine and insight visual a
/// pack is assembled from. It is always derived from the topic text and is
/// never chosen at random.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "Business Growth")]
    BusinessGrowth,
    #[serde(rename = "Process Optimization")]
    ProcessOptimization,
    #[serde(rename = "AI System")]
    AiSystem,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "General")]
    General,
}

impl Mode {
    /// All modes in classification priority order, `General` last.
    pub const ALL: [Mode; 5] = [
        Mode::BusinessGrowth,
        Mode::ProcessOptimization,
        Mode::AiSystem,
        Mode::Education,
        Mode::General,
    ];

    /// Human-readable label used in artifacts and metadata.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BusinessGrowth => "Business Growth",
            Self::ProcessOptimization => "Process Optimization",
            Self::AiSystem => "AI System",
            Self::Education => "Education",
            Self::General => "General",
        }
    }

    /// Resolve a label coming from outside the engine (e.g. a model response).
    /// Matching ignores case and surrounding whitespace; anything
    /// unrecognised is `General`.
    pub fn from_label(label: &str) -> Mode {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(wanted))
            .unwrap_or(Mode::General)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(Mode::BusinessGrowth.label(), "Business Growth");
        assert_eq!(Mode::AiSystem.to_string(), "AI System");
    }

    #[test]
    fn from_label_round_trips_every_mode() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_label(mode.label()), mode);
        }
    }

    #[test]
    fn from_label_is_lenient() {
        assert_eq!(Mode::from_label("  ai system "), Mode::AiSystem);
        assert_eq!(Mode::from_label("Marketing"), Mode::General);
        assert_eq!(Mode::from_label(""), Mode::General);
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Mode::ProcessOptimization).unwrap();
        assert_eq!(json, "\"Process Optimization\"");
    }
}
