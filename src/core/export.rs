/// Export formatter: renders a pack as one Markdown document and writes it
/// to disk under a timestamped, sanitized filename.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::schema::pack::MediaPack;

/// Longest sanitized topic kept in a filename, in characters.
pub const MAX_NAME_LEN: usize = 50;
/// Base name used when nothing of the topic survives sanitization.
pub const FALLBACK_NAME: &str = "pack";

const TITLE: &str = "# GlowMiniAI Output Pack";
const SECTION_HEADINGS: [&str; 4] = ["## Outline", "## Script", "## Shotlist", "## Prompt Pack"];
const META_HEADING: &str = "## Meta";
/// Suffixes tried after a name clash before giving up.
const MAX_SUFFIX: u32 = 999;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no free filename for '{0}' after {MAX_SUFFIX} attempts")]
    NameExhausted(String),
    #[error("document is missing section '{0}'")]
    MissingSection(&'static str),
    #[error("section heading '{0}' occurs more than once")]
    AmbiguousSection(&'static str),
}

/// Render the pack as a Markdown document.
pub fn render(pack: &MediaPack) -> Result<String, ExportError> {
    let meta = serde_json::to_string_pretty(&pack.meta)?;
    Ok(format!(
        "{TITLE}\n\
         Topic: {}\n\
         Mode: {}\n\
         Language: {}\n\
         Platform: {}\n\
         Duration: {}s\n\
         Audience: {}\n\
         Style: {}\n\
         Generated: {}\n\
         Engine: {}\n\
         \n\
         {}\n{}\n\
         {}\n{}\n\
         {}\n{}\n\
         {}\n{}\n\
         {META_HEADING}\n{}\n",
        pack.topic,
        pack.mode,
        pack.language.code(),
        pack.platform.label(),
        pack.duration_sec,
        pack.audience.label(),
        pack.style_preset,
        pack.meta.generated_at,
        pack.meta.engine,
        SECTION_HEADINGS[0],
        pack.outline,
        SECTION_HEADINGS[1],
        pack.script,
        SECTION_HEADINGS[2],
        pack.shotlist,
        SECTION_HEADINGS[3],
        pack.prompts,
        meta,
    ))
}

/// Reduce a topic to a filesystem-safe base name.
///
/// Keeps letters, digits, space, `_`, `-` and `.`; trims; turns spaces into
/// underscores; truncates to [`MAX_NAME_LEN`] characters. Falls back to
/// [`FALLBACK_NAME`] when nothing is left.
pub fn sanitize_topic(topic: &str) -> String {
    let kept: String = topic
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.'))
        .collect();
    let safe: String = kept
        .trim()
        .replace(' ', "_")
        .chars()
        .take(MAX_NAME_LEN)
        .collect();
    if safe.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        safe
    }
}

/// Base filename for a pack, without any uniqueness suffix.
pub fn file_name(pack: &MediaPack) -> String {
    format!("{}_{}.md", pack.meta.generated_at, sanitize_topic(&pack.topic))
}

/// Write the rendered pack into `dir`, creating the directory if needed.
///
/// The file is created exclusively. If `{stamp}_{topic}.md` already exists
/// (same topic within the same second), `_2`, `_3`, ... is appended to the
/// stem instead of overwriting.
pub fn persist(pack: &MediaPack, dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let document = render(pack)?;
    let stem = format!("{}_{}", pack.meta.generated_at, sanitize_topic(&pack.topic));

    for attempt in 1..=MAX_SUFFIX {
        let name = if attempt == 1 {
            format!("{stem}.md")
        } else {
            format!("{stem}_{attempt}.md")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                write_or_discard(file, &path, document.as_bytes())?;
                info!(path = %path.display(), "pack written");
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(ExportError::NameExhausted(stem))
}

/// Write `bytes` to a freshly created file, removing the file again if the
/// write fails so a later export can reuse the name.
fn write_or_discard(mut file: impl Write, path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    if let Err(e) = file.write_all(bytes).and_then(|_| file.flush()) {
        drop(file);
        if let Err(rm) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %rm, "could not remove partial pack");
        }
        return Err(e.into());
    }
    Ok(())
}

/// The four artifact sections recovered from a rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub outline: String,
    pub script: String,
    pub shotlist: String,
    pub prompts: String,
}

impl ExportedDocument {
    /// Split a document produced by [`render`] back into its artifacts.
    ///
    /// Boundaries are located right to left from the last `## Meta` heading,
    /// whose JSON body cannot contain a raw newline. Each section heading
    /// must then occur exactly once before it; a topic or artifact that
    /// carries one of those heading lines makes the document
    /// [`ExportError::AmbiguousSection`].
    pub fn parse(document: &str) -> Result<ExportedDocument, ExportError> {
        let meta_marker = format!("\n{META_HEADING}\n");
        let mut end = document
            .rfind(&meta_marker)
            .ok_or(ExportError::MissingSection(META_HEADING))?;
        let region = &document[..end];

        let mut bodies: [String; 4] = Default::default();
        for (slot, heading) in SECTION_HEADINGS.iter().copied().enumerate().rev() {
            let marker = format!("\n{heading}\n");
            match occurrences(region, &marker) {
                0 => return Err(ExportError::MissingSection(heading)),
                1 => {}
                _ => return Err(ExportError::AmbiguousSection(heading)),
            }
            let start = region[..end]
                .rfind(&marker)
                .ok_or(ExportError::MissingSection(heading))?;
            bodies[slot] = region
                .get(start + marker.len()..end)
                .ok_or(ExportError::MissingSection(heading))?
                .to_string();
            end = start;
        }

        let [outline, script, shotlist, prompts] = bodies;
        Ok(ExportedDocument {
            outline,
            script,
            shotlist,
            prompts,
        })
    }
}

/// Occurrences of `marker`, overlapping ones included. Markers start with
/// `\n`, so stepping one byte past a hit stays on a char boundary.
fn occurrences(haystack: &str, marker: &str) -> usize {
    let mut count = 0;
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(marker) {
        count += 1;
        from += pos + 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::pack::{ExternalArtifacts, OFFLINE_ENGINE};
    use crate::schema::request::GenerationRequest;

    fn sample_pack(topic: &str) -> MediaPack {
        MediaPack::from_external(
            &GenerationRequest::new(topic).seed(Some(7)),
            ExternalArtifacts {
                mode: "General".to_string(),
                outline: "OUTLINE\n".to_string(),
                script: "SCRIPT\n".to_string(),
                shotlist: "SHOTS\n".to_string(),
                prompts: "PROMPTS\n".to_string(),
            },
            OFFLINE_ENGINE,
            "20260316_101500".to_string(),
        )
    }

    #[test]
    fn sanitize_keeps_permitted_characters() {
        let name = sanitize_topic("Plan: A/B <test>!!");
        assert_eq!(name, "Plan_AB_test");
        assert!(name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.')));
    }

    #[test]
    fn sanitize_keeps_unicode_letters() {
        assert_eq!(sanitize_topic("  Tối ưu quy trình  "), "Tối_ưu_quy_trình");
    }

    #[test]
    fn sanitize_falls_back_when_empty() {
        assert_eq!(sanitize_topic("???"), FALLBACK_NAME);
        assert_eq!(sanitize_topic("   "), FALLBACK_NAME);
    }

    #[test]
    fn sanitize_truncates_by_characters() {
        let long = "ư".repeat(80);
        let name = sanitize_topic(&long);
        assert_eq!(name.chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn file_name_uses_stamp_and_topic() {
        assert_eq!(file_name(&sample_pack("My topic")), "20260316_101500_My_topic.md");
    }

    #[test]
    fn render_layout() {
        let doc = render(&sample_pack("My topic")).unwrap();
        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(lines[0], "# GlowMiniAI Output Pack");
        assert_eq!(lines[1], "Topic: My topic");
        assert_eq!(lines[2], "Mode: General");
        assert_eq!(lines[3], "Language: vi");
        assert_eq!(lines[4], "Platform: YouTube Shorts");
        assert_eq!(lines[5], "Duration: 35s");
        assert_eq!(lines[6], "Audience: General");
        assert_eq!(lines[7], "Style: Cinematic 3D");
        assert_eq!(lines[8], "Generated: 20260316_101500");
        assert_eq!(lines[9], "Engine: offline_mock_adaptive");
        assert_eq!(lines[11], "## Outline");
        assert!(doc.contains("## Meta\n{\n"));
        assert!(doc.contains("\"seed\": 7"));
    }

    #[test]
    fn parse_recovers_sections() {
        let pack = sample_pack("x");
        let parsed = ExportedDocument::parse(&render(&pack).unwrap()).unwrap();
        assert_eq!(parsed.outline, pack.outline);
        assert_eq!(parsed.script, pack.script);
        assert_eq!(parsed.shotlist, pack.shotlist);
        assert_eq!(parsed.prompts, pack.prompts);
    }

    #[test]
    fn parse_rejects_truncated_document() {
        let doc = render(&sample_pack("x")).unwrap();
        let cut = &doc[..doc.find("## Shotlist").unwrap()];
        assert!(matches!(
            ExportedDocument::parse(cut),
            Err(ExportError::MissingSection("## Meta"))
        ));
    }

    #[test]
    fn parse_rejects_missing_middle_section() {
        let doc = render(&sample_pack("x")).unwrap();
        let doc = doc.replace("\n## Shotlist\n", "\n");
        assert!(matches!(
            ExportedDocument::parse(&doc),
            Err(ExportError::MissingSection("## Shotlist"))
        ));
    }

    #[test]
    fn parse_rejects_heading_inside_topic() {
        let doc = render(&sample_pack("ghi chú\n## Script\nmẹo")).unwrap();
        assert!(matches!(
            ExportedDocument::parse(&doc),
            Err(ExportError::AmbiguousSection("## Script"))
        ));
    }

    #[test]
    fn parse_keeps_other_markdown_headings() {
        let mut pack = sample_pack("x");
        pack.script = "## Tips\nshort lines\n".to_string();
        pack.prompts = "GLOBAL\n## Meta\nnot the real one\n".to_string();
        let parsed = ExportedDocument::parse(&render(&pack).unwrap()).unwrap();
        assert_eq!(parsed.script, pack.script);
        assert_eq!(parsed.prompts, pack.prompts);
    }

    #[test]
    fn occurrences_counts_overlapping_markers() {
        assert_eq!(occurrences("\n## A\n## A\n", "\n## A\n"), 2);
        assert_eq!(occurrences("none", "\n## A\n"), 0);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("20260316_101500_x.md");
        std::fs::write(&path, "").unwrap();

        let err = write_or_discard(FailingWriter, &path, b"document").unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
        assert!(!path.exists());
    }
}
