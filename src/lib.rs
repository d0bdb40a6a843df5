//! GlowMiniAI: offline media-pack generation for short-form video.
//!
//! Turns a topic into an outline, a narration script, a five-shot shotlist
//! and an image-prompt pack, using keyword mode classification, a RON phrase
//! bank and style presets. A hosted language model can stand in for the
//! offline engine (feature `gemini`), with the offline engine as fallback.

pub mod config;
pub mod core;
pub mod schema;
