pub mod catalog;
pub mod classifier;
pub mod export;
pub mod external;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod phrase_bank;
pub mod pipeline;
pub mod style;
pub mod template;
