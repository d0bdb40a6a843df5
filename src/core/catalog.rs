/// Built-in catalog data and the error type shared by catalog loaders.

use thiserror::Error;

use super::template::TemplateError;

/// RON sources compiled into the library.
pub mod data {
    pub const PHRASE_BANK: &str = include_str!("../../catalog_data/phrase_bank.ron");
    pub const STYLES: &str = include_str!("../../catalog_data/styles.ron");
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("template error in {location}: {source}")]
    Template {
        location: String,
        #[source]
        source: TemplateError,
    },
    #[error("invalid catalog: {0}")]
    Invalid(String),
}
