//! Error type shared by the library and the CLI.
//!
//! Only collaborator failures live here (storage, export, rate fetch,
//! configuration, template compilation). Bad numeric input and unknown
//! reference data never produce an error; they fall back to defaults.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read settings: {0}")]
    ConfigRead(#[from] toml::de::Error),

    #[error("failed to write settings: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("currency rate request failed: {0}")]
    Rates(#[from] reqwest::Error),

    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: u32 },

    #[error("invoice number {0} is already in use")]
    DuplicateNumber(String),

    #[error("invoice {0} has a non-finite amount, tax rate or discount")]
    NonFinite(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("prompt aborted: {0}")]
    Prompt(#[from] inquire::InquireError),
}

impl Error {
    pub fn not_found(entity: &'static str, id: u32) -> Self {
        Self::NotFound { entity, id }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
