//! Error types for the simulator

use meme_presale_core::PresaleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("Invalid participant '{0}'")]
    InvalidParticipant(String),

    #[error("Invalid step: {0}")]
    InvalidStep(String),

    #[error("Sale rejected the configuration: {0}")]
    Presale(#[from] PresaleError),
}

impl From<toml::ser::Error> for SimError {
    fn from(err: toml::ser::Error) -> Self {
        SimError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Serialization(err.to_string())
    }
}

pub type SimResult<T> = Result<T, SimError>;
