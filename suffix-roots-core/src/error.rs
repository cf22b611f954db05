use std::path::PathBuf;
use suffix_roots_prober::ProbeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllowlistError {
    #[error("at least one of --rust-out or --json-out must be provided")]
    NoOutputRequested,

    #[error("Failed to read suffix list {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("Probe task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AllowlistError>;
