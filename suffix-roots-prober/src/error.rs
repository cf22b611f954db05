use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    #[error("Invalid probe configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
