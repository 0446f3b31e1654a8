//! Error types for the CLI.

use std::path::PathBuf;

/// All errors that can occur while loading inputs or running an analysis.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid analytics settings: {0}")]
    Analytics(#[from] folioscope::ConfigError),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("failed to read snapshot {path}: {source}")]
    SnapshotRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse snapshot JSON: {0}")]
    SnapshotParse(#[from] serde_json::Error),

    #[error(transparent)]
    Feed(#[from] folioscope::FeedError),

    #[error("failed to serialize report: {0}")]
    Serialize(serde_json::Error),

    #[error("failed to write export {path}: {source}")]
    Export {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<folioscope::RunError> for Error {
    fn from(e: folioscope::RunError) -> Self {
        match e {
            folioscope::RunError::Feed(e) => Error::Feed(e),
            folioscope::RunError::Config(e) => Error::Analytics(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
