use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems found while building the configuration.
///
/// These surface before any session exists; nothing is partially constructed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set. Export it or add it to your environment before starting knowbot")]
    MissingCredential(String),

    #[error("temperature must be between 0 and 2, got {0}")]
    InvalidTemperature(f32),

    #[error("history window must hold at least one message")]
    InvalidHistoryWindow,

    #[error("Cannot find home directory")]
    HomeDirNotFound,

    #[error("Config file already exists at: {}. Please edit it directly.", .0.display())]
    AlreadyExists(PathBuf),

    #[error("failed to read or write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
