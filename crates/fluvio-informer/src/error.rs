use std::io::Error as IoError;
use std::path::PathBuf;

use thiserror::Error;

use fluvio_informer_model::{KindId, ObjectKey};

#[derive(Debug, Error)]
pub enum InformerError {
    /// pipeline builder failed, nothing is cached so the next request retries
    #[error("unable to construct informer for {kind}: {reason}")]
    Construction { kind: KindId, reason: anyhow::Error },
    #[error("unable to decode {kind} object {key}: {reason}")]
    Decode {
        kind: KindId,
        key: ObjectKey,
        reason: serde_json::Error,
    },
}

/// Failure reading or writing [`InformerConfig`](crate::InformerConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to access config {}: {source}", .path.display())]
    Access { path: PathBuf, source: IoError },
    #[error("invalid informer config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unable to render informer config: {0}")]
    Render(#[from] toml::ser::Error),
}
