use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error(
        "all patient slides must share tile resolution (expected mpp {expected}, found {found}); \
         reprocess the slides with the same tile_size_um and tile_size_px for all of them"
    )]
    ResolutionMismatch { expected: f64, found: f64 },
    #[error("coordinates must be provided to encode a slide")]
    MissingCoordinates,
    #[error("patient group has no slides")]
    EmptyPatient,
    #[error("failed to read slide features {path:?}: {reason}")]
    SlideRead { path: PathBuf, reason: String },
    #[error("invalid feature set: {0}")]
    InvalidFeatureSet(String),
    #[error("encoder error: {0}")]
    Encoder(String),
    #[error("other: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, EncodeError>;

impl From<anyhow::Error> for EncodeError {
    fn from(value: anyhow::Error) -> Self {
        Self::Other(value.to_string())
    }
}
