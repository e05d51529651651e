use thiserror::Error;

/// every fatal condition the evolution run can hit. nothing here is retried.
#[derive(Debug, Error)]
pub enum EvolveError {
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("target image has zero width or height")]
    EmptyTarget,

    #[error("dimension mismatch: canvas is {expected:?}, image is {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("chart error: {0}")]
    Chart(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EvolveError>;
