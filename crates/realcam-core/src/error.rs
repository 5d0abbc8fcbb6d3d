//! Error types for realcam-rs.

use std::path::PathBuf;

use thiserror::Error;

use crate::tone_response::Look;

/// The main error type for realcam-rs operations.
#[derive(Error, Debug)]
pub enum RealCameraError {
    /// The tone curves have not been loaded.
    #[error("realcam not initialized - call realcam::init() first")]
    NotInitialized,

    /// The tone curves have already been loaded.
    #[error("realcam already initialized")]
    AlreadyInitialized,

    /// A tone-curve or settings file could not be read.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A tone-curve file does not hold exactly one value per curve sample.
    #[error("curve '{look}' has {actual} samples, expected {expected}")]
    CurveLength {
        look: Look,
        expected: usize,
        actual: usize,
    },

    /// A tone-curve line is not a floating-point literal.
    #[error("curve '{look}' line {line}: cannot parse '{value}' as a number")]
    CurveParse {
        look: Look,
        line: usize,
        value: String,
    },

    /// A camera setting lies outside its allowed range.
    #[error("setting '{name}' = {value} is out of range [{min}, {max}]")]
    InvalidSetting {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Failed to load or decode an image.
    #[error("image error: {0}")]
    ImageError(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for realcam-rs operations.
pub type Result<T> = std::result::Result<T, RealCameraError>;
