//! Error types for ring-sizer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RingSizeError {
    /// Pixel density is unset, zero or not finite
    #[error("Screen is not calibrated: pixels per millimeter must be positive")]
    NotCalibrated,

    /// Calibration inputs that cannot produce a usable ratio
    #[error("Invalid calibration: {observed_px}px observed for {known_mm}mm reference")]
    InvalidCalibration { observed_px: f64, known_mm: f64 },

    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RingSizeError>;
