//! Engine error types.

use thiserror::Error;

use crate::PixelRect;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("View scale must be a positive finite number, got {0}")]
    InvalidScale(f64),

    #[error("max_iterations must be at least 1")]
    InvalidMaxIterations,

    #[error(
        "Perturbation threshold ({perturbation}) must be positive and below the \
         double-double threshold ({double_double})"
    )]
    InvalidThresholds {
        double_double: f64,
        perturbation: f64,
    },

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse coordinate: {0}")]
    Parse(String),

    #[error("Canvas must have a non-zero width and height")]
    EmptyCanvas,

    #[error("Tile {rect:?} lies outside the {width}x{height} canvas")]
    TileOutOfBounds {
        rect: PixelRect,
        width: u32,
        height: u32,
    },

    #[error("Evaluation superseded by a newer view")]
    Superseded,
}
