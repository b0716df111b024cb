use nalgebra::Vector2;
use thiserror::Error;

/// Precondition violations in a parameter set. These are reported before any
/// integration step runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("`{name}` must be a positive, finite number (got {value})")]
    NonPositive { name: &'static str, value: f64 },

    #[error("gravitational constant must be finite and non-negative (got {0})")]
    InvalidGravity(f64),

    #[error("initial condition `{name}` must be finite (got {value})")]
    NonFiniteInitialCondition { name: &'static str, value: f64 },

    #[error("resolution must be non-zero in both dimensions (got {width}x{height})")]
    EmptyResolution { width: u32, height: u32 },

    #[error("frame rate must be at least 1 Hz")]
    ZeroFrameRate,

    #[error("`{0}` must be at least one pixel wide")]
    ZeroLineWidth(&'static str),
}

/// Raised when the integrator produces a non-finite state and the guard policy
/// asks for the run to stop.
#[derive(Debug, Error, Clone, PartialEq)]
#[error(
    "non-finite pendulum state after step {step}: angles = ({}, {}), velocities = ({}, {})",
    .angles[0], .angles[1], .velocities[0], .velocities[1]
)]
pub struct DomainError {
    pub step: u64,
    pub angles: Vector2<f64>,
    pub velocities: Vector2<f64>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid parameters: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unable to parse parameter file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unable to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error("pixel surface error: {0}")]
    Pixels(#[from] pixels::Error),

    #[error("unable to create window: {0}")]
    Window(#[from] winit::error::OsError),
}
