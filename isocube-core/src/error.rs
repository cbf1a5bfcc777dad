/// Error type shared by the engine's fallible constructors
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("cube size must be positive and finite, got {0}")]
    InvalidCubeSize(f32),
    #[error("animation period must be positive and finite, got {0}")]
    InvalidPeriod(f32),
    #[error("time step must be non-negative and finite, got {0}")]
    NegativeTimeStep(f32),
    #[error("invalid hex layout: {0}")]
    InvalidLayout(String),
    #[error("invalid scene configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
