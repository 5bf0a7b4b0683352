//! Flick error types

use thiserror::Error;

/// Errors raised while constructing a [`Flick`](crate::Flick)
///
/// Once constructed, gesture handling has no error channel.
#[derive(Error, Debug)]
pub enum FlickError {
    /// The host cannot apply CSS transforms
    #[error("CSS transforms are not supported by this host, please use a modern browser")]
    TransformUnsupported,

    /// Both bounds given, but in the wrong order
    #[error("min value ({min}) can't be greater than max value ({max})")]
    InvalidBounds { min: f64, max: f64 },

    /// Step must be a positive, finite number
    #[error("step must be a positive number, got {0}")]
    InvalidStep(f64),

    /// Other invalid option
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The preventDefault exception is not a valid regular expression
    #[error("Invalid preventDefault exception pattern: {0}")]
    InvalidExceptionPattern(#[from] regex::Error),

    /// The target lacks the bound property and no initial value was given
    #[error("Target has no property '{0}' and no initial value was given")]
    MissingProperty(String),
}

/// Result type for Flick construction
pub type Result<T> = std::result::Result<T, FlickError>;
