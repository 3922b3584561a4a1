//! Error types for projection and distance operations
//!
//! Every variant is a contract violation: the call is aborted and no partial
//! record is returned. Recoverable input-shape issues are reported through
//! [`crate::diagnostics::Diagnostic`] instead.

use thiserror::Error;

/// Result type alias for colour-vision operations
pub type VisionResult<T> = Result<T, VisionError>;

/// Contract errors raised by the projector and the distance engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VisionError {
    /// Too few chromatic channels for the requested operation
    #[error("Channel count mismatch in {context}: expected at least {expected} channels, got {got}")]
    ChannelCount {
        expected: usize,
        got: usize,
        context: String,
    },

    /// A table or vector does not have the declared shape
    #[error("Shape mismatch in {context}: expected {expected}, got {got}")]
    ShapeMismatch {
        expected: usize,
        got: usize,
        context: String,
    },

    /// Receptor density vector does not match the declared cone count
    #[error("Vector of relative receptor densities has length {got}, but the data declares {expected} cones")]
    DensityMismatch { expected: usize, got: usize },

    /// Per-channel Weber fractions do not match the declared cone count
    #[error("Per-channel Weber fractions have length {got}, but the data declares {expected} cones")]
    WeberMismatch { expected: usize, got: usize },

    /// Weber reference channel is outside the channel range
    #[error("Weber reference channel {index} is out of range for {cones} cones")]
    WeberReference { index: usize, cones: usize },

    /// More than two subset patterns supplied to the distance engine
    #[error("Too many subsetting conditions: {count} given, one or two allowed")]
    TooManyPatterns { count: usize },

    /// A subset pattern is not a valid regular expression
    #[error("Invalid subset pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Quantum noise requested on catches that are negative once log-transformed
    #[error("Quantum catches are negative after log-transformation in sample '{sample}'; quantum noise needs catches above 1, so either use neural noise or raise the illuminant scale used to compute the catches")]
    NegativeLogCatch { sample: String },

    /// The declared catch scale cannot be used by the requested model
    #[error("Catch scale {scale} is incompatible with {model}: {reason}")]
    IncompatibleScale {
        scale: String,
        model: String,
        reason: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{parameter}' = '{value}': must satisfy {constraint}")]
    InvalidParameter {
        parameter: String,
        value: String,
        constraint: String,
    },
}

// Convenience constructors for common error patterns
impl VisionError {
    /// Create a channel count error
    pub fn channel_count(expected: usize, got: usize, context: impl Into<String>) -> Self {
        VisionError::ChannelCount {
            expected,
            got,
            context: context.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: usize, got: usize, context: impl Into<String>) -> Self {
        VisionError::ShapeMismatch {
            expected,
            got,
            context: context.into(),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        VisionError::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create an incompatible scale error
    pub fn incompatible_scale(
        scale: impl Into<String>,
        model: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        VisionError::IncompatibleScale {
            scale: scale.into(),
            model: model.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        VisionError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }
}
