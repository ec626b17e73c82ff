// Copyright @yucwang 2026

//! Errors reported by renderer configuration.

use crate::math::constants::{Float, Vector3i};
use thiserror::Error;

/// Rejected configure call. The previous configuration generation stays active.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A field dimension is negative.
    #[error("invalid volume dimensions: {0:?}")]
    InvalidDimensions(Vector3i),

    /// A transfer function table was supplied with an empty or negative domain.
    #[error("invalid transfer function domain: range {range} must be positive")]
    InvalidTransferFunctionDomain { range: Float },

    /// A recognised parameter holds a value of the wrong type.
    #[error("parameter `{name}` expects {expected}")]
    InvalidParameter { name: String, expected: &'static str },

    /// No renderer is registered under this identifier.
    #[error("unknown renderer type: {0}")]
    UnknownRenderer(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidDimensions(Vector3i::new(4, -1, 2));
        assert!(err.to_string().starts_with("invalid volume dimensions"));

        let err = ConfigError::InvalidTransferFunctionDomain { range: 0.0 };
        assert_eq!(err.to_string(), "invalid transfer function domain: range 0 must be positive");
    }
}
