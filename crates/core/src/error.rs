//! Error types for the opt-in validated paths
//!
//! The per-tick physics never fails: bad inputs degrade into NaN or infinite
//! numbers the same way the underlying arithmetic does. These errors come only
//! from parsing text (units, preset names) and from explicit parameter
//! validation before an update.

use crate::core_types::units::Unit;
use thiserror::Error;

/// Simulator error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("unit '{unit}' is not a {domain} unit")]
    IncompatibleUnit { unit: Unit, domain: &'static str },

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("unknown car preset '{0}'")]
    UnknownPreset(String),
}

/// Result type for validated simulator operations
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimError::IncompatibleUnit {
            unit: Unit::Rpm,
            domain: "speed",
        };
        assert_eq!(err.to_string(), "unit 'rpm' is not a speed unit");

        let err = SimError::InvalidParameter {
            name: "mass",
            value: -1.0,
            reason: "must be positive",
        };
        assert_eq!(err.to_string(), "invalid parameter mass = -1: must be positive");
    }
}
