//! Unified error types for branch parameter derivation
//!
//! This module provides a common error type [`ZykError`] covering every
//! failure a derivation can produce. All errors are raised synchronously at
//! construction time; none of them are transient, so nothing is retried.
//!
//! # Example
//!
//! ```ignore
//! use zyk_core::{ZykError, ZykResult};
//!
//! fn build_line(name: &str) -> ZykResult<()> {
//!     let line = LineParameters::from_name(name)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all parameter derivations.
///
/// The variants follow the failure taxonomy of the engine: bad input syntax,
/// inconsistent matrix dimensions, physically invalid parameters, and
/// out-of-domain nameplate or geometry data.
#[derive(Error, Debug)]
pub enum ZykError {
    /// Input-syntax errors (canonical catalogue names, vector-group codes)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Matrix dimensions inconsistent with the requested conductor count
    #[error("Shape error: {0}")]
    Shape(String),

    /// Physically invalid parameters (non-passive or singular matrices)
    #[error("Physical error: {0}")]
    Physical(String),

    /// Domain errors (bad transformer voltages, negative test radicand,
    /// geometry on the wrong side of the ground plane)
    #[error("Domain error: {0}")]
    Domain(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using ZykError.
pub type ZykResult<T> = Result<T, ZykError>;

// Conversion from anyhow::Error
impl From<anyhow::Error> for ZykError {
    fn from(err: anyhow::Error) -> Self {
        ZykError::Other(err.to_string())
    }
}

// Conversion from string-like types for convenience
impl From<String> for ZykError {
    fn from(s: String) -> Self {
        ZykError::Other(s)
    }
}

impl From<&str> for ZykError {
    fn from(s: &str) -> Self {
        ZykError::Other(s.to_string())
    }
}

// JSON (de)serialization errors
impl From<serde_json::Error> for ZykError {
    fn from(err: serde_json::Error) -> Self {
        ZykError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ZykError::Physical("singular impedance matrix".into());
        assert!(err.to_string().contains("Physical error"));
        assert!(err.to_string().contains("singular impedance matrix"));
    }

    #[test]
    fn test_anyhow_conversion() {
        let any_err = anyhow::anyhow!("matrix must be square");
        let err: ZykError = any_err.into();
        assert!(matches!(err, ZykError::Other(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> ZykResult<()> {
            Err(ZykError::Domain("uhv must exceed ulv".into()))
        }

        fn outer() -> ZykResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
