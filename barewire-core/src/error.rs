//! Error types for BAREWire.
//!
//! This module provides strongly-typed errors with stable codes. Every
//! fallible operation in the crate reports exactly one of these variants;
//! the `Display` rendering is the only human-readable channel.

use thiserror::Error;

/// The main error type for BAREWire operations.
#[derive(Error, Debug)]
pub enum BareError {
    // =========================================================================
    // Schema Errors (E001-E099)
    // =========================================================================
    /// Schema validation failed.
    ///
    /// Wraps the full set of per-type violations collected by the validator.
    #[error("E001: Schema validation failed: {cause}")]
    SchemaValidation {
        /// Rendered list of validation violations.
        cause: String,
    },

    // =========================================================================
    // Wire Errors (E101-E199)
    // =========================================================================
    /// Wire decoding failed.
    #[error("E101: Decoding failed: {cause}")]
    Decoding {
        /// Reason for the decode failure.
        cause: String,
    },

    /// Wire encoding failed.
    #[error("E102: Encoding failed: {cause}")]
    Encoding {
        /// Reason for the encode failure.
        cause: String,
    },

    // =========================================================================
    // View Errors (E201-E299)
    // =========================================================================
    /// A view access disagreed with the declared schema type.
    #[error("E201: Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The type declared by the schema.
        expected: String,
        /// The type that was actually supplied or found.
        actual: String,
    },

    /// An offset/length pair fell outside the addressed byte region.
    #[error("E202: Out of bounds access at offset {offset} in a region of {length} bytes")]
    OutOfBounds {
        /// The offset at which the access was attempted.
        offset: usize,
        /// The length of the region that was addressed.
        length: usize,
    },

    // =========================================================================
    // Structural Errors (E301-E399)
    // =========================================================================
    /// Catch-all for structural errors (e.g. an unknown field path).
    #[error("E301: Invalid value: {cause}")]
    InvalidValue {
        /// Description of the structural error.
        cause: String,
    },
}

impl BareError {
    /// Get the error code (e.g., "E001").
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::SchemaValidation { .. } => "E001",
            Self::Decoding { .. } => "E101",
            Self::Encoding { .. } => "E102",
            Self::TypeMismatch { .. } => "E201",
            Self::OutOfBounds { .. } => "E202",
            Self::InvalidValue { .. } => "E301",
        }
    }

    /// Check if this error came from the wire codec.
    #[must_use]
    pub fn is_wire_error(&self) -> bool {
        matches!(self, Self::Decoding { .. } | Self::Encoding { .. })
    }

    /// Check if this error is a schema validation error.
    #[must_use]
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::SchemaValidation { .. })
    }

    /// Create a decoding error.
    pub fn decoding(cause: impl Into<String>) -> Self {
        Self::Decoding {
            cause: cause.into(),
        }
    }

    /// Create an encoding error.
    pub fn encoding(cause: impl Into<String>) -> Self {
        Self::Encoding {
            cause: cause.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(cause: impl Into<String>) -> Self {
        Self::InvalidValue {
            cause: cause.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Result type alias using `BareError`.
pub type Result<T> = std::result::Result<T, BareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_correct() {
        let err = BareError::SchemaValidation {
            cause: "empty struct".to_string(),
        };
        assert_eq!(err.code(), "E001");

        let err = BareError::decoding("varint overflow");
        assert_eq!(err.code(), "E101");

        let err = BareError::OutOfBounds {
            offset: 16,
            length: 8,
        };
        assert_eq!(err.code(), "E202");
    }

    #[test]
    fn error_display() {
        let err = BareError::type_mismatch("u32", "string");
        let msg = format!("{}", err);
        assert!(msg.contains("E201"));
        assert!(msg.contains("u32"));
        assert!(msg.contains("string"));
    }

    #[test]
    fn wire_error_classification() {
        assert!(BareError::decoding("truncated").is_wire_error());
        assert!(BareError::encoding("overflow").is_wire_error());
        assert!(!BareError::invalid_value("bad path").is_wire_error());

        assert!(
            BareError::SchemaValidation {
                cause: "cycle".to_string()
            }
            .is_schema_error()
        );
    }
}
