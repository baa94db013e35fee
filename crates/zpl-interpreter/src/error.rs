//! Error types for zpl-interpreter.
//!
//! Interpretation itself never fails: a field that cannot be decoded or
//! encoded is logged and skipped (or printed as plain text). These errors
//! surface from the standalone decoders.

/// Errors raised while decoding graphics or encoding barcodes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum InterpretError {
    /// A `^GF` payload could not be decoded.
    #[error("Invalid graphic: {reason}")]
    Graphic {
        /// What went wrong
        reason: String,
    },

    /// Field data cannot be represented by the barcode symbology.
    #[error("Cannot encode {symbology}: {reason}")]
    Barcode {
        /// Symbology name
        symbology: &'static str,
        /// What went wrong
        reason: String,
    },
}

/// Convenience `Result` type alias for interpreter operations.
pub type Result<T> = std::result::Result<T, InterpretError>;

impl InterpretError {
    /// Creates a graphic error.
    pub fn graphic(reason: impl Into<String>) -> Self {
        InterpretError::Graphic {
            reason: reason.into(),
        }
    }

    /// Creates a barcode error.
    pub fn barcode(symbology: &'static str, reason: impl Into<String>) -> Self {
        InterpretError::Barcode {
            symbology,
            reason: reason.into(),
        }
    }
}
