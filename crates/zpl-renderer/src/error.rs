//! Error types for zpl-renderer.

/// Errors that can occur while rendering a label.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The canvas would be empty or unreasonably large.
    #[error("Invalid label dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Canvas width in dots
        width: u64,
        /// Canvas height in dots
        height: u64,
    },

    /// A font file could not be read or parsed.
    #[error("Font error: {message}")]
    Font {
        /// What went wrong
        message: String,
    },

    /// PNG encoding failed.
    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),
}

/// Convenience `Result` type alias for renderer operations.
pub type Result<T> = std::result::Result<T, RenderError>;

impl RenderError {
    /// Creates a font error.
    pub fn font(message: impl Into<String>) -> Self {
        RenderError::Font {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_display() {
        let err = RenderError::InvalidDimensions {
            width: 0,
            height: 1200,
        };
        assert_eq!(err.to_string(), "Invalid label dimensions: 0x1200");
    }

    #[test]
    fn test_font_display() {
        let err = RenderError::font("fonts/OCRB/OCRB.ttf: not found");
        assert_eq!(err.to_string(), "Font error: fonts/OCRB/OCRB.ttf: not found");
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RenderError>();
    }
}
