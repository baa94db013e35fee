//! Error types for the zpl facade.

use std::path::{Path, PathBuf};

/// Errors that can occur while loading configuration or rendering labels.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input is not valid ZPL
    #[error("Parse error: {0}")]
    Parse(#[from] zpl_parser::ParseError),

    /// The label could not be drawn or encoded
    #[error("Render error: {0}")]
    Render(#[from] zpl_renderer::RenderError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// File operation failed
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Convenience `Result` type alias for zpl operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it happened on.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = Error::config("dpmm must be positive");
        assert_eq!(err.to_string(), "Configuration error: dpmm must be positive");
    }

    #[test]
    fn test_io_error_names_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io_with_path(source, "/tmp/label.zpl");
        assert_eq!(err.to_string(), "I/O error at /tmp/label.zpl: missing");
    }

    #[test]
    fn test_parse_error_converts() {
        let err: Error = zpl_parser::parse_zpl("no format here").unwrap_err().into();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().starts_with("Parse error:"));
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
