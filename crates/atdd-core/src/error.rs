//! Error types for the ATDD toolkit
//!
//! The pipeline itself never fails; these cover caller misuse:
//! - Invalid generation options
//! - Unreadable input files
//! - Malformed configuration
//! - JSON encoding of reports

use atdd_codegen::OptionsError;
use std::path::PathBuf;

/// Main toolkit error type
#[derive(Debug, thiserror::Error)]
pub enum AtddError {
    /// Generation options rejected before rendering
    #[error("invalid generation options: {0}")]
    Options(#[from] OptionsError),

    /// File could not be read or written
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`AtddConfig`](crate::AtddConfig)
    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        /// Configuration file
        path: PathBuf,
        /// Parse error with location
        #[source]
        source: Box<toml::de::Error>,
    },

    /// Report could not be encoded
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl AtddError {
    /// I/O error on `path`
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the caller's options or configuration
    #[inline]
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Options(_) | Self::Config { .. })
    }
}

/// Result alias for toolkit operations
pub type Result<T> = std::result::Result<T, AtddError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_path() {
        let err = AtddError::io(
            "plans/missing.md",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.to_string(), "i/o error on plans/missing.md: not found");
        assert!(!err.is_usage());
    }

    #[test]
    fn options_errors_convert() {
        let err: AtddError = OptionsError::ZeroCodeunitId.into();
        assert!(err.is_usage());
        assert!(err.to_string().contains("codeunit id must be positive"));
    }
}
