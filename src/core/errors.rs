//! Shared error types for the crate
//!
//! The evaluation pipeline itself is total; these errors only surface at the
//! edges: configuration loading/validation and report writing.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deliveryrisk operations
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read
    #[error("Config file error for {path}: {message}")]
    ConfigFile {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration content could not be parsed
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but holds inconsistent values
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a config file error with path context
    pub fn config_file(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: Option<std::io::Error>,
    ) -> Self {
        Self::ConfigFile {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration validation error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }

    /// Whether the user can fix this by editing their configuration
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            Self::ConfigParse(_) | Self::Configuration(_) | Self::ConfigFile { .. }
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_prefixes_message() {
        let err = Error::configuration("at_risk must be below red_zone").with_context("bands");
        assert_eq!(
            err.to_string(),
            "bands: Configuration error: at_risk must be below red_zone"
        );
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> = Err(Error::configuration("bad"));
        let err = result.context("loading .deliveryrisk.toml").unwrap_err();
        assert!(matches!(err, Error::WithContext { .. }));
    }

    #[test]
    fn test_user_fixable_classification() {
        assert!(Error::configuration("x").is_user_fixable());
        let io = Error::Io(std::io::Error::other("disk"));
        assert!(!io.is_user_fixable());
    }
}
