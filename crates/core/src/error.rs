//! Error taxonomy shared by every crosswind crate.
//!
//! `ConfigError` and `ScanError` are fatal for a build. Per-file soft failures
//! are not errors; they travel as [`ScanWarning`](crate::ScanWarning)s next to
//! the output.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed configuration. Always raised before any scanning starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `content.files` is missing or empty.
    #[error("content.files must list at least one glob pattern")]
    EmptyContent,

    /// The configuration document is not valid JSON.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value that must be a mapping was something else.
    #[error("{path} must be a mapping, found {found}")]
    ExpectedMapping { path: String, found: &'static str },

    /// A leaf value has the wrong shape.
    #[error("invalid value at {path}: {message}")]
    InvalidValue { path: String, message: String },

    /// A breakpoint key matches neither the length nor the identifier grammar.
    #[error("invalid breakpoint key '{key}' at {path}")]
    InvalidBreakpoint { path: String, key: String },

    /// A content glob does not compile.
    #[error("invalid content pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// `content.extract` names an extractor nobody registered.
    #[error("unknown extractor '{name}' for extension '{extension}'")]
    UnknownExtractor { extension: String, name: String },

    /// A `plugins` entry does not satisfy the plugin contract.
    #[error("plugins[{index}] is not a valid plugin: {reason}")]
    InvalidPlugin { index: usize, reason: String },
}

/// Fatal traversal failure. Aborts the current build.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Following symlinks led back to an ancestor directory.
    #[error("symlink cycle at {path} (points back to {ancestor})")]
    SymlinkCycle { path: PathBuf, ancestor: PathBuf },

    /// A required directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other walker failure.
    #[error("failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// The scan was aborted through its cancellation token.
    #[error("scan cancelled")]
    Cancelled,

    /// The bounded worker pool could not be started.
    #[error("failed to start scan workers: {0}")]
    Pool(String),
}

/// Umbrella error returned by the engine facade.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scan(#[from] ScanError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    pub fn is_scan(&self) -> bool {
        matches!(self, Error::Scan(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_names_path() {
        let err = ConfigError::ExpectedMapping {
            path: "theme.container.padding".to_string(),
            found: "string",
        };
        assert_eq!(
            err.to_string(),
            "theme.container.padding must be a mapping, found string"
        );
    }

    #[test]
    fn test_plugin_error_names_index() {
        let err = ConfigError::InvalidPlugin {
            index: 2,
            reason: "unknown plugin 'forms'".to_string(),
        };
        assert!(err.to_string().starts_with("plugins[2]"));
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: Error = ScanError::Cancelled.into();
        assert!(err.is_scan());
        assert!(!err.is_config());
        assert_eq!(err.to_string(), "scan cancelled");
    }
}
