pub mod error;
pub mod merge;
pub mod types;

// Re-export commonly used types
pub use error::{ConfigError, Error, Result, ScanError};
pub use merge::{apply_important, merge_declarations};
pub use types::{Declaration, ScanWarning, WarningKind};
