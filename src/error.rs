//! Global error handling for dumpdoc
//!
//! Per-file and per-directory failures never surface here; they become
//! placeholder content or scan warnings. This type covers what is fatal to
//! a run: an unreadable root, configuration problems, output writes and
//! watcher setup.

use std::io;
use thiserror::Error;

/// Global error type for dumpdoc operations
#[derive(Error, Debug)]
pub enum DumpDocError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// XML/HTML processing errors
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File watcher errors
    #[error("Watch error: {0}")]
    Watch(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for dumpdoc operations
pub type Result<T> = std::result::Result<T, DumpDocError>;

/// Creates a DumpDocError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::DumpDocError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// Allow DumpDocError where an io::Error is expected
impl From<DumpDocError> for io::Error {
    fn from(err: DumpDocError) -> Self {
        match err {
            DumpDocError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
