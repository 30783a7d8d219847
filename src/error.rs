//! Global error handling for ctxdump
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::git::GitError;
use crate::tokenizer::TokenizerError;

/// Global error type for ctxdump operations
#[derive(Error, Debug)]
pub enum CtxDumpError {
    /// Git-related errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Tokenizer-related errors
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The output sink could not be opened; fatal for the whole run
    #[error("Error opening output file {}: {source}", .path.display())]
    OutputSink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Path not found
    #[error("Path does not exist: {0}")]
    PathNotFound(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for ctxdump operations
pub type Result<T> = std::result::Result<T, CtxDumpError>;

/// Creates a CtxDumpError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::CtxDumpError::$error_type(format!($($arg)*))
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

// Lets the binary keep an io::Result main
impl From<CtxDumpError> for io::Error {
    fn from(err: CtxDumpError) -> Self {
        match err {
            CtxDumpError::Io(e) => e,
            CtxDumpError::OutputSink { ref source, .. } => io::Error::new(source.kind(), err.to_string()),
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
