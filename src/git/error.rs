/*!
 * Error types for Git operations
 */

use thiserror::Error;

/// Errors that can occur while reading repository metadata
#[derive(Error, Debug)]
pub enum GitError {
    /// Error opening or discovering a Git repository
    #[error("Failed to open repository: {0}")]
    OpenError(git2::Error),

    /// HEAD could not be resolved to a commit
    #[error("Failed to resolve HEAD: {0}")]
    HeadError(git2::Error),

    /// Git2 error (generic)
    #[error("Git error: {0}")]
    Git2Error(#[from] git2::Error),

    /// Commit timestamp outside the representable range
    #[error("Invalid commit time: {0}")]
    InvalidTime(i64),
}

/// Specialized Result type for Git operations
pub type GitResult<T> = Result<T, GitError>;
