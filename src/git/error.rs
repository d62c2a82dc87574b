/*!
 * Error types for Git operations
 */

use thiserror::Error;

/// Errors that can occur while reading repository metadata
#[derive(Error, Debug)]
pub enum GitError {
    /// No repository contains the scanned directory
    #[error("Failed to open repository: {0}")]
    OpenError(git2::Error),

    /// Repository has no commits or HEAD cannot be resolved
    #[error("Failed to resolve HEAD: {0}")]
    HeadError(git2::Error),

    /// Git2 error (generic)
    #[error("Git error: {0}")]
    Git2Error(#[from] git2::Error),

    /// Repository has no working directory
    #[error("Repository is bare: {0}")]
    Bare(String),
}

/// Specialized Result type for Git operations
pub type GitResult<T> = Result<T, GitError>;
