//! Store layer error types
//!
//! All errors that can occur during store operations are defined here.
//! We use `thiserror` for ergonomic error definition and better error messages

use std::path::PathBuf;

use thiserror::Error;

use crate::store::types::InvalidNameError;

/// the main error type for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// error from the underlying Git library
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// the requested file was not found in the tree
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// the requested directory was not found in the tree
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// the file already exists (create precondition violated)
    #[error("file already exists: {path}")]
    FileAlreadyExists { path: String },

    /// the directory already exists (create precondition violated)
    #[error("directory already exists: {path}")]
    DirectoryAlreadyExists { path: String },

    /// a tree entry has the wrong type for the requested edit
    /// (e.g. a file sits where a directory is needed)
    #[error("entry conflict at {path}: expected {expected}, found {found}")]
    EntryConflict {
        path: String,
        expected: String,
        found: String,
    },

    /// head moved between reading the base tree and committing
    #[error("concurrent modification: head moved from {expected} to {found}")]
    ConcurrentModification { expected: String, found: String },

    /// a stored document's metadata block could not be decoded
    #[error("decode error at {path}: {reason}")]
    Decode { path: String, reason: String },

    /// the translation target language is not enabled in configuration
    #[error("language not enabled: {0}")]
    LanguageNotEnabled(String),

    /// invalid path or file name
    #[error("invalid name: {0}")]
    InvalidName(#[from] InvalidNameError),

    /// repo is not initialized at the given location
    #[error("repository not initialized: {0}")]
    NotInitialized(PathBuf),

    /// repo is empty (no commits, so no head)
    #[error("repository is empty: no commits found")]
    EmptyRepository,

    /// the commit was not found
    #[error("commit not found: {0}")]
    CommitNotFound(String),

    /// internal error that shouldn't happen
    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// check if this error indicates the resource doesn't exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::FileNotFound { .. }
                | StoreError::DirectoryNotFound { .. }
                | StoreError::CommitNotFound(_)
                | StoreError::NotInitialized(_)
        )
    }

    /// check if this error is a conflict
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::FileAlreadyExists { .. }
                | StoreError::DirectoryAlreadyExists { .. }
                | StoreError::EntryConflict { .. }
                | StoreError::ConcurrentModification { .. }
        )
    }

    /// check if this error is recoverable by rebuilding against the fresh head
    pub fn is_retriable(&self) -> bool {
        matches!(self, StoreError::ConcurrentModification { .. })
    }
}

/// result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
