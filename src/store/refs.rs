//! Head reference management.
//!
//! The head is the single mutable pointer in the whole store: everything
//! else is immutable content-addressed objects. It lives at
//! `refs/heads/main` and moves only after the new commit object exists,
//! through a compare-and-swap on the expected prior value.

use git2::Repository;

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::CommitId;

/// the branch backing the head reference
pub const HEAD_BRANCH: &str = "main";

fn head_ref_path() -> String {
    format!("refs/heads/{}", HEAD_BRANCH)
}

/// Manages the head reference.
pub struct RefManager;

impl RefManager {
    /// Get the current head commit.
    ///
    /// A fresh repository with no commits yet reports `EmptyRepository`,
    /// which is distinct from "repository does not exist" (a failure at the
    /// open step).
    pub fn head_commit(repo: &Repository) -> StoreResult<CommitId> {
        let head = repo.head().map_err(|e| {
            if e.code() == git2::ErrorCode::UnbornBranch {
                StoreError::EmptyRepository
            } else {
                StoreError::Git(e)
            }
        })?;

        let commit = head.peel_to_commit()?;
        Ok(CommitId::new(commit.id()))
    }

    /// Move head only if it still points to the expected commit.
    ///
    /// This is the lost-update guard: a writer that built its tree against a
    /// stale head fails here with `ConcurrentModification` and must retry
    /// against the fresh head.
    pub fn update_head_if_unchanged(
        repo: &Repository,
        expected: CommitId,
        new_target: CommitId,
    ) -> StoreResult<()> {
        let mut reference = repo.find_reference(&head_ref_path())?;
        let current = reference
            .target()
            .map(CommitId::new)
            .ok_or(StoreError::EmptyRepository)?;

        if current != expected {
            return Err(StoreError::ConcurrentModification {
                expected: expected.to_string(),
                found: current.to_string(),
            });
        }

        // libgit2 re-validates against the value read at lookup, so a writer
        // from another handle that moves the ref after the check above still
        // fails the swap instead of overwriting it
        reference
            .set_target(
                new_target.raw(),
                &format!("commit: advance head to {}", new_target.short()),
            )
            .map_err(|e| {
                if e.code() == git2::ErrorCode::Modified {
                    let found = Self::head_commit(repo)
                        .map(|c| c.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());
                    StoreError::ConcurrentModification {
                        expected: expected.to_string(),
                        found,
                    }
                } else {
                    StoreError::Git(e)
                }
            })?;

        Ok(())
    }

    /// Initialize the head branch after the initial commit.
    ///
    /// Ensures `main` exists at the initial commit and HEAD points to it.
    pub fn init_head(repo: &Repository, initial_commit: CommitId) -> StoreResult<()> {
        if repo.find_reference(&head_ref_path()).is_err() {
            let commit = repo.find_commit(initial_commit.raw())?;
            repo.branch(HEAD_BRANCH, &commit, false)?;
        }

        repo.set_head(&head_ref_path())?;
        Ok(())
    }
}
