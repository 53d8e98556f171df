//! Working-copy sync.
//!
//! After a commit, the on-disk tree is reconciled to exactly match the
//! committed tree: missing paths created, stale files overwritten or
//! removed. The object graph is the source of truth; a failed sync does not
//! fail the write, it is surfaced as a [`SyncWarning`] and retried by the
//! next successful reconcile (at-least-once convergence).

use std::fmt;

use git2::build::CheckoutBuilder;
use git2::Repository;

use crate::store::error::StoreResult;
use crate::store::types::CommitId;

/// the working copy could not be brought in line with a committed revision.
///
/// The revision itself is durable; this only means readers of the raw
/// filesystem may see stale content until the next reconcile.
#[derive(Debug, Clone)]
pub struct SyncWarning {
    pub revision: CommitId,
    pub reason: String,
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "working copy sync failed for {}: {}",
            self.revision, self.reason
        )
    }
}

/// force the working copy to match the tree at `commit_id` (all-or-nothing)
pub fn reconcile(repo: &Repository, commit_id: CommitId) -> StoreResult<()> {
    let commit = repo.find_commit(commit_id.raw())?;
    let mut opts = CheckoutBuilder::new();
    opts.force();
    repo.checkout_tree(commit.as_object(), Some(&mut opts))?;
    Ok(())
}

/// reconcile, downgrading any failure to a logged warning
pub fn reconcile_or_warn(repo: &Repository, commit_id: CommitId) -> Option<SyncWarning> {
    match reconcile(repo, commit_id) {
        Ok(()) => None,
        Err(e) => {
            let warning = SyncWarning {
                revision: commit_id,
                reason: e.to_string(),
            };
            tracing::warn!(revision = %commit_id, error = %e, "working copy sync failed");
            Some(warning)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::blob::write_blob;
    use crate::store::commit::{create_initial_commit, CommitBuilder};
    use crate::store::refs::RefManager;
    use crate::store::tree::TreeMutator;
    use crate::store::types::{DirPath, FileName, Signature};
    use tempfile::TempDir;

    #[test]
    fn test_reconcile_materializes_tree() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let c1 = create_initial_commit(&repo, &Signature::system()).unwrap();
        RefManager::init_head(&repo, c1).unwrap();

        let blob = write_blob(&repo, b"hello").unwrap();
        let base = crate::store::commit::get_tree_at_commit(&repo, c1).unwrap();
        let mut mutator = TreeMutator::from_tree(&repo, &base);
        mutator
            .add_blob(
                &DirPath::new("docs").unwrap(),
                &FileName::new("a.md").unwrap(),
                blob,
            )
            .unwrap();
        let tree_id = mutator.write();

        let c2 = CommitBuilder::new(&repo)
            .tree(tree_id)
            .parent(c1)
            .message("add docs/a.md")
            .commit()
            .unwrap();
        RefManager::update_head_if_unchanged(&repo, c1, c2).unwrap();

        reconcile(&repo, c2).unwrap();
        let on_disk = std::fs::read(dir.path().join("docs/a.md")).unwrap();
        assert_eq!(on_disk, b"hello");

        // reconciling back removes the file again
        reconcile(&repo, c1).unwrap();
        assert!(!dir.path().join("docs/a.md").exists());
    }
}
