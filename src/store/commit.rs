//! Commit creation and history traversal.
//!
//! Commits are the atomic units of change. In vellum:
//! - each write operation creates exactly one commit
//! - history is strictly linear: every commit has zero or one parent
//!
//! This module handles commit creation, lookup and history walking.

use chrono::{DateTime, TimeZone, Utc};
use git2::{Repository, Revwalk, Sort};

use crate::store::error::{StoreError, StoreResult};
use crate::store::tree::TreeHandle;
use crate::store::types::{CommitId, Signature, TreeId};

/// information about a commit
#[derive(Debug, Clone)]
pub struct CommitInfo {
    pub id: CommitId,
    pub tree_id: TreeId,
    pub parent_id: Option<CommitId>,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    pub timestamp: DateTime<Utc>,
}

impl CommitInfo {
    /// create CommitInfo from a git2::Commit
    pub(crate) fn from_git2(commit: &git2::Commit<'_>) -> Self {
        let author = commit.author();
        let time = commit.time();
        let timestamp = Utc
            .timestamp_opt(time.seconds(), 0)
            .single()
            .unwrap_or_else(Utc::now);

        Self {
            id: CommitId::new(commit.id()),
            tree_id: TreeId::new(commit.tree_id()),
            parent_id: commit.parent_ids().next().map(CommitId::new),
            message: commit.message().unwrap_or("").to_string(),
            author_name: author.name().unwrap_or("Unknown").to_string(),
            author_email: author.email().unwrap_or("unknown@unknown").to_string(),
            timestamp,
        }
    }

    /// check if this is the first commit in the repository
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// get a short summary of the commit (first line of message)
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or(&self.message)
    }
}

/// builder for creating commits with a fluent interface
pub struct CommitBuilder<'a> {
    repo: &'a Repository,
    tree_id: Option<TreeId>,
    parent: Option<CommitId>,
    message: String,
    signature: Signature,
    update_ref: Option<String>,
}

impl<'a> CommitBuilder<'a> {
    /// create a new CommitBuilder
    pub fn new(repo: &'a Repository) -> Self {
        Self {
            repo,
            tree_id: None,
            parent: None,
            message: String::new(),
            signature: Signature::system(),
            update_ref: None,
        }
    }

    /// set the tree for this commit
    pub fn tree(mut self, tree_id: TreeId) -> Self {
        self.tree_id = Some(tree_id);
        self
    }

    /// set the parent commit (root commits have none)
    pub fn parent(mut self, parent: CommitId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// set the commit message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// set the author/committer signature
    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    /// update a ref to point to this commit
    pub fn update_ref(mut self, refname: impl Into<String>) -> Self {
        self.update_ref = Some(refname.into());
        self
    }

    /// create the commit and return its ID
    pub fn commit(self) -> StoreResult<CommitId> {
        let tree_id = self
            .tree_id
            .ok_or_else(|| StoreError::Internal("commit requires a tree".to_string()))?;

        let tree = self.repo.find_tree(tree_id.raw())?;
        let sig = self.signature.to_git2_signature()?;

        let parent_commit = self
            .parent
            .map(|id| self.repo.find_commit(id.raw()))
            .transpose()?;
        let parent_refs: Vec<&git2::Commit<'_>> = parent_commit.iter().collect();

        let oid = self.repo.commit(
            self.update_ref.as_deref(),
            &sig,
            &sig,
            &self.message,
            &tree,
            &parent_refs,
        )?;

        Ok(CommitId::new(oid))
    }
}

/// look up a commit by id
pub fn get_commit(repo: &Repository, id: CommitId) -> StoreResult<CommitInfo> {
    let commit = repo
        .find_commit(id.raw())
        .map_err(|_| StoreError::CommitNotFound(id.to_string()))?;

    Ok(CommitInfo::from_git2(&commit))
}

/// get the tree snapshot at a specific commit
pub fn get_tree_at_commit(repo: &Repository, commit_id: CommitId) -> StoreResult<TreeHandle<'_>> {
    let commit = repo
        .find_commit(commit_id.raw())
        .map_err(|_| StoreError::CommitNotFound(commit_id.to_string()))?;

    let tree = commit.tree()?;
    Ok(TreeHandle::new(tree))
}

/// create the initial commit for a new repository (empty tree, no parent)
pub fn create_initial_commit(repo: &Repository, signature: &Signature) -> StoreResult<CommitId> {
    let tree_id = crate::store::tree::TreeMutator::empty(repo)?.write();

    CommitBuilder::new(repo)
        .tree(tree_id)
        .message("Initialize repository")
        .signature(signature.clone())
        .update_ref("HEAD")
        .commit()
}

/// iterate over commit history starting from a commit, newest first
pub struct HistoryIterator<'repo> {
    repo: &'repo Repository,
    revwalk: Revwalk<'repo>,
}

impl<'repo> HistoryIterator<'repo> {
    /// create a new history iterator
    pub fn new(repo: &'repo Repository, start: CommitId) -> StoreResult<Self> {
        let mut revwalk = repo.revwalk()?;
        revwalk.push(start.raw())?;
        revwalk.set_sorting(Sort::TIME | Sort::TOPOLOGICAL)?;

        Ok(Self { repo, revwalk })
    }
}

impl<'repo> Iterator for HistoryIterator<'repo> {
    type Item = StoreResult<CommitInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.revwalk.next()? {
            Ok(oid) => match self.repo.find_commit(oid) {
                Ok(commit) => Some(Ok(CommitInfo::from_git2(&commit))),
                Err(e) => Some(Err(StoreError::Git(e))),
            },
            Err(e) => Some(Err(StoreError::Git(e))),
        }
    }
}

/// walk history from a commit
pub fn history(repo: &Repository, start: CommitId) -> StoreResult<HistoryIterator<'_>> {
    HistoryIterator::new(repo, start)
}
