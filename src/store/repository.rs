//! Core document store.
//!
//! This is the central component of the store layer. It wraps
//! `git2::Repository` with thread-safe access and implements every write
//! operation as one linear pipeline:
//!
//! ```text
//! read base tree -> precondition -> encode/stage -> build tree
//!     -> create commit -> move head (CAS) -> sync working copy
//! ```
//!
//! Nothing is visible until the head moves; if any step before that fails,
//! head is untouched and no partial state exists. A working-copy sync
//! failure after the head move does not fail the write - the revision is
//! already durable - it rides along as a [`SyncWarning`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use git2::Repository;
use parking_lot::RwLock;

use crate::config::LanguageConfig;
use crate::document::codec;
use crate::document::{Document, FrontMatter};
use crate::store::blob::{read_blob, write_blob};
use crate::store::checkout::{reconcile_or_warn, SyncWarning};
use crate::store::commit::{self, CommitBuilder, CommitInfo};
use crate::store::error::{StoreError, StoreResult};
use crate::store::refs::RefManager;
use crate::store::tree::TreeMutator;
use crate::store::types::{CommitId, DirPath, FileName, Signature, TreeId};

/// per-directory metadata file. Doubles as the directory placeholder, since
/// a git tree cannot hold an empty directory.
pub const DIR_META_FILE: &str = "_index.md";

/// the input to a file write operation; transient, never persisted
#[derive(Debug, Clone)]
pub struct WriteRequest {
    pub path: DirPath,
    pub filename: FileName,
    pub body: String,
    pub front_matter: FrontMatter,
    pub message: String,
    pub committer: Signature,
}

/// the result of a successful write: the new revision plus an optional
/// working-copy sync warning
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub revision: CommitId,
    pub sync: Option<SyncWarning>,
}

/// a fully loaded document, as handed to the API layer
#[derive(Debug, Clone)]
pub struct File {
    pub path: String,
    pub filename: String,
    pub title: String,
    pub author: String,
    pub body: String,
}

/// a directory listing entry (no body)
#[derive(Debug, Clone)]
pub struct FileItem {
    pub path: String,
    pub filename: String,
    pub title: String,
    pub author: String,
}

/// The main document store handle.
///
/// Clone this to share within a process - it uses Arc internally. Reads run
/// under the read lock against immutable objects; every write operation runs
/// entirely under the write lock, and the compare-and-swap on head catches
/// writers that raced through independently opened handles.
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<DocumentStoreInner>,
}

struct DocumentStoreInner {
    repo: RwLock<Repository>,
    path: PathBuf,
}

impl DocumentStore {
    /// Open an existing store.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let repo =
            Repository::open(path).map_err(|_| StoreError::NotInitialized(path.to_path_buf()))?;

        Ok(Self {
            inner: Arc::new(DocumentStoreInner {
                repo: RwLock::new(repo),
                path: path.to_path_buf(),
            }),
        })
    }

    /// Initialize a new store with an empty initial revision.
    pub fn init(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let repo = Repository::init(path)?;

        let store = Self {
            inner: Arc::new(DocumentStoreInner {
                repo: RwLock::new(repo),
                path: path.to_path_buf(),
            }),
        };

        store.with_repo_mut(|repo| {
            let commit_id = commit::create_initial_commit(repo, &Signature::system())?;
            RefManager::init_head(repo, commit_id)?;
            Ok(())
        })?;

        Ok(store)
    }

    /// Open or initialize a store.
    pub fn open_or_init(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if path.join(".git").exists() {
            Self::open(path)
        } else {
            Self::init(path)
        }
    }

    /// Get the store's working-copy path.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Execute a function with read access to the repository.
    fn with_repo<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Repository) -> StoreResult<T>,
    {
        let repo = self.inner.repo.read();
        f(&repo)
    }

    /// Execute a function with write access to the repository.
    fn with_repo_mut<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Repository) -> StoreResult<T>,
    {
        let repo = self.inner.repo.write();
        f(&repo)
    }

    // ==================== Revision History ====================

    /// Get the current head commit.
    pub fn head(&self) -> StoreResult<CommitId> {
        self.with_repo(RefManager::head_commit)
    }

    /// Look up a commit by id.
    pub fn lookup(&self, id: CommitId) -> StoreResult<CommitInfo> {
        self.with_repo(|repo| commit::get_commit(repo, id))
    }

    /// Walk history from a commit, newest first.
    pub fn history(&self, from: CommitId, limit: Option<usize>) -> StoreResult<Vec<CommitInfo>> {
        self.with_repo(|repo| {
            let iter = commit::history(repo, from)?;
            match limit {
                Some(n) => iter.take(n).collect(),
                None => iter.collect(),
            }
        })
    }

    // ==================== Write Operations ====================

    /// Create a new file. Fails if the file already exists at the base tree.
    pub fn create_file(&self, request: &WriteRequest, at: CommitId) -> StoreResult<WriteOutcome> {
        self.with_repo_mut(|repo| {
            let tree = commit::get_tree_at_commit(repo, at)?;

            if tree.file_exists(repo, &request.path, &request.filename)? {
                return Err(StoreError::FileAlreadyExists {
                    path: request.path.join(&request.filename),
                });
            }

            let document = Document::new(request.front_matter.clone(), request.body.clone());
            let blob_id = write_blob(repo, &codec::encode(&document)?)?;

            let mut mutator = TreeMutator::from_tree(repo, &tree);
            mutator.add_blob(&request.path, &request.filename, blob_id)?;

            self.commit_and_sync(repo, at, mutator.write(), &request.message, &request.committer)
        })
    }

    /// Create an empty file (blank metadata, empty body).
    pub fn create_empty_file(
        &self,
        path: &DirPath,
        filename: &FileName,
        message: &str,
        committer: &Signature,
        at: CommitId,
    ) -> StoreResult<WriteOutcome> {
        let request = WriteRequest {
            path: path.clone(),
            filename: filename.clone(),
            body: String::new(),
            front_matter: FrontMatter::default(),
            message: message.to_string(),
            committer: committer.clone(),
        };
        self.create_file(&request, at)
    }

    /// Update an existing file. Fails if the file is absent from the base tree.
    pub fn update_file(&self, request: &WriteRequest, at: CommitId) -> StoreResult<WriteOutcome> {
        self.with_repo_mut(|repo| {
            let tree = commit::get_tree_at_commit(repo, at)?;

            if !tree.file_exists(repo, &request.path, &request.filename)? {
                return Err(StoreError::FileNotFound {
                    path: request.path.join(&request.filename),
                });
            }

            let document = Document::new(request.front_matter.clone(), request.body.clone());
            let blob_id = write_blob(repo, &codec::encode(&document)?)?;

            let mut mutator = TreeMutator::from_tree(repo, &tree);
            mutator.add_blob(&request.path, &request.filename, blob_id)?;

            self.commit_and_sync(repo, at, mutator.write(), &request.message, &request.committer)
        })
    }

    /// Delete a file. Fails if the file is absent from the base tree.
    pub fn delete_file(
        &self,
        path: &DirPath,
        filename: &FileName,
        message: &str,
        committer: &Signature,
        at: CommitId,
    ) -> StoreResult<WriteOutcome> {
        self.with_repo_mut(|repo| {
            let tree = commit::get_tree_at_commit(repo, at)?;

            let mut mutator = TreeMutator::from_tree(repo, &tree);
            mutator.remove_entry(path, filename)?;

            self.commit_and_sync(repo, at, mutator.write(), message, committer)
        })
    }

    /// Create a directory by materializing its metadata placeholder file.
    ///
    /// Existence is checked against the base tree, not the filesystem - the
    /// working copy is derived state.
    pub fn create_directory(
        &self,
        path: &DirPath,
        message: &str,
        committer: &Signature,
        at: CommitId,
    ) -> StoreResult<WriteOutcome> {
        self.with_repo_mut(|repo| {
            let tree = commit::get_tree_at_commit(repo, at)?;

            if path.is_root() || tree.dir_exists(repo, path)? {
                return Err(StoreError::DirectoryAlreadyExists {
                    path: path.as_str().to_string(),
                });
            }

            let blob_id = write_blob(repo, &codec::encode(&Document::empty())?)?;
            let meta = FileName::new(DIR_META_FILE)?;

            let mut mutator = TreeMutator::from_tree(repo, &tree);
            mutator.add_blob(path, &meta, blob_id)?;

            self.commit_and_sync(repo, at, mutator.write(), message, committer)
        })
    }

    /// Delete a directory and everything under it in a single commit.
    pub fn delete_directory(
        &self,
        path: &DirPath,
        message: &str,
        committer: &Signature,
        at: CommitId,
    ) -> StoreResult<WriteOutcome> {
        self.with_repo_mut(|repo| {
            let tree = commit::get_tree_at_commit(repo, at)?;

            let mut mutator = TreeMutator::from_tree(repo, &tree);
            mutator.remove_subtree(path)?;

            self.commit_and_sync(repo, at, mutator.write(), message, committer)
        })
    }

    /// Upsert a directory's metadata file.
    ///
    /// The directory must exist; its `_index.md` is created if absent and
    /// replaced if present.
    pub fn update_directory_meta(
        &self,
        path: &DirPath,
        front_matter: FrontMatter,
        body: &str,
        message: &str,
        committer: &Signature,
        at: CommitId,
    ) -> StoreResult<WriteOutcome> {
        self.with_repo_mut(|repo| {
            let tree = commit::get_tree_at_commit(repo, at)?;

            if !tree.dir_exists(repo, path)? {
                return Err(StoreError::DirectoryNotFound {
                    path: path.as_str().to_string(),
                });
            }

            let document = Document::new(front_matter, body);
            let blob_id = write_blob(repo, &codec::encode(&document)?)?;
            let meta = FileName::new(DIR_META_FILE)?;

            let mut mutator = TreeMutator::from_tree(repo, &tree);
            mutator.add_blob(path, &meta, blob_id)?;

            self.commit_and_sync(repo, at, mutator.write(), message, committer)
        })
    }

    /// Create a translated copy of a document.
    ///
    /// The target language must be enabled in configuration. The target file
    /// name is the source name with the language code inserted before the
    /// extension; the body is copied unchanged and the copy's draft flag is
    /// forced on, leaving the source untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn create_translation(
        &self,
        path: &DirPath,
        filename: &FileName,
        language: &str,
        languages: &LanguageConfig,
        message: &str,
        committer: &Signature,
        at: CommitId,
    ) -> StoreResult<WriteOutcome> {
        self.with_repo_mut(|repo| {
            if !languages.is_enabled(language) {
                return Err(StoreError::LanguageNotEnabled(language.to_string()));
            }

            let tree = commit::get_tree_at_commit(repo, at)?;

            let source_blob = tree.get_file_blob_id(repo, path, filename)?.ok_or_else(|| {
                StoreError::FileNotFound {
                    path: path.join(filename),
                }
            })?;

            let target = filename.with_language(language);
            if tree.file_exists(repo, path, &target)? {
                return Err(StoreError::FileAlreadyExists {
                    path: path.join(&target),
                });
            }

            let source_path = path.join(filename);
            let mut document = codec::decode(&source_path, &read_blob(repo, source_blob)?)?;
            document.front_matter.draft = true;

            let blob_id = write_blob(repo, &codec::encode(&document)?)?;

            let mut mutator = TreeMutator::from_tree(repo, &tree);
            mutator.add_blob(path, &target, blob_id)?;

            self.commit_and_sync(repo, at, mutator.write(), message, committer)
        })
    }

    /// shared tail of every write: commit against the expected parent, swap
    /// head, reconcile the working copy
    fn commit_and_sync(
        &self,
        repo: &Repository,
        base: CommitId,
        tree_id: TreeId,
        message: &str,
        committer: &Signature,
    ) -> StoreResult<WriteOutcome> {
        let revision = CommitBuilder::new(repo)
            .tree(tree_id)
            .parent(base)
            .message(message)
            .signature(committer.clone())
            .commit()?;

        RefManager::update_head_if_unchanged(repo, base, revision)?;
        tracing::debug!(revision = %revision, "committed revision");

        let sync = reconcile_or_warn(repo, revision);
        Ok(WriteOutcome { revision, sync })
    }

    // ==================== Reads ====================

    /// Load a document at a revision.
    pub fn get_file(&self, at: CommitId, path: &DirPath, filename: &FileName) -> StoreResult<File> {
        self.with_repo(|repo| {
            let tree = commit::get_tree_at_commit(repo, at)?;

            let blob_id = tree.get_file_blob_id(repo, path, filename)?.ok_or_else(|| {
                StoreError::FileNotFound {
                    path: path.join(filename),
                }
            })?;

            let full_path = path.join(filename);
            let document = codec::decode(&full_path, &read_blob(repo, blob_id)?)?;

            Ok(File {
                path: path.as_str().to_string(),
                filename: filename.as_str().to_string(),
                title: document.front_matter.title,
                author: document.front_matter.author,
                body: document.body,
            })
        })
    }

    /// List the documents of a directory at a revision.
    ///
    /// The directory's own metadata placeholder is not listed, so an
    /// existing directory with no documents yields an empty list. A path
    /// never reached during the tree walk is a `DirectoryNotFound`.
    pub fn list_dir(&self, at: CommitId, path: &DirPath) -> StoreResult<Vec<FileItem>> {
        self.with_repo(|repo| {
            let tree = commit::get_tree_at_commit(repo, at)?;

            let entries = tree.list_files(repo, path)?.ok_or_else(|| {
                StoreError::DirectoryNotFound {
                    path: path.as_str().to_string(),
                }
            })?;

            let mut items = Vec::with_capacity(entries.len());
            for (name, blob_id) in entries {
                if name.as_str() == DIR_META_FILE {
                    continue;
                }
                let full_path = path.join(&name);
                let document = codec::decode(&full_path, &read_blob(repo, blob_id)?)?;
                items.push(FileItem {
                    path: path.as_str().to_string(),
                    filename: name.as_str().to_string(),
                    title: document.front_matter.title,
                    author: document.front_matter.author,
                });
            }

            Ok(items)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DocumentStore) {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::init(dir.path()).unwrap();
        (dir, store)
    }

    fn request(path: &str, filename: &str, body: &str, title: &str) -> WriteRequest {
        WriteRequest {
            path: DirPath::new(path).unwrap(),
            filename: FileName::new(filename).unwrap(),
            body: body.to_string(),
            front_matter: FrontMatter {
                title: title.to_string(),
                author: "alice".to_string(),
                ..Default::default()
            },
            message: format!("edit {}/{}", path, filename),
            committer: Signature::new("alice", "alice@example.com"),
        }
    }

    #[test]
    fn test_init_and_open() {
        let dir = TempDir::new().unwrap();

        let store = DocumentStore::init(dir.path()).unwrap();
        let head1 = store.head().unwrap();

        drop(store);
        let store = DocumentStore::open(dir.path()).unwrap();
        let head2 = store.head().unwrap();

        assert_eq!(head1, head2);
    }

    #[test]
    fn test_open_missing_repository() {
        let dir = TempDir::new().unwrap();
        let result = DocumentStore::open(dir.path().join("nope"));
        assert!(matches!(result, Err(StoreError::NotInitialized(_))));
    }

    #[test]
    fn test_create_file_advances_head() {
        let (_dir, store) = setup();
        let head = store.head().unwrap();

        let outcome = store.create_file(&request("documents", "doc.md", "body\n", "Doc"), head).unwrap();

        assert!(outcome.sync.is_none());
        assert_eq!(store.head().unwrap(), outcome.revision);

        let file = store
            .get_file(
                outcome.revision,
                &DirPath::new("documents").unwrap(),
                &FileName::new("doc.md").unwrap(),
            )
            .unwrap();
        assert_eq!(file.title, "Doc");
        assert_eq!(file.author, "alice");
        assert_eq!(file.body, "body\n");
    }

    #[test]
    fn test_create_file_materializes_working_copy() {
        let (dir, store) = setup();
        let head = store.head().unwrap();

        store.create_file(&request("documents", "doc.md", "hello\n", "Doc"), head).unwrap();

        let on_disk = std::fs::read_to_string(dir.path().join("documents/doc.md")).unwrap();
        assert!(on_disk.contains("hello"));
        assert!(on_disk.contains("title = \"Doc\""));
    }

    #[test]
    fn test_create_duplicate_file_fails_and_leaves_head() {
        let (_dir, store) = setup();
        let head = store.head().unwrap();
        let head = store
            .create_file(&request("documents", "doc.md", "original\n", "Doc"), head)
            .unwrap()
            .revision;

        let result = store.create_file(&request("documents", "doc.md", "other\n", "Doc"), head);
        assert!(matches!(result, Err(StoreError::FileAlreadyExists { .. })));

        // head and content unchanged
        assert_eq!(store.head().unwrap(), head);
        let file = store
            .get_file(
                head,
                &DirPath::new("documents").unwrap(),
                &FileName::new("doc.md").unwrap(),
            )
            .unwrap();
        assert_eq!(file.body, "original\n");
    }

    #[test]
    fn test_create_empty_file() {
        let (_dir, store) = setup();
        let head = store.head().unwrap();

        let outcome = store
            .create_empty_file(
                &DirPath::new("documents").unwrap(),
                &FileName::new("empty.md").unwrap(),
                "create empty file",
                &Signature::new("alice", "alice@example.com"),
                head,
            )
            .unwrap();

        let file = store
            .get_file(
                outcome.revision,
                &DirPath::new("documents").unwrap(),
                &FileName::new("empty.md").unwrap(),
            )
            .unwrap();
        assert!(file.body.is_empty());
        assert!(file.title.is_empty());
    }

    #[test]
    fn test_update_file() {
        let (_dir, store) = setup();
        let head = store.head().unwrap();
        let head = store
            .create_file(&request("documents", "doc.md", "v1\n", "Doc"), head)
            .unwrap()
            .revision;

        let head = store
            .update_file(&request("documents", "doc.md", "v2\n", "Doc"), head)
            .unwrap()
            .revision;

        let file = store
            .get_file(
                head,
                &DirPath::new("documents").unwrap(),
                &FileName::new("doc.md").unwrap(),
            )
            .unwrap();
        assert_eq!(file.body, "v2\n");
    }

    #[test]
    fn test_update_missing_file_fails() {
        let (_dir, store) = setup();
        let head = store.head().unwrap();

        let result = store.update_file(&request("documents", "missing.md", "x\n", "X"), head);
        assert!(matches!(result, Err(StoreError::FileNotFound { .. })));
        assert_eq!(store.head().unwrap(), head);
    }

    #[test]
    fn test_delete_file() {
        let (dir, store) = setup();
        let sig = Signature::new("alice", "alice@example.com");
        let head = store.head().unwrap();
        let head = store
            .create_file(&request("documents", "doc.md", "body\n", "Doc"), head)
            .unwrap()
            .revision;

        let head = store
            .delete_file(
                &DirPath::new("documents").unwrap(),
                &FileName::new("doc.md").unwrap(),
                "delete documents/doc.md",
                &sig,
                head,
            )
            .unwrap()
            .revision;

        let result = store.get_file(
            head,
            &DirPath::new("documents").unwrap(),
            &FileName::new("doc.md").unwrap(),
        );
        assert!(matches!(result, Err(StoreError::FileNotFound { .. })));
        assert!(!dir.path().join("documents/doc.md").exists());
    }

    #[test]
    fn test_delete_missing_file_fails() {
        let (_dir, store) = setup();
        let sig = Signature::new("alice", "alice@example.com");
        let head = store.head().unwrap();

        let result = store.delete_file(
            &DirPath::new("documents").unwrap(),
            &FileName::new("missing.md").unwrap(),
            "delete",
            &sig,
            head,
        );
        assert!(matches!(result, Err(StoreError::FileNotFound { .. })));
        assert_eq!(store.head().unwrap(), head);
    }

    #[test]
    fn test_create_directory() {
        let (dir, store) = setup();
        let sig = Signature::new("alice", "alice@example.com");
        let head = store.head().unwrap();

        let head = store
            .create_directory(
                &DirPath::new("appendices").unwrap(),
                "create appendices",
                &sig,
                head,
            )
            .unwrap()
            .revision;

        // placeholder exists, directory lists as empty
        assert!(dir.path().join("appendices/_index.md").exists());
        let items = store.list_dir(head, &DirPath::new("appendices").unwrap()).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_create_existing_directory_fails() {
        let (_dir, store) = setup();
        let sig = Signature::new("alice", "alice@example.com");
        let head = store.head().unwrap();
        let head = store
            .create_directory(&DirPath::new("appendices").unwrap(), "create", &sig, head)
            .unwrap()
            .revision;

        let result =
            store.create_directory(&DirPath::new("appendices").unwrap(), "create", &sig, head);
        assert!(matches!(result, Err(StoreError::DirectoryAlreadyExists { .. })));
        assert_eq!(store.head().unwrap(), head);
    }

    #[test]
    fn test_delete_directory_single_commit() {
        let (dir, store) = setup();
        let sig = Signature::new("alice", "alice@example.com");
        let mut head = store.head().unwrap();

        for i in 0..3 {
            head = store
                .create_file(
                    &request("appendices", &format!("a{}.md", i), "x\n", "A"),
                    head,
                )
                .unwrap()
                .revision;
        }
        head = store
            .create_file(&request("documents", "keep.md", "keep\n", "Keep"), head)
            .unwrap()
            .revision;

        let history_before = store.history(head, None).unwrap().len();

        let outcome = store
            .delete_directory(&DirPath::new("appendices").unwrap(), "drop appendices", &sig, head)
            .unwrap();

        // head advanced exactly once
        assert_eq!(store.head().unwrap(), outcome.revision);
        let history_after = store.history(outcome.revision, None).unwrap().len();
        assert_eq!(history_after, history_before + 1);

        // all files gone from tree and working copy; unrelated file intact
        let result = store.list_dir(outcome.revision, &DirPath::new("appendices").unwrap());
        assert!(matches!(result, Err(StoreError::DirectoryNotFound { .. })));
        assert!(!dir.path().join("appendices").exists());
        assert!(dir.path().join("documents/keep.md").exists());
    }

    #[test]
    fn test_delete_missing_directory_fails() {
        let (_dir, store) = setup();
        let sig = Signature::new("alice", "alice@example.com");
        let head = store.head().unwrap();

        let result = store.delete_directory(&DirPath::new("nope").unwrap(), "drop", &sig, head);
        assert!(matches!(result, Err(StoreError::DirectoryNotFound { .. })));
        assert_eq!(store.head().unwrap(), head);
    }

    #[test]
    fn test_update_directory_meta_upserts() {
        let (_dir, store) = setup();
        let sig = Signature::new("alice", "alice@example.com");
        let head = store.head().unwrap();
        let path = DirPath::new("documents").unwrap();
        let head = store
            .create_file(&request("documents", "doc.md", "x\n", "Doc"), head)
            .unwrap()
            .revision;

        // created if absent
        let fm = FrontMatter {
            title: "Documents".to_string(),
            ..Default::default()
        };
        let head = store
            .update_directory_meta(&path, fm, "", "set meta", &sig, head)
            .unwrap()
            .revision;

        let meta = store
            .get_file(head, &path, &FileName::new(DIR_META_FILE).unwrap())
            .unwrap();
        assert_eq!(meta.title, "Documents");

        // updated if present
        let fm = FrontMatter {
            title: "All documents".to_string(),
            ..Default::default()
        };
        let head = store
            .update_directory_meta(&path, fm, "", "update meta", &sig, head)
            .unwrap()
            .revision;

        let meta = store
            .get_file(head, &path, &FileName::new(DIR_META_FILE).unwrap())
            .unwrap();
        assert_eq!(meta.title, "All documents");
    }

    #[test]
    fn test_update_meta_of_missing_directory_fails() {
        let (_dir, store) = setup();
        let sig = Signature::new("alice", "alice@example.com");
        let head = store.head().unwrap();

        let result = store.update_directory_meta(
            &DirPath::new("nope").unwrap(),
            FrontMatter::default(),
            "",
            "set meta",
            &sig,
            head,
        );
        assert!(matches!(result, Err(StoreError::DirectoryNotFound { .. })));
    }

    fn language_config() -> LanguageConfig {
        LanguageConfig {
            default: "en".to_string(),
            enabled: vec!["en".to_string(), "fi".to_string()],
        }
    }

    #[test]
    fn test_create_translation() {
        let (_dir, store) = setup();
        let sig = Signature::new("alice", "alice@example.com");
        let head = store.head().unwrap();
        let path = DirPath::new("documents/document_1").unwrap();
        let head = store
            .create_file(
                &request("documents/document_1", "index.md", "source body\n", "Doc 1"),
                head,
            )
            .unwrap()
            .revision;

        let head = store
            .create_translation(
                &path,
                &FileName::new("index.md").unwrap(),
                "fi",
                &language_config(),
                "translate to fi",
                &sig,
                head,
            )
            .unwrap()
            .revision;

        // target name carries the language code before the extension
        let target = store
            .get_file(head, &path, &FileName::new("index.fi.md").unwrap())
            .unwrap();
        assert_eq!(target.body, "source body\n");

        // the copy is a draft, the source is not
        let repo = git2::Repository::open(store.path()).unwrap();
        let tree = commit::get_tree_at_commit(&repo, head).unwrap();
        let target_blob = tree
            .get_file_blob_id(&repo, &path, &FileName::new("index.fi.md").unwrap())
            .unwrap()
            .unwrap();
        let target_doc = codec::decode("t", &read_blob(&repo, target_blob).unwrap()).unwrap();
        assert!(target_doc.front_matter.draft);

        let source_blob = tree
            .get_file_blob_id(&repo, &path, &FileName::new("index.md").unwrap())
            .unwrap()
            .unwrap();
        let source_doc = codec::decode("s", &read_blob(&repo, source_blob).unwrap()).unwrap();
        assert!(!source_doc.front_matter.draft);
    }

    #[test]
    fn test_translation_language_not_enabled() {
        let (_dir, store) = setup();
        let sig = Signature::new("alice", "alice@example.com");
        let head = store.head().unwrap();
        let head = store
            .create_file(&request("documents", "doc.md", "x\n", "Doc"), head)
            .unwrap()
            .revision;

        let result = store.create_translation(
            &DirPath::new("documents").unwrap(),
            &FileName::new("doc.md").unwrap(),
            "de",
            &language_config(),
            "translate",
            &sig,
            head,
        );
        assert!(matches!(result, Err(StoreError::LanguageNotEnabled(_))));
        assert_eq!(store.head().unwrap(), head);
    }

    #[test]
    fn test_translation_target_already_exists() {
        let (_dir, store) = setup();
        let sig = Signature::new("alice", "alice@example.com");
        let head = store.head().unwrap();
        let head = store
            .create_file(&request("documents", "doc.md", "x\n", "Doc"), head)
            .unwrap()
            .revision;
        let head = store
            .create_translation(
                &DirPath::new("documents").unwrap(),
                &FileName::new("doc.md").unwrap(),
                "fi",
                &language_config(),
                "translate",
                &sig,
                head,
            )
            .unwrap()
            .revision;

        let result = store.create_translation(
            &DirPath::new("documents").unwrap(),
            &FileName::new("doc.md").unwrap(),
            "fi",
            &language_config(),
            "translate again",
            &sig,
            head,
        );
        assert!(matches!(result, Err(StoreError::FileAlreadyExists { .. })));
    }

    #[test]
    fn test_concurrent_writers_stale_head_fails() {
        let (_dir, store) = setup();
        let base = store.head().unwrap();

        // writer A commits first
        let a = store
            .create_file(&request("documents", "a.md", "a\n", "A"), base)
            .unwrap()
            .revision;

        // writer B built against the stale base and must not overwrite A
        let result = store.create_file(&request("documents", "b.md", "b\n", "B"), base);
        assert!(matches!(result, Err(StoreError::ConcurrentModification { .. })));
        assert_eq!(store.head().unwrap(), a);

        // retrying against the fresh head succeeds
        let b = store
            .create_file(&request("documents", "b.md", "b\n", "B"), a)
            .unwrap()
            .revision;
        assert_eq!(store.head().unwrap(), b);
    }

    #[test]
    fn test_list_dir() {
        let (_dir, store) = setup();
        let head = store.head().unwrap();
        let head = store
            .create_file(&request("documents", "a.md", "a\n", "Alpha"), head)
            .unwrap()
            .revision;
        let head = store
            .create_file(&request("documents", "b.md", "b\n", "Beta"), head)
            .unwrap()
            .revision;

        let items = store.list_dir(head, &DirPath::new("documents").unwrap()).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().any(|i| i.filename == "a.md" && i.title == "Alpha"));
        assert!(items.iter().any(|i| i.filename == "b.md" && i.title == "Beta"));

        let result = store.list_dir(head, &DirPath::new("never-created").unwrap());
        assert!(matches!(result, Err(StoreError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_history_walk() {
        let (_dir, store) = setup();
        let head = store.head().unwrap();
        let head = store
            .create_file(&request("documents", "a.md", "a\n", "A"), head)
            .unwrap()
            .revision;
        let head = store
            .create_file(&request("documents", "b.md", "b\n", "B"), head)
            .unwrap()
            .revision;

        let history = store.history(head, None).unwrap();
        assert_eq!(history.len(), 3); // init + two writes
        assert_eq!(history[0].id, head);
        assert!(history.last().unwrap().is_root());

        let limited = store.history(head, Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_lookup() {
        let (_dir, store) = setup();
        let head = store.head().unwrap();
        let outcome = store
            .create_file(&request("documents", "a.md", "a\n", "A"), head)
            .unwrap();

        let info = store.lookup(outcome.revision).unwrap();
        assert_eq!(info.id, outcome.revision);
        assert_eq!(info.parent_id, Some(head));
        assert_eq!(info.author_name, "alice");
    }
}
