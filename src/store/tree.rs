//! Tree operations: reading snapshots and staging new trees.
//!
//! In Git, a tree is a directory. In vellum:
//! - the root tree is the document hierarchy
//! - subtrees are directories, blobs are encoded documents
//!
//! [`TreeHandle`] gives read-only access to the tree at a commit.
//! [`TreeMutator`] is the staging builder: it takes a base tree plus a set of
//! path-scoped edits and produces a new root tree id without ever touching
//! the base. Subtrees untouched by an edit keep their original id, so
//! unchanged files are byte-identical across revisions.

use git2::{FileMode, ObjectType, Oid, Repository, Tree};

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{BlobId, DirPath, FileName, TreeId};

/// A read-only handle to a git tree at a specific commit.
///
/// Think of it as a snapshot - it won't change even if new commits are made.
#[derive(Debug)]
pub struct TreeHandle<'repo> {
    tree: Tree<'repo>,
}

impl<'repo> TreeHandle<'repo> {
    /// create a TreeHandle from a git2::Tree
    pub(crate) fn new(tree: Tree<'repo>) -> Self {
        Self { tree }
    }

    /// get the tree ID
    pub fn id(&self) -> TreeId {
        TreeId::new(self.tree.id())
    }

    /// navigate to the subtree at a directory path.
    ///
    /// Returns `None` if any segment is missing or is not a directory -
    /// the path was never reached during the walk.
    pub fn dir_tree(&self, repo: &'repo Repository, dir: &DirPath) -> StoreResult<Option<Tree<'repo>>> {
        let mut current = repo.find_tree(self.tree.id())?;
        for segment in dir.segments() {
            // take the child oid out before reassigning the borrowed tree
            let child = match current.get_name(segment) {
                Some(entry) if entry.kind() == Some(ObjectType::Tree) => entry.id(),
                _ => return Ok(None),
            };
            current = repo.find_tree(child)?;
        }
        Ok(Some(current))
    }

    /// check if a directory exists in this tree (the root always does)
    pub fn dir_exists(&self, repo: &'repo Repository, dir: &DirPath) -> StoreResult<bool> {
        Ok(self.dir_tree(repo, dir)?.is_some())
    }

    /// get the blob ID for a file, or `None` if absent.
    ///
    /// Fails if the entry at that name is a directory, not a file.
    pub fn get_file_blob_id(
        &self,
        repo: &'repo Repository,
        dir: &DirPath,
        name: &FileName,
    ) -> StoreResult<Option<BlobId>> {
        let table = match self.dir_tree(repo, dir)? {
            Some(tree) => tree,
            None => return Ok(None),
        };
        let found = table.get_name(name.as_str()).map(|e| (e.kind(), e.id()));
        match found {
            Some((Some(ObjectType::Blob), id)) => Ok(Some(BlobId::new(id))),
            Some(_) => Err(StoreError::EntryConflict {
                path: dir.join(name),
                expected: "file".to_string(),
                found: "directory".to_string(),
            }),
            None => Ok(None),
        }
    }

    /// check if a file exists
    pub fn file_exists(
        &self,
        repo: &'repo Repository,
        dir: &DirPath,
        name: &FileName,
    ) -> StoreResult<bool> {
        Ok(self.get_file_blob_id(repo, dir, name)?.is_some())
    }

    /// list the file entries of a directory, or `None` if the directory was
    /// never reached during the walk. An existing directory with no files
    /// yields an empty list - the two cases are deliberately distinct.
    pub fn list_files(
        &self,
        repo: &'repo Repository,
        dir: &DirPath,
    ) -> StoreResult<Option<Vec<(FileName, BlobId)>>> {
        let table = match self.dir_tree(repo, dir)? {
            Some(tree) => tree,
            None => return Ok(None),
        };
        let files = table
            .iter()
            .filter_map(|entry| {
                if entry.kind() != Some(ObjectType::Blob) {
                    return None;
                }
                let name = FileName::new(entry.name()?).ok()?;
                Some((name, BlobId::new(entry.id())))
            })
            .collect();
        Ok(Some(files))
    }
}

/// The staging builder: accumulates path-scoped edits against a base tree
/// and produces a new root tree id. The base tree is never mutated.
///
/// # Usage pattern
///
/// ```ignore
/// let mut mutator = TreeMutator::from_tree(repo, &tree);
/// mutator.add_blob(&dir, &name, blob_id)?;
/// let new_tree_id = mutator.write()?;
/// ```
pub struct TreeMutator<'repo> {
    repo: &'repo Repository,
    /// root tree oid reflecting all edits applied so far
    root: Oid,
}

impl<'repo> TreeMutator<'repo> {
    /// create a new TreeMutator from an existing tree
    pub fn from_tree(repo: &'repo Repository, tree: &TreeHandle<'_>) -> Self {
        Self {
            repo,
            root: tree.id().raw(),
        }
    }

    /// create a new TreeMutator over an empty tree
    pub fn empty(repo: &'repo Repository) -> StoreResult<Self> {
        let builder = repo.treebuilder(None)?;
        let root = builder.write()?;
        Ok(Self { repo, root })
    }

    /// add (or replace) a blob entry at `dir/name`, creating intermediate
    /// directories as needed.
    ///
    /// Fails with an entry conflict if a file sits where a directory is
    /// needed, or a directory where the file goes. A plain already-exists
    /// check for create operations is the caller's responsibility.
    pub fn add_blob(&mut self, dir: &DirPath, name: &FileName, blob_id: BlobId) -> StoreResult<()> {
        let segments: Vec<&str> = dir.segments().collect();
        self.root = self.insert_at(Some(self.root), &segments, dir, name, blob_id)?;
        Ok(())
    }

    fn insert_at(
        &self,
        base: Option<Oid>,
        segments: &[&str],
        dir: &DirPath,
        name: &FileName,
        blob_id: BlobId,
    ) -> StoreResult<Oid> {
        let base_tree = base.map(|oid| self.repo.find_tree(oid)).transpose()?;
        let mut builder = self.repo.treebuilder(base_tree.as_ref())?;

        match segments.split_first() {
            None => {
                if let Some(entry) = builder.get(name.as_str())? {
                    if entry.kind() == Some(ObjectType::Tree) {
                        return Err(StoreError::EntryConflict {
                            path: dir.join(name),
                            expected: "file".to_string(),
                            found: "directory".to_string(),
                        });
                    }
                }
                builder.insert(name.as_str(), blob_id.raw(), FileMode::Blob.into())?;
            }
            Some((first, rest)) => {
                let child_base = match builder.get(first)? {
                    Some(entry) if entry.kind() == Some(ObjectType::Tree) => Some(entry.id()),
                    Some(_) => {
                        return Err(StoreError::EntryConflict {
                            path: dir.as_str().to_string(),
                            expected: "directory".to_string(),
                            found: "file".to_string(),
                        })
                    }
                    None => None,
                };
                let child = self.insert_at(child_base, rest, dir, name, blob_id)?;
                builder.insert(first, child, FileMode::Tree.into())?;
            }
        }

        Ok(builder.write()?)
    }

    /// remove the file entry at `dir/name`.
    ///
    /// Fails if the file is absent. Directories left empty by the removal
    /// are pruned, since git trees do not keep empty directories.
    pub fn remove_entry(&mut self, dir: &DirPath, name: &FileName) -> StoreResult<()> {
        let segments: Vec<&str> = dir.segments().collect();
        let path = dir.join(name);
        self.root = match self.remove_at(self.root, &segments, name, &path)? {
            Some(oid) => oid,
            None => {
                let builder = self.repo.treebuilder(None)?;
                builder.write()?
            }
        };
        Ok(())
    }

    fn remove_at(
        &self,
        base: Oid,
        segments: &[&str],
        name: &FileName,
        path: &str,
    ) -> StoreResult<Option<Oid>> {
        let base_tree = self.repo.find_tree(base)?;
        let mut builder = self.repo.treebuilder(Some(&base_tree))?;

        match segments.split_first() {
            None => {
                match builder.get(name.as_str())? {
                    Some(entry) if entry.kind() == Some(ObjectType::Blob) => {}
                    Some(_) => {
                        return Err(StoreError::EntryConflict {
                            path: path.to_string(),
                            expected: "file".to_string(),
                            found: "directory".to_string(),
                        })
                    }
                    None => {
                        return Err(StoreError::FileNotFound {
                            path: path.to_string(),
                        })
                    }
                }
                builder.remove(name.as_str())?;
            }
            Some((first, rest)) => {
                let child_oid = match builder.get(first)? {
                    Some(entry) if entry.kind() == Some(ObjectType::Tree) => entry.id(),
                    _ => {
                        return Err(StoreError::FileNotFound {
                            path: path.to_string(),
                        })
                    }
                };
                match self.remove_at(child_oid, rest, name, path)? {
                    Some(new_child) => {
                        builder.insert(first, new_child, FileMode::Tree.into())?;
                    }
                    None => {
                        builder.remove(first)?;
                    }
                }
            }
        }

        if builder.len() == 0 {
            return Ok(None);
        }
        Ok(Some(builder.write()?))
    }

    /// remove the entire subtree at a directory path in one edit.
    ///
    /// Fails if the directory is absent (or the entry is a file). The root
    /// itself is not a removable directory.
    pub fn remove_subtree(&mut self, dir: &DirPath) -> StoreResult<()> {
        let segments: Vec<&str> = dir.segments().collect();
        if segments.is_empty() {
            return Err(StoreError::DirectoryNotFound {
                path: dir.as_str().to_string(),
            });
        }
        self.root = match self.remove_subtree_at(self.root, &segments, dir)? {
            Some(oid) => oid,
            None => {
                let builder = self.repo.treebuilder(None)?;
                builder.write()?
            }
        };
        Ok(())
    }

    fn remove_subtree_at(
        &self,
        base: Oid,
        segments: &[&str],
        dir: &DirPath,
    ) -> StoreResult<Option<Oid>> {
        let base_tree = self.repo.find_tree(base)?;
        let mut builder = self.repo.treebuilder(Some(&base_tree))?;

        let (first, rest) = segments
            .split_first()
            .expect("remove_subtree_at requires at least one segment");

        if rest.is_empty() {
            match builder.get(first)? {
                Some(entry) if entry.kind() == Some(ObjectType::Tree) => {}
                Some(_) => {
                    return Err(StoreError::EntryConflict {
                        path: dir.as_str().to_string(),
                        expected: "directory".to_string(),
                        found: "file".to_string(),
                    })
                }
                None => {
                    return Err(StoreError::DirectoryNotFound {
                        path: dir.as_str().to_string(),
                    })
                }
            }
            builder.remove(first)?;
        } else {
            let child_oid = match builder.get(first)? {
                Some(entry) if entry.kind() == Some(ObjectType::Tree) => entry.id(),
                _ => {
                    return Err(StoreError::DirectoryNotFound {
                        path: dir.as_str().to_string(),
                    })
                }
            };
            match self.remove_subtree_at(child_oid, rest, dir)? {
                Some(new_child) => {
                    builder.insert(first, new_child, FileMode::Tree.into())?;
                }
                None => {
                    builder.remove(first)?;
                }
            }
        }

        if builder.len() == 0 {
            return Ok(None);
        }
        Ok(Some(builder.write()?))
    }

    /// finish staging and return the new root tree ID
    pub fn write(self) -> TreeId {
        TreeId::new(self.root)
    }
}
