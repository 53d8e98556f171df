//! core type-safe wrappers around git primitives for the store layer.

use std::fmt;
use std::fmt::Formatter;

use git2::Oid;

/// This makes sure we don't accidentally pass a blob ID where a commit ID
/// is expected. The inner Oid is only accessible within the store module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitId(pub(crate) Oid);

impl CommitId {
    pub(crate) fn new(oid: Oid) -> Self {
        Self(oid)
    }

    /// raw Oid (for internal use only)
    pub(crate) fn raw(&self) -> Oid {
        self.0
    }

    /// parse a CommitId from its hex string form (the "oid" exposed to API clients)
    pub fn from_hex(hex: &str) -> Result<Self, git2::Error> {
        Oid::from_str(hex).map(CommitId)
    }

    /// short form of the commit ID
    pub fn short(&self) -> String {
        self.0.to_string()[..7].to_string()
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Git blob identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlobId(pub(crate) Oid);

impl BlobId {
    pub(crate) fn new(oid: Oid) -> Self {
        Self(oid)
    }

    pub(crate) fn raw(&self) -> Oid {
        self.0
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Git tree identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(pub(crate) Oid);

impl TreeId {
    pub(crate) fn new(oid: Oid) -> Self {
        Self(oid)
    }

    pub(crate) fn raw(&self) -> Oid {
        self.0
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated directory path, relative to the repository root.
///
/// The empty path is the root. Non-root paths are slash-separated segments
/// with the same character restrictions as [`FileName`]; `.` and `..`
/// segments are rejected so a path can never escape the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirPath(String);

impl DirPath {
    /// the repository root
    pub fn root() -> Self {
        Self(String::new())
    }

    /// create a new DirPath, validating every segment
    pub fn new(path: impl Into<String>) -> Result<Self, InvalidNameError> {
        let path = path.into();
        if path.is_empty() {
            return Ok(Self(path));
        }
        if path.starts_with('/') || path.ends_with('/') {
            return Err(InvalidNameError::InvalidPath(path));
        }
        for segment in path.split('/') {
            validate_segment(segment)?;
        }
        Ok(Self(path))
    }

    /// whether this is the repository root
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// iterate the path segments (empty for the root)
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// full slash-separated path of a file inside this directory
    pub fn join(&self, filename: &FileName) -> String {
        if self.is_root() {
            filename.as_str().to_string()
        } else {
            format!("{}/{}", self.0, filename)
        }
    }
}

impl fmt::Display for DirPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated file name (single path segment).
///
/// File names become tree entries and working-copy paths, so they carry the
/// same restrictions the store applies everywhere: 1-255 ascii characters
/// from `[A-Za-z0-9._-]`, never `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileName(String);

impl FileName {
    /// create a new FileName, validating the input
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidNameError> {
        let name = name.into();
        validate_segment(&name)?;
        Ok(Self(name))
    }

    /// get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// derive the translated file name for a language code.
    ///
    /// The code is inserted immediately before the final extension:
    /// `index.md` + `fi` -> `index.fi.md`. A name without an extension gets
    /// the code appended as one.
    pub fn with_language(&self, code: &str) -> Self {
        match self.0.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Self(format!("{}.{}.{}", stem, code, ext)),
            _ => Self(format!("{}.{}", self.0, code)),
        }
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// validate one path segment (shared by DirPath and FileName)
fn validate_segment(segment: &str) -> Result<(), InvalidNameError> {
    if segment.is_empty() {
        return Err(InvalidNameError::Empty);
    }
    if segment.len() > 255 {
        return Err(InvalidNameError::TooLong(segment.len()));
    }
    if segment == "." || segment == ".." {
        return Err(InvalidNameError::InvalidPath(segment.to_string()));
    }
    for (i, c) in segment.chars().enumerate() {
        if !c.is_ascii_alphanumeric() && c != '_' && c != '-' && c != '.' {
            return Err(InvalidNameError::InvalidCharacter { char: c, position: i });
        }
    }
    Ok(())
}

/// commit signature (the authenticated caller's identity)
#[derive(Debug, Clone)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

impl Signature {
    /// create a new signature
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// default signature for system-generated commits (repository init)
    pub fn system() -> Self {
        Self::new("vellum", "vellum@localhost")
    }

    /// convert to git2::Signature
    pub(crate) fn to_git2_signature(&self) -> Result<git2::Signature<'static>, git2::Error> {
        git2::Signature::now(&self.name, &self.email)
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::system()
    }
}

/// error type for invalid names and paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidNameError {
    Empty,
    TooLong(usize),
    InvalidCharacter { char: char, position: usize },
    InvalidPath(String),
}

impl fmt::Display for InvalidNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "name cannot be empty"),
            Self::TooLong(len) => write!(f, "name too long: {} characters", len),
            Self::InvalidCharacter { char, position } => {
                write!(f, "invalid character '{}' at position {}", char, position)
            }
            Self::InvalidPath(path) => write!(f, "invalid path: '{}'", path),
        }
    }
}

impl std::error::Error for InvalidNameError {}
