//! store layer for vellum
//!
//! this module provides a complete abstraction over git for document
//! storage. The consumers (an HTTP/API layer, site generators) use this API
//! and never touch git2 directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      DocumentStore                          │
//! │   (High-level API: write operations, reads, history)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!        ┌─────────────────────┼─────────────────────┐
//!        │                     │                     │
//!        ▼                     ▼                     ▼
//!  ┌─────────────┐       ┌─────────────┐       ┌─────────────┐
//!  │    tree     │       │    blob     │       │    refs     │
//!  │ (staging)   │       │ (documents) │       │   (head)    │
//!  └─────────────┘       └─────────────┘       └─────────────┘
//!         │                     │                     │
//!         └─────────────────────┼─────────────────────┘
//!                               │
//!               ┌───────────────┴──────────────┐
//!               ▼                              ▼
//!        ┌─────────────┐                ┌─────────────┐
//!        │   commit    │                │  checkout   │
//!        │  (history)  │                │ (work copy) │
//!        └─────────────┘                └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use vellum::store::{DocumentStore, WriteRequest, DirPath, FileName, Signature};
//! use vellum::document::FrontMatter;
//!
//! // Initialize or open
//! let store = DocumentStore::open_or_init("./content")?;
//!
//! // Get current state
//! let head = store.head()?;
//!
//! // Create a document
//! let outcome = store.create_file(&WriteRequest {
//!     path: DirPath::new("documents")?,
//!     filename: FileName::new("doc.md")?,
//!     body: "# Hello\n".into(),
//!     front_matter: FrontMatter { title: "Hello".into(), ..Default::default() },
//!     message: "create documents/doc.md".into(),
//!     committer: Signature::new("alice", "alice@example.com"),
//! }, head)?;
//!
//! // Read back at the new revision
//! let file = store.get_file(outcome.revision, &DirPath::new("documents")?, &FileName::new("doc.md")?)?;
//! ```

mod blob;
mod checkout;
mod commit;
mod error;
mod refs;
mod repository;
mod tree;
mod types;

// Re-export public API
pub use checkout::SyncWarning;
pub use commit::CommitInfo;
pub use error::{StoreError, StoreResult};
pub use repository::{DocumentStore, File, FileItem, WriteOutcome, WriteRequest, DIR_META_FILE};
pub use types::{BlobId, CommitId, DirPath, FileName, InvalidNameError, Signature, TreeId};
