//! vellum - a Git-backed versioned document store
//!
//! Every file and directory mutation is committed as an atomic snapshot to a
//! content-addressable revision history, with the working copy on disk kept
//! in sync. History is strictly linear: one head, one parent per commit, no
//! merges.
//!
//! # Example
//!
//! ```no_run
//! use vellum::store::{DocumentStore, DirPath, FileName, Signature, WriteRequest};
//! use vellum::document::FrontMatter;
//!
//! let store = DocumentStore::open_or_init("./content").unwrap();
//! let head = store.head().unwrap();
//!
//! let outcome = store.create_file(&WriteRequest {
//!     path: DirPath::new("documents").unwrap(),
//!     filename: FileName::new("doc.md").unwrap(),
//!     body: "# Hello\n".into(),
//!     front_matter: FrontMatter { title: "Hello".into(), ..Default::default() },
//!     message: "create documents/doc.md".into(),
//!     committer: Signature::new("alice", "alice@example.com"),
//! }, head).unwrap();
//!
//! assert_eq!(store.head().unwrap(), outcome.revision);
//! ```

pub mod config;
pub mod document;
pub mod store;
