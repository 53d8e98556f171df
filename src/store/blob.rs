//! Blob operations: the content-addressed object store.
//!
//! A blob is one file's encoded payload. Identity is the digest of the
//! content, so writing identical bytes twice yields the same id and stores
//! nothing new. Blobs are durable in the object database before an id is
//! returned; a tree must never reference an id that failed to persist.

use git2::Repository;

use crate::store::error::StoreResult;
use crate::store::types::BlobId;

/// write bytes as a blob, returning its content id (idempotent)
pub fn write_blob(repo: &Repository, bytes: &[u8]) -> StoreResult<BlobId> {
    let oid = repo.blob(bytes)?;
    Ok(BlobId::new(oid))
}

/// read a blob's content by id
pub fn read_blob(repo: &Repository, blob_id: BlobId) -> StoreResult<Vec<u8>> {
    let blob = repo.find_blob(blob_id.raw())?;
    Ok(blob.content().to_vec())
}
