//! Blob storage for record content referenced by `blob_key`.

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

/// Blob error type.
pub use error::BlobError;
/// Filesystem blob store.
pub use file::FileBlobStore;
/// In-memory blob store.
pub use memory::MemoryBlobStore;
/// Blob store interface and helpers.
pub use store::{BlobReceipt, BlobStore, content_etag, validate_key};
