//! Storage layer
//!
//! The `StorageAdapter` trait is the persistence contract consumed by the
//! stores; `SqliteStorage` is the bundled implementation. All operations are
//! idempotent overwrites and no partial write is ever visible to readers.

pub mod sqlite;

pub use sqlite::{create_pool, SqliteStorage};

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Cv, CvMetadata, Revision};

/// Key-value persistence contract for CV documents.
///
/// `put_cv` atomically maintains the metadata index entry alongside the
/// document; `delete_cv` cascades to the metadata entry and the revision
/// log. List ordering is the caller's responsibility.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Fetch a full document. Malformed records read as absent, not errors.
    async fn get_cv(&self, id: &str) -> Result<Option<Cv>>;

    /// Insert-or-replace a document and its metadata index entry.
    async fn put_cv(&self, cv: &Cv) -> Result<()>;

    /// Remove a document, its metadata entry, and its entire revision log.
    async fn delete_cv(&self, id: &str) -> Result<()>;

    /// All metadata index entries, in storage order.
    async fn list_metadata(&self) -> Result<Vec<CvMetadata>>;

    /// Revisions for one document, newest first.
    async fn list_revisions(&self, cv_id: &str) -> Result<Vec<Revision>>;

    /// Prepend a revision, silently evicting the oldest beyond the cap.
    async fn append_revision(&self, revision: &Revision) -> Result<()>;

    /// Drop every revision for one document.
    async fn clear_revisions(&self, cv_id: &str) -> Result<()>;
}
