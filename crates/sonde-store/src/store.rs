//! The `DocumentStore` trait.
//!
//! This is the auditor's only external boundary. Implementations map a
//! slash-separated resource path (`users/alice`, `reports`) onto their
//! native addressing scheme and translate native failures into the
//! [`StoreError`](crate::StoreError) taxonomy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A document fetched from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// The document's identifier (last path segment).
    pub id: String,
    /// The document's fields, in the store's native JSON shape.
    pub fields: Value,
}

/// Abstract document store boundary.
///
/// # Contract
///
/// - Reads never mutate the store.
/// - `merge_document` is a non-destructive upsert: fields in `payload` are
///   merged over the existing document, which is created if absent.
///   Repeating the same merge must not fail (idempotent for a fixed
///   payload).
/// - `append_to_collection` creates a new document with a store-assigned id
///   and returns that id.
/// - Every failure is one of the `StoreError` variants; in particular a
///   policy rejection is always `PermissionDenied`, never `Transient`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document.
    async fn get_document(&self, path: &str) -> Result<Document>;

    /// Fetch at most one member of a collection.
    ///
    /// A bounded existence probe: it exercises the same read permission as
    /// a full query without the auditor itself exfiltrating data. `None`
    /// means the read was permitted but the collection is empty.
    async fn get_one_from_collection(&self, path: &str) -> Result<Option<Document>>;

    /// Merge `payload` into the document at `path`, creating it if absent.
    async fn merge_document(&self, path: &str, payload: &Value) -> Result<()>;

    /// Append a new document to the collection at `path`.
    ///
    /// Returns the created document's id.
    async fn append_to_collection(&self, path: &str, payload: &Value) -> Result<String>;

    /// List up to `limit` documents from the collection at `path`.
    ///
    /// Used only by the subject resolver to sample existing user records;
    /// any read-only paginated query suffices, ordering is not contractual.
    async fn list_documents(&self, path: &str, limit: usize) -> Result<Vec<Document>>;

    /// Get the store name for diagnostics.
    fn name(&self) -> &str;
}
