//! Document store collaborator.
//!
//! Every operation in this crate talks to persistence through [`DocumentStore`]:
//! - [`MemoryStore`] keeps documents in-process and can inject write failures
//! - [`RedisStore`] keeps documents as RedisJSON values
//!
//! Updates are partial: only the attributes present in the patch are replaced,
//! each one wholesale. There is no transaction spanning two documents.

mod memory;
mod redis_store;

pub use self::memory::MemoryStore;
pub use self::redis_store::{RedisStore, cleanup_pattern};

use crate::{
    errors::{Result, SharucoError},
    types::{Collection, Document, DocumentRef},
};

#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Reads a document, `None` when it does not exist.
    async fn get(&self, document: &DocumentRef) -> Result<Option<Document>>;

    /// Replaces the given top-level attributes. Fails with `NotFound` when the
    /// document does not exist.
    async fn update(&self, document: &DocumentRef, partial: Document) -> Result<()>;

    /// Creates a document unless one already exists. Returns whether it was created.
    async fn insert(&self, document: &DocumentRef, value: Document) -> Result<bool>;

    /// Every document of a collection, in no guaranteed order.
    async fn list(&self, collection: Collection) -> Result<Vec<Document>>;
}

/// Reads a document, turning absence into `NotFound`.
pub async fn get_or_error<S>(store: &S, document: &DocumentRef) -> Result<Document>
where
    S: DocumentStore,
{
    store
        .get(document)
        .await?
        .ok_or_else(|| SharucoError::not_found(document.clone()))
}

/// Single-attribute patch.
pub fn patch(attribute: &str, value: impl Into<serde_json::Value>) -> Document {
    let mut partial = Document::new();
    partial.insert(attribute.to_string(), value.into());
    partial
}
