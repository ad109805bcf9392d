use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use log::debug;
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::{
    errors::{Result, SharucoError},
    types::{Collection, Document, DocumentRef},
};

/// In-process document store.
///
/// Clones share the same documents. Writes to documents registered with
/// [`MemoryStore::fail_updates_to`] fail with `RemoteUnavailable`, which is how
/// tests reproduce a mirrored write that only lands on one side.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    documents: BTreeMap<DocumentRef, Document>,
    failing: HashSet<DocumentRef>,
    offline: bool,
    writes: usize,
}

impl MemoryState {
    fn check_online(&self) -> Result<()> {
        if self.offline {
            return Err(SharucoError::RemoteUnavailable("memory store is offline".into()));
        }
        Ok(())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later update to `document` fail until [`MemoryStore::heal`].
    pub async fn fail_updates_to(&self, document: DocumentRef) {
        self.state.write().await.failing.insert(document);
    }

    /// Takes the whole store offline (or back online).
    pub async fn set_offline(&self, offline: bool) {
        self.state.write().await.offline = offline;
    }

    /// Clears injected failures.
    pub async fn heal(&self) {
        let mut state = self.state.write().await;
        state.failing.clear();
        state.offline = false;
    }

    /// Number of successful writes so far.
    pub async fn write_count(&self) -> usize {
        self.state.read().await.writes
    }
}

impl DocumentStore for MemoryStore {
    async fn get(&self, document: &DocumentRef) -> Result<Option<Document>> {
        let state = self.state.read().await;
        state.check_online()?;
        Ok(state.documents.get(document).cloned())
    }

    async fn update(&self, document: &DocumentRef, partial: Document) -> Result<()> {
        let mut state = self.state.write().await;
        state.check_online()?;
        if state.failing.contains(document) {
            return Err(SharucoError::RemoteUnavailable(format!("injected write failure for {document}")));
        }
        let stored = state
            .documents
            .get_mut(document)
            .ok_or_else(|| SharucoError::not_found(document.clone()))?;
        debug!("memory store: updating {document} ({} attributes)", partial.len());
        for (attribute, value) in partial {
            stored.insert(attribute, value);
        }
        state.writes += 1;
        Ok(())
    }

    async fn insert(&self, document: &DocumentRef, value: Document) -> Result<bool> {
        let mut state = self.state.write().await;
        state.check_online()?;
        if state.documents.contains_key(document) {
            return Ok(false);
        }
        debug!("memory store: creating {document}");
        state.documents.insert(document.clone(), value);
        state.writes += 1;
        Ok(true)
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>> {
        let state = self.state.read().await;
        state.check_online()?;
        Ok(state
            .documents
            .iter()
            .filter(|(key, _)| key.collection == collection)
            .map(|(_, document)| document.clone())
            .collect())
    }
}
