//! Change notifications for individual documents.
//!
//! A caller subscribes to a [`DocumentRef`] and receives a [`DocumentChange`]
//! for every successful write made through an [`ObservedStore`]. Writes made
//! directly against the inner store, or by other processes, are not seen.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use log::debug;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};

use crate::{
    errors::Result,
    store::DocumentStore,
    types::{Collection, Document, DocumentRef},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChange {
    pub document: DocumentRef,
    pub kind: ChangeKind,
    /// Attributes as written: the patch for updates, the full document for creates.
    pub attributes: Document,
}

type Subscribers = HashMap<DocumentRef, Vec<UnboundedSender<DocumentChange>>>;

/// Registry of per-document subscribers. Clones share the registry.
#[derive(Clone, Default)]
pub struct SubscriptionHub {
    subscribers: Arc<Mutex<Subscribers>>,
}

impl SubscriptionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, document: DocumentRef) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().entry(document.clone()).or_default().push(tx);
        Subscription { document, rx }
    }

    /// Delivers `change` to the document's live subscribers, dropping closed ones.
    pub fn publish(&self, change: DocumentChange) {
        let mut subscribers = self.lock();
        let Some(senders) = subscribers.get_mut(&change.document) else {
            return;
        };
        senders.retain(|tx| tx.send(change.clone()).is_ok());
        debug!("delivered change of {} to {} subscribers", change.document, senders.len());
        if senders.is_empty() {
            subscribers.remove(&change.document);
        }
    }

    pub fn subscriber_count(&self, document: &DocumentRef) -> usize {
        self.lock().get(document).map_or(0, |senders| senders.len())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Subscribers> {
        // Every critical section leaves the map consistent, so poisoning is ignored.
        self.subscribers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Receiving end of a document subscription. Dropping it unsubscribes.
pub struct Subscription {
    document: DocumentRef,
    rx: UnboundedReceiver<DocumentChange>,
}

impl Subscription {
    pub fn document(&self) -> &DocumentRef {
        &self.document
    }

    /// Waits for the next change. `None` once the hub is gone.
    pub async fn recv(&mut self) -> Option<DocumentChange> {
        self.rx.recv().await
    }

    /// Next change if one is already queued.
    pub fn try_recv(&mut self) -> Option<DocumentChange> {
        match self.rx.try_recv() {
            Ok(change) => Some(change),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

/// Store wrapper that publishes successful writes to a [`SubscriptionHub`].
pub struct ObservedStore<S> {
    inner: S,
    hub: SubscriptionHub,
}

impl<S> ObservedStore<S> {
    pub fn new(inner: S, hub: SubscriptionHub) -> Self {
        Self { inner, hub }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn hub(&self) -> &SubscriptionHub {
        &self.hub
    }
}

impl<S: DocumentStore> DocumentStore for ObservedStore<S> {
    async fn get(&self, document: &DocumentRef) -> Result<Option<Document>> {
        self.inner.get(document).await
    }

    async fn update(&self, document: &DocumentRef, partial: Document) -> Result<()> {
        self.inner.update(document, partial.clone()).await?;
        self.hub.publish(DocumentChange {
            document: document.clone(),
            kind: ChangeKind::Updated,
            attributes: partial,
        });
        Ok(())
    }

    async fn insert(&self, document: &DocumentRef, value: Document) -> Result<bool> {
        let created = self.inner.insert(document, value.clone()).await?;
        if created {
            self.hub.publish(DocumentChange {
                document: document.clone(),
                kind: ChangeKind::Created,
                attributes: value,
            });
        }
        Ok(created)
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>> {
        self.inner.list(collection).await
    }
}
