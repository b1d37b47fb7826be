//! Reactive state container for one cached collection.
//!
//! The store is the only holder of the mutable state triple
//! (items, loading, error). Mutators are crate-private so every change
//! funnels through `ResourceService`; consumers get read-only watch
//! receivers plus a broadcast stream of `StoreEvent` outcomes.

use shopfront_api::{Resource, ResourceId, StoreEvent};
use tokio::sync::{broadcast, watch};

/// Capacity of the outcome event channel. Slow subscribers that fall
/// further behind than this observe a lag error, not blocked stores.
const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct ResourceStore<R> {
    items: watch::Sender<Vec<R>>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
    events: broadcast::Sender<StoreEvent>,
}

impl<R: Resource> ResourceStore<R> {
    pub(crate) fn new() -> Self {
        let (items, _) = watch::channel(Vec::new());
        let (loading, _) = watch::channel(false);
        let (error, _) = watch::channel(None);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            items,
            loading,
            error,
            events,
        }
    }

    /// Read-only view of the cached collection.
    pub fn items(&self) -> watch::Receiver<Vec<R>> {
        self.items.subscribe()
    }

    /// Read-only view of the in-flight flag.
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Read-only view of the published error message.
    pub fn error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }

    /// Subscribe to operation outcomes.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Clear the error state unconditionally.
    pub fn clear_error(&self) {
        self.error.send_replace(None);
    }

    /// Mark a request as in flight.
    pub(crate) fn begin(&self) {
        self.loading.send_replace(true);
    }

    /// Replace the collection wholesale with the server's response.
    pub(crate) fn replace_all(&self, items: Vec<R>) {
        let count = items.len();
        self.items.send_replace(items);
        self.settle_ok(StoreEvent::Refreshed { count });
    }

    /// Append a created entity.
    pub(crate) fn append(&self, item: R) {
        let id = item.id().unwrap_or_default();
        self.items.send_modify(|list| list.push(item));
        self.settle_ok(StoreEvent::Created { id });
    }

    /// Replace the entity matching `id` with the server's value.
    /// A vanished entity is left alone; nothing is inserted.
    pub(crate) fn replace_item(&self, id: ResourceId, item: R) {
        self.items.send_modify(|list| {
            if let Some(slot) = list.iter_mut().find(|r| r.id() == Some(id)) {
                *slot = item;
            }
        });
        self.settle_ok(StoreEvent::Updated { id });
    }

    /// Remove the entity matching `id`.
    pub(crate) fn remove_item(&self, id: ResourceId) {
        self.items.send_modify(|list| list.retain(|r| r.id() != Some(id)));
        self.settle_ok(StoreEvent::Deleted { id });
    }

    /// Record a failure: publish the message, end the in-flight state.
    /// The cached collection is left untouched.
    pub(crate) fn fail(&self, message: String) {
        self.loading.send_replace(false);
        self.error.send_replace(Some(message.clone()));
        let _ = self.events.send(StoreEvent::Failed { message });
    }

    /// A successful operation ends the in-flight state and clears any
    /// earlier error before announcing the outcome.
    fn settle_ok(&self, event: StoreEvent) {
        self.loading.send_replace(false);
        self.error.send_replace(None);
        let _ = self.events.send(event);
    }
}
