use serde::{Deserialize, Serialize};

use crate::ResourceId;

/// Notification emitted by a resource store after each completed
/// operation.
///
/// Consumers subscribe to react to explicit outcomes instead of
/// inferring them from state transitions; the page controllers reset
/// their forms on `Created`/`Updated`. Emission is fire-and-forget:
/// a store never waits for, or fails on, absent subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreEvent {
    /// The cached collection was replaced wholesale by a fetch.
    Refreshed { count: usize },
    /// A created entity was appended to the cache.
    Created { id: ResourceId },
    /// The entity with this id was replaced by the server's value.
    Updated { id: ResourceId },
    /// The entity with this id was removed from the cache.
    Deleted { id: ResourceId },
    /// The operation failed; `message` is the published error text.
    Failed { message: String },
}
