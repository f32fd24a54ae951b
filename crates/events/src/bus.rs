//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`CatalogEvent`]s. It is
//! shared via `Arc<EventBus>` across the application.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use skudesk_core::item::Item;
use skudesk_core::types::ItemId;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

pub const EVENT_CATALOG_IMPORTED: &str = "catalog.imported";
pub const EVENT_CATALOG_CLEARED: &str = "catalog.cleared";
pub const EVENT_DESCRIPTION_UPDATED: &str = "item.description_updated";
pub const EVENT_PHOTOS_ADDED: &str = "item.photos_added";
pub const EVENT_PHOTO_REMOVED: &str = "item.photo_removed";
pub const EVENT_PHOTOS_REORDERED: &str = "item.photos_reordered";

// ---------------------------------------------------------------------------
// CatalogEvent
// ---------------------------------------------------------------------------

/// A change to the catalog, together with the catalog as it is afterwards.
///
/// The snapshot sits behind an `Arc` because the broadcast channel clones the
/// event once per subscriber.
#[derive(Debug, Clone)]
pub struct CatalogEvent {
    /// Dot-separated event name, e.g. `"item.photos_added"`.
    pub event_type: &'static str,

    /// The item that changed, for single-item events.
    pub item_id: Option<ItemId>,

    /// The full catalog after the change.
    pub items: Arc<Vec<Item>>,

    pub timestamp: DateTime<Utc>,
}

impl CatalogEvent {
    /// Create a catalog-wide event.
    pub fn new(event_type: &'static str, items: Vec<Item>) -> Self {
        Self {
            event_type,
            item_id: None,
            items: Arc::new(items),
            timestamp: Utc::now(),
        }
    }

    /// Attach the item the event is about.
    pub fn with_item(mut self, item_id: ItemId) -> Self {
        self.item_id = Some(item_id);
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use skudesk_events::bus::{CatalogEvent, EventBus, EVENT_CATALOG_CLEARED};
///
/// let bus = EventBus::default();
/// let _rx = bus.subscribe();
///
/// bus.publish(CatalogEvent::new(EVENT_CATALOG_CLEARED, Vec::new()));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest events are dropped and slow
    /// receivers observe `RecvError::Lagged`. Since each event carries the
    /// whole catalog, a lagging receiver only needs the newest one.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no subscribers the event is dropped.
    pub fn publish(&self, event: CatalogEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
