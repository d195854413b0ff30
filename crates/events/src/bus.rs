//! In-process platform event bus.
//!
//! A thin fan-out layer over `tokio::sync::broadcast`. Handlers publish a
//! [`PlatformEvent`] only after the fact it describes is durable, and
//! consumers re-read whatever they need by id. Events carry ids, never
//! row data, so a lagged or dropped event never leaves a consumer holding
//! stale state.

use tokio::sync::broadcast;
use waxwing_core::order::OrderStatus;
use waxwing_core::types::DbId;

/// Broadcast buffer size. A subscriber that falls further behind than this
/// observes `RecvError::Lagged` and loses the oldest events.
const DEFAULT_CAPACITY: usize = 256;

/// A domain fact that just became durable.
///
/// The variants are deliberately typed: a consumer matches on the variant
/// it cares about and ignores the rest, and there is no string event name
/// to misspell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    /// A vinyl order row was inserted in `pending`.
    OrderPlaced { order_id: DbId, user_id: DbId },
    /// An existing order moved along its lifecycle.
    OrderAdvanced { order_id: DbId, status: OrderStatus },
    /// An artist registered a new track.
    TrackRegistered { track_id: DbId, artist_id: DbId },
    /// A playback was reported; `listener_id` is `None` for anonymous plays.
    TrackPlayed {
        track_id: DbId,
        listener_id: Option<DbId>,
    },
}

/// Fan-out hub shared as `Arc<EventBus>` across handlers and consumers.
///
/// Every subscriber receives every event published after it subscribed;
/// filtering happens at the consumer by matching variants.
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Bus with an explicit buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers.
    ///
    /// With zero subscribers the event is dropped. That is fine: the fact
    /// itself is already in the database, events only accelerate reactions.
    pub fn publish(&self, event: PlatformEvent) {
        let _ = self.sender.send(event);
    }

    /// Open a new subscription covering events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
