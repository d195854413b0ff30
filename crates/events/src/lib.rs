//! Waxwing in-process event bus.
//!
//! Handlers publish a [`PlatformEvent`] for every domain fact worth
//! reacting to: an order placed or advanced, a track registered, a play
//! recorded. Background consumers subscribe to the shared [`EventBus`]
//! and match on the variants they care about; the logistics optimizer
//! consumes [`PlatformEvent::OrderPlaced`].

pub mod bus;

pub use bus::{EventBus, PlatformEvent};
