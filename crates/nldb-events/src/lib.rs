//! Event bus for the natural-language database exploration core.
//!
//! This crate provides:
//! - Domain event types for the orchestration core's components
//! - Broadcast-based event bus for async subscribers
//!
//! # Architecture
//!
//! Events are published to an `EventBus` which broadcasts them to every
//! subscriber. Call `bus.subscribe()` to get an `EventReceiver` that can be
//! polled asynchronously.
//!
//! # Example
//!
//! ```rust
//! use nldb_events::{EventBus, NldbEvent, EventMetadata};
//!
//! # async fn example() {
//! let bus = EventBus::new();
//! let mut receiver = bus.subscribe();
//!
//! bus.publish(NldbEvent::UserRegistered {
//!     metadata: EventMetadata::new("auth"),
//!     user_id: "u1".to_string(),
//! });
//!
//! let event = receiver.recv().await.unwrap();
//! assert_eq!(event.event_type(), "user_registered");
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod bus;
mod event;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, EventBus, EventReceiver};
pub use event::{EventMetadata, NldbEvent};
