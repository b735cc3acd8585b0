//! Progress events for upload runs
//!
//! The orchestrator emits one event per pipeline state transition on a
//! `tokio::sync::broadcast` channel. Emitting never blocks: with no
//! subscribers the event is dropped, and a lagging subscriber loses the
//! oldest events rather than slowing the run down.
//!
//! # Example
//!
//! ```no_run
//! use libreelcast::service::events::{Event, EventBus};
//!
//! # async fn example() {
//! let event_bus = EventBus::new(64);
//! let mut receiver = event_bus.subscribe();
//!
//! event_bus.emit(Event::ItemSkipped {
//!     key: "https://site/p/abc".to_string(),
//! });
//!
//! if let Ok(event) = receiver.recv().await {
//!     println!("Received: {:?}", event);
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub type EventReceiver = broadcast::Receiver<Event>;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: Event) {
        // Err only means nobody is listening
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Pipeline state transitions, keyed by manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    RunStarted { entries: usize, cap: usize },

    /// Already in history; nothing fetched
    ItemSkipped { key: String },

    /// No media in the manifest entry
    ItemUnavailable { key: String },

    ItemFetching { key: String, url: String },

    ItemDeriving { key: String },

    ItemPublishing { key: String },

    ItemRecorded { key: String },

    ItemFailed { key: String, error: String },

    /// Scratch files released; last event for every attempted entry
    ItemCleanedUp { key: String },

    CapReached { cap: usize },

    RunCompleted { published: usize },
}

impl Event {
    /// The manifest key this event concerns, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Event::ItemSkipped { key }
            | Event::ItemUnavailable { key }
            | Event::ItemFetching { key, .. }
            | Event::ItemDeriving { key }
            | Event::ItemPublishing { key }
            | Event::ItemRecorded { key }
            | Event::ItemFailed { key, .. }
            | Event::ItemCleanedUp { key } => Some(key),
            Event::RunStarted { .. } | Event::CapReached { .. } | Event::RunCompleted { .. } => {
                None
            }
        }
    }
}
