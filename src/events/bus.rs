//! # Event bus for broadcasting run events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from the run task and the run controller.
//!
//! ## Architecture
//! ```text
//! Publishers:                          Subscriber (one):
//!   Session (run task) ──┐
//!   RunController ───────┼───► Bus ───► Visualizer listener ───► SubscriberSet
//!                        │  (broadcast)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active subscribers at send time.
//! - **Shadow view**: every published event is also applied to a sequence-checked
//!   [`View`], so a receiver that lagged can be brought back with
//!   [`Bus::resync_events`].

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use super::event::Event;
use super::view::View;

/// Broadcast channel for run events.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately (send clones internally).
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
    view: Arc<Mutex<View>>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity.
    ///
    /// The minimum capacity is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self {
            tx,
            view: Arc::new(Mutex::new(View::default())),
        }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        if let Ok(mut view) = self.view.lock() {
            view.apply(&ev);
        }
        let _ = self.tx.send(ev);
    }

    /// Events rebuilding the current view, for receivers that lost events.
    pub(crate) fn resync_events(&self) -> Vec<Event> {
        match self.view.lock() {
            Ok(view) => view.resync_events(),
            Err(_) => Vec::new(),
        }
    }

    /// Creates a new receiver that will observe subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
