//! # View mirror: a renderer-side copy of the run state, rebuilt from events.
//!
//! Maintains what a renderer would draw (bars, tags, counters, run state) by
//! applying events in sequence order.
//!
//! ## Architecture
//! ```text
//! Session / RunController ──► Bus ──► listener ──► SubscriberSet ──► ViewMirror::apply()
//!                                                                          │
//!                                                                          ▼
//!                                                  MirrorSnapshot { values, tags, stats, state }
//! ```
//!
//! ## Rules
//! - Ordering is checked **per key** (index, stats, run state): an event is
//!   rejected only if a newer event for the same key was applied
//! - `ArrayReplaced` resets values and clears all tags
//! - Index events outside the mirrored array are ignored
//! - Reads are **eventually consistent** with the run

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::algorithms::Algorithm;
use crate::core::RunState;
use crate::events::{Event, View};
use crate::model::TagSet;
use crate::subscribers::Subscribe;

/// What a renderer draws at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSnapshot {
    /// Bar heights.
    pub values: Vec<u32>,
    /// Per-bar tags.
    pub tags: Vec<TagSet>,
    pub comparisons: u64,
    pub swaps: u64,
    pub elapsed: Duration,
    pub state: RunState,
    pub algorithm: Option<Algorithm>,
    /// Highest sequence number applied so far.
    pub last_seq: u64,
}

impl Default for MirrorSnapshot {
    fn default() -> Self {
        Self::of(&View::default())
    }
}

impl MirrorSnapshot {
    fn of(view: &View) -> Self {
        Self {
            values: view.values.clone(),
            tags: view.tags.clone(),
            comparisons: view.comparisons,
            swaps: view.swaps,
            elapsed: view.elapsed,
            state: view.state,
            algorithm: view.algorithm,
            last_seq: view.last_seq,
        }
    }
}

/// Subscriber keeping a [`MirrorSnapshot`] up to date.
pub struct ViewMirror {
    state: RwLock<View>,
    capacity: usize,
}

impl Default for ViewMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewMirror {
    /// Creates an empty mirror with a queue large enough for a 200-bar run.
    pub fn new() -> Self {
        Self::with_queue_capacity(1 << 16)
    }

    /// Creates an empty mirror with an explicit subscriber queue capacity.
    pub fn with_queue_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(View::default()),
            capacity,
        }
    }

    /// Applies `ev` unless a newer event for the same key was applied.
    ///
    /// Returns `true` if the view changed.
    pub async fn apply(&self, ev: &Event) -> bool {
        self.state.write().await.apply(ev)
    }

    /// Returns a copy of the current view.
    pub async fn snapshot(&self) -> MirrorSnapshot {
        MirrorSnapshot::of(&*self.state.read().await)
    }

    pub async fn values(&self) -> Vec<u32> {
        self.state.read().await.values.clone()
    }

    pub async fn state(&self) -> RunState {
        self.state.read().await.state
    }
}

#[async_trait]
impl Subscribe for ViewMirror {
    async fn on_event(&self, event: &Event) {
        self.apply(event).await;
    }

    fn name(&self) -> &'static str {
        "ViewMirror"
    }

    fn queue_capacity(&self) -> usize {
        self.capacity
    }
}
