//! # Events emitted by a run and by the run controller.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **View events**: array contents, tags and counters a renderer draws
//! - **Control events**: run state transitions
//! - **Delivery events**: subscriber overflow / panic reports
//!
//! The [`Event`] struct carries the payload as optional fields set according to
//! the kind.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use sortvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ValueChanged).with_index(3).with_value(42);
//!
//! assert_eq!(ev.kind, EventKind::ValueChanged);
//! assert_eq!(ev.index, Some(3));
//! assert_eq!(ev.value, Some(42));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::algorithms::Algorithm;
use crate::core::RunState;
use crate::model::{Stats, TagSet};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Classification of events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === View events ===
    /// The whole array was replaced (generate / custom array).
    ///
    /// Sets:
    /// - `values`: new contents (all tags are cleared)
    ArrayReplaced,

    /// One position received a new value.
    ///
    /// Sets:
    /// - `index`, `value`
    ValueChanged,

    /// The tag set of one position changed.
    ///
    /// Sets:
    /// - `index`, `tags`
    TagChanged,

    /// Counters changed.
    ///
    /// Sets:
    /// - `comparisons`, `swaps`, `elapsed_ms`
    StatsChanged,

    // === Control events ===
    /// Run state transition.
    ///
    /// Sets:
    /// - `state`: new state
    /// - `algorithm`: algorithm of the run (when one is involved)
    /// - `reason`: failure message (only for runs ending on a defect)
    RunStateChanged,

    // === Delivery events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: subscriber name and panic info
    SubscriberPanicked,

    /// Events were dropped for a subscriber (queue full, closed, or bus lag).
    ///
    /// Sets:
    /// - `reason`: subscriber name and cause
    SubscriberOverflow,
}

/// Event with optional payload.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Array position.
    pub index: Option<usize>,
    /// New value at `index`.
    pub value: Option<u32>,
    /// Full array contents.
    pub values: Option<Arc<[u32]>>,
    /// New tag set at `index`.
    pub tags: Option<TagSet>,

    /// Comparisons so far in the run.
    pub comparisons: Option<u64>,
    /// Swaps so far in the run.
    pub swaps: Option<u64>,
    /// Elapsed run time in milliseconds (compact).
    pub elapsed_ms: Option<u64>,

    /// Run state after the transition.
    pub state: Option<RunState>,
    /// Algorithm of the run.
    pub algorithm: Option<Algorithm>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            index: None,
            value: None,
            values: None,
            tags: None,
            comparisons: None,
            swaps: None,
            elapsed_ms: None,
            state: None,
            algorithm: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    #[inline]
    pub fn with_value(mut self, value: u32) -> Self {
        self.value = Some(value);
        self
    }

    #[inline]
    pub fn with_values(mut self, values: impl Into<Arc<[u32]>>) -> Self {
        self.values = Some(values.into());
        self
    }

    #[inline]
    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Attaches counters and elapsed time (stored as milliseconds).
    #[inline]
    pub fn with_stats(mut self, stats: &Stats) -> Self {
        self.comparisons = Some(stats.comparisons());
        self.swaps = Some(stats.swaps());
        self.elapsed_ms = Some(duration_ms(stats.elapsed()));
        self
    }

    #[inline]
    pub fn with_state(mut self, state: RunState) -> Self {
        self.state = Some(state);
        self
    }

    #[inline]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }

    /// True for events that describe what a renderer draws.
    #[inline]
    pub fn is_view(&self) -> bool {
        matches!(
            self.kind,
            EventKind::ArrayReplaced
                | EventKind::ValueChanged
                | EventKind::TagChanged
                | EventKind::StatsChanged
        )
    }
}

fn duration_ms(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::StatsChanged);
        let b = Event::new(EventKind::StatsChanged);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_fill_payload() {
        let mut stats = Stats::new();
        stats.record_comparison();
        stats.record_swap();
        stats.record_swap();

        let ev = Event::new(EventKind::StatsChanged).with_stats(&stats);
        assert_eq!(ev.comparisons, Some(1));
        assert_eq!(ev.swaps, Some(2));
        assert_eq!(ev.elapsed_ms, Some(0));

        let ev = Event::new(EventKind::TagChanged)
            .with_index(1)
            .with_tags(Tag::Pivot.into());
        assert!(ev.is_view());
        assert_eq!(ev.tags, Some(TagSet::from(Tag::Pivot)));
    }

    #[test]
    fn test_overflow_event_reason() {
        let ev = Event::subscriber_overflow("mirror", "full");
        assert_eq!(ev.kind, EventKind::SubscriberOverflow);
        assert_eq!(ev.reason.as_deref(), Some("subscriber=mirror reason=full"));
        assert!(!ev.is_view());
    }
}
