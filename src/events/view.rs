//! # Sequence-checked view state rebuilt from events.
//!
//! [`View`] is what a renderer draws (bars, tags, counters, run state), kept
//! current by applying events. It is shared by [`ViewMirror`](crate::ViewMirror)
//! and by the [`Bus`](super::Bus) shadow used to resync lagging listeners.
//!
//! ## Rules
//! - Ordering is tracked **per key**: one `seq` per index for values and tags,
//!   one for stats, one for run state. An event is stale only if a newer event
//!   for the same key was applied.
//! - `ArrayReplaced` resets every index and its per-index sequence numbers.
//! - Delivery events (`SubscriberOverflow`, `SubscriberPanicked`) are ignored
//!   and leave all sequence numbers untouched.
//!
//! ```text
//! apply(ValueChanged i=3, seq=101)  → values[3] updated, value_seq[3]=101
//! apply(RunStateChanged, seq=100)   → state updated,     state_seq=100
//! apply(ValueChanged i=3, seq=99)   → rejected (value_seq[3]=101)
//! ```

use std::time::Duration;

use crate::algorithms::Algorithm;
use crate::core::RunState;
use crate::events::{Event, EventKind};
use crate::model::TagSet;

#[derive(Debug, Clone)]
pub(crate) struct View {
    pub(crate) values: Vec<u32>,
    pub(crate) tags: Vec<TagSet>,
    pub(crate) comparisons: u64,
    pub(crate) swaps: u64,
    pub(crate) elapsed: Duration,
    pub(crate) state: RunState,
    pub(crate) algorithm: Option<Algorithm>,
    /// Highest sequence number applied so far.
    pub(crate) last_seq: u64,

    array_seq: u64,
    value_seq: Vec<u64>,
    tag_seq: Vec<u64>,
    stats_seq: u64,
    state_seq: u64,
}

impl Default for View {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            tags: Vec::new(),
            comparisons: 0,
            swaps: 0,
            elapsed: Duration::ZERO,
            state: RunState::Idle,
            algorithm: None,
            last_seq: 0,
            array_seq: 0,
            value_seq: Vec::new(),
            tag_seq: Vec::new(),
            stats_seq: 0,
            state_seq: 0,
        }
    }
}

impl View {
    /// Applies `ev` unless a newer event for the same key was applied.
    ///
    /// Returns `true` if the view changed.
    pub(crate) fn apply(&mut self, ev: &Event) -> bool {
        let applied = match ev.kind {
            EventKind::ArrayReplaced => match ev.values.as_deref() {
                Some(values) if ev.seq > self.array_seq => {
                    self.values = values.to_vec();
                    self.tags = vec![TagSet::EMPTY; values.len()];
                    self.array_seq = ev.seq;
                    self.value_seq = vec![ev.seq; values.len()];
                    self.tag_seq = vec![ev.seq; values.len()];
                    true
                }
                _ => false,
            },
            EventKind::ValueChanged => match (ev.index, ev.value) {
                (Some(i), Some(v)) if i < self.values.len() && ev.seq > self.value_seq[i] => {
                    self.values[i] = v;
                    self.value_seq[i] = ev.seq;
                    true
                }
                _ => false,
            },
            EventKind::TagChanged => match (ev.index, ev.tags) {
                (Some(i), Some(t)) if i < self.tags.len() && ev.seq > self.tag_seq[i] => {
                    self.tags[i] = t;
                    self.tag_seq[i] = ev.seq;
                    true
                }
                _ => false,
            },
            EventKind::StatsChanged if ev.seq > self.stats_seq => {
                self.comparisons = ev.comparisons.unwrap_or(self.comparisons);
                self.swaps = ev.swaps.unwrap_or(self.swaps);
                if let Some(ms) = ev.elapsed_ms {
                    self.elapsed = Duration::from_millis(ms);
                }
                self.stats_seq = ev.seq;
                true
            }
            EventKind::RunStateChanged if ev.seq > self.state_seq => {
                if let Some(s) = ev.state {
                    self.state = s;
                }
                if ev.algorithm.is_some() {
                    self.algorithm = ev.algorithm;
                }
                self.state_seq = ev.seq;
                true
            }
            _ => false,
        };
        if applied {
            self.last_seq = self.last_seq.max(ev.seq);
        }
        applied
    }

    /// Events that rebuild this view on an empty or stale receiver.
    ///
    /// Each event carries the sequence number of the change it stands for, so
    /// anything older that is still in flight is rejected afterwards.
    pub(crate) fn resync_events(&self) -> Vec<Event> {
        let mut out = Vec::new();
        if self.array_seq == 0 {
            return out;
        }

        out.push(with_seq(
            Event::new(EventKind::ArrayReplaced).with_values(self.values.clone()),
            self.array_seq,
        ));
        for (i, (&v, &seq)) in self.values.iter().zip(&self.value_seq).enumerate() {
            if seq > self.array_seq {
                out.push(with_seq(
                    Event::new(EventKind::ValueChanged).with_index(i).with_value(v),
                    seq,
                ));
            }
        }
        for (i, (&t, &seq)) in self.tags.iter().zip(&self.tag_seq).enumerate() {
            if seq > self.array_seq {
                out.push(with_seq(
                    Event::new(EventKind::TagChanged).with_index(i).with_tags(t),
                    seq,
                ));
            }
        }
        if self.stats_seq > 0 {
            let mut ev = Event::new(EventKind::StatsChanged);
            ev.comparisons = Some(self.comparisons);
            ev.swaps = Some(self.swaps);
            ev.elapsed_ms = Some(u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX));
            out.push(with_seq(ev, self.stats_seq));
        }
        if self.state_seq > 0 {
            let mut ev = Event::new(EventKind::RunStateChanged).with_state(self.state);
            if let Some(a) = self.algorithm {
                ev = ev.with_algorithm(a);
            }
            out.push(with_seq(ev, self.state_seq));
        }
        out
    }
}

fn with_seq(mut ev: Event, seq: u64) -> Event {
    ev.seq = seq;
    ev
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;

    #[test]
    fn test_older_state_survives_newer_tag() {
        let mut v = View::default();
        v.apply(&Event::new(EventKind::ArrayReplaced).with_values(vec![2, 1]));

        let paused = Event::new(EventKind::RunStateChanged).with_state(RunState::Paused);
        let tag = Event::new(EventKind::TagChanged)
            .with_index(0)
            .with_tags(TagSet::from(Tag::Comparing));

        assert!(v.apply(&tag));
        assert!(v.apply(&paused));
        assert_eq!(v.state, RunState::Paused);
        assert!(v.tags[0].contains(Tag::Comparing));
        assert_eq!(v.last_seq, tag.seq);
    }

    #[test]
    fn test_stale_value_rejected_per_index() {
        let mut v = View::default();
        v.apply(&Event::new(EventKind::ArrayReplaced).with_values(vec![0, 0]));
        let older = Event::new(EventKind::ValueChanged).with_index(0).with_value(7);
        let newer = Event::new(EventKind::ValueChanged).with_index(0).with_value(9);
        let other = Event::new(EventKind::ValueChanged).with_index(1).with_value(4);

        assert!(v.apply(&newer));
        assert!(v.apply(&other));
        assert!(!v.apply(&older));
        assert_eq!(v.values, vec![9, 4]);
    }

    #[test]
    fn test_delivery_events_leave_sequence_alone() {
        let mut v = View::default();
        let state = Event::new(EventKind::RunStateChanged).with_state(RunState::Running);
        let overflow = Event::subscriber_overflow("slow", "full");

        assert!(!v.apply(&overflow));
        assert_eq!(v.last_seq, 0);
        assert!(v.apply(&state));
    }

    #[test]
    fn test_resync_rebuilds_an_empty_view() {
        let mut src = View::default();
        src.apply(&Event::new(EventKind::ArrayReplaced).with_values(vec![3, 2, 1]));
        src.apply(&Event::new(EventKind::ValueChanged).with_index(0).with_value(1));
        src.apply(
            &Event::new(EventKind::TagChanged)
                .with_index(2)
                .with_tags(TagSet::from(Tag::Sorted)),
        );
        src.apply(
            &Event::new(EventKind::RunStateChanged)
                .with_state(RunState::Running)
                .with_algorithm(Algorithm::Shell),
        );

        let mut dst = View::default();
        for ev in src.resync_events() {
            dst.apply(&ev);
        }
        assert_eq!(dst.values, vec![1, 2, 1]);
        assert!(dst.tags[2].contains(Tag::Sorted));
        assert_eq!(dst.state, RunState::Running);
        assert_eq!(dst.algorithm, Some(Algorithm::Shell));
        assert_eq!(dst.last_seq, src.last_seq);
    }
}
