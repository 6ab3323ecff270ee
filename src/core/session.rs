//! # Session: one run's array, counters, pacing and publisher.
//!
//! A [`Session`] is constructed per run and owned by the run task for the whole
//! run. Algorithms only talk to the session; each primitive mutates the
//! [`ArrayModel`], updates [`Stats`] and publishes the matching events.
//!
//! ## Primitives
//! ```text
//! compare(i, j)          tag both Comparing → +1 comparison → suspend → untag
//! swap(i, j)             exchange (no-op if i == j) → +1 swap
//! set(i, v)              positional overwrite        → +1 swap
//! suspend()              explicit suspension for steps without a comparison
//! tag/untag/mark_sorted  observational only
//! ```
//!
//! ## Rules
//! - Comparison tags are removed even when the suspension aborts.
//! - Values are published as `ValueChanged`, counters as `StatsChanged`
//!   after every counted primitive.

use crate::core::delay::Suspend;
use crate::error::SortError;
use crate::events::{Bus, Event, EventKind};
use crate::model::{ArrayModel, Stats, Tag, TagSet};

/// Instrumented view over one run's data.
pub struct Session {
    array: ArrayModel,
    stats: Stats,
    gate: Box<dyn Suspend>,
    bus: Bus,
}

impl Session {
    /// Starts a session: clears leftover tags and resets the counters.
    pub fn new(mut array: ArrayModel, gate: Box<dyn Suspend>, bus: Bus) -> Self {
        let tagged: Vec<usize> = (0..array.len())
            .filter(|&i| array.tags(i).map(|t| !t.is_empty()).unwrap_or(false))
            .collect();
        array.clear_tags();
        for i in tagged {
            bus.publish(
                Event::new(EventKind::TagChanged)
                    .with_index(i)
                    .with_tags(TagSet::EMPTY),
            );
        }

        let mut stats = Stats::new();
        stats.reset();
        bus.publish(Event::new(EventKind::StatsChanged).with_stats(&stats));

        Self {
            array,
            stats,
            gate,
            bus,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    #[inline]
    pub fn values(&self) -> &[u32] {
        self.array.values()
    }

    #[inline]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Ends the session, freezing the elapsed time.
    pub fn finish(mut self) -> (ArrayModel, Stats) {
        self.stats.finish();
        self.publish_stats();
        (self.array, self.stats)
    }

    /// Compares positions `i` and `j`; returns their values.
    pub async fn compare(&mut self, i: usize, j: usize) -> Result<(u32, u32), SortError> {
        let a = self.array.get(i)?;
        let b = self.array.get(j)?;
        self.observe(i, j).await?;
        Ok((a, b))
    }

    /// Exchanges two positions. `i == j` is a no-op and is not counted.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<(), SortError> {
        if !self.array.swap(i, j)? {
            return Ok(());
        }
        self.stats.record_swap();
        self.publish_value(i);
        self.publish_value(j);
        self.publish_stats();
        Ok(())
    }

    pub fn get(&self, i: usize) -> Result<u32, SortError> {
        self.array.get(i)
    }

    /// Overwrites position `i`; counted as a swap.
    pub fn set(&mut self, i: usize, v: u32) -> Result<(), SortError> {
        self.array.set(i, v)?;
        self.stats.record_swap();
        self.publish_value(i);
        self.publish_stats();
        Ok(())
    }

    /// Suspends without a comparison (write-only steps).
    pub async fn suspend(&mut self) -> Result<(), SortError> {
        self.gate.suspend().await
    }

    pub fn tag(&mut self, i: usize, tag: Tag) -> Result<(), SortError> {
        if let Some(set) = self.array.tag(i, tag)? {
            self.publish_tags(i, set);
        }
        Ok(())
    }

    pub fn untag(&mut self, i: usize, tag: Tag) -> Result<(), SortError> {
        if let Some(set) = self.array.untag(i, tag)? {
            self.publish_tags(i, set);
        }
        Ok(())
    }

    #[inline]
    pub fn mark_sorted(&mut self, i: usize) -> Result<(), SortError> {
        self.tag(i, Tag::Sorted)
    }

    /// Marks every index sorted (completion sweep).
    pub fn mark_all_sorted(&mut self) {
        for i in 0..self.array.len() {
            // Index is in range by construction.
            let _ = self.mark_sorted(i);
        }
    }

    async fn observe(&mut self, i: usize, j: usize) -> Result<(), SortError> {
        self.tag(i, Tag::Comparing)?;
        self.tag(j, Tag::Comparing)?;
        self.stats.record_comparison();
        self.publish_stats();

        let res = self.gate.suspend().await;

        self.untag(i, Tag::Comparing)?;
        self.untag(j, Tag::Comparing)?;
        res
    }

    fn publish_value(&self, i: usize) {
        if let Ok(v) = self.array.get(i) {
            self.bus
                .publish(Event::new(EventKind::ValueChanged).with_index(i).with_value(v));
        }
    }

    fn publish_tags(&self, i: usize, set: TagSet) {
        self.bus
            .publish(Event::new(EventKind::TagChanged).with_index(i).with_tags(set));
    }

    fn publish_stats(&self) {
        self.bus
            .publish(Event::new(EventKind::StatsChanged).with_stats(&self.stats));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic gates for driving sessions in tests.

    use async_trait::async_trait;

    use super::*;

    /// Never blocks; counts calls.
    #[derive(Default)]
    pub struct Free {
        pub calls: std::sync::Arc<std::sync::atomic::AtomicU64>,
    }

    #[async_trait]
    impl Suspend for Free {
        async fn suspend(&mut self) -> Result<(), SortError> {
            self.calls
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            Ok(())
        }
    }

    /// Aborts on the `n`-th call (1-based).
    pub struct StopAt {
        pub n: u64,
        pub seen: u64,
    }

    impl StopAt {
        pub fn new(n: u64) -> Self {
            Self { n, seen: 0 }
        }
    }

    #[async_trait]
    impl Suspend for StopAt {
        async fn suspend(&mut self) -> Result<(), SortError> {
            self.seen += 1;
            if self.seen >= self.n {
                return Err(SortError::Aborted);
            }
            Ok(())
        }
    }

    pub fn session(values: &[u32], gate: impl Suspend + 'static) -> Session {
        let array = ArrayModel::new(values.to_vec(), 1024).expect("valid test array");
        Session::new(array, Box::new(gate), Bus::new(16))
    }
}
