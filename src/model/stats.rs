//! # Per-run operation counters.
//!
//! [`Stats`] counts comparisons and swaps of one run and measures its wall time.
//! Both counters only grow between two [`Stats::reset`] calls.

use std::time::{Duration, Instant};

/// Comparison/swap counters plus elapsed wall time.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stats {
    comparisons: u64,
    swaps: u64,
    started: Option<Instant>,
    frozen: Option<Duration>,
}

impl Stats {
    /// Creates zeroed counters with the clock not started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeros both counters and (re)starts the clock.
    pub fn reset(&mut self) {
        *self = Self {
            started: Some(Instant::now()),
            ..Self::default()
        };
    }

    #[inline]
    pub fn record_comparison(&mut self) {
        self.comparisons += 1;
    }

    #[inline]
    pub fn record_swap(&mut self) {
        self.swaps += 1;
    }

    /// Freezes the elapsed time; later calls keep the first value.
    pub fn finish(&mut self) {
        if self.frozen.is_none() {
            self.frozen = Some(self.elapsed());
        }
    }

    #[inline]
    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }

    #[inline]
    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    /// Time since `reset`, or the frozen value after `finish`.
    pub fn elapsed(&self) -> Duration {
        match (self.frozen, self.started) {
            (Some(d), _) => d,
            (None, Some(t)) => t.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    /// True once `finish` has been called.
    pub fn is_finished(&self) -> bool {
        self.frozen.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_zeros_counters() {
        let mut stats = Stats::new();
        stats.record_comparison();
        stats.record_swap();
        stats.record_swap();
        assert_eq!((stats.comparisons(), stats.swaps()), (1, 2));

        stats.reset();
        assert_eq!((stats.comparisons(), stats.swaps()), (0, 0));
        assert!(!stats.is_finished());
    }

    #[test]
    fn test_finish_freezes_elapsed() {
        let mut stats = Stats::new();
        assert_eq!(stats.elapsed(), Duration::ZERO);
        stats.reset();
        stats.finish();
        let first = stats.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        stats.finish();
        assert_eq!(stats.elapsed(), first);
    }
}
