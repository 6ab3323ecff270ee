//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints run lifecycle events to stdout.
//! Per-step events (values, tags, counters) are only printed in verbose mode.
//!
//! ## Example output
//! ```text
//! [array] len=5 values=[5, 3, 1, 4, 2]
//! [state] running algorithm=quick
//! [stats] comparisons=7 swaps=4 elapsed_ms=12
//! [state] completed algorithm=quick
//! [subscriber-overflow] subscriber=slow reason=full
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter {
    verbose: bool,
}

impl LogWriter {
    /// Construct a [`LogWriter`] printing lifecycle events only.
    #[must_use]
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Construct a [`LogWriter`] that also prints every step.
    #[must_use]
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::ArrayReplaced => {
                let values = e.values.as_deref().unwrap_or(&[]);
                println!("[array] len={} values={:?}", values.len(), values);
            }
            EventKind::RunStateChanged => {
                let state = e.state.map(|s| s.as_str()).unwrap_or("unknown");
                match (e.algorithm, e.reason.as_deref()) {
                    (Some(a), Some(r)) => println!("[state] {state} algorithm={a} reason={r:?}"),
                    (Some(a), None) => println!("[state] {state} algorithm={a}"),
                    (None, _) => println!("[state] {state}"),
                }
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                let tag = if e.kind == EventKind::SubscriberOverflow {
                    "subscriber-overflow"
                } else {
                    "subscriber-panicked"
                };
                println!("[{tag}] {}", e.reason.as_deref().unwrap_or("unknown"));
            }
            EventKind::StatsChanged if self.verbose => {
                println!(
                    "[stats] comparisons={} swaps={} elapsed_ms={}",
                    e.comparisons.unwrap_or(0),
                    e.swaps.unwrap_or(0),
                    e.elapsed_ms.unwrap_or(0)
                );
            }
            EventKind::ValueChanged if self.verbose => {
                println!("[value] index={:?} value={:?}", e.index, e.value);
            }
            EventKind::TagChanged if self.verbose => {
                println!("[tags] index={:?} tags={:?}", e.index, e.tags);
            }
            EventKind::StatsChanged | EventKind::ValueChanged | EventKind::TagChanged => {}
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }

    fn queue_capacity(&self) -> usize {
        if self.verbose {
            1 << 16
        } else {
            1024
        }
    }
}
