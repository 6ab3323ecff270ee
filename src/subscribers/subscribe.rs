//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for renderers and other observers of a
//! run. Each subscriber is driven by a dedicated worker loop fed by a bounded
//! queue that is owned by the [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow (drawing, I/O): they do **not** block the run
//!   task nor other subscribers.
//! - Each subscriber **declares** its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. A run produces several events per step; if
//!   a queue overflows, events for that subscriber are **dropped** and a
//!   [`EventKind::SubscriberOverflow`](crate::EventKind::SubscriberOverflow) is
//!   published.
//!
//! ## Example
//! ```rust
//! use sortvisor::{Event, EventKind, Subscribe};
//!
//! struct BarPrinter;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for BarPrinter {
//!     async fn on_event(&self, ev: &Event) {
//!         if let (EventKind::ValueChanged, Some(i), Some(v)) = (ev.kind, ev.index, ev.value) {
//!             println!("{i:>3} {}", "#".repeat(v as usize / 10));
//!         }
//!     }
//!     fn name(&self) -> &'static str { "bar-printer" }
//!     fn queue_capacity(&self) -> usize { 4096 }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs and overflow reports).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
