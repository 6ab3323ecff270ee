//! Run events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by a sorting run and the run controller.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//! - `View` sequence-checked view state rebuilt from events
//!
//! ## Quick reference
//! - **Publishers**: `Session` primitives (values, tags, stats), `RunController`
//!   (state transitions, array replacement), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the `Visualizer` listener, which fans out to `SubscriberSet`.

mod bus;
mod event;
mod view;

pub use bus::Bus;
pub use event::{Event, EventKind};
pub(crate) use view::View;
