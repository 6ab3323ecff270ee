//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out,
//! and built-in implementations for consuming run events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Session ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit(&Event)
//!                                                         │
//!                                                    ┌────┴────┬──────────┬───────┐
//!                                                    ▼         ▼          ▼       ▼
//!                                               ViewMirror  LogWriter  Renderer  ...
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers**: observe and react (logging, drawing)
//! - **Stateful subscribers**: rebuild the view from events ([`ViewMirror`])

mod mirror;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod embedded;

pub use mirror::{MirrorSnapshot, ViewMirror};
pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
