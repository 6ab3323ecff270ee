//! # sortvisor
//!
//! **Sortvisor** is the engine behind a step-by-step sorting visualizer.
//!
//! It runs one of eight classic sorting algorithms over a small array of bar
//! heights, suspending after every step so a renderer can animate it, and lets
//! the user pause, resume, stop and re-seed the run at any time. Everything the
//! renderer draws (values, highlights, counters, run state) is published as
//! [`Event`]s; the engine has no opinion on how they are drawn.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!        UI: generate / custom array / start(alg, speed) / pause toggle / stop
//!                                        │
//!                                        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Visualizer (facade)                                              │
//! │  - RunController (array ownership, state machine, run task)       │
//! │  - Bus (broadcast events)                                         │
//! │  - SubscriberSet (fans out to renderers / mirrors / loggers)      │
//! └──────┬─────────────────────────────────────────────────────┬──────┘
//!        │ spawn (array moved in)                              │
//!        ▼                                                     │
//!   ┌─────────────────────────────────────────┐                │
//!   │ run task                                │                │
//!   │  Algorithm::run(&mut Session)           │                │
//!   │   ├─ compare(i, j)  ─► +1 comparison    │                │
//!   │   ├─ swap(i, j)     ─► +1 swap          │                │
//!   │   ├─ set(i, v)      ─► +1 swap          │                │
//!   │   └─ Pacer::suspend()                   │                │
//!   │        ├─ paused?  wait (watch)         │                │
//!   │        ├─ stopped? Err(Aborted)         │                │
//!   │        └─ sleep(speed)                  │                │
//!   └───────────────┬─────────────────────────┘                │
//!                   │ publishes ValueChanged / TagChanged /    │
//!                   │ StatsChanged / RunStateChanged           │
//!                   ▼                                          ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                  (capacity: Config::bus_capacity)                 │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber_listener   │
//!                       │   (in Visualizer)      │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                                  ┌─────────┼─────────┐
//!                                  ▼         ▼         ▼
//!                             ViewMirror  LogWriter  renderer
//! ```
//!
//! ### Lifecycle
//! ```text
//! Idle ──start──► Running ◄──toggle──► Paused
//!                   │  │                 │
//!          finished │  └─stop─► Stopped ◄┘ stop
//!                   ▼
//!               Completed ──generate / custom array──► Idle
//! ```
//!
//! ## Features
//! | Area              | Description                                                    | Key types / traits                       |
//! |-------------------|----------------------------------------------------------------|------------------------------------------|
//! | **Algorithms**    | Bubble, selection, insertion, quick, merge, heap, shell, radix | [`Algorithm`], [`AlgorithmInfo`]         |
//! | **Control**       | Start, pause/resume, stop, re-seed, live speed                 | [`Visualizer`], [`RunController`]        |
//! | **Instrumentation**| Counted compare/swap/set with per-step suspension             | [`Session`], [`Suspend`], [`Stats`]      |
//! | **Subscriber API**| Consume view and lifecycle events                              | [`Subscribe`], [`ViewMirror`]            |
//! | **Errors**        | Typed errors for runs and control requests                     | [`SortError`], [`ControlError`]          |
//! | **Configuration** | Array limits, value range, step interval, bus size             | [`Config`]                               |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sortvisor::{Algorithm, Config, RunState, StartOutcome, Subscribe, Visualizer};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(sortvisor::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//!
//!     let vis = Visualizer::builder(Config::default())
//!         .with_subscribers(subs)
//!         .build()?;
//!
//!     vis.request_generate(20).await?;
//!     let outcome = vis.request_start("heap".parse()?, Duration::ZERO).await?;
//!     assert_eq!(outcome, StartOutcome::Started);
//!     assert_eq!(vis.controller().wait().await?, RunState::Completed);
//!
//!     let values = vis.controller().values().await.unwrap_or_default();
//!     assert!(values.windows(2).all(|w| w[0] <= w[1]));
//!     assert_eq!(Algorithm::Heap.info().name, "Heap Sort");
//!
//!     vis.shutdown().await?;
//!     Ok(())
//! }
//! ```
mod algorithms;
mod config;
mod core;
mod error;
mod events;
mod model;
mod subscribers;

// ---- Public re-exports ----

pub use algorithms::{Algorithm, AlgorithmInfo, ParseAlgorithmError};
pub use config::Config;
pub use core::{
    Controls, Pacer, RunController, RunState, Session, Speed, StartOutcome, StateCell, Suspend,
    Visualizer, VisualizerBuilder,
};
pub use error::{ControlError, SortError};
pub use events::{Bus, Event, EventKind};
pub use model::{ArrayModel, Stats, Tag, TagSet};
pub use subscribers::{MirrorSnapshot, Subscribe, SubscriberSet, ViewMirror};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
