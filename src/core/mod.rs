//! Runtime core: run lifecycle and orchestration.
//!
//! Public API from this module is the [`Visualizer`] facade, the
//! [`RunController`] it wraps, and the pieces algorithms run against
//! ([`Session`], [`Suspend`]).
//!
//! Internal modules:
//! - [`state`]: run state machine and derived UI controls;
//! - [`delay`]: the interruptible per-step suspension (pause, stop, speed);
//! - [`session`]: one run's array, counters and event publishing;
//! - [`runner`]: executes one run on the run task and reports back;
//! - [`controller`]: owns the array between runs, start/pause/resume/stop;
//! - [`visualizer`]: facade, bus listener and shutdown;
//! - [`builder`]: assembles a [`Visualizer`] with subscribers.

mod builder;
mod controller;
mod delay;
mod runner;
mod session;
mod state;
mod visualizer;

pub use builder::VisualizerBuilder;
pub use controller::{RunController, StartOutcome};
pub use delay::{Pacer, Speed, Suspend};
pub use session::Session;
pub use state::{Controls, RunState, StateCell};
pub use visualizer::Visualizer;

#[cfg(test)]
pub(crate) use session::testing;
