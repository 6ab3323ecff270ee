//! # Run state machine.
//!
//! ```text
//!            start                pause
//!   Idle ──────────► Running ◄──────────► Paused
//!    ▲                 │  │     resume       │
//!    │        finished │  └──── stop ───┐    │ stop
//!    │                 ▼                ▼    ▼
//!    └──── generate ─ Completed       Stopped ──► (Idle on generate / start)
//! ```
//!
//! [`StateCell`] is the single writer of the state: every change goes through
//! a guarded transition that publishes [`EventKind::RunStateChanged`].

use std::fmt;

use tokio::sync::watch;

use crate::algorithms::Algorithm;
use crate::events::{Bus, Event, EventKind};

/// Lifecycle state of the run controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// No run in progress.
    Idle,
    /// A run is executing.
    Running,
    /// A run is suspended at a suspension point.
    Paused,
    /// The last run was interrupted.
    Stopped,
    /// The last run finished and the array is sorted.
    Completed,
}

impl RunState {
    /// True while a run task exists (`Running` or `Paused`).
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, RunState::Running | RunState::Paused)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Stopped => "stopped",
            RunState::Completed => "completed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which user actions make sense in the current state.
///
/// Mirrors the button enablement of a typical visualizer UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// Starting a sort would do something.
    pub start: bool,
    /// Pause/resume toggle is meaningful.
    pub pause_toggle: bool,
    /// Generating a new array is allowed.
    pub generate: bool,
}

impl Controls {
    /// Derives the controls for `state`; `sorted` marks an unchanged completed array.
    pub fn for_state(state: RunState, sorted: bool) -> Self {
        match state {
            RunState::Running => Self {
                start: false,
                pause_toggle: true,
                generate: false,
            },
            RunState::Paused => Self {
                start: false,
                pause_toggle: true,
                generate: true,
            },
            RunState::Idle | RunState::Stopped | RunState::Completed => Self {
                start: !sorted,
                pause_toggle: false,
                generate: true,
            },
        }
    }
}

/// Shared, observable run state with guarded transitions.
#[derive(Debug)]
pub struct StateCell {
    tx: watch::Sender<RunState>,
    bus: Bus,
}

impl StateCell {
    pub fn new(bus: Bus) -> Self {
        let (tx, _rx) = watch::channel(RunState::Idle);
        Self { tx, bus }
    }

    #[inline]
    pub fn get(&self) -> RunState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.tx.subscribe()
    }

    /// Moves to `to` if the current state is one of `from`.
    ///
    /// Returns the previous state on success, or the current one as `Err`.
    pub fn transition(
        &self,
        from: &[RunState],
        to: RunState,
        algorithm: Option<Algorithm>,
    ) -> Result<RunState, RunState> {
        let mut prev = RunState::Idle;
        let mut rejected = None;
        self.tx.send_if_modified(|cur| {
            prev = *cur;
            if !from.contains(cur) {
                rejected = Some(*cur);
                return false;
            }
            if *cur == to {
                return false;
            }
            *cur = to;
            true
        });
        if let Some(cur) = rejected {
            return Err(cur);
        }
        if prev != to {
            self.publish(to, algorithm, None);
        }
        Ok(prev)
    }

    /// Unconditional transition that also carries a failure reason.
    pub fn force(&self, to: RunState, algorithm: Option<Algorithm>, reason: Option<String>) {
        self.tx.send_replace(to);
        self.publish(to, algorithm, reason);
    }

    fn publish(&self, to: RunState, algorithm: Option<Algorithm>, reason: Option<String>) {
        let mut ev = Event::new(EventKind::RunStateChanged).with_state(to);
        if let Some(a) = algorithm {
            ev = ev.with_algorithm(a);
        }
        if let Some(r) = reason {
            ev = ev.with_reason(r);
        }
        self.bus.publish(ev);
    }
}
