//! # Visualizer: the UI-facing facade over the run controller and event fan-out.
//!
//! The [`Visualizer`] owns the event bus, a [`SubscriberSet`], and the
//! [`RunController`]. UI requests map one-to-one onto its methods; everything a
//! renderer needs arrives through subscribers.
//!
//! ## High-level architecture
//! ```text
//! UI requests:
//!   request_generate / request_custom_array / request_start /
//!   request_pause_toggle / request_stop / set_speed
//!        │
//!        ▼
//!   RunController ── spawn ──► run task (Session + Pacer + Algorithm)
//!
//! Event flow:
//!   Session / RunController ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit(&Event)
//!                                                                  ┌─────────┬─────────┐
//!                                                                  ▼         ▼         ▼
//!                                                           [queue S1] [queue S2] ... [queue SN]
//!                                                                  │         │         │
//!                                                         sub.on_event(&Event) (per subscriber)
//!
//! Shutdown path:
//!   shutdown()
//!     └─► RunController::stop()          → run task aborted, array reclaimed
//!     └─► listener token cancel          → listener drains what the bus still holds
//!     └─► SubscriberSet::shutdown()      → queues closed, workers joined
//!
//!   drop (no shutdown)
//!     └─► run token + listener token cancelled → listener exits, set dropped,
//!                                                workers see closed queues
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sortvisor::{Algorithm, Config, RunState, Subscribe, ViewMirror, Visualizer};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mirror = Arc::new(ViewMirror::new());
//!     let vis = Visualizer::builder(Config::default())
//!         .with_subscribers(vec![mirror.clone() as Arc<dyn Subscribe>])
//!         .build()?;
//!
//!     vis.request_custom_array(vec![5, 3, 1, 4, 2]).await?;
//!     vis.request_start(Algorithm::Quick, Duration::ZERO).await?;
//!     assert_eq!(vis.controller().wait().await?, RunState::Completed);
//!
//!     vis.shutdown().await?;
//!     assert_eq!(mirror.snapshot().await.values, vec![1, 2, 3, 4, 5]);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::{
    sync::broadcast::{self, error::RecvError, error::TryRecvError},
    task::JoinHandle,
};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::algorithms::Algorithm;
use crate::config::Config;
use crate::core::{
    builder::VisualizerBuilder,
    controller::{RunController, StartOutcome},
    state::RunState,
};
use crate::error::ControlError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::SubscriberSet;

/// Coordinates the run controller, event delivery, and shutdown.
pub struct Visualizer {
    cfg: Config,
    bus: Bus,
    controller: RunController,
    subs: Arc<SubscriberSet>,
    listener_token: CancellationToken,
    listener: JoinHandle<()>,
    /// Stops the listener if the visualizer is dropped without `shutdown`.
    _listener_guard: DropGuard,
}

impl Visualizer {
    /// Returns a builder; see [`VisualizerBuilder`].
    pub fn builder(cfg: Config) -> VisualizerBuilder {
        VisualizerBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        subs: Arc<SubscriberSet>,
    ) -> Result<Self, ControlError> {
        // The listener subscribes before the controller publishes the first array.
        let listener_token = CancellationToken::new();
        let listener = subscriber_listener(
            bus.clone(),
            Arc::clone(&subs),
            listener_token.clone(),
        );
        let controller = RunController::new(cfg.clone(), bus.clone())?;

        Ok(Self {
            cfg,
            bus,
            controller,
            subs,
            _listener_guard: listener_token.clone().drop_guard(),
            listener_token,
            listener,
        })
    }

    /// Replaces the array with `size` random values (stops any run).
    pub async fn request_generate(&self, size: usize) -> Result<(), ControlError> {
        self.controller.generate(size).await
    }

    /// Replaces the array with `Config::default_size` random values.
    pub async fn request_generate_default(&self) -> Result<(), ControlError> {
        self.controller.generate(self.cfg.default_size).await
    }

    /// Replaces the array with `values` (stops any run).
    pub async fn request_custom_array(&self, values: Vec<u32>) -> Result<(), ControlError> {
        self.controller.set_values(values).await
    }

    /// Sets the step interval and starts `algorithm`.
    ///
    /// The interval is applied even when the start turns out to be a no-op.
    pub async fn request_start(
        &self,
        algorithm: Algorithm,
        step: Duration,
    ) -> Result<StartOutcome, ControlError> {
        self.controller.set_speed(step);
        self.controller.start(algorithm).await
    }

    /// Pauses a running sort or resumes a paused one.
    pub async fn request_pause_toggle(&self) -> Result<RunState, ControlError> {
        self.controller.toggle_pause().await
    }

    /// Stops the run in flight; `Ok(false)` if nothing was running.
    pub async fn request_stop(&self) -> Result<bool, ControlError> {
        self.controller.stop().await
    }

    /// Changes the step interval of the current and future runs.
    pub fn set_speed(&self, step: Duration) {
        self.controller.set_speed(step);
    }

    /// Direct access to the run controller (state, values, stats, wait).
    pub fn controller(&self) -> &RunController {
        &self.controller
    }

    /// Raw receiver on the event bus.
    ///
    /// Bypasses the subscriber queues; slow readers see `Lagged`.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Stops any run, delivers pending events to subscribers and joins their workers.
    pub async fn shutdown(self) -> Result<(), ControlError> {
        let stopped = self.controller.stop().await;

        self.listener_token.cancel();
        let _ = self.listener.await;
        match Arc::try_unwrap(self.subs) {
            Ok(set) => set.shutdown().await,
            Err(_) => eprintln!("[sortvisor] subscriber set still shared; workers left running"),
        }
        stopped.map(|_| ())
    }
}

/// Forwards bus events to the subscriber set until cancelled.
///
/// On cancel, whatever the bus still buffers for this receiver is delivered
/// before returning. A lagging listener reports the loss and replays the
/// bus view so subscribers can rebuild what they missed.
fn subscriber_listener(
    bus: Bus,
    set: Arc<SubscriberSet>,
    token: CancellationToken,
) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                res = rx.recv() => match res {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(n)) => {
                        eprintln!("[sortvisor] listener lagged, {n} events skipped; resyncing");
                        set.emit(
                            &Event::new(EventKind::SubscriberOverflow)
                                .with_reason(format!("listener lagged by {n} events")),
                        );
                        for ev in bus.resync_events() {
                            set.emit(&ev);
                        }
                    }
                    Err(RecvError::Closed) => return,
                },
                _ = token.cancelled() => break,
            }
        }
        loop {
            match rx.try_recv() {
                Ok(ev) => set.emit(&ev),
                Err(TryRecvError::Lagged(_)) => {
                    for ev in bus.resync_events() {
                        set.emit(&ev);
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return,
            }
        }
    })
}
