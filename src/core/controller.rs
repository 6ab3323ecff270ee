//! # RunController: owns the array between runs and drives the run lifecycle.
//!
//! The controller holds the current [`ArrayModel`] while no run exists. Starting
//! a run **moves** the array into a [`Session`] on a spawned run task; the task
//! hands it back in a [`RunReport`] when it finishes or is stopped. Nothing else
//! can touch the array while a run owns it.
//!
//! ## Architecture
//! ```text
//! start(alg) ──► Slot.array.take() ──► Session ──► tokio::spawn(run_sort)
//!                                                       │
//!        pause/resume ──► watch<bool> ──► Pacer ◄───────┤
//!        stop         ──► CancellationToken ──► Pacer ◄─┘
//!                                                       │
//! reap (next call / wait / stop) ◄── JoinHandle<RunReport>
//!        └─► Slot.array = report.array, Slot.stats = report.stats
//! ```
//!
//! ## Rules
//! - Inputs (sizes, custom arrays) are validated **before** any in-flight run is
//!   stopped or the array is touched.
//! - `generate`/`set_values` destroy any in-flight run first.
//! - A completed run on an unchanged array makes `start` a no-op
//!   ([`StartOutcome::AlreadySorted`]).
//! - `Stopped` and `Completed` fall back to `Idle` on the next array change or start.

use std::sync::Arc;
use std::time::Duration;

use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::algorithms::Algorithm;
use crate::config::Config;
use crate::core::{
    delay::{Pacer, Speed},
    runner::{run_sort, RunReport},
    session::Session,
    state::{Controls, RunState, StateCell},
};
use crate::error::{ControlError, SortError};
use crate::events::{Bus, Event, EventKind};
use crate::model::{random_values, ArrayModel, Stats};

/// Result of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new run task was spawned.
    Started,
    /// A run is already in progress; nothing changed.
    AlreadyRunning,
    /// The array was sorted by the previous run and has not changed since.
    AlreadySorted,
}

/// Handles of the run task currently owning the array.
struct ActiveRun {
    algorithm: Algorithm,
    stop: CancellationToken,
    pause: watch::Sender<bool>,
    /// Cancelled when the run task exits, panics included.
    done: CancellationToken,
    join: JoinHandle<RunReport>,
}

/// Controller state guarded by one async mutex.
struct Slot {
    /// `None` while a run owns the array.
    array: Option<ArrayModel>,
    /// Counters of the last finished run.
    stats: Stats,
    /// Last run completed and the array was not replaced since.
    sorted: bool,
    /// Algorithm of the current or last run.
    algorithm: Option<Algorithm>,
    active: Option<ActiveRun>,
}

/// Owns the array and the run lifecycle.
pub struct RunController {
    cfg: Config,
    bus: Bus,
    speed: Speed,
    state: Arc<StateCell>,
    slot: Mutex<Slot>,
}

impl RunController {
    /// Creates a controller holding a random array of `cfg.default_size`.
    ///
    /// Publishes the initial [`EventKind::ArrayReplaced`].
    pub fn new(cfg: Config, bus: Bus) -> Result<Self, ControlError> {
        cfg.validate_size(cfg.default_size)?;
        let array = ArrayModel::random(cfg.default_size, cfg.max_size, cfg.value_range_checked())?;
        publish_replaced(&bus, &array);

        Ok(Self {
            speed: Speed::new(cfg.step),
            state: Arc::new(StateCell::new(bus.clone())),
            slot: Mutex::new(Slot {
                array: Some(array),
                stats: Stats::new(),
                sorted: false,
                algorithm: None,
                active: None,
            }),
            cfg,
            bus,
        })
    }

    /// Current run state.
    #[inline]
    pub fn state(&self) -> RunState {
        self.state.get()
    }

    /// Receiver observing every state change.
    pub fn subscribe_state(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    /// Shared step-interval handle; changes apply to a run in flight.
    pub fn speed(&self) -> Speed {
        self.speed.clone()
    }

    pub fn set_speed(&self, step: Duration) {
        self.speed.set(step);
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Array contents, or `None` while a run owns the array.
    ///
    /// Live contents during a run are available from the event stream.
    pub async fn values(&self) -> Option<Vec<u32>> {
        let mut slot = self.slot.lock().await;
        let _ = self.reap(&mut slot, false).await;
        slot.array.as_ref().map(|a| a.values().to_vec())
    }

    /// Counters of the last finished run.
    pub async fn stats(&self) -> Stats {
        let mut slot = self.slot.lock().await;
        let _ = self.reap(&mut slot, false).await;
        slot.stats
    }

    /// Algorithm of the current or last run.
    pub async fn algorithm(&self) -> Option<Algorithm> {
        self.slot.lock().await.algorithm
    }

    /// Which user actions are meaningful right now.
    pub async fn controls(&self) -> Controls {
        let mut slot = self.slot.lock().await;
        let _ = self.reap(&mut slot, false).await;
        Controls::for_state(self.state.get(), slot.sorted)
    }

    /// Starts `algorithm` on the current array.
    ///
    /// ### Outcomes
    /// - `Idle`/`Stopped`/`Completed` with an unsorted array → [`StartOutcome::Started`]
    /// - `Running`/`Paused` → [`StartOutcome::AlreadyRunning`]
    /// - completed on an unchanged array → [`StartOutcome::AlreadySorted`]
    pub async fn start(&self, algorithm: Algorithm) -> Result<StartOutcome, ControlError> {
        let mut slot = self.slot.lock().await;
        self.reap(&mut slot, false).await?;

        let current = self.state.get();
        if current.is_active() {
            return Ok(StartOutcome::AlreadyRunning);
        }
        if slot.sorted {
            return Ok(StartOutcome::AlreadySorted);
        }
        let Some(array) = slot.array.take() else {
            return Err(ControlError::InvalidTransition {
                from: current,
                action: "start",
            });
        };

        let _ = self.state.transition(
            &[RunState::Stopped, RunState::Completed],
            RunState::Idle,
            slot.algorithm,
        );
        if let Err(cur) = self
            .state
            .transition(&[RunState::Idle], RunState::Running, Some(algorithm))
        {
            slot.array = Some(array);
            return Err(ControlError::InvalidTransition {
                from: cur,
                action: "start",
            });
        }

        let stop = CancellationToken::new();
        let (pause, paused) = watch::channel(false);
        let pacer = Pacer::new(self.speed.clone(), paused, stop.clone());
        let session = Session::new(array, Box::new(pacer), self.bus.clone());
        let done = CancellationToken::new();
        let finished = done.clone().drop_guard();
        let state = Arc::clone(&self.state);
        let join = tokio::spawn(async move {
            let _finished = finished;
            run_sort(algorithm, session, state).await
        });

        slot.algorithm = Some(algorithm);
        slot.active = Some(ActiveRun {
            algorithm,
            stop,
            pause,
            done,
            join,
        });
        Ok(StartOutcome::Started)
    }

    /// Suspends the run at its next suspension point.
    pub async fn pause(&self) -> Result<RunState, ControlError> {
        let mut slot = self.slot.lock().await;
        self.reap(&mut slot, false).await?;

        let Some(active) = slot.active.as_ref() else {
            return Err(self.rejected("pause"));
        };
        self.state
            .transition(&[RunState::Running], RunState::Paused, Some(active.algorithm))
            .map_err(|from| ControlError::InvalidTransition {
                from,
                action: "pause",
            })?;
        active.pause.send_replace(true);
        Ok(RunState::Paused)
    }

    /// Resumes a paused run.
    pub async fn resume(&self) -> Result<RunState, ControlError> {
        let mut slot = self.slot.lock().await;
        self.reap(&mut slot, false).await?;

        let Some(active) = slot.active.as_ref() else {
            return Err(self.rejected("resume"));
        };
        self.state
            .transition(&[RunState::Paused], RunState::Running, Some(active.algorithm))
            .map_err(|from| ControlError::InvalidTransition {
                from,
                action: "resume",
            })?;
        active.pause.send_replace(false);
        Ok(RunState::Running)
    }

    /// Pauses a running run or resumes a paused one; returns the new state.
    pub async fn toggle_pause(&self) -> Result<RunState, ControlError> {
        match self.state.get() {
            RunState::Running => self.pause().await,
            RunState::Paused => self.resume().await,
            from => Err(ControlError::InvalidTransition {
                from,
                action: "toggle pause",
            }),
        }
    }

    /// Interrupts the run in flight and takes the array back.
    ///
    /// Returns `Ok(false)` if there was nothing to stop. A run that completed
    /// before observing the stop keeps its `Completed` state.
    pub async fn stop(&self) -> Result<bool, ControlError> {
        let mut slot = self.slot.lock().await;
        self.stop_locked(&mut slot).await
    }

    /// Replaces the array with `size` random values.
    pub async fn generate(&self, size: usize) -> Result<(), ControlError> {
        self.cfg.validate_size(size)?;
        let values = random_values(size, self.cfg.value_range_checked());
        self.replace(values).await
    }

    /// Replaces the array with user-provided values.
    ///
    /// Rejected with [`ControlError::InvalidInput`] (nothing changes) if the
    /// length is outside `1..=max_size`.
    pub async fn set_values(&self, values: Vec<u32>) -> Result<(), ControlError> {
        self.cfg.validate_size(values.len())?;
        self.replace(values).await
    }

    /// Waits until no run is active, then returns the resulting state.
    ///
    /// Returns [`ControlError::RunFailed`] if the run ended with a defect.
    pub async fn wait(&self) -> Result<RunState, ControlError> {
        let done = {
            let mut slot = self.slot.lock().await;
            self.reap(&mut slot, false).await?;
            slot.active.as_ref().map(|active| active.done.clone())
        };
        if let Some(done) = done {
            done.cancelled().await;
        }

        let mut slot = self.slot.lock().await;
        self.reap(&mut slot, true).await?;
        Ok(self.state.get())
    }

    async fn replace(&self, values: Vec<u32>) -> Result<(), ControlError> {
        let mut slot = self.slot.lock().await;
        self.stop_locked(&mut slot).await?;

        match slot.array.as_mut() {
            Some(array) => array.set_values(values)?,
            None => slot.array = Some(ArrayModel::new(values, self.cfg.max_size)?),
        }
        if let Some(array) = slot.array.as_ref() {
            publish_replaced(&self.bus, array);
        }

        slot.sorted = false;
        slot.stats = Stats::new();
        self.bus
            .publish(Event::new(EventKind::StatsChanged).with_stats(&slot.stats));

        let _ = self.state.transition(
            &[RunState::Stopped, RunState::Completed],
            RunState::Idle,
            slot.algorithm,
        );
        Ok(())
    }

    async fn stop_locked(&self, slot: &mut Slot) -> Result<bool, ControlError> {
        let Some(active) = slot.active.take() else {
            return Ok(false);
        };
        active.stop.cancel();
        let algorithm = active.algorithm;

        match self.collect(slot, active).await {
            Ok(()) => Ok(false),
            Err(ControlError::RunFailed(SortError::Aborted)) => {
                let _ = self.state.transition(
                    &[RunState::Running, RunState::Paused],
                    RunState::Stopped,
                    Some(algorithm),
                );
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    /// Collects a finished run; `force` awaits one that is about to finish.
    ///
    /// A terminal state means the run task is returning, so it is joined too.
    async fn reap(&self, slot: &mut Slot, force: bool) -> Result<(), ControlError> {
        let finished = match slot.active.as_ref() {
            Some(active) => force || active.join.is_finished() || !self.state.get().is_active(),
            None => false,
        };
        if !finished {
            return Ok(());
        }
        let Some(active) = slot.active.take() else {
            return Ok(());
        };
        match self.collect(slot, active).await {
            // Aborts only come from `stop`, which reaps on its own.
            Err(ControlError::RunFailed(SortError::Aborted)) => Ok(()),
            other => other,
        }
    }

    /// Joins the run task and puts its array back into the slot.
    async fn collect(&self, slot: &mut Slot, active: ActiveRun) -> Result<(), ControlError> {
        match active.join.await {
            Ok(report) => {
                slot.array = Some(report.array);
                slot.stats = report.stats;
                match report.result {
                    Ok(()) => {
                        slot.sorted = true;
                        Ok(())
                    }
                    Err(e) => Err(ControlError::RunFailed(e)),
                }
            }
            Err(join_err) => {
                // The array went down with the task; start over from a fresh one.
                eprintln!("[sortvisor] run task of {} died: {join_err}", active.algorithm);
                let array = ArrayModel::random(
                    self.cfg.default_size,
                    self.cfg.max_size,
                    self.cfg.value_range_checked(),
                )?;
                publish_replaced(&self.bus, &array);
                slot.array = Some(array);
                slot.stats = Stats::new();
                slot.sorted = false;
                self.state.force(
                    RunState::Stopped,
                    Some(active.algorithm),
                    Some(join_err.to_string()),
                );
                Ok(())
            }
        }
    }

    fn rejected(&self, action: &'static str) -> ControlError {
        ControlError::InvalidTransition {
            from: self.state.get(),
            action,
        }
    }
}

impl Drop for RunController {
    fn drop(&mut self) {
        if let Some(active) = self.slot.get_mut().active.as_ref() {
            active.stop.cancel();
        }
    }
}

fn publish_replaced(bus: &Bus, array: &ArrayModel) {
    bus.publish(Event::new(EventKind::ArrayReplaced).with_values(array.values().to_vec()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(step: Duration) -> RunController {
        let cfg = Config {
            step,
            ..Config::default()
        };
        RunController::new(cfg, Bus::new(1024)).unwrap()
    }

    fn sorted_copy(values: &[u32]) -> Vec<u32> {
        let mut v = values.to_vec();
        v.sort_unstable();
        v
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_completes_and_sorts() {
        let c = controller(Duration::from_millis(1));
        c.set_values(vec![5, 1, 4, 2, 8]).await.unwrap();

        assert_eq!(c.start(Algorithm::Bubble).await, Ok(StartOutcome::Started));
        assert_eq!(c.state(), RunState::Running);
        assert_eq!(c.wait().await, Ok(RunState::Completed));

        assert_eq!(c.values().await, Some(vec![1, 2, 4, 5, 8]));
        let stats = c.stats().await;
        assert_eq!((stats.comparisons(), stats.swaps()), (10, 4));
        assert!(stats.is_finished());
        assert_eq!(c.algorithm().await, Some(Algorithm::Bubble));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_is_noop() {
        let c = controller(Duration::from_millis(10));
        c.start(Algorithm::Selection).await.unwrap();
        assert_eq!(
            c.start(Algorithm::Heap).await,
            Ok(StartOutcome::AlreadyRunning)
        );
        assert_eq!(c.algorithm().await, Some(Algorithm::Selection));
        c.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_on_sorted_array_is_noop() {
        let c = controller(Duration::ZERO);
        c.set_values(vec![3, 1, 2]).await.unwrap();
        c.start(Algorithm::Insertion).await.unwrap();
        c.wait().await.unwrap();

        assert_eq!(
            c.start(Algorithm::Quick).await,
            Ok(StartOutcome::AlreadySorted)
        );
        assert!(!c.controls().await.start);
        assert_eq!(c.state(), RunState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_leaves_permutation() {
        let c = controller(Duration::from_millis(10));
        let input: Vec<u32> = (0..40).rev().collect();
        c.set_values(input.clone()).await.unwrap();
        c.start(Algorithm::Merge).await.unwrap();

        tokio::time::sleep(Duration::from_millis(255)).await;
        assert_eq!(c.stop().await, Ok(true));
        assert_eq!(c.state(), RunState::Stopped);

        let out = c.values().await.unwrap();
        assert_eq!(sorted_copy(&out), sorted_copy(&input));
        assert!(c.stats().await.is_finished());
        assert_eq!(c.stop().await, Ok(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_holds_progress() {
        let c = controller(Duration::from_millis(10));
        c.set_values((0..30).rev().collect()).await.unwrap();
        c.start(Algorithm::Bubble).await.unwrap();

        tokio::time::sleep(Duration::from_millis(105)).await;
        assert_eq!(c.pause().await, Ok(RunState::Paused));

        let mut state = c.subscribe_state();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(!state.has_changed().unwrap());
        assert_eq!(c.state(), RunState::Paused);

        assert_eq!(c.resume().await, Ok(RunState::Running));
        assert_eq!(c.wait().await, Ok(RunState::Completed));
        assert_eq!(c.values().await, Some((0..30).collect()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_resume_does_not_change_result() {
        let input = vec![9, 3, 7, 1, 8, 2, 6, 4, 5, 0];

        let plain = controller(Duration::from_millis(5));
        plain.set_values(input.clone()).await.unwrap();
        plain.start(Algorithm::Heap).await.unwrap();
        plain.wait().await.unwrap();

        let paused = controller(Duration::from_millis(5));
        paused.set_values(input).await.unwrap();
        paused.start(Algorithm::Heap).await.unwrap();
        tokio::time::sleep(Duration::from_millis(23)).await;
        paused.toggle_pause().await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        paused.toggle_pause().await.unwrap();
        paused.wait().await.unwrap();

        assert_eq!(plain.values().await, paused.values().await);
        let (a, b) = (plain.stats().await, paused.stats().await);
        assert_eq!((a.comparisons(), a.swaps()), (b.comparisons(), b.swaps()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_transitions() {
        let c = controller(Duration::from_millis(10));
        assert_eq!(
            c.pause().await,
            Err(ControlError::InvalidTransition {
                from: RunState::Idle,
                action: "pause"
            })
        );
        assert_eq!(
            c.toggle_pause().await,
            Err(ControlError::InvalidTransition {
                from: RunState::Idle,
                action: "toggle pause"
            })
        );

        c.start(Algorithm::Shell).await.unwrap();
        assert!(matches!(
            c.resume().await,
            Err(ControlError::InvalidTransition {
                from: RunState::Running,
                ..
            })
        ));
        c.stop().await.unwrap();
        assert!(matches!(
            c.resume().await,
            Err(ControlError::InvalidTransition {
                from: RunState::Stopped,
                ..
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_input_changes_nothing() {
        let c = controller(Duration::from_millis(10));
        c.set_values(vec![2, 1]).await.unwrap();
        c.start(Algorithm::Bubble).await.unwrap();

        assert!(matches!(
            c.set_values(vec![]).await,
            Err(ControlError::InvalidInput(SortError::InvalidSize { len: 0, .. }))
        ));
        assert!(matches!(
            c.generate(201).await,
            Err(ControlError::InvalidInput(SortError::InvalidSize { len: 201, .. }))
        ));
        // The run was not disturbed.
        assert!(c.state().is_active());
        assert_eq!(c.wait().await, Ok(RunState::Completed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_while_running_stops_and_resets() {
        let c = controller(Duration::from_millis(10));
        c.start(Algorithm::Radix).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        c.generate(12).await.unwrap();
        assert_eq!(c.state(), RunState::Idle);
        let values = c.values().await.unwrap();
        assert_eq!(values.len(), 12);
        assert!(values.iter().all(|v| (10..360).contains(v)));
        assert_eq!(c.stats().await.comparisons(), 0);
        assert!(c.controls().await.start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop() {
        let c = controller(Duration::from_millis(10));
        c.set_values((0..20).rev().collect()).await.unwrap();
        c.start(Algorithm::Quick).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        c.stop().await.unwrap();

        assert_eq!(c.start(Algorithm::Quick).await, Ok(StartOutcome::Started));
        assert_eq!(c.wait().await, Ok(RunState::Completed));
        assert_eq!(c.values().await, Some((0..20).collect()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_start_right_after_completion_is_noop() {
        let c = controller(Duration::ZERO);
        for _ in 0..50 {
            c.set_values(vec![4, 3, 2, 1]).await.unwrap();
            let mut state = c.subscribe_state();
            assert_eq!(c.start(Algorithm::Bubble).await, Ok(StartOutcome::Started));

            state.wait_for(|s| *s == RunState::Completed).await.unwrap();
            assert_eq!(
                c.start(Algorithm::Bubble).await,
                Ok(StartOutcome::AlreadySorted)
            );
            assert_eq!(c.values().await, Some(vec![1, 2, 3, 4]));
        }
    }

    async fn crash(_finished: tokio_util::sync::DropGuard) -> RunReport {
        panic!("run task died");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_returns_when_run_task_panics() {
        let c = controller(Duration::from_millis(10));
        {
            let mut slot = c.slot.lock().await;
            slot.array = None;
            c.state
                .transition(&[RunState::Idle], RunState::Running, Some(Algorithm::Heap))
                .unwrap();
            let done = CancellationToken::new();
            let join = tokio::spawn(crash(done.clone().drop_guard()));
            let (pause, _paused) = watch::channel(false);
            slot.active = Some(ActiveRun {
                algorithm: Algorithm::Heap,
                stop: CancellationToken::new(),
                pause,
                done,
                join,
            });
        }

        let waited = tokio::time::timeout(Duration::from_secs(5), c.wait())
            .await
            .expect("wait returned");
        assert_eq!(waited, Ok(RunState::Stopped));
        assert_eq!(c.values().await.map(|v| v.len()), Some(50));
        assert_eq!(c.start(Algorithm::Bubble).await, Ok(StartOutcome::Started));
        c.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_change_applies_mid_run() {
        let c = controller(Duration::from_millis(10));
        c.set_values((0..30).rev().collect()).await.unwrap();
        let started = tokio::time::Instant::now();
        c.start(Algorithm::Bubble).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        c.set_speed(Duration::ZERO);
        assert_eq!(c.wait().await, Ok(RunState::Completed));

        // 435 comparisons at 10ms would take over four seconds.
        assert!(started.elapsed() < Duration::from_millis(100));
        assert_eq!(c.speed().get(), Duration::ZERO);
    }
}
