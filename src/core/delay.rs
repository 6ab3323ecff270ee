//! # Interruptible delay: the only suspension point of a run.
//!
//! Every algorithm step ends in [`Suspend::suspend`]. The production
//! implementation, [`Pacer`], does three things there:
//!
//! ```text
//! suspend()
//!   ├─► stop requested?            → Err(Aborted)
//!   ├─► paused? wait for resume    (watch channel, cancellable)
//!   │     └─ stop while paused     → Err(Aborted)
//!   └─► sleep(speed.get())         (cancellable; 0 = yield only)
//!         └─ stop while sleeping   → Err(Aborted)
//! ```
//!
//! ## Rules
//! - The step interval is read from [`Speed`] on **every** call, so speed changes
//!   apply to a run in flight.
//! - Pausing never polls: the pacer waits on a `watch` change or on cancellation.
//! - Cancellation is observed lazily, only inside `suspend()`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::{select, sync::watch, time};
use tokio_util::sync::CancellationToken;

use crate::error::SortError;

/// Contract for the per-step suspension used by algorithms.
///
/// Implementations decide whether the run may continue. Returning
/// `Err(SortError::Aborted)` unwinds the algorithm.
#[async_trait]
pub trait Suspend: Send {
    async fn suspend(&mut self) -> Result<(), SortError>;
}

/// Live step interval shared between the UI and a running [`Pacer`].
///
/// Cheap to clone; all clones observe the same value.
#[derive(Clone, Debug, Default)]
pub struct Speed {
    micros: Arc<AtomicU64>,
}

impl Speed {
    pub fn new(step: Duration) -> Self {
        let speed = Self::default();
        speed.set(step);
        speed
    }

    pub fn set(&self, step: Duration) {
        let us = step.as_micros().min(u128::from(u64::MAX)) as u64;
        self.micros.store(us, Ordering::Relaxed);
    }

    pub fn get(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::Relaxed))
    }
}

/// Pause/stop/speed-aware [`Suspend`] implementation.
pub struct Pacer {
    speed: Speed,
    paused: watch::Receiver<bool>,
    stop: CancellationToken,
    calls: u64,
}

impl Pacer {
    /// Creates a pacer observing `paused` and `stop`.
    pub fn new(speed: Speed, paused: watch::Receiver<bool>, stop: CancellationToken) -> Self {
        Self {
            speed,
            paused,
            stop,
            calls: 0,
        }
    }

    /// Number of `suspend` calls so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    async fn wait_resumed(&mut self) -> Result<(), SortError> {
        loop {
            if self.stop.is_cancelled() {
                return Err(SortError::Aborted);
            }
            if !*self.paused.borrow_and_update() {
                return Ok(());
            }
            select! {
                changed = self.paused.changed() => {
                    // Sender gone: nobody can resume us any more.
                    if changed.is_err() {
                        return Err(SortError::Aborted);
                    }
                }
                _ = self.stop.cancelled() => return Err(SortError::Aborted),
            }
        }
    }
}

#[async_trait]
impl Suspend for Pacer {
    async fn suspend(&mut self) -> Result<(), SortError> {
        self.calls += 1;
        self.wait_resumed().await?;

        let step = self.speed.get();
        if step.is_zero() {
            tokio::task::yield_now().await;
        } else {
            let sleep = time::sleep(step);
            tokio::pin!(sleep);
            select! {
                _ = &mut sleep => {}
                _ = self.stop.cancelled() => return Err(SortError::Aborted),
            }
        }

        if self.stop.is_cancelled() {
            return Err(SortError::Aborted);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn pacer(step: Duration) -> (Pacer, watch::Sender<bool>, CancellationToken, Speed) {
        let (tx, rx) = watch::channel(false);
        let token = CancellationToken::new();
        let speed = Speed::new(step);
        (Pacer::new(speed.clone(), rx, token.clone()), tx, token, speed)
    }

    #[tokio::test(start_paused = true)]
    async fn test_suspend_sleeps_for_step() {
        let (mut p, _tx, _token, _speed) = pacer(Duration::from_millis(50));
        let start = Instant::now();
        p.suspend().await.unwrap();
        let waited = start.elapsed();
        assert!(waited >= Duration::from_millis(50) && waited < Duration::from_millis(60));
        assert_eq!(p.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_is_read_live() {
        let (mut p, _tx, _token, speed) = pacer(Duration::from_millis(50));
        speed.set(Duration::from_millis(5));
        let start = Instant::now();
        p.suspend().await.unwrap();
        let waited = start.elapsed();
        assert!(waited >= Duration::from_millis(5) && waited < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_stop_aborts() {
        let (mut p, _tx, token, _speed) = pacer(Duration::ZERO);
        p.suspend().await.unwrap();
        token.cancel();
        assert_eq!(p.suspend().await, Err(SortError::Aborted));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_blocks_until_resume() {
        let (mut p, tx, _token, _speed) = pacer(Duration::ZERO);
        tx.send_replace(true);

        let handle = tokio::spawn(async move {
            let res = p.suspend().await;
            (res, Instant::now())
        });

        time::sleep(Duration::from_secs(3)).await;
        assert!(!handle.is_finished());
        let resumed_at = Instant::now();
        tx.send_replace(false);

        let (res, done_at) = handle.await.unwrap();
        assert_eq!(res, Ok(()));
        assert!(done_at >= resumed_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_while_paused_aborts() {
        let (mut p, tx, token, _speed) = pacer(Duration::ZERO);
        tx.send_replace(true);

        let handle = tokio::spawn(async move { p.suspend().await });
        time::sleep(Duration::from_millis(500)).await;
        token.cancel();

        assert_eq!(handle.await.unwrap(), Err(SortError::Aborted));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_interrupts_long_step() {
        let (mut p, _tx, token, _speed) = pacer(Duration::from_secs(3600));
        let handle = tokio::spawn(async move { p.suspend().await });
        time::sleep(Duration::from_millis(10)).await;
        token.cancel();
        assert_eq!(handle.await.unwrap(), Err(SortError::Aborted));
    }
}
