//! # Execute one sorting run on the run task.
//!
//! [`run_sort`] is the body of the task spawned by
//! [`RunController::start`](crate::RunController::start). It owns the
//! [`Session`] for the whole run and hands the array back in a [`RunReport`].
//!
//! ## Event flow
//! ```text
//! Success:
//!   algorithm → Ok(())            → publish RunStateChanged(Completed)
//!
//! Stop:
//!   algorithm → Err(Aborted)      → (controller publishes Stopped after join)
//!
//! Defect:
//!   algorithm → Err(IndexOutOfRange) → publish RunStateChanged(Stopped, reason)
//! ```
//!
//! ## Rules
//! - Always returns the array, whatever the outcome.
//! - Elapsed time is frozen before the terminal state is published.

use std::sync::Arc;

use crate::algorithms::Algorithm;
use crate::core::session::Session;
use crate::core::state::{RunState, StateCell};
use crate::error::SortError;
use crate::model::{ArrayModel, Stats};

/// What a finished run hands back to the controller.
#[derive(Debug)]
pub struct RunReport {
    pub array: ArrayModel,
    pub stats: Stats,
    pub result: Result<(), SortError>,
}

/// Runs `algorithm` to completion or abort and publishes its terminal state.
pub async fn run_sort(
    algorithm: Algorithm,
    mut session: Session,
    state: Arc<StateCell>,
) -> RunReport {
    let result = algorithm.run(&mut session).await;
    let (array, stats) = session.finish();

    match &result {
        Ok(()) => {
            let _ = state.transition(
                &[RunState::Running, RunState::Paused],
                RunState::Completed,
                Some(algorithm),
            );
        }
        Err(SortError::Aborted) => {}
        Err(e) => {
            eprintln!("[sortvisor] {algorithm} failed: {e}");
            state.force(RunState::Stopped, Some(algorithm), Some(e.to_string()));
        }
    }

    RunReport {
        array,
        stats,
        result,
    }
}
