//! Merge sort: recursive halving plus a linear merge through two temporary runs.
//!
//! A merge writes the array front to back. If the run is aborted mid-merge the
//! unconsumed parts of both runs are written back before unwinding, so the
//! segment stays a permutation of its input.

use futures::future::{BoxFuture, FutureExt};

use crate::core::Session;
use crate::error::SortError;

pub(super) async fn sort(s: &mut Session) -> Result<(), SortError> {
    let right = s.len() - 1;
    range(s, 0, right).await?;
    s.mark_all_sorted();
    Ok(())
}

fn range(s: &mut Session, left: usize, right: usize) -> BoxFuture<'_, Result<(), SortError>> {
    async move {
        if left < right {
            let mid = left + (right - left) / 2;
            range(s, left, mid).await?;
            range(s, mid + 1, right).await?;
            merge(s, left, mid, right).await?;
        }
        Ok(())
    }
    .boxed()
}

/// Copies of the two sorted halves plus read/write cursors.
struct Runs {
    left: Vec<u32>,
    right: Vec<u32>,
    i: usize,
    j: usize,
    /// Next array position to write.
    k: usize,
}

impl Runs {
    fn both_pending(&self) -> bool {
        self.i < self.left.len() && self.j < self.right.len()
    }

    /// Next leftover value once one run is exhausted (left run first).
    fn next_rest(&mut self) -> Option<u32> {
        if let Some(&v) = self.left.get(self.i) {
            self.i += 1;
            return Some(v);
        }
        let v = self.right.get(self.j).copied()?;
        self.j += 1;
        Some(v)
    }
}

async fn merge(s: &mut Session, left: usize, mid: usize, right: usize) -> Result<(), SortError> {
    let mut runs = Runs {
        left: s.values()[left..=mid].to_vec(),
        right: s.values()[mid + 1..=right].to_vec(),
        i: 0,
        j: 0,
        k: left,
    };

    match merge_steps(s, &mut runs, left, mid).await {
        Err(e) => {
            while let Some(v) = runs.next_rest() {
                s.set(runs.k, v)?;
                runs.k += 1;
            }
            Err(e)
        }
        ok => ok,
    }
}

async fn merge_steps(
    s: &mut Session,
    runs: &mut Runs,
    left: usize,
    mid: usize,
) -> Result<(), SortError> {
    while runs.both_pending() {
        s.compare(left + runs.i, mid + 1 + runs.j).await?;

        // `<=` keeps equal elements of the left run first.
        let v = if runs.left[runs.i] <= runs.right[runs.j] {
            runs.i += 1;
            runs.left[runs.i - 1]
        } else {
            runs.j += 1;
            runs.right[runs.j - 1]
        };
        s.set(runs.k, v)?;
        runs.k += 1;
        s.suspend().await?;
    }

    while let Some(v) = runs.next_rest() {
        s.set(runs.k, v)?;
        runs.k += 1;
        s.suspend().await?;
    }
    Ok(())
}
