//! Bubble sort: adjacent compare-swap passes with a shrinking upper bound.

use crate::core::Session;
use crate::error::SortError;

pub(super) async fn sort(s: &mut Session) -> Result<(), SortError> {
    let n = s.len();
    for pass in 0..n.saturating_sub(1) {
        for j in 0..n - pass - 1 {
            let (a, b) = s.compare(j, j + 1).await?;
            if a > b {
                s.swap(j, j + 1)?;
            }
        }
        s.mark_sorted(n - pass - 1)?;
    }
    s.mark_sorted(0)
}
