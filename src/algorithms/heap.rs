//! Heap sort: build a max-heap by sift-down, then extract the root repeatedly.

use crate::core::Session;
use crate::error::SortError;

pub(super) async fn sort(s: &mut Session) -> Result<(), SortError> {
    let n = s.len();
    for i in (0..n / 2).rev() {
        sift_down(s, n, i).await?;
    }
    for end in (1..n).rev() {
        s.swap(0, end)?;
        s.mark_sorted(end)?;
        sift_down(s, end, 0).await?;
    }
    s.mark_sorted(0)
}

/// Restores the heap property below `i` within the first `n` elements.
async fn sift_down(s: &mut Session, n: usize, mut i: usize) -> Result<(), SortError> {
    loop {
        let mut largest = i;
        let left = 2 * i + 1;
        let right = left + 1;

        if left < n {
            let (top, child) = s.compare(largest, left).await?;
            if child > top {
                largest = left;
            }
        }
        // Strict: on equal children the left one stays.
        if right < n {
            let (top, child) = s.compare(largest, right).await?;
            if child > top {
                largest = right;
            }
        }

        if largest == i {
            return Ok(());
        }
        s.swap(i, largest)?;
        i = largest;
    }
}
