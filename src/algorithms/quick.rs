//! Quick sort with the last element as pivot and Lomuto partitioning.

use futures::future::{BoxFuture, FutureExt};

use crate::core::Session;
use crate::error::SortError;
use crate::model::Tag;

pub(super) async fn sort(s: &mut Session) -> Result<(), SortError> {
    let high = s.len() - 1;
    range(s, 0, high).await?;
    s.mark_all_sorted();
    Ok(())
}

fn range(s: &mut Session, low: usize, high: usize) -> BoxFuture<'_, Result<(), SortError>> {
    async move {
        if low < high {
            let p = partition(s, low, high).await?;
            if p > low {
                range(s, low, p - 1).await?;
            }
            range(s, p + 1, high).await?;
        }
        Ok(())
    }
    .boxed()
}

/// Partitions `low..=high` around `values[high]`; returns the pivot's final index.
///
/// Elements equal to the pivot stay on the right side.
async fn partition(s: &mut Session, low: usize, high: usize) -> Result<usize, SortError> {
    let pivot = s.get(high)?;
    s.tag(high, Tag::Pivot)?;

    let mut store = low;
    for j in low..high {
        let (v, _) = s.compare(j, high).await?;
        if v < pivot {
            s.swap(store, j)?;
            store += 1;
        }
    }

    s.swap(store, high)?;
    s.untag(high, Tag::Pivot)?;
    s.untag(store, Tag::Pivot)?;
    Ok(store)
}
