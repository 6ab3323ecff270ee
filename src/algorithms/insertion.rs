//! Insertion sort: shift the key left past every greater predecessor.
//!
//! Each shift is performed as an exchange with the key's current slot, so the
//! array stays a permutation of its input at every suspension point and every
//! shift is counted once.

use crate::core::Session;
use crate::error::SortError;
use crate::model::Tag;

pub(super) async fn sort(s: &mut Session) -> Result<(), SortError> {
    gapped(s, 1).await?;
    s.mark_all_sorted();
    Ok(())
}

/// One insertion pass over elements `gap` apart (`gap == 1` is plain insertion).
pub(super) async fn gapped(s: &mut Session, gap: usize) -> Result<(), SortError> {
    for i in gap..s.len() {
        s.tag(i, Tag::Selected)?;

        let mut j = i;
        while j >= gap {
            let (prev, key) = s.compare(j - gap, j).await?;
            if prev <= key {
                break;
            }
            s.swap(j - gap, j)?;
            // The highlight follows the key.
            s.untag(j, Tag::Selected)?;
            s.tag(j - gap, Tag::Selected)?;
            j -= gap;
        }

        s.untag(j, Tag::Selected)?;
        s.suspend().await?;
    }
    Ok(())
}
