//! Selection sort: scan the unsorted suffix for its minimum, one swap per pass.

use crate::core::Session;
use crate::error::SortError;
use crate::model::Tag;

pub(super) async fn sort(s: &mut Session) -> Result<(), SortError> {
    let n = s.len();
    for i in 0..n.saturating_sub(1) {
        let mut min = i;
        s.tag(i, Tag::Selected)?;

        for j in i + 1..n {
            let (current, probe) = s.compare(min, j).await?;
            // Strict: the first minimum keeps its place on ties.
            if probe < current {
                s.untag(min, Tag::Selected)?;
                min = j;
                s.tag(min, Tag::Selected)?;
            }
        }

        s.swap(i, min)?;
        s.untag(min, Tag::Selected)?;
        s.mark_sorted(i)?;
    }
    s.mark_sorted(n - 1)
}
