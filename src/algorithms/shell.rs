//! Shell sort: insertion passes over a halving gap sequence.

use super::insertion::gapped;
use crate::core::Session;
use crate::error::SortError;

pub(super) async fn sort(s: &mut Session) -> Result<(), SortError> {
    let mut gap = s.len() / 2;
    while gap > 0 {
        gapped(s, gap).await?;
        gap /= 2;
    }
    s.mark_all_sorted();
    Ok(())
}
