//! LSD radix sort, base 10, with a stable counting sort per digit.
//!
//! The maximum is found by comparisons (counted); digit passes only read and
//! write, suspending once per element read and once per element written.

use crate::core::Session;
use crate::error::SortError;
use crate::model::Tag;

const BASE: u64 = 10;

pub(super) async fn sort(s: &mut Session) -> Result<(), SortError> {
    let max = u64::from(find_max(s).await?);

    let mut exp: u64 = 1;
    while max / exp > 0 {
        digit_pass(s, exp).await?;
        exp *= BASE;
    }
    s.mark_all_sorted();
    Ok(())
}

async fn find_max(s: &mut Session) -> Result<u32, SortError> {
    let mut max = 0;
    s.tag(max, Tag::Selected)?;
    for i in 1..s.len() {
        let (top, v) = s.compare(max, i).await?;
        if v > top {
            s.untag(max, Tag::Selected)?;
            max = i;
            s.tag(max, Tag::Selected)?;
        }
    }
    s.untag(max, Tag::Selected)?;
    s.get(max)
}

#[inline]
fn digit(v: u32, exp: u64) -> usize {
    ((u64::from(v) / exp) % BASE) as usize
}

async fn digit_pass(s: &mut Session, exp: u64) -> Result<(), SortError> {
    let input = s.values().to_vec();
    let mut count = [0usize; BASE as usize];

    for (i, &v) in input.iter().enumerate() {
        s.tag(i, Tag::Selected)?;
        let res = s.suspend().await;
        s.untag(i, Tag::Selected)?;
        res?;
        count[digit(v, exp)] += 1;
    }
    for d in 1..count.len() {
        count[d] += count[d - 1];
    }

    // Back to front keeps equal digits in input order.
    let mut output = vec![0u32; input.len()];
    for &v in input.iter().rev() {
        let d = digit(v, exp);
        count[d] -= 1;
        output[count[d]] = v;
    }

    for (k, &v) in output.iter().enumerate() {
        s.set(k, v)?;
        if let Err(e) = s.suspend().await {
            // Finish the copy so the array is the whole permutation again.
            for (rest, &w) in output.iter().enumerate().skip(k + 1) {
                s.set(rest, w)?;
            }
            return Err(e);
        }
    }
    Ok(())
}
