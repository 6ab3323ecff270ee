//! # Array model: the bars being sorted.
//!
//! [`ArrayModel`] owns the values and their per-index [`TagSet`]s. It knows
//! nothing about stats or events; the run [`Session`](crate::Session) wraps
//! each mutation with counting, publishing and suspension.
//!
//! ## Rules
//! - Length is in `1..=max_size` and constant until the next `set_values`.
//! - Every index access is bounds-checked and reported as
//!   [`SortError::IndexOutOfRange`].
//! - A failed `set_values` leaves the model untouched.

use std::ops::Range;

use rand::Rng;

use super::tags::{Tag, TagSet};
use crate::error::SortError;

/// Draws `size` values uniformly from `range`; an empty range yields `range.start`.
pub(crate) fn random_values(size: usize, range: Range<u32>) -> Vec<u32> {
    if range.is_empty() {
        return vec![range.start; size];
    }
    let mut rng = rand::rng();
    (0..size).map(|_| rng.random_range(range.clone())).collect()
}

/// Values plus visual tags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayModel {
    values: Vec<u32>,
    tags: Vec<TagSet>,
    max_size: usize,
}

impl ArrayModel {
    /// Creates a model from `values`, rejecting empty or oversized input.
    pub fn new(values: Vec<u32>, max_size: usize) -> Result<Self, SortError> {
        check_len(values.len(), max_size)?;
        let tags = vec![TagSet::EMPTY; values.len()];
        Ok(Self {
            values,
            tags,
            max_size,
        })
    }

    /// Creates a model of `size` values drawn uniformly from `range`.
    pub fn random(size: usize, max_size: usize, range: Range<u32>) -> Result<Self, SortError> {
        check_len(size, max_size)?;
        Self::new(random_values(size, range), max_size)
    }

    /// Replaces the contents and clears all tags.
    pub fn set_values(&mut self, values: Vec<u32>) -> Result<(), SortError> {
        check_len(values.len(), self.max_size)?;
        self.tags = vec![TagSet::EMPTY; values.len()];
        self.values = values;
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false` for a constructed model; kept for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    #[inline]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn get(&self, i: usize) -> Result<u32, SortError> {
        self.values.get(i).copied().ok_or(SortError::IndexOutOfRange {
            index: i,
            len: self.values.len(),
        })
    }

    /// Overwrites one position; returns the previous value.
    pub fn set(&mut self, i: usize, v: u32) -> Result<u32, SortError> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(i)
            .ok_or(SortError::IndexOutOfRange { index: i, len })?;
        Ok(std::mem::replace(slot, v))
    }

    /// Exchanges two positions; returns `false` (and does nothing) if `i == j`.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<bool, SortError> {
        self.check_index(i)?;
        self.check_index(j)?;
        if i == j {
            return Ok(false);
        }
        self.values.swap(i, j);
        Ok(true)
    }

    /// True if values are in non-decreasing order.
    pub fn is_sorted(&self) -> bool {
        self.values.windows(2).all(|w| w[0] <= w[1])
    }

    pub fn tags(&self, i: usize) -> Result<TagSet, SortError> {
        self.check_index(i)?;
        Ok(self.tags[i])
    }

    /// Adds `tag` at `i`; returns the new set if it changed.
    pub fn tag(&mut self, i: usize, tag: Tag) -> Result<Option<TagSet>, SortError> {
        self.check_index(i)?;
        let set = &mut self.tags[i];
        Ok(set.insert(tag).then_some(*set))
    }

    /// Removes `tag` at `i`; returns the new set if it changed.
    pub fn untag(&mut self, i: usize, tag: Tag) -> Result<Option<TagSet>, SortError> {
        self.check_index(i)?;
        let set = &mut self.tags[i];
        Ok(set.remove(tag).then_some(*set))
    }

    /// Drops every tag on every index.
    pub fn clear_tags(&mut self) {
        self.tags.fill(TagSet::EMPTY);
    }

    #[inline]
    fn check_index(&self, i: usize) -> Result<(), SortError> {
        if i < self.values.len() {
            Ok(())
        } else {
            Err(SortError::IndexOutOfRange {
                index: i,
                len: self.values.len(),
            })
        }
    }
}

fn check_len(len: usize, max: usize) -> Result<(), SortError> {
    if len == 0 || len > max {
        return Err(SortError::InvalidSize { len, max });
    }
    Ok(())
}
