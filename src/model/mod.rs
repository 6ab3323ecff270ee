//! Data owned by a run: the array being sorted, its tags, and its counters.
//!
//! ## Contents
//! - [`ArrayModel`] values plus per-index [`TagSet`]
//! - [`Tag`], [`TagSet`] observational annotations
//! - [`Stats`] comparison/swap counters and elapsed time

mod array;
mod stats;
mod tags;

pub use array::ArrayModel;
pub(crate) use array::random_values;
pub use stats::Stats;
pub use tags::{Tag, TagSet};
