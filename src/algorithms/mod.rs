//! Sorting algorithms instrumented for step-by-step animation.
//!
//! Every algorithm is an async function over a [`Session`]. Comparisons,
//! swaps and positional writes go through the session's primitives, which
//! count them, publish them and suspend between steps.
//!
//! ## Contract
//! - On `Ok(())` the array is a non-decreasing permutation of its input and
//!   every index is tagged sorted.
//! - On `Err(SortError::Aborted)` the array is still a permutation of its input.
//! - Every inner-loop iteration reaches a suspension point.
//!
//! ## Accounting
//! | Algorithm | Comparisons | Swaps counter |
//! |-----------|-------------|---------------|
//! | bubble, selection, quick, heap | every probe | exchanges |
//! | insertion, shell | every probe | every shift |
//! | merge | every probe | every write back from the runs |
//! | radix | max scan | every write back per digit pass |

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::Session;
use crate::error::SortError;

mod bubble;
mod heap;
mod insertion;
mod merge;
mod quick;
mod radix;
mod selection;
mod shell;

/// Available sorting algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Bubble,
    Selection,
    Insertion,
    Quick,
    Merge,
    Heap,
    Shell,
    Radix,
}

/// Display metadata for an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmInfo {
    pub name: &'static str,
    pub complexity: &'static str,
    pub description: &'static str,
    pub stable: bool,
}

/// Returned by [`Algorithm::from_str`] for unknown ids.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown algorithm {0:?}")]
pub struct ParseAlgorithmError(pub String);

impl Algorithm {
    /// Every algorithm, in menu order.
    pub const ALL: [Algorithm; 8] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Quick,
        Algorithm::Merge,
        Algorithm::Heap,
        Algorithm::Shell,
        Algorithm::Radix,
    ];

    /// Stable lowercase id.
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Quick => "quick",
            Algorithm::Merge => "merge",
            Algorithm::Heap => "heap",
            Algorithm::Shell => "shell",
            Algorithm::Radix => "radix",
        }
    }

    pub fn info(self) -> AlgorithmInfo {
        match self {
            Algorithm::Bubble => AlgorithmInfo {
                name: "Bubble Sort",
                complexity: "O(n²)",
                description: "Compares adjacent elements and swaps them if they are in the wrong \
                              order. Each pass settles the largest remaining element at the end.",
                stable: true,
            },
            Algorithm::Selection => AlgorithmInfo {
                name: "Selection Sort",
                complexity: "O(n²)",
                description: "Finds the minimum element of the unsorted part and moves it to the \
                              front, one swap per pass.",
                stable: false,
            },
            Algorithm::Insertion => AlgorithmInfo {
                name: "Insertion Sort",
                complexity: "O(n²)",
                description: "Builds the sorted prefix one element at a time by shifting each new \
                              element left past every greater one.",
                stable: true,
            },
            Algorithm::Quick => AlgorithmInfo {
                name: "Quick Sort",
                complexity: "O(n log n)",
                description: "Picks the last element as pivot, partitions the range into smaller \
                              and not-smaller elements, then sorts both sides recursively.",
                stable: false,
            },
            Algorithm::Merge => AlgorithmInfo {
                name: "Merge Sort",
                complexity: "O(n log n)",
                description: "Splits the array in halves, sorts them recursively and merges the \
                              two sorted halves.",
                stable: true,
            },
            Algorithm::Heap => AlgorithmInfo {
                name: "Heap Sort",
                complexity: "O(n log n)",
                description: "Builds a max-heap and repeatedly moves the root to the end, \
                              restoring the heap after each extraction.",
                stable: false,
            },
            Algorithm::Shell => AlgorithmInfo {
                name: "Shell Sort",
                complexity: "O(n²)",
                description: "Runs insertion sort over elements a gap apart, halving the gap \
                              until it reaches one.",
                stable: false,
            },
            Algorithm::Radix => AlgorithmInfo {
                name: "Radix Sort",
                complexity: "O(d·n)",
                description: "Distributes values by each decimal digit, least significant first, \
                              with a stable counting pass per digit.",
                stable: true,
            },
        }
    }

    /// Sorts the session's array.
    pub async fn run(self, s: &mut Session) -> Result<(), SortError> {
        match self {
            Algorithm::Bubble => bubble::sort(s).await,
            Algorithm::Selection => selection::sort(s).await,
            Algorithm::Insertion => insertion::sort(s).await,
            Algorithm::Quick => quick::sort(s).await,
            Algorithm::Merge => merge::sort(s).await,
            Algorithm::Heap => heap::sort(s).await,
            Algorithm::Shell => shell::sort(s).await,
            Algorithm::Radix => radix::sort(s).await,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.id() == id)
            .ok_or(ParseAlgorithmError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use rand::Rng;

    use super::*;
    use crate::core::testing::{session, Free, StopAt};
    use crate::model::{Stats, Tag};

    async fn run_free(algorithm: Algorithm, input: &[u32]) -> (Vec<u32>, Stats, u64) {
        let gate = Free::default();
        let calls = gate.calls.clone();
        let mut s = session(input, gate);
        algorithm.run(&mut s).await.unwrap();
        let (array, stats) = s.finish();
        for i in 0..array.len() {
            assert!(array.tags(i).unwrap().contains(Tag::Sorted), "{algorithm}: index {i} not sorted");
        }
        (array.values().to_vec(), stats, calls.load(Ordering::Relaxed))
    }

    fn sorted(input: &[u32]) -> Vec<u32> {
        let mut v = input.to_vec();
        v.sort_unstable();
        v
    }

    fn inversions(input: &[u32]) -> u64 {
        let mut n = 0;
        for i in 0..input.len() {
            for j in i + 1..input.len() {
                if input[i] > input[j] {
                    n += 1;
                }
            }
        }
        n
    }

    fn min_comparisons(algorithm: Algorithm, n: u64) -> u64 {
        match algorithm {
            Algorithm::Bubble | Algorithm::Selection => n * (n - 1) / 2,
            Algorithm::Merge | Algorithm::Heap => n / 2,
            _ => n - 1,
        }
    }

    fn inputs() -> Vec<Vec<u32>> {
        let mut rng = rand::rng();
        vec![
            vec![7],
            vec![4, 4, 4, 4, 4],
            vec![1, 2, 3, 4, 5, 6],
            vec![9, 8, 7, 6, 5, 4, 3, 2, 1],
            vec![0, 0, 1, 0],
            vec![170, 45, 75, 90, 802, 24, 2, 66],
            (0..64).map(|_| rng.random_range(0..1000)).collect(),
            (0..33).map(|_| rng.random_range(0..5)).collect(),
        ]
    }

    #[tokio::test]
    async fn test_every_algorithm_sorts_every_input() {
        for algorithm in Algorithm::ALL {
            for input in inputs() {
                let (out, stats, _) = run_free(algorithm, &input).await;
                assert_eq!(out, sorted(&input), "{algorithm} on {input:?}");
                assert!(
                    stats.comparisons() >= min_comparisons(algorithm, input.len() as u64),
                    "{algorithm} on {input:?}: {} comparisons",
                    stats.comparisons()
                );
            }
        }
    }

    #[tokio::test]
    async fn test_every_inner_step_suspends() {
        for algorithm in Algorithm::ALL {
            let input: Vec<u32> = (0..20).rev().collect();
            let (_, stats, calls) = run_free(algorithm, &input).await;
            assert!(calls >= stats.comparisons(), "{algorithm}: {calls} suspends");
            assert!(calls > 0);
        }
    }

    #[tokio::test]
    async fn test_bubble_golden_counts() {
        let (out, stats, _) = run_free(Algorithm::Bubble, &[5, 3, 8, 1, 9, 2]).await;
        assert_eq!(out, vec![1, 2, 3, 5, 8, 9]);
        assert_eq!(stats.comparisons(), 15);
        assert_eq!(stats.swaps(), 8);
    }

    #[tokio::test]
    async fn test_selection_on_sorted_input() {
        let (out, stats, _) = run_free(Algorithm::Selection, &[1, 2, 3]).await;
        assert_eq!(out, vec![1, 2, 3]);
        assert_eq!(stats.comparisons(), 3);
        assert_eq!(stats.swaps(), 0);
    }

    #[tokio::test]
    async fn test_radix_example() {
        let (out, stats, _) = run_free(Algorithm::Radix, &[170, 45, 75, 90, 802, 24, 2, 66]).await;
        assert_eq!(out, vec![2, 24, 45, 66, 75, 90, 170, 802]);
        assert_eq!(stats.comparisons(), 7);
        // Three digit passes, eight writes each.
        assert_eq!(stats.swaps(), 24);
    }

    #[tokio::test]
    async fn test_exchange_sorts_count_one_swap_per_inversion() {
        for input in inputs() {
            let expected = inversions(&input);
            for algorithm in [Algorithm::Bubble, Algorithm::Insertion] {
                let (_, stats, _) = run_free(algorithm, &input).await;
                assert_eq!(stats.swaps(), expected, "{algorithm} on {input:?}");
            }
        }
    }

    #[tokio::test]
    async fn test_selection_swaps_at_most_once_per_pass() {
        for input in inputs() {
            let (_, stats, _) = run_free(Algorithm::Selection, &input).await;
            assert!(stats.swaps() < input.len() as u64);
            let n = input.len() as u64;
            assert_eq!(stats.comparisons(), n * (n - 1) / 2);
        }
    }

    #[tokio::test]
    async fn test_merge_counts_every_write() {
        // [2, 1]: one comparison, two writes.
        let (out, stats, _) = run_free(Algorithm::Merge, &[2, 1]).await;
        assert_eq!(out, vec![1, 2]);
        assert_eq!((stats.comparisons(), stats.swaps()), (1, 2));
    }

    #[tokio::test]
    async fn test_quick_already_sorted_never_swaps() {
        let (_, stats, _) = run_free(Algorithm::Quick, &[1, 2, 3, 4]).await;
        // Pivot is always the maximum and stays in place.
        assert_eq!(stats.swaps(), 0);
        assert_eq!(stats.comparisons(), 3 + 2 + 1);
    }

    #[tokio::test]
    async fn test_abort_leaves_a_permutation() {
        let input = vec![31, 4, 15, 9, 26, 5, 35, 8, 97, 9, 32, 3, 84, 6, 26, 43];
        for algorithm in Algorithm::ALL {
            let (_, _, total) = run_free(algorithm, &input).await;
            for n in [1, total / 2, total] {
                let mut s = session(&input, StopAt::new(n));
                assert_eq!(algorithm.run(&mut s).await, Err(SortError::Aborted), "{algorithm} n={n}");
                let (array, _) = s.finish();
                assert_eq!(
                    sorted(array.values()),
                    sorted(&input),
                    "{algorithm} stopped at {n}/{total}"
                );
            }
        }
    }

    #[test]
    fn test_parse_ids() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.id().parse::<Algorithm>(), Ok(algorithm));
        }
        assert_eq!(" Heap ".parse::<Algorithm>(), Ok(Algorithm::Heap));
        assert_eq!(
            "bogo".parse::<Algorithm>(),
            Err(ParseAlgorithmError("bogo".to_string()))
        );
    }

    #[test]
    fn test_info_stability_flags() {
        let stable: Vec<&str> = Algorithm::ALL
            .into_iter()
            .filter(|a| a.info().stable)
            .map(Algorithm::id)
            .collect();
        assert_eq!(stable, vec!["bubble", "insertion", "merge", "radix"]);
    }
}
