// Copyright 2024-2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![doc = include_str!("../README.md")]
#![forbid(missing_docs, unsafe_code)]

mod core;
pub mod error;
pub mod iter;
mod macros;
pub mod threads;

pub use crate::core::{LocalCache, Materialize, SyncCache};
pub use error::SourceFailure;
pub use iter::{HeadAndTail, Sequence};

/// A prelude, to import the main types and traits of this crate.
pub mod prelude {
    pub use crate::iter::{reducers, monoid, FromSequence, IntoPullSource, Monoid, Sequence};
    pub use crate::threads::{EncounterOrder, IndexStrategy, ParallelTraversal, ThreadCount};
    pub use crate::SourceFailure;
}

#[cfg(test)]
mod test {
    use super::prelude::*;
    use std::num::NonZeroUsize;

    #[test]
    fn test_grouped_scenario() {
        let groups = Sequence::of(vec![1, 2, 3, 4, 5, 6]).grouped(3).to_list();
        assert_eq!(groups, vec![vec![1, 2, 3], vec![4, 5, 6]]);
    }

    #[test]
    fn test_sorted_scenario() {
        let sorted = || Sequence::of(vec![4, 3, 6, 7]).sorted();
        assert_eq!(sorted().to_list(), vec![3, 4, 6, 7]);
        assert_eq!(sorted().skip(2).to_list(), vec![6, 7]);
    }

    #[test]
    fn test_cycle_scenario() {
        let cycled = Sequence::of(vec![1, 2, 2]).cycle_times(3).to_list();
        assert_eq!(cycled, vec![1, 2, 2, 1, 2, 2, 1, 2, 2]);
    }

    #[test]
    fn test_zip3_scenario() {
        let zipped = [1, 2, 3]
            .into_seq()
            .zip3(["a", "b", "c"], [true, false, true])
            .to_list();
        assert_eq!(zipped, vec![(1, "a", true), (2, "b", false), (3, "c", true)]);
    }

    #[test]
    fn test_split_scenario() {
        let (first, second) = Sequence::of(vec![1, 2, 3, 4]).split_at(2);
        assert_eq!(first.to_list(), vec![1, 2]);
        assert_eq!(second.to_list(), vec![3, 4]);

        let (head, tail) = Sequence::of(Vec::<i32>::new()).split_at_head();
        assert_eq!(head, None);
        assert!(tail.to_list().is_empty());
    }

    #[test]
    fn test_pipeline_across_engines() {
        // Windows of a cycled sequence, indexed, then reduced per column.
        let (sums, indices) = Sequence::of(vec![1, 2, 3])
            .cycle_times(2)
            .sliding(2)
            .map(|window| window.into_seq().reduce(reducers::sum()))
            .zip_with_index()
            .unzip();
        assert_eq!(indices.to_list(), vec![0, 1, 2, 3, 4]);
        assert_eq!(sums.scan_left(reducers::sum()).to_list(), vec![0, 3, 8, 12, 15, 20]);
    }

    #[test]
    fn test_parallel_traversal_of_forked_sequence() {
        let traversal = ParallelTraversal {
            num_threads: ThreadCount::Count(NonZeroUsize::try_from(4usize).unwrap()),
            index_strategy: IndexStrategy::Dynamic,
        };
        let shared = Sequence::iterate(1u64, |x| x + 1).limit(1000).share();
        let doubled = traversal.map(&shared, EncounterOrder::Ordered, |x| x * 2);
        assert_eq!(doubled.len(), 1000);
        assert_eq!(
            shared.iter().grouped(100).map(|group| group.len()).to_list(),
            vec![100; 10]
        );
        assert_eq!(doubled.into_seq().reduce(reducers::sum()), 1000 * 1001);
    }
}
