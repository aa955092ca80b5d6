// Copyright 2024-2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use super::{EncounterOrder, IndexStrategy, ThreadCount};
use crate::iter::SharedReplay;
use crate::macros::{log_debug, log_error};
use crossbeam_utils::thread::scope;
use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Parameters to traverse a [`SharedReplay`] with scoped worker threads.
///
/// Worker threads read the shared cache concurrently: the source itself is
/// still pulled by one thread at a time, so a traversal pays off when the
/// per-element function dominates the cost of producing the elements.
///
/// ```
/// # use lazyseq::threads::{EncounterOrder, IndexStrategy, ParallelTraversal, ThreadCount};
/// # use lazyseq::Sequence;
/// let traversal = ParallelTraversal {
///     num_threads: ThreadCount::AvailableParallelism,
///     index_strategy: IndexStrategy::Dynamic,
/// };
///
/// let shared = Sequence::from_source(1..=10).share();
/// let squares = traversal.map(&shared, EncounterOrder::Ordered, |x| x * x);
/// assert_eq!(squares, vec![1, 4, 9, 16, 25, 36, 49, 64, 81, 100]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ParallelTraversal {
    /// Number of worker threads to spawn.
    pub num_threads: ThreadCount,
    /// Strategy to distribute indices among the worker threads.
    pub index_strategy: IndexStrategy,
}

impl ParallelTraversal {
    /// Calls the function on every element of the shared sequence, from the
    /// worker threads, in no particular order.
    ///
    /// # Panics
    ///
    /// Panics once all the workers have stopped, if any of them panicked,
    /// either in `f` or because the source failed.
    pub fn for_each<I, F>(&self, shared: &SharedReplay<I>, f: F)
    where
        I: Iterator + Send,
        I::Item: Clone + Send + Sync,
        F: Fn(I::Item) + Sync,
    {
        self.traverse(shared, || (), |_, _, item| f(item));
    }

    /// Applies the function to every element of the shared sequence, from the
    /// worker threads, and collects the outputs.
    ///
    /// With [`EncounterOrder::Ordered`], the outputs follow the order of the
    /// sequence. With [`EncounterOrder::Unordered`], no order is guaranteed.
    ///
    /// # Panics
    ///
    /// Panics once all the workers have stopped, if any of them panicked,
    /// either in `f` or because the source failed.
    pub fn map<I, U, F>(&self, shared: &SharedReplay<I>, order: EncounterOrder, f: F) -> Vec<U>
    where
        I: Iterator + Send,
        I::Item: Clone + Send + Sync,
        U: Send,
        F: Fn(I::Item) -> U + Sync,
    {
        let outputs = self.traverse(shared, Vec::new, |outputs, index, item| {
            outputs.push((index, f(item)))
        });
        let mut outputs: Vec<(usize, U)> = outputs.into_iter().flatten().collect();
        if order == EncounterOrder::Ordered {
            outputs.sort_unstable_by_key(|(index, _)| *index);
        }
        outputs.into_iter().map(|(_, output)| output).collect()
    }

    /// Spawns the workers, each folding the elements it reads into its own
    /// accumulator, and returns the accumulators in worker order.
    fn traverse<I, A>(
        &self,
        shared: &SharedReplay<I>,
        init: impl Fn() -> A + Sync,
        step: impl Fn(&mut A, usize, I::Item) + Sync,
    ) -> Vec<A>
    where
        I: Iterator + Send,
        I::Item: Clone + Send + Sync,
        A: Send,
    {
        let num_threads = self.num_threads.count().get();
        let next_index = CachePadded::new(AtomicUsize::new(0));
        let index_strategy = self.index_strategy;

        let worker = |id: usize| -> A {
            let mut accumulator = init();
            let mut index = match index_strategy {
                IndexStrategy::Strided => id,
                IndexStrategy::Dynamic => next_index.fetch_add(1, Ordering::Relaxed),
            };
            while let Some(item) = shared.get(index) {
                step(&mut accumulator, index, item);
                index = match index_strategy {
                    IndexStrategy::Strided => index + num_threads,
                    IndexStrategy::Dynamic => next_index.fetch_add(1, Ordering::Relaxed),
                };
            }
            log_debug!("[worker #{id}] Reached the end of the sequence");
            accumulator
        };

        log_debug!("[traversal] Spawning {num_threads} worker thread(s) ({index_strategy:?})");
        let result = scope(|s| {
            let handles = (0..num_threads)
                .map(|id| {
                    let worker = &worker;
                    s.spawn(move |_| worker(id))
                })
                .collect::<Vec<_>>();

            let mut accumulators = Vec::with_capacity(num_threads);
            let mut num_panicked = 0;
            for (_id, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(accumulator) => accumulators.push(accumulator),
                    Err(_) => {
                        log_error!("[traversal] Worker #{_id} panicked");
                        num_panicked += 1;
                    }
                }
            }
            (accumulators, num_panicked)
        });

        // All the workers have been joined above, so the scope itself only
        // fails if spawning did.
        let (accumulators, num_panicked) = match result {
            Ok(result) => result,
            Err(e) => std::panic::resume_unwind(e),
        };
        if num_panicked != 0 {
            panic!("{num_panicked} worker thread(s) panicked!");
        }
        log_debug!(
            "[traversal] Finished after realizing {} element(s)",
            shared.realized_len()
        );
        accumulators
    }
}
