// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Forking a sequence into independent readers of one materialization cache.

use super::Sequence;
use crate::core::{LocalCache, Materialize, SyncCache};
use crate::error::SourceFailure;
use std::iter::{Skip, SkipWhile, Take, TakeWhile};
use std::rc::Rc;
use std::sync::Arc;

/// Fork over a single-threaded cache, as returned by
/// [`duplicate()`](Sequence::duplicate) and friends.
type LocalFork<I> = Sequence<Fork<Rc<LocalCache<I>>>>;

/// A read cursor over a shared materialization cache.
///
/// Each fork carries its own position: advancing one fork realizes the cache
/// up to that position if needed, without affecting the position of other
/// forks. Cloning a fork yields a new fork at the same position.
///
/// You most likely won't need to interact with this struct directly, as it
/// implements the [`Iterator`] trait, but it is nonetheless public because of
/// the `must_use` annotation.
///
/// # Panics
///
/// Iterating panics if the source panicked while realizing the requested
/// index, see [`SourceFailure`]. Use [`try_next()`](Self::try_next) to observe
/// the failure as a value instead.
#[must_use = "iterator adaptors are lazy"]
#[derive(Clone)]
pub struct Fork<H> {
    handle: H,
    cursor: usize,
}

impl<H: Materialize> Fork<H> {
    fn new(handle: H) -> Self {
        Fork { handle, cursor: 0 }
    }

    /// Index of the next item that this fork will read.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Reads the next item, surfacing a failed source as an error.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// # use lazyseq::error::SourceFailure;
    /// # use std::panic::{catch_unwind, AssertUnwindSafe};
    /// let source = (0..3).map(|x| if x == 1 { panic!("source failure") } else { x });
    /// let (mut a, b) = Sequence::from_source(source).duplicate();
    /// let mut b = b.into_inner();
    ///
    /// assert_eq!(a.next(), Some(0));
    /// assert!(catch_unwind(AssertUnwindSafe(|| a.next())).is_err());
    ///
    /// assert_eq!(b.try_next(), Ok(Some(0)));
    /// assert_eq!(b.try_next(), Err(SourceFailure::Poisoned { index: 1 }));
    /// ```
    pub fn try_next(&mut self) -> Result<Option<H::Item>, SourceFailure> {
        let item = self.handle.try_get(self.cursor)?;
        if item.is_some() {
            self.cursor += 1;
        }
        Ok(item)
    }
}

impl<H: Materialize> Iterator for Fork<H> {
    type Item = H::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match self.try_next() {
            Ok(item) => item,
            Err(e) => panic!("{e}"),
        }
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        // Realizing index `cursor + n` realizes all the skipped ones anyway.
        self.cursor = self.cursor.saturating_add(n);
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let available = self.handle.realized_len().saturating_sub(self.cursor);
        if self.handle.is_exhausted() {
            (available, Some(available))
        } else {
            (available, None)
        }
    }
}

/// A replayable view of a sequence, backed by a single-threaded
/// materialization cache.
///
/// Every call to [`iter()`](Self::iter) returns a new sequence starting from
/// the first element. The underlying source is pulled at most once per index,
/// by whichever reader reaches that index first. Cloning a [`Replay`] shares
/// the same cache.
///
/// Realized items are retained until the last handle is dropped: replaying an
/// infinite source keeps every item realized so far in memory.
///
/// ```
/// # use lazyseq::Sequence;
/// let replay = Sequence::of(vec![1, 2, 3]).map(|x| x * 10).replay();
/// assert_eq!(replay.iter().to_list(), vec![10, 20, 30]);
/// assert_eq!(replay.iter().skip(1).to_list(), vec![20, 30]);
/// assert_eq!(replay.get(2), Some(30));
/// ```
pub struct Replay<I: Iterator> {
    cache: Rc<LocalCache<I>>,
}

impl<I: Iterator> Clone for Replay<I> {
    fn clone(&self) -> Self {
        Replay {
            cache: self.cache.clone(),
        }
    }
}

impl<I: Iterator> Replay<I>
where
    I::Item: Clone,
{
    /// Creates a replayable view of the given source. Nothing is pulled until
    /// the first read.
    pub fn new(source: I) -> Self {
        Replay {
            cache: Rc::new(LocalCache::new(source)),
        }
    }

    /// Returns a new sequence over all the elements, starting from the first.
    pub fn iter(&self) -> Sequence<Fork<Rc<LocalCache<I>>>> {
        Sequence::from_source(Fork::new(self.cache.clone()))
    }

    /// Returns the element at the given index, realizing the source up to it.
    ///
    /// # Panics
    ///
    /// Panics if the source panicked at or before that index.
    pub fn get(&self, index: usize) -> Option<I::Item> {
        self.cache.get(index)
    }

    /// Returns the element at the given index, realizing the source up to it.
    pub fn try_get(&self, index: usize) -> Result<Option<I::Item>, SourceFailure> {
        self.cache.try_get(index)
    }

    /// Number of elements realized so far.
    pub fn realized_len(&self) -> usize {
        self.cache.realized_len()
    }

    /// Whether the source has been fully realized.
    pub fn is_exhausted(&self) -> bool {
        self.cache.is_exhausted()
    }
}

/// A replayable view of a sequence that can be read from multiple threads,
/// backed by a [`SyncCache`].
///
/// Readers racing for an unrealized index are serialized: exactly one of them
/// pulls the source, the others block until the item is published. There is
/// no timeout, a source that never returns stalls every waiting reader.
///
/// ```
/// # use lazyseq::Sequence;
/// let shared = Sequence::from_source(0..100).share();
/// std::thread::scope(|s| {
///     for _ in 0..4 {
///         let shared = shared.clone();
///         s.spawn(move || assert_eq!(shared.iter().sum::<i32>(), 4950));
///     }
/// });
/// ```
pub struct SharedReplay<I: Iterator> {
    cache: Arc<SyncCache<I>>,
}

impl<I: Iterator> Clone for SharedReplay<I> {
    fn clone(&self) -> Self {
        SharedReplay {
            cache: self.cache.clone(),
        }
    }
}

impl<I: Iterator> SharedReplay<I>
where
    I::Item: Clone,
{
    /// Creates a shared replayable view of the given source. Nothing is pulled
    /// until the first read.
    pub fn new(source: I) -> Self {
        SharedReplay {
            cache: Arc::new(SyncCache::new(source)),
        }
    }

    /// Returns a new sequence over all the elements, starting from the first.
    pub fn iter(&self) -> Sequence<Fork<Arc<SyncCache<I>>>> {
        Sequence::from_source(Fork::new(self.cache.clone()))
    }

    /// Returns the element at the given index, realizing the source up to it.
    ///
    /// # Panics
    ///
    /// Panics if the source panicked at or before that index.
    pub fn get(&self, index: usize) -> Option<I::Item> {
        self.cache.get(index)
    }

    /// Returns the element at the given index, realizing the source up to it.
    pub fn try_get(&self, index: usize) -> Result<Option<I::Item>, SourceFailure> {
        self.cache.try_get(index)
    }

    /// Number of elements realized so far.
    pub fn realized_len(&self) -> usize {
        self.cache.realized_len()
    }

    /// Whether the source has been fully realized.
    pub fn is_exhausted(&self) -> bool {
        self.cache.is_exhausted()
    }
}

impl<I: Iterator> Sequence<I>
where
    I::Item: Clone,
{
    /// Moves this sequence into a single-threaded materialization cache, that
    /// can be replayed any number of times.
    pub fn replay(self) -> Replay<I> {
        Replay::new(self.into_inner())
    }

    /// Moves this sequence into a thread-safe materialization cache, that can
    /// be replayed any number of times from any thread.
    pub fn share(self) -> SharedReplay<I> {
        SharedReplay::new(self.into_inner())
    }

    /// Forks this sequence into 2 independent sequences. Each of them yields
    /// the same elements as this sequence, regardless of how their iterations
    /// are interleaved.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let (mut a, b) = Sequence::of(vec![1, 2, 3]).duplicate();
    /// assert_eq!(a.next(), Some(1));
    /// assert_eq!(b.to_list(), vec![1, 2, 3]);
    /// assert_eq!(a.to_list(), vec![2, 3]);
    /// ```
    pub fn duplicate(self) -> (LocalFork<I>, LocalFork<I>) {
        let replay = self.replay();
        (replay.iter(), replay.iter())
    }

    /// Forks this sequence into 3 independent sequences.
    pub fn triplicate(self) -> (LocalFork<I>, LocalFork<I>, LocalFork<I>) {
        let replay = self.replay();
        (replay.iter(), replay.iter(), replay.iter())
    }

    /// Forks this sequence into 4 independent sequences.
    pub fn quadruplicate(self) -> (LocalFork<I>, LocalFork<I>, LocalFork<I>, LocalFork<I>) {
        let replay = self.replay();
        (replay.iter(), replay.iter(), replay.iter(), replay.iter())
    }

    /// Splits this sequence into its first `k` elements and the remaining
    /// ones.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let (first, second) = Sequence::of(vec![1, 2, 3, 4]).split_at(2);
    /// assert_eq!(first.to_list(), vec![1, 2]);
    /// assert_eq!(second.to_list(), vec![3, 4]);
    /// ```
    pub fn split_at(
        self,
        k: usize,
    ) -> (
        Sequence<Take<Fork<Rc<LocalCache<I>>>>>,
        Sequence<Skip<Fork<Rc<LocalCache<I>>>>>,
    ) {
        let (first, second) = self.duplicate();
        (first.limit(k), second.skip(k))
    }

    /// Splits this sequence into its first element, if any, and the remaining
    /// ones. The first element is realized immediately.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let (head, tail) = Sequence::<std::iter::Empty<i32>>::empty().split_at_head();
    /// assert_eq!(head, None);
    /// assert_eq!(tail.to_list(), Vec::<i32>::new());
    /// ```
    pub fn split_at_head(self) -> (Option<I::Item>, Sequence<Skip<Fork<Rc<LocalCache<I>>>>>) {
        let (head, tail) = self.split_at(1);
        (head.find_first(), tail)
    }

    /// Splits this sequence into the longest prefix whose elements match the
    /// predicate, and the remaining elements.
    ///
    /// Each half evaluates its own clone of the predicate on its own
    /// traversal: a predicate that isn't deterministic can make both halves
    /// disagree on the boundary.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let (small, rest) = Sequence::of(vec![1, 2, 5, 1, 7]).split_by(|x| *x < 3);
    /// assert_eq!(small.to_list(), vec![1, 2]);
    /// assert_eq!(rest.to_list(), vec![5, 1, 7]);
    /// ```
    pub fn split_by<P>(
        self,
        predicate: P,
    ) -> (
        Sequence<TakeWhile<Fork<Rc<LocalCache<I>>>, P>>,
        Sequence<SkipWhile<Fork<Rc<LocalCache<I>>>, P>>,
    )
    where
        P: FnMut(&I::Item) -> bool + Clone,
    {
        let (first, second) = self.duplicate();
        (first.limit_while(predicate.clone()), second.skip_while(predicate))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crossbeam_utils::thread::scope;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::cell::Cell;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn failing_source(fail_at: u32) -> impl Iterator<Item = u32> {
        (0..10).map(move |x| {
            if x == fail_at {
                panic!("source failure");
            }
            x
        })
    }

    #[test]
    fn test_duplicate_drain_in_any_order() {
        let (a, b) = Sequence::from_source(0..100).duplicate();
        assert_eq!(b.to_list(), (0..100).collect::<Vec<_>>());
        assert_eq!(a.to_list(), (0..100).collect::<Vec<_>>());

        let (mut a, mut b) = Sequence::from_source(0..100).duplicate();
        let mut alternating = (Vec::new(), Vec::new());
        loop {
            match (a.next(), b.next()) {
                (Some(x), Some(y)) => {
                    alternating.0.push(x);
                    alternating.1.push(y);
                }
                (None, None) => break,
                _ => panic!("forks disagree on the length"),
            }
        }
        assert_eq!(alternating.0, (0..100).collect::<Vec<_>>());
        assert_eq!(alternating.1, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_quadruplicate_random_interleavings() {
        const LEN: usize = 200;
        let expected = (0..LEN).map(|x| x * 3).collect::<Vec<_>>();

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let pulls = Cell::new(0);
            let (a, b, c, d) = Sequence::from_source((0..LEN).map(|x| x * 3))
                .peek(|_| pulls.set(pulls.get() + 1))
                .quadruplicate();
            let mut forks = [a, b, c, d];
            let mut outputs: [Vec<usize>; 4] = Default::default();

            while outputs.iter().any(|output| output.len() < LEN) {
                let i = rng.random_range(0..4);
                if let Some(x) = forks[i].next() {
                    outputs[i].push(x);
                }
            }

            for (fork, output) in forks.iter_mut().zip(&outputs) {
                assert_eq!(fork.next(), None);
                assert_eq!(output, &expected);
            }
            assert_eq!(pulls.get(), LEN);
        }
    }

    #[test]
    fn test_forks_are_lazy() {
        let pulls = Cell::new(0);
        let (a, b, c) = Sequence::from_source((0..10).inspect(|_| pulls.set(pulls.get() + 1)))
            .triplicate();
        assert_eq!(pulls.get(), 0);
        assert_eq!(a.limit(3).to_list(), vec![0, 1, 2]);
        assert_eq!(pulls.get(), 3);
        assert_eq!(b.limit(2).to_list(), vec![0, 1]);
        assert_eq!(pulls.get(), 3);
        assert_eq!(c.skip(9).to_list(), vec![9]);
        assert_eq!(pulls.get(), 10);
    }

    #[test]
    fn test_duplicate_infinite() {
        let (a, b) = Sequence::iterate(1u64, |x| x * 2).duplicate();
        assert_eq!(a.limit(4).to_list(), vec![1, 2, 4, 8]);
        assert_eq!(b.skip(10).find_first(), Some(1024));
    }

    #[test]
    fn test_failure_reaches_every_fork() {
        let (a, b, c) = Sequence::from_source(failing_source(2)).triplicate();
        let mut c = c.into_inner();

        let result = catch_unwind(AssertUnwindSafe(|| a.to_list()));
        assert!(result.is_err());

        let result = catch_unwind(AssertUnwindSafe(|| b.to_list()));
        assert!(result.is_err());

        assert_eq!(c.try_next(), Ok(Some(0)));
        assert_eq!(c.try_next(), Ok(Some(1)));
        assert_eq!(c.try_next(), Err(SourceFailure::Poisoned { index: 2 }));
        assert_eq!(c.try_next(), Err(SourceFailure::Poisoned { index: 2 }));
        assert_eq!(c.position(), 2);
    }

    #[test]
    #[should_panic(
        expected = "the source panicked while realizing index 4, the sequence cannot be replayed past it"
    )]
    fn test_fork_panics_with_failure() {
        let (a, b) = Sequence::from_source(failing_source(4)).duplicate();
        let _ = catch_unwind(AssertUnwindSafe(|| a.to_list()));
        b.to_list();
    }

    #[test]
    fn test_result_errors_are_shared() {
        let (a, b) = Sequence::of(vec![Ok(1), Err("bad input"), Ok(3)]).duplicate();
        assert_eq!(a.collect::<Result<Vec<i32>, _>>(), Err("bad input"));
        assert_eq!(b.to_list(), vec![Ok(1), Err("bad input"), Ok(3)]);
    }

    #[test]
    fn test_split_at() {
        let (first, second) = Sequence::of(vec![1, 2, 3, 4]).split_at(2);
        assert_eq!(second.to_list(), vec![3, 4]);
        assert_eq!(first.to_list(), vec![1, 2]);

        let (first, second) = Sequence::of(vec![1, 2]).split_at(5);
        assert_eq!(first.to_list(), vec![1, 2]);
        assert_eq!(second.to_list(), Vec::<i32>::new());
    }

    #[test]
    fn test_split_at_head() {
        let (head, tail) = Sequence::of(vec!['a', 'b', 'c']).split_at_head();
        assert_eq!(head, Some('a'));
        assert_eq!(tail.to_list(), vec!['b', 'c']);

        let (head, tail) = Sequence::<std::iter::Empty<char>>::empty().split_at_head();
        assert_eq!(head, None);
        assert_eq!(tail.to_list(), Vec::<char>::new());
    }

    #[test]
    fn test_split_by() {
        let (prefix, rest) = Sequence::of(vec![2, 4, 5, 6]).split_by(|x| x % 2 == 0);
        assert_eq!(rest.to_list(), vec![5, 6]);
        assert_eq!(prefix.to_list(), vec![2, 4]);

        let (prefix, rest) = Sequence::of(vec![1, 2]).split_by(|_| true);
        assert_eq!(prefix.to_list(), vec![1, 2]);
        assert_eq!(rest.to_list(), Vec::<i32>::new());
    }

    #[test]
    fn test_fork_size_hint() {
        let replay = Sequence::from_source(0..5).replay();
        let mut fork = replay.iter();
        assert_eq!(fork.size_hint(), (0, None));
        assert_eq!(fork.next(), Some(0));
        assert_eq!(replay.get(3), Some(3));
        assert_eq!(fork.size_hint(), (3, None));
        assert_eq!(replay.get(5), None);
        assert!(replay.is_exhausted());
        assert_eq!(fork.size_hint(), (4, Some(4)));
    }

    #[test]
    fn test_cloned_fork_keeps_position() {
        let replay = Sequence::from_source(0..5).replay();
        let mut fork = replay.iter().into_inner();
        fork.next();
        fork.next();
        let clone = fork.clone();
        assert_eq!(clone.collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(fork.collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(replay.realized_len(), 5);
    }

    #[test]
    fn test_shared_replay_concurrent_forks() {
        const NUM_THREADS: usize = 8;
        const LEN: u64 = 10_000;

        let shared = Sequence::from_source(0..LEN).map(|x| x * x).share();
        scope(|s| {
            for id in 0..NUM_THREADS {
                let shared = shared.clone();
                s.spawn(move |_| {
                    // Threads start at different offsets to race on different slots.
                    let skipped = shared.iter().skip(id * 100).find_first();
                    assert_eq!(skipped, Some((id as u64 * 100).pow(2)));
                    let sum: u64 = shared.iter().sum();
                    assert_eq!(sum, (0..LEN).map(|x| x * x).sum::<u64>());
                });
            }
        })
        .unwrap();

        assert_eq!(shared.realized_len(), LEN as usize);
        assert!(shared.is_exhausted());
    }

    #[test]
    fn test_shared_replay_failure_reaches_every_thread() {
        let shared = Sequence::from_source(failing_source(5)).share();
        let result = scope(|s| {
            s.spawn(|_| shared.iter().to_list());
        });
        assert!(result.is_err());

        scope(|s| {
            for _ in 0..4 {
                s.spawn(|_| {
                    let mut fork = shared.iter().into_inner();
                    for i in 0..5 {
                        assert_eq!(fork.try_next(), Ok(Some(i)));
                    }
                    assert_eq!(fork.try_next(), Err(SourceFailure::Poisoned { index: 5 }));
                });
            }
        })
        .unwrap();
    }
}
