// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Bounded, unbounded and predicate-bounded repetition.

use super::detail::Deferred;
use super::fork::{Fork, Replay};
use super::reduce::Monoid;
use super::Sequence;
use crate::core::LocalCache;
use std::iter::TakeWhile;
use std::rc::Rc;

/// An iterator that traverses a sequence again and again, possibly a bounded
/// number of times.
///
/// The first pass records the elements in a [`Replay`] cache as they are
/// pulled, and later passes read them back: the source is pulled at most once
/// per element. An empty source yields an empty cycle, even when unbounded.
///
/// This struct is created by the [`cycle()`](Sequence::cycle) and
/// [`cycle_times()`](Sequence::cycle_times) methods on [`Sequence`].
///
/// You most likely won't need to interact with this struct directly, as it
/// implements the [`Iterator`] trait, but it is nonetheless public because of
/// the `must_use` annotation.
#[must_use = "iterator adaptors are lazy"]
pub struct Cycle<I: Iterator> {
    replay: Replay<I>,
    pass: Fork<Rc<LocalCache<I>>>,
    /// Number of passes left, including the current one. [`None`] for an
    /// unbounded cycle.
    passes_left: Option<usize>,
}

impl<I: Iterator> Cycle<I>
where
    I::Item: Clone,
{
    fn new(source: I, passes: Option<usize>) -> Self {
        let replay = Replay::new(source);
        let pass = replay.iter().into_inner();
        Cycle {
            replay,
            pass,
            passes_left: passes,
        }
    }
}

impl<I: Iterator> Iterator for Cycle<I>
where
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        loop {
            if self.passes_left == Some(0) {
                return None;
            }
            if let Some(item) = self.pass.next() {
                return Some(item);
            }
            if self.replay.realized_len() == 0 {
                self.passes_left = Some(0);
                return None;
            }
            if let Some(passes_left) = &mut self.passes_left {
                *passes_left -= 1;
            }
            self.pass = self.replay.iter().into_inner();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.passes_left {
            Some(0) => (0, Some(0)),
            Some(passes_left) if self.replay.is_exhausted() => {
                let len = self.replay.realized_len();
                let remaining = (passes_left - 1)
                    .checked_mul(len)
                    .and_then(|n| n.checked_add(len - self.pass.position()));
                (remaining.unwrap_or(usize::MAX), remaining)
            }
            _ => (0, None),
        }
    }
}

impl<I: Iterator> Sequence<I>
where
    I::Item: Clone,
{
    /// Traverses this sequence `n` times, end to end.
    ///
    /// Each element is pulled once from the source, and replayed from a cache
    /// for the later passes. A cycle over an infinite sequence never reaches
    /// its second pass. Cycling 0 times yields nothing and never pulls the
    /// source.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let cycled = Sequence::of(vec![1, 2, 2]).cycle_times(3).to_list();
    /// assert_eq!(cycled, vec![1, 2, 2, 1, 2, 2, 1, 2, 2]);
    /// ```
    pub fn cycle_times(self, n: usize) -> Sequence<Cycle<I>> {
        Sequence::from_source(Cycle::new(self.into_inner(), Some(n)))
    }

    /// Traverses this sequence again and again, without end unless the
    /// sequence is empty.
    ///
    /// The result must be consumed through a bounding combinator, such as
    /// [`limit()`](Self::limit), or a terminal operation that stops on its own.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let cycled = Sequence::of(vec!['a', 'b']).cycle().limit(5).to_list();
    /// assert_eq!(cycled, vec!['a', 'b', 'a', 'b', 'a']);
    /// ```
    pub fn cycle(self) -> Sequence<Cycle<I>> {
        Sequence::from_source(Cycle::new(self.into_inner(), None))
    }

    /// Traverses this sequence again and again, stopping at the first element
    /// that doesn't match the predicate. That element is excluded.
    ///
    /// The predicate sees the elements of the cycled output, so it must fail
    /// eventually for the result to be finite.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let mut budget = 5;
    /// let cycled = Sequence::of(vec![1, 2, 3])
    ///     .cycle_while(|_| {
    ///         budget -= 1;
    ///         budget >= 0
    ///     })
    ///     .to_list();
    /// assert_eq!(cycled, vec![1, 2, 3, 1, 2]);
    /// ```
    pub fn cycle_while<P>(self, predicate: P) -> Sequence<TakeWhile<Cycle<I>, P>>
    where
        P: FnMut(&I::Item) -> bool,
    {
        self.cycle().limit_while(predicate)
    }

    /// Traverses this sequence again and again, stopping at the first element
    /// that matches the predicate. That element is excluded.
    pub fn cycle_until<P>(self, predicate: P) -> Sequence<impl Iterator<Item = I::Item>>
    where
        P: FnMut(&I::Item) -> bool,
    {
        self.cycle().limit_until(predicate)
    }

    /// Reduces this sequence with the monoid, and yields the result `n` times.
    ///
    /// The reduction happens on the first pull, so the whole sequence is
    /// realized at that point.
    ///
    /// ```
    /// # use lazyseq::iter::reducers;
    /// # use lazyseq::Sequence;
    /// let totals = Sequence::of(vec![1, 2, 3]).cycle_reduced(reducers::sum(), 2);
    /// assert_eq!(totals.to_list(), vec![6, 6]);
    /// ```
    pub fn cycle_reduced<M>(
        self,
        monoid: M,
        n: usize,
    ) -> Sequence<Deferred<I, impl FnOnce(Vec<I::Item>) -> Vec<I::Item>, I::Item>>
    where
        M: Monoid<Value = I::Item>,
    {
        Sequence::from_source(Deferred::new(self.into_inner(), move |items: Vec<I::Item>| {
            let total = items
                .into_iter()
                .fold(monoid.identity(), |total, x| monoid.combine(total, x));
            vec![total; n]
        }))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::iter::reducers;
    use std::cell::Cell;

    #[test]
    fn test_cycle_times() {
        let cycled = Sequence::of(vec![1, 2, 2]).cycle_times(3).to_list();
        assert_eq!(cycled, vec![1, 2, 2, 1, 2, 2, 1, 2, 2]);
        assert_eq!(Sequence::of(vec![4, 5]).cycle_times(1).to_list(), vec![4, 5]);
    }

    #[test]
    fn test_cycle_pulls_each_element_once() {
        let pulls = Cell::new(0);
        let cycled = Sequence::from_source(0..4)
            .peek(|_| pulls.set(pulls.get() + 1))
            .cycle_times(5)
            .to_list();
        assert_eq!(cycled.len(), 20);
        assert_eq!(pulls.get(), 4);
    }

    #[test]
    fn test_cycle_zero_times_never_pulls() {
        let pulls = Cell::new(0);
        let cycled = Sequence::from_source(0..4)
            .peek(|_| pulls.set(pulls.get() + 1))
            .cycle_times(0)
            .to_list();
        assert!(cycled.is_empty());
        assert_eq!(pulls.get(), 0);
    }

    #[test]
    fn test_cycle_empty() {
        let empty = || Sequence::<std::iter::Empty<i32>>::empty();
        assert!(empty().cycle_times(10).to_list().is_empty());
        assert!(empty().cycle().to_list().is_empty());
        assert!(empty().cycle_while(|_| true).to_list().is_empty());
    }

    #[test]
    fn test_cycle_unbounded() {
        let cycled = Sequence::of(vec![1, 2, 3]).cycle().skip(7).limit(4).to_list();
        assert_eq!(cycled, vec![2, 3, 1, 2]);
    }

    #[test]
    fn test_cycle_infinite_source() {
        let cycled = Sequence::iterate(0u32, |x| x + 1)
            .cycle_times(2)
            .limit(5)
            .to_list();
        assert_eq!(cycled, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_cycle_size_hint() {
        let mut cycled = Sequence::of(vec![1, 2, 3]).cycle_times(3);
        assert_eq!(cycled.size_hint(), (0, None));
        for _ in 0..4 {
            cycled.next();
        }
        assert_eq!(cycled.size_hint(), (5, Some(5)));
        assert_eq!(cycled.count(), 5);
    }

    #[test]
    fn test_cycle_while_and_until() {
        let cycled = Sequence::of(vec![1, 2, 3]).cycle_while(|x| *x < 3).to_list();
        assert_eq!(cycled, vec![1, 2]);

        let mut seen = 0;
        let cycled = Sequence::of(vec!['x', 'y'])
            .cycle_until(|_| {
                seen += 1;
                seen > 5
            })
            .to_list();
        assert_eq!(cycled, vec!['x', 'y', 'x', 'y', 'x']);
    }

    #[test]
    fn test_cycle_reduced() {
        let cycled = Sequence::of(vec![2, 3, 4])
            .cycle_reduced(reducers::product(), 3)
            .to_list();
        assert_eq!(cycled, vec![24, 24, 24]);

        let cycled = Sequence::<std::iter::Empty<i32>>::empty()
            .cycle_reduced(reducers::sum(), 2)
            .to_list();
        assert_eq!(cycled, vec![0, 0]);

        let pulls = Cell::new(0);
        let cycled = Sequence::from_source(0..3)
            .peek(|_| pulls.set(pulls.get() + 1))
            .cycle_reduced(reducers::sum(), 1);
        assert_eq!(pulls.get(), 0);
        assert_eq!(cycled.to_list(), vec![3]);
        assert_eq!(pulls.get(), 3);
    }
}
