// Copyright 2024-2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The [`Sequence`] type and its combinators.
//!
//! Combinators are grouped by engine:
//! - forking and replaying ([`Replay`], [`SharedReplay`], [`Fork`]),
//! - windowing ([`Sliding`], [`Grouped`]),
//! - zipping and unzipping,
//! - cycling ([`Cycle`]),
//! - reductions ([`Monoid`], [`ScanLeft`]).

mod cycle;
mod detail;
mod fork;
mod reduce;
pub mod reducers;
mod source;
mod window;
mod zip;

pub use cycle::Cycle;
pub use detail::{Deferred, Iterate};
pub use fork::{Fork, Replay, SharedReplay};
pub use reduce::{monoid, FnMonoid, MappedMonoid, Monoid, ScanLeft};
pub use source::{FromSequence, IntoPullSource};
pub use window::{Grouped, Sliding};

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Write};
use std::hash::Hash;
use std::iter::{Filter, FlatMap, Flatten, Inspect, Map, Skip, SkipWhile, Take, TakeWhile};

/// A lazy, ordered, possibly infinite series of values.
///
/// A [`Sequence`] wraps a pull source (any [`Iterator`]) and exposes
/// combinators as methods that consume the sequence and return a new one.
/// Nothing is pulled from the source until a terminal operation (iteration,
/// collection, reduction) needs it.
///
/// Some combinators require the whole sequence to be realized (for example
/// [`sorted()`](Self::sorted), [`reverse()`](Self::reverse),
/// [`fold_right()`](Self::fold_right)): they never return on an infinite
/// source.
///
/// ```
/// # use lazyseq::Sequence;
/// let sorted = Sequence::of(vec![4, 3, 6, 7]).sorted();
/// assert_eq!(sorted.skip(2).to_list(), vec![6, 7]);
/// ```
#[must_use = "sequences are lazy and do nothing unless consumed"]
#[derive(Clone, Debug)]
pub struct Sequence<I> {
    iter: I,
}

impl<I: Iterator> Iterator for Sequence<I> {
    type Item = I::Item;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> Sequence<std::vec::IntoIter<T>> {
    /// Creates a sequence over the given elements.
    pub fn of(elements: Vec<T>) -> Self {
        Sequence::from_source(elements.into_iter())
    }

    /// Creates a sequence over the given elements, in reverse order.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// assert_eq!(Sequence::reversed_of(vec![1, 2, 3]).to_list(), vec![3, 2, 1]);
    /// ```
    pub fn reversed_of(mut elements: Vec<T>) -> Self {
        elements.reverse();
        Sequence::of(elements)
    }
}

impl<T> Sequence<std::iter::Empty<T>> {
    /// Creates an empty sequence.
    pub fn empty() -> Self {
        Sequence::from_source(std::iter::empty())
    }
}

impl<T, F> Sequence<Iterate<T, F>>
where
    F: FnMut(&T) -> T,
{
    /// Creates an infinite sequence `seed, f(seed), f(f(seed)), ...`.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let powers = Sequence::iterate(1, |x| x * 2).limit(5).to_list();
    /// assert_eq!(powers, vec![1, 2, 4, 8, 16]);
    /// ```
    pub fn iterate(seed: T, f: F) -> Self {
        Sequence::from_source(Iterate::new(seed, f))
    }
}

impl<I: Iterator> Sequence<I> {
    /// Wraps the given pull source into a sequence.
    pub fn from_source(source: I) -> Self {
        Sequence { iter: source }
    }

    /// Unwraps the underlying iterator.
    pub fn into_inner(self) -> I {
        self.iter
    }

    /// Erases the type of the underlying iterator.
    pub fn boxed<'a>(self) -> Sequence<Box<dyn Iterator<Item = I::Item> + 'a>>
    where
        I: 'a,
    {
        Sequence::from_source(Box::new(self.iter))
    }

    /// Lazily transforms each element.
    pub fn map<U, F>(self, f: F) -> Sequence<Map<I, F>>
    where
        F: FnMut(I::Item) -> U,
    {
        Sequence::from_source(self.iter.map(f))
    }

    /// Lazily transforms each element into an iterable and flattens one level.
    pub fn flat_map<U, F>(self, f: F) -> Sequence<FlatMap<I, U, F>>
    where
        U: IntoIterator,
        F: FnMut(I::Item) -> U,
    {
        Sequence::from_source(self.iter.flat_map(f))
    }

    /// Flattens one level of nesting.
    pub fn flatten(self) -> Sequence<Flatten<I>>
    where
        I::Item: IntoIterator,
    {
        Sequence::from_source(self.iter.flatten())
    }

    /// Lazily keeps the elements matching the predicate.
    pub fn filter<P>(self, predicate: P) -> Sequence<Filter<I, P>>
    where
        P: FnMut(&I::Item) -> bool,
    {
        Sequence::from_source(self.iter.filter(predicate))
    }

    /// Calls the given function on each element as it is pulled.
    pub fn peek<F>(self, f: F) -> Sequence<Inspect<I, F>>
    where
        F: FnMut(&I::Item),
    {
        Sequence::from_source(self.iter.inspect(f))
    }

    /// Keeps at most the first `n` elements.
    pub fn limit(self, n: usize) -> Sequence<Take<I>> {
        Sequence::from_source(self.iter.take(n))
    }

    /// Drops the first `n` elements.
    pub fn skip(self, n: usize) -> Sequence<Skip<I>> {
        Sequence::from_source(self.iter.skip(n))
    }

    /// Keeps elements while the predicate holds. The first element failing
    /// the predicate is excluded, and nothing after it is pulled.
    pub fn limit_while<P>(self, predicate: P) -> Sequence<TakeWhile<I, P>>
    where
        P: FnMut(&I::Item) -> bool,
    {
        Sequence::from_source(self.iter.take_while(predicate))
    }

    /// Keeps elements until the predicate holds. The first element satisfying
    /// the predicate is excluded.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let head = Sequence::of(vec![1, 2, 3, 4, 5]).limit_until(|x| *x == 3);
    /// assert_eq!(head.to_list(), vec![1, 2]);
    /// ```
    pub fn limit_until<P>(self, mut predicate: P) -> Sequence<impl Iterator<Item = I::Item>>
    where
        P: FnMut(&I::Item) -> bool,
    {
        Sequence::from_source(self.iter.take_while(move |x| !predicate(x)))
    }

    /// Drops elements while the predicate holds. The first element failing the
    /// predicate is kept.
    pub fn skip_while<P>(self, predicate: P) -> Sequence<SkipWhile<I, P>>
    where
        P: FnMut(&I::Item) -> bool,
    {
        Sequence::from_source(self.iter.skip_while(predicate))
    }

    /// Drops elements until the predicate holds. The first element satisfying
    /// the predicate is kept.
    pub fn skip_until<P>(self, mut predicate: P) -> Sequence<impl Iterator<Item = I::Item>>
    where
        P: FnMut(&I::Item) -> bool,
    {
        Sequence::from_source(self.iter.skip_while(move |x| !predicate(x)))
    }

    /// Sorts the elements. The whole sequence is realized on the first pull.
    pub fn sorted(self) -> Sequence<Deferred<I, impl FnOnce(Vec<I::Item>) -> Vec<I::Item>, I::Item>>
    where
        I::Item: Ord,
    {
        Sequence::from_source(Deferred::new(self.iter, |mut items: Vec<I::Item>| {
            items.sort();
            items
        }))
    }

    /// Sorts the elements with the given comparator. The sort is stable, and
    /// the whole sequence is realized on the first pull.
    pub fn sorted_by<F>(
        self,
        compare: F,
    ) -> Sequence<Deferred<I, impl FnOnce(Vec<I::Item>) -> Vec<I::Item>, I::Item>>
    where
        F: FnMut(&I::Item, &I::Item) -> std::cmp::Ordering,
    {
        Sequence::from_source(Deferred::new(self.iter, move |mut items: Vec<I::Item>| {
            items.sort_by(compare);
            items
        }))
    }

    /// Reverses the elements. The whole sequence is realized on the first
    /// pull.
    pub fn reverse(
        self,
    ) -> Sequence<Deferred<I, impl FnOnce(Vec<I::Item>) -> Vec<I::Item>, I::Item>> {
        Sequence::from_source(Deferred::new(self.iter, |mut items: Vec<I::Item>| {
            items.reverse();
            items
        }))
    }

    /// Lazily drops elements equal to an element already produced.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let distinct = Sequence::of(vec![1, 2, 2, 2, 5, 6, 1]).distinct();
    /// assert_eq!(distinct.to_list(), vec![1, 2, 5, 6]);
    /// ```
    pub fn distinct(self) -> Sequence<impl Iterator<Item = I::Item>>
    where
        I::Item: Clone + Eq + Hash,
    {
        let mut seen = HashSet::new();
        Sequence::from_source(self.iter.filter(move |x| seen.insert(x.clone())))
    }

    /// Inserts the given value between any two elements.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let spaced = Sequence::of(vec![1, 2, 3, 4]).intersperse(0);
    /// assert_eq!(spaced.to_list(), vec![1, 0, 2, 0, 3, 0, 4]);
    /// ```
    pub fn intersperse(self, value: I::Item) -> Sequence<impl Iterator<Item = I::Item>>
    where
        I::Item: Clone,
    {
        Sequence::from_source(self.iter.flat_map(move |x| [value.clone(), x]).skip(1))
    }

    /// Collects the elements into a [`Vec`].
    pub fn to_list(self) -> Vec<I::Item> {
        self.iter.collect()
    }

    /// Collects the elements into a [`HashSet`].
    pub fn to_set(self) -> HashSet<I::Item>
    where
        I::Item: Eq + Hash,
    {
        self.iter.collect()
    }

    /// Adapts this sequence into another container shape holding the fully
    /// materialized elements.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let option: Option<Vec<_>> = Sequence::of(vec!["hello", "world"]).into_shape();
    /// assert_eq!(option, Some(vec!["hello", "world"]));
    /// ```
    pub fn into_shape<S: FromSequence<I::Item>>(self) -> S {
        S::from_sequence(self.iter)
    }

    /// Returns the first element, if any.
    pub fn find_first(mut self) -> Option<I::Item> {
        self.iter.next()
    }

    /// Whether all elements match the predicate. Stops at the first mismatch.
    pub fn all_match<P>(mut self, predicate: P) -> bool
    where
        P: FnMut(I::Item) -> bool,
    {
        self.iter.all(predicate)
    }

    /// Whether any element matches the predicate. Stops at the first match.
    pub fn any_match<P>(mut self, predicate: P) -> bool
    where
        P: FnMut(I::Item) -> bool,
    {
        self.iter.any(predicate)
    }

    /// Whether no element matches the predicate. Stops at the first match.
    pub fn none_match<P>(mut self, predicate: P) -> bool
    where
        P: FnMut(I::Item) -> bool,
    {
        !self.iter.any(predicate)
    }

    /// Whether exactly `n` elements match the predicate.
    pub fn x_match<P>(self, n: usize, mut predicate: P) -> bool
    where
        P: FnMut(&I::Item) -> bool,
    {
        self.iter.filter(|x| predicate(x)).count() == n
    }

    /// Whether this sequence starts with the elements of the given iterable.
    /// An iterable longer than this sequence never matches.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// assert!(Sequence::of(vec![1, 2, 3, 4]).starts_with([1, 2, 3]));
    /// assert!(!Sequence::of(vec![1, 2]).starts_with([1, 2, 3]));
    /// ```
    pub fn starts_with<J>(mut self, prefix: J) -> bool
    where
        J: IntoIterator<Item = I::Item>,
        I::Item: PartialEq,
    {
        prefix
            .into_iter()
            .all(|expected| self.iter.next().is_some_and(|x| x == expected))
    }

    /// Concatenates the string representations of the elements, separated by
    /// `separator`.
    pub fn join(self, separator: &str) -> String
    where
        I::Item: Display,
    {
        self.join_with(separator, "", "")
    }

    /// Concatenates the string representations of the elements, separated by
    /// `separator`, between `start` and `end`.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let joined = Sequence::of(vec![1, 2, 3]).join_with(", ", "[", "]");
    /// assert_eq!(joined, "[1, 2, 3]");
    /// ```
    pub fn join_with(self, separator: &str, start: &str, end: &str) -> String
    where
        I::Item: Display,
    {
        let mut result = String::from(start);
        for (i, x) in self.iter.enumerate() {
            if i != 0 {
                result.push_str(separator);
            }
            // Writing to a String never fails.
            let _ = write!(result, "{x}");
        }
        result.push_str(end);
        result
    }

    /// Groups the elements by the given key, preserving encounter order within
    /// each group.
    pub fn group_by<K, F>(self, mut key: F) -> HashMap<K, Vec<I::Item>>
    where
        K: Eq + Hash,
        F: FnMut(&I::Item) -> K,
    {
        let mut groups: HashMap<K, Vec<I::Item>> = HashMap::new();
        for x in self.iter {
            groups.entry(key(&x)).or_default().push(x);
        }
        groups
    }

    /// Realizes the first element, returning it together with the rest of the
    /// sequence, or [`None`] if the sequence is empty.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let hello_world = Sequence::of(vec!["hello", "world", "last"]);
    /// let head_and_tail = hello_world.head_and_tail().unwrap();
    /// assert_eq!(*head_and_tail.head(), "hello");
    ///
    /// let tail = head_and_tail.into_tail();
    /// assert_eq!(*tail.head_and_tail().unwrap().head(), "world");
    /// ```
    pub fn head_and_tail(mut self) -> Option<HeadAndTail<I::Item, Self>> {
        let head = self.iter.next()?;
        Some(HeadAndTail { head, tail: self })
    }
}

/// A realized first element together with the remaining sequence. This struct
/// is created by the [`head_and_tail()`](Sequence::head_and_tail) method on
/// [`Sequence`].
#[derive(Clone, Debug)]
pub struct HeadAndTail<T, S> {
    head: T,
    tail: S,
}

impl<T, S> HeadAndTail<T, S> {
    /// Returns a reference to the first element.
    pub fn head(&self) -> &T {
        &self.head
    }

    /// Returns a mutable reference to the remaining sequence.
    pub fn tail(&mut self) -> &mut S {
        &mut self.tail
    }

    /// Returns the remaining sequence, dropping the head.
    pub fn into_tail(self) -> S {
        self.tail
    }

    /// Splits into the head and the remaining sequence.
    pub fn into_parts(self) -> (T, S) {
        (self.head, self.tail)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_sorted_then_skip() {
        let sorted = || Sequence::of(vec![4, 3, 6, 7]).sorted();
        assert_eq!(sorted().to_list(), vec![3, 4, 6, 7]);
        assert_eq!(sorted().skip(2).to_list(), vec![6, 7]);
    }

    #[test]
    fn test_sorted_by_is_stable() {
        let sorted = Sequence::of(vec![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')])
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .to_list();
        assert_eq!(sorted, vec![(0, 'b'), (0, 'd'), (1, 'a'), (1, 'c')]);
    }

    #[test]
    fn test_combinators_are_lazy() {
        let pulls = Cell::new(0);
        let seq = Sequence::from_source((0..10).inspect(|_| pulls.set(pulls.get() + 1)))
            .map(|x| x * 2)
            .filter(|x| x % 3 == 0)
            .sorted()
            .reverse()
            .intersperse(-1)
            .distinct();
        assert_eq!(pulls.get(), 0);
        assert_eq!(seq.to_list(), vec![18, -1, 12, 6, 0]);
        assert_eq!(pulls.get(), 10);
    }

    #[test]
    fn test_limit_and_skip_variants() {
        let seq = || Sequence::of(vec![1, 2, 3, 4, 5, 1]);
        assert_eq!(seq().limit(2).to_list(), vec![1, 2]);
        assert_eq!(seq().limit(10).to_list(), vec![1, 2, 3, 4, 5, 1]);
        assert_eq!(seq().skip(4).to_list(), vec![5, 1]);
        assert_eq!(seq().limit_while(|x| *x < 3).to_list(), vec![1, 2]);
        assert_eq!(seq().limit_until(|x| *x == 4).to_list(), vec![1, 2, 3]);
        assert_eq!(seq().skip_while(|x| *x < 3).to_list(), vec![3, 4, 5, 1]);
        assert_eq!(seq().skip_until(|x| *x == 4).to_list(), vec![4, 5, 1]);
    }

    #[test]
    fn test_limit_while_stops_pulling() {
        let pulls = Cell::new(0);
        let head = Sequence::iterate(0u64, |x| x + 1)
            .peek(|_| pulls.set(pulls.get() + 1))
            .limit_while(|x| *x < 5)
            .to_list();
        assert_eq!(head, vec![0, 1, 2, 3, 4]);
        assert_eq!(pulls.get(), 6);
    }

    #[test]
    fn test_flat_map_and_flatten() {
        let nested = Sequence::of(vec![vec![1, 2], vec![], vec![3]]);
        assert_eq!(nested.clone().flatten().to_list(), vec![1, 2, 3]);
        assert_eq!(
            nested.flat_map(|v| v.into_iter().map(|x| x * 10)).to_list(),
            vec![10, 20, 30]
        );
    }

    #[test]
    fn test_intersperse_edge_cases() {
        assert_eq!(
            Sequence::<std::iter::Empty<i32>>::empty()
                .intersperse(0)
                .to_list(),
            Vec::<i32>::new()
        );
        assert_eq!(Sequence::of(vec![7]).intersperse(0).to_list(), vec![7]);
    }

    #[test]
    fn test_matching() {
        let seq = || Sequence::of(vec![1, 2, 3, 4, 5]);
        assert!(seq().all_match(|x| x > 0));
        assert!(!seq().all_match(|x| x > 1));
        assert!(seq().any_match(|x| x == 3));
        assert!(seq().none_match(|x| x > 5));
        assert!(seq().x_match(2, |x| x % 2 == 0));
        assert!(!seq().x_match(3, |x| x % 2 == 0));
        assert_eq!(seq().find_first(), Some(1));
        assert_eq!(Sequence::<std::iter::Empty<i32>>::empty().find_first(), None);
    }

    #[test]
    fn test_starts_with() {
        assert!(Sequence::of(vec![1, 2, 3]).starts_with([]));
        assert!(Sequence::of(vec![1, 2, 3]).starts_with(vec![1, 2, 3]));
        assert!(!Sequence::of(vec![1, 2, 3]).starts_with([2]));
        assert!(Sequence::iterate(0, |x| x + 1).starts_with(0..100));
    }

    #[test]
    fn test_join() {
        assert_eq!(Sequence::of(vec!["a", "b", "c"]).join(""), "abc");
        assert_eq!(Sequence::of(vec![1, 2, 3]).join(", "), "1, 2, 3");
        assert_eq!(Sequence::<std::iter::Empty<i32>>::empty().join_with(",", "(", ")"), "()");
    }

    #[test]
    fn test_group_by() {
        let groups = Sequence::of(vec![1, 2, 3, 4, 5, 6]).group_by(|x| x % 3);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[&0], vec![3, 6]);
        assert_eq!(groups[&1], vec![1, 4]);
        assert_eq!(groups[&2], vec![2, 5]);
    }

    #[test]
    fn test_head_and_tail() {
        let (head, tail) = Sequence::of(vec![1, 2, 3])
            .head_and_tail()
            .unwrap()
            .into_parts();
        assert_eq!(head, 1);
        assert_eq!(tail.to_list(), vec![2, 3]);

        assert!(Sequence::<std::iter::Empty<i32>>::empty()
            .head_and_tail()
            .is_none());
    }

    #[test]
    fn test_head_and_tail_forces_one_element() {
        let pulls = Cell::new(0);
        let source = (0..5).inspect(|_| pulls.set(pulls.get() + 1));
        let mut head_and_tail = Sequence::from_source(source).head_and_tail().unwrap();
        assert_eq!(*head_and_tail.head(), 0);
        assert_eq!(pulls.get(), 1);
        assert_eq!(head_and_tail.tail().next(), Some(1));
        assert_eq!(pulls.get(), 2);
    }

    #[test]
    fn test_boxed() {
        let boxed = Sequence::of(vec![1, 2, 3]).map(|x| x + 1).boxed();
        let boxed: Sequence<Box<dyn Iterator<Item = i32>>> = boxed;
        assert_eq!(boxed.to_list(), vec![2, 3, 4]);
    }

    #[test]
    fn test_to_set() {
        let set = Sequence::of(vec![1, 1, 2]).to_set();
        assert_eq!(set, HashSet::from([1, 2]));
    }
}
