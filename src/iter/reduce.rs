// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Monoids, folds, prefix scans and order statistics.

use super::detail::Deferred;
use super::Sequence;
use std::cmp::Ordering;

/// An identity value and an associative binary operation over
/// [`Value`](Self::Value).
///
/// Implementations must satisfy `combine(identity(), x) == x` and
/// `combine(combine(a, b), c) == combine(a, combine(b, c))`. These laws aren't
/// checked: scans, cycles and reductions give meaningless results for a
/// monoid that breaks them.
///
/// This trait is object safe, and implemented for references and boxes to a
/// monoid, so that heterogeneous monoids can be passed together to
/// [`reduce_all()`](Sequence::reduce_all).
pub trait Monoid {
    /// Type of the values combined by this monoid.
    type Value;

    /// Returns the identity value.
    fn identity(&self) -> Self::Value;

    /// Combines two values.
    fn combine(&self, a: Self::Value, b: Self::Value) -> Self::Value;

    /// Returns a monoid that can also reduce values of another type, by
    /// mapping them to [`Value`](Self::Value) first.
    ///
    /// ```
    /// # use lazyseq::iter::{reducers, Monoid};
    /// # use lazyseq::Sequence;
    /// let total_len = reducers::sum::<usize>().mapping(|s: &str| s.len());
    /// let words = Sequence::of(vec!["hello", "world", "!"]);
    /// assert_eq!(words.fold_left_mapped(&total_len), 11);
    /// ```
    fn mapping<U, F>(self, f: F) -> MappedMonoid<Self, F>
    where
        Self: Sized,
        F: Fn(U) -> Self::Value,
    {
        MappedMonoid { monoid: self, f }
    }
}

impl<M: Monoid + ?Sized> Monoid for &M {
    type Value = M::Value;

    fn identity(&self) -> M::Value {
        (**self).identity()
    }

    fn combine(&self, a: M::Value, b: M::Value) -> M::Value {
        (**self).combine(a, b)
    }
}

impl<M: Monoid + ?Sized> Monoid for Box<M> {
    type Value = M::Value;

    fn identity(&self) -> M::Value {
        (**self).identity()
    }

    fn combine(&self, a: M::Value, b: M::Value) -> M::Value {
        (**self).combine(a, b)
    }
}

/// A monoid defined by an identity value and a function. This struct is
/// created by the [`monoid()`] function.
#[derive(Clone, Copy, Debug)]
pub struct FnMonoid<T, F> {
    identity: T,
    combine: F,
}

/// Creates a monoid from an identity value and an associative function.
///
/// ```
/// # use lazyseq::iter::monoid;
/// # use lazyseq::Sequence;
/// let max = monoid(i32::MIN, |a: i32, b: i32| a.max(b));
/// assert_eq!(Sequence::of(vec![3, 9, 2]).reduce(&max), 9);
/// assert_eq!(Sequence::of(vec![]).reduce(&max), i32::MIN);
/// ```
pub fn monoid<T, F>(identity: T, combine: F) -> FnMonoid<T, F>
where
    T: Clone,
    F: Fn(T, T) -> T,
{
    FnMonoid { identity, combine }
}

impl<T, F> Monoid for FnMonoid<T, F>
where
    T: Clone,
    F: Fn(T, T) -> T,
{
    type Value = T;

    fn identity(&self) -> T {
        self.identity.clone()
    }

    fn combine(&self, a: T, b: T) -> T {
        (self.combine)(a, b)
    }
}

/// A monoid together with a projection into its values. This struct is created
/// by the [`mapping()`](Monoid::mapping) method on [`Monoid`].
#[derive(Clone, Copy, Debug)]
pub struct MappedMonoid<M, F> {
    monoid: M,
    f: F,
}

impl<M: Monoid, F> MappedMonoid<M, F> {
    /// Maps a value into the monoid.
    pub fn project<U>(&self, x: U) -> M::Value
    where
        F: Fn(U) -> M::Value,
    {
        (self.f)(x)
    }

    /// Returns the underlying monoid.
    pub fn monoid(&self) -> &M {
        &self.monoid
    }
}

impl<M: Monoid, F> Monoid for MappedMonoid<M, F> {
    type Value = M::Value;

    fn identity(&self) -> M::Value {
        self.monoid.identity()
    }

    fn combine(&self, a: M::Value, b: M::Value) -> M::Value {
        self.monoid.combine(a, b)
    }
}

/// An iterator over running totals, starting with the initial value.
///
/// This struct is created by the [`scan_left()`](Sequence::scan_left) and
/// [`scan_left_with()`](Sequence::scan_left_with) methods on [`Sequence`].
///
/// You most likely won't need to interact with this struct directly, as it
/// implements the [`Iterator`] trait, but it is nonetheless public because of
/// the `must_use` annotation.
#[must_use = "iterator adaptors are lazy"]
pub struct ScanLeft<I, T, F> {
    iter: I,
    /// The next total to emit, or [`None`] once the upstream is exhausted.
    total: Option<T>,
    f: F,
}

impl<I, T, F> Iterator for ScanLeft<I, T, F>
where
    I: Iterator,
    T: Clone,
    F: FnMut(T, I::Item) -> T,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let total = self.total.take()?;
        if let Some(x) = self.iter.next() {
            self.total = Some((self.f)(total.clone(), x));
        }
        Some(total)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.total {
            None => (0, Some(0)),
            Some(_) => {
                let (lower, upper) = self.iter.size_hint();
                (
                    lower.saturating_add(1),
                    upper.and_then(|upper| upper.checked_add(1)),
                )
            }
        }
    }
}

/// Running totals of `items` folded from the right, in the order of `items`.
fn scan_right_totals<T, U, F>(items: Vec<U>, identity: T, mut f: F) -> Vec<T>
where
    T: Clone,
    F: FnMut(T, U) -> T,
{
    let mut totals = Vec::with_capacity(items.len() + 1);
    let mut total = identity;
    for x in items.into_iter().rev() {
        totals.push(total.clone());
        total = f(total, x);
    }
    totals.push(total);
    totals.reverse();
    totals
}

impl<I: Iterator> Sequence<I> {
    /// Reduces the elements with the given monoid, from left to right, starting
    /// from the identity.
    ///
    /// ```
    /// # use lazyseq::iter::reducers;
    /// # use lazyseq::Sequence;
    /// assert_eq!(Sequence::of(vec![1, 2, 3, 4]).reduce(reducers::sum()), 10);
    /// ```
    pub fn reduce<M>(self, monoid: M) -> I::Item
    where
        M: Monoid<Value = I::Item>,
    {
        self.into_inner()
            .fold(monoid.identity(), |total, x| monoid.combine(total, x))
    }

    /// Combines the elements from left to right with `f`, without an identity.
    /// Returns [`None`] for an empty sequence.
    ///
    /// This is the closure form of [`Iterator::reduce()`], which the monoid
    /// form [`reduce()`](Self::reduce) shadows on [`Sequence`].
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// assert_eq!(Sequence::of(vec![3, 1, 4]).reduce_with(|a, b| a * 10 + b), Some(314));
    /// assert_eq!(Sequence::of(Vec::<i32>::new()).reduce_with(|a, b| a + b), None);
    /// ```
    pub fn reduce_with<F>(self, f: F) -> Option<I::Item>
    where
        F: FnMut(I::Item, I::Item) -> I::Item,
    {
        self.into_inner().reduce(f)
    }

    /// Same as [`reduce()`](Self::reduce).
    pub fn fold_left<M>(self, monoid: M) -> I::Item
    where
        M: Monoid<Value = I::Item>,
    {
        self.reduce(monoid)
    }

    /// Reduces the reversed elements with the given monoid, starting from the
    /// identity. The whole sequence is realized first, so this never returns
    /// on an infinite sequence.
    ///
    /// ```
    /// # use lazyseq::iter::reducers;
    /// # use lazyseq::Sequence;
    /// let letters = Sequence::of(vec!["a", "b", "c"]).map(String::from);
    /// assert_eq!(letters.fold_right(reducers::string()), "cba");
    /// ```
    pub fn fold_right<M>(self, monoid: M) -> I::Item
    where
        M: Monoid<Value = I::Item>,
    {
        let items: Vec<I::Item> = self.into_inner().collect();
        items
            .into_iter()
            .rev()
            .fold(monoid.identity(), |total, x| monoid.combine(total, x))
    }

    /// Maps each element into the monoid and reduces the results from left to
    /// right.
    pub fn map_reduce<M, F>(self, f: F, monoid: M) -> M::Value
    where
        M: Monoid,
        F: FnMut(I::Item) -> M::Value,
    {
        self.into_inner()
            .map(f)
            .fold(monoid.identity(), |total, x| monoid.combine(total, x))
    }

    /// Reduces the elements from left to right with a monoid that maps them to
    /// its values first.
    pub fn fold_left_mapped<M, F>(self, monoid: &MappedMonoid<M, F>) -> M::Value
    where
        M: Monoid,
        F: Fn(I::Item) -> M::Value,
    {
        self.map_reduce(|x| monoid.project(x), monoid)
    }

    /// Reduces the reversed elements with a monoid that maps them to its
    /// values first. The whole sequence is realized first.
    pub fn fold_right_mapped<M, F>(self, monoid: &MappedMonoid<M, F>) -> M::Value
    where
        M: Monoid,
        F: Fn(I::Item) -> M::Value,
    {
        let items: Vec<I::Item> = self.into_inner().collect();
        items
            .into_iter()
            .rev()
            .fold(monoid.identity(), |total, x| {
                monoid.combine(total, monoid.project(x))
            })
    }

    /// Lazily produces the running totals of the monoid over the elements,
    /// starting with the identity. The result has one more element than this
    /// sequence.
    ///
    /// ```
    /// # use lazyseq::iter::reducers;
    /// # use lazyseq::Sequence;
    /// let totals = Sequence::of(vec![1, 2, 3]).scan_left(reducers::sum()).to_list();
    /// assert_eq!(totals, vec![0, 1, 3, 6]);
    /// ```
    pub fn scan_left<M>(
        self,
        monoid: M,
    ) -> Sequence<ScanLeft<I, I::Item, impl FnMut(I::Item, I::Item) -> I::Item>>
    where
        M: Monoid<Value = I::Item>,
        I::Item: Clone,
    {
        let identity = monoid.identity();
        self.scan_left_with(identity, move |total, x| monoid.combine(total, x))
    }

    /// Lazily produces the running totals of `f` over the elements, starting
    /// with `identity`. The result has one more element than this sequence.
    pub fn scan_left_with<T, F>(self, identity: T, f: F) -> Sequence<ScanLeft<I, T, F>>
    where
        T: Clone,
        F: FnMut(T, I::Item) -> T,
    {
        Sequence::from_source(ScanLeft {
            iter: self.into_inner(),
            total: Some(identity),
            f,
        })
    }

    /// Produces the running totals of the monoid over the elements, folded from
    /// the right, in the order of the elements: the first total covers the
    /// whole sequence, the last one is the identity.
    ///
    /// The whole sequence is realized on the first pull.
    ///
    /// ```
    /// # use lazyseq::iter::reducers;
    /// # use lazyseq::Sequence;
    /// let totals = Sequence::of(vec![1, 2, 3]).scan_right(reducers::sum()).to_list();
    /// assert_eq!(totals, vec![6, 5, 3, 0]);
    /// ```
    pub fn scan_right<M>(
        self,
        monoid: M,
    ) -> Sequence<Deferred<I, impl FnOnce(Vec<I::Item>) -> Vec<I::Item>, I::Item>>
    where
        M: Monoid<Value = I::Item>,
        I::Item: Clone,
    {
        Sequence::from_source(Deferred::new(self.into_inner(), move |items: Vec<I::Item>| {
            scan_right_totals(items, monoid.identity(), |total, x| monoid.combine(total, x))
        }))
    }

    /// Produces the running totals of `f` over the elements, folded from the
    /// right, in the order of the elements. The whole sequence is realized on
    /// the first pull.
    pub fn scan_right_with<T, F>(
        self,
        identity: T,
        f: F,
    ) -> Sequence<Deferred<I, impl FnOnce(Vec<I::Item>) -> Vec<T>, T>>
    where
        T: Clone,
        F: FnMut(T, I::Item) -> T,
    {
        Sequence::from_source(Deferred::new(self.into_inner(), move |items: Vec<I::Item>| {
            scan_right_totals(items, identity, f)
        }))
    }

    /// Reduces the elements with every given monoid, in a single traversal.
    /// Returns one result per monoid, in the same order.
    ///
    /// ```
    /// # use lazyseq::iter::{reducers, Monoid};
    /// # use lazyseq::Sequence;
    /// let sum = reducers::sum::<i32>();
    /// let product = reducers::product::<i32>();
    /// let monoids: [&dyn Monoid<Value = i32>; 2] = [&sum, &product];
    /// assert_eq!(Sequence::of(vec![1, 2, 3, 4]).reduce_all(&monoids), vec![10, 24]);
    /// ```
    pub fn reduce_all<M>(self, monoids: &[M]) -> Vec<I::Item>
    where
        M: Monoid<Value = I::Item>,
        I::Item: Clone,
    {
        // Totals are moved out while being combined.
        let mut totals: Vec<Option<I::Item>> =
            monoids.iter().map(|monoid| Some(monoid.identity())).collect();
        for x in self.into_inner() {
            for (total, monoid) in totals.iter_mut().zip(monoids) {
                if let Some(t) = total.take() {
                    *total = Some(monoid.combine(t, x.clone()));
                }
            }
        }
        totals.into_iter().flatten().collect()
    }

    /// Returns the element with the minimum key, or the first one of them if
    /// several elements have the minimum key.
    pub fn min_by_key<K, F>(self, f: F) -> Option<I::Item>
    where
        K: Ord,
        F: FnMut(&I::Item) -> K,
    {
        self.extremum_by_key(f, Ordering::Less)
    }

    /// Returns the element with the maximum key, or the first one of them if
    /// several elements have the maximum key.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let words = Sequence::of(vec!["bb", "a", "cc", "d"]);
    /// assert_eq!(words.max_by_key(|s| s.len()), Some("bb"));
    /// ```
    pub fn max_by_key<K, F>(self, f: F) -> Option<I::Item>
    where
        K: Ord,
        F: FnMut(&I::Item) -> K,
    {
        self.extremum_by_key(f, Ordering::Greater)
    }

    /// Returns the minimum element with respect to the comparator, or the
    /// first one of them if several elements compare equal.
    pub fn min_by<F>(self, compare: F) -> Option<I::Item>
    where
        F: FnMut(&I::Item, &I::Item) -> Ordering,
    {
        self.extremum_by(compare, Ordering::Less)
    }

    /// Returns the maximum element with respect to the comparator, or the
    /// first one of them if several elements compare equal.
    pub fn max_by<F>(self, compare: F) -> Option<I::Item>
    where
        F: FnMut(&I::Item, &I::Item) -> Ordering,
    {
        self.extremum_by(compare, Ordering::Greater)
    }

    /// Keeps the first element, replacing it only by an element that compares
    /// strictly as `wanted` to it.
    fn extremum_by<F>(self, mut compare: F, wanted: Ordering) -> Option<I::Item>
    where
        F: FnMut(&I::Item, &I::Item) -> Ordering,
    {
        self.into_inner()
            .reduce(|best, x| if compare(&x, &best) == wanted { x } else { best })
    }

    fn extremum_by_key<K, F>(self, mut f: F, wanted: Ordering) -> Option<I::Item>
    where
        K: Ord,
        F: FnMut(&I::Item) -> K,
    {
        self.into_inner()
            .map(|x| (f(&x), x))
            .reduce(|best, x| if x.0.cmp(&best.0) == wanted { x } else { best })
            .map(|(_, x)| x)
    }
}
