// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Common monoids.

use super::reduce::{monoid, FnMonoid, MappedMonoid, Monoid};
use std::iter::{Product, Sum};

/// Monoid combining values with `+`, with identity zero.
pub fn sum<T: Sum + Clone>() -> FnMonoid<T, fn(T, T) -> T> {
    monoid(std::iter::empty::<T>().sum(), add::<T> as fn(T, T) -> T)
}

/// Monoid combining values with `*`, with identity one.
pub fn product<T: Product + Clone>() -> FnMonoid<T, fn(T, T) -> T> {
    monoid(std::iter::empty::<T>().product(), multiply::<T> as fn(T, T) -> T)
}

/// Monoid concatenating strings, with the empty string as identity.
pub fn string() -> FnMonoid<String, fn(String, String) -> String> {
    monoid(String::new(), append_str as fn(String, String) -> String)
}

/// Monoid concatenating vectors, with the empty vector as identity.
///
/// ```
/// # use lazyseq::iter::reducers;
/// # use lazyseq::Sequence;
/// let flat = Sequence::of(vec![vec![1, 2], vec![], vec![3]]).reduce(reducers::concat());
/// assert_eq!(flat, vec![1, 2, 3]);
/// ```
pub fn concat<T: Clone>() -> FnMonoid<Vec<T>, fn(Vec<T>, Vec<T>) -> Vec<T>> {
    monoid(Vec::new(), append_vec::<T> as fn(Vec<T>, Vec<T>) -> Vec<T>)
}

/// Monoid counting the values of any type.
///
/// ```
/// # use lazyseq::iter::reducers;
/// # use lazyseq::Sequence;
/// let count = reducers::count();
/// assert_eq!(Sequence::of(vec!['a', 'b', 'c']).fold_left_mapped(&count), 3);
/// ```
#[allow(clippy::type_complexity)]
pub fn count<T>() -> MappedMonoid<FnMonoid<usize, fn(usize, usize) -> usize>, fn(T) -> usize> {
    sum::<usize>().mapping(one::<T> as fn(T) -> usize)
}

fn add<T: Sum>(a: T, b: T) -> T {
    [a, b].into_iter().sum()
}

fn multiply<T: Product>(a: T, b: T) -> T {
    [a, b].into_iter().product()
}

fn append_str(mut a: String, b: String) -> String {
    a.push_str(&b);
    a
}

fn append_vec<T>(mut a: Vec<T>, mut b: Vec<T>) -> Vec<T> {
    a.append(&mut b);
    a
}

fn one<T>(_: T) -> usize {
    1
}
