// Copyright 2024-2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Boundaries between sequences and other container shapes.

use super::Sequence;
use std::collections::VecDeque;
use std::future::Ready;

/// Trait for converting a container-like value into a pull source: a
/// single-pass [`Iterator`] over its logical elements.
///
/// This trait is automatically implemented for all types implementing
/// [`IntoIterator`] (collections, slices, arrays, [`Option`], ranges,
/// iterators), so the container shape is resolved once, at compile time.
pub trait IntoPullSource {
    /// The type of items that the pull source produces.
    type Item;

    /// Target pull source type.
    type Source: Iterator<Item = Self::Item>;

    /// Converts `self` into a pull source.
    fn into_pull_source(self) -> Self::Source;

    /// Converts `self` into a [`Sequence`].
    ///
    /// ```
    /// # use lazyseq::iter::IntoPullSource;
    /// assert_eq!(Some(42).into_seq().to_list(), vec![42]);
    /// assert_eq!([1, 2, 3].into_seq().map(|x| x * 2).to_list(), vec![2, 4, 6]);
    /// ```
    fn into_seq(self) -> Sequence<Self::Source>
    where
        Self: Sized,
    {
        Sequence::from_source(self.into_pull_source())
    }
}

impl<C: IntoIterator> IntoPullSource for C {
    type Item = C::Item;
    type Source = C::IntoIter;

    fn into_pull_source(self) -> C::IntoIter {
        self.into_iter()
    }
}

/// Trait for adapting a sequence back into a container shape, by collecting
/// the fully materialized elements.
pub trait FromSequence<T>: Sized {
    /// Collects the given items into this shape.
    fn from_sequence(iter: impl Iterator<Item = T>) -> Self;
}

impl<T> FromSequence<T> for Vec<T> {
    fn from_sequence(iter: impl Iterator<Item = T>) -> Self {
        iter.collect()
    }
}

impl<T> FromSequence<T> for VecDeque<T> {
    fn from_sequence(iter: impl Iterator<Item = T>) -> Self {
        iter.collect()
    }
}

/// An option-like view of a sequence: always [`Some`], holding the whole
/// (possibly empty) collection.
impl<T> FromSequence<T> for Option<Vec<T>> {
    fn from_sequence(iter: impl Iterator<Item = T>) -> Self {
        Some(iter.collect())
    }
}

/// A future-like view of a sequence: an already completed future holding the
/// whole collection.
impl<T> FromSequence<T> for Ready<Vec<T>> {
    fn from_sequence(iter: impl Iterator<Item = T>) -> Self {
        std::future::ready(iter.collect())
    }
}
