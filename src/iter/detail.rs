// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Implementation details of sequence adaptors.

/// An adaptor that realizes its whole upstream on the first pull, transforms
/// the realized items at once, and then yields the transformed items.
///
/// This struct is created by combinators that need the whole sequence, such as
/// [`sorted()`](super::Sequence::sorted), [`reverse()`](super::Sequence::reverse)
/// or [`scan_right()`](super::Sequence::scan_right).
///
/// You most likely won't need to interact with this struct directly, as it
/// implements the [`Iterator`] trait, but it is nonetheless public because of
/// the `must_use` annotation.
#[must_use = "iterator adaptors are lazy"]
pub struct Deferred<I, F, T> {
    /// The upstream and the transformation, until the first pull.
    pending: Option<(I, F)>,
    /// The transformed items.
    realized: std::vec::IntoIter<T>,
}

impl<I, F, T> Deferred<I, F, T> {
    pub(super) fn new(upstream: I, realize: F) -> Self {
        Deferred {
            pending: Some((upstream, realize)),
            realized: Vec::new().into_iter(),
        }
    }
}

impl<I, F, T> Iterator for Deferred<I, F, T>
where
    I: Iterator,
    F: FnOnce(Vec<I::Item>) -> Vec<T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if let Some((upstream, realize)) = self.pending.take() {
            self.realized = realize(upstream.collect()).into_iter();
        }
        self.realized.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.pending {
            Some(_) => (0, None),
            None => self.realized.size_hint(),
        }
    }
}

/// An infinite iterator that repeatedly applies a function to its last item.
///
/// This struct is created by the [`iterate()`](super::Sequence::iterate)
/// function.
#[must_use = "iterator adaptors are lazy"]
pub struct Iterate<T, F> {
    next: Option<T>,
    f: F,
}

impl<T, F> Iterate<T, F> {
    pub(super) fn new(seed: T, f: F) -> Self {
        Iterate {
            next: Some(seed),
            f,
        }
    }
}

impl<T, F> Iterator for Iterate<T, F>
where
    F: FnMut(&T) -> T,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let current = self.next.take()?;
        self.next = Some((self.f)(&current));
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
