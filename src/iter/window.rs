// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sliding windows and disjoint groups.

use super::Sequence;
use std::collections::VecDeque;
use std::iter::Fuse;

/// An iterator over overlapping windows of a fixed size.
///
/// This struct is created by the [`sliding()`](Sequence::sliding) method on
/// [`Sequence`].
///
/// You most likely won't need to interact with this struct directly, as it
/// implements the [`Iterator`] trait, but it is nonetheless public because of
/// the `must_use` annotation.
#[must_use = "iterator adaptors are lazy"]
pub struct Sliding<I: Iterator> {
    iter: Fuse<I>,
    size: usize,
    window: VecDeque<I::Item>,
}

impl<I: Iterator> Iterator for Sliding<I>
where
    I::Item: Clone,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.window.len() == self.size {
            self.window.pop_front();
        }
        while self.window.len() < self.size {
            self.window.push_back(self.iter.next()?);
        }
        Some(self.window.iter().cloned().collect())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Number of items still needed before the next window is complete.
        let missing = if self.window.len() == self.size {
            1
        } else {
            self.size - self.window.len()
        };
        let (lower, upper) = self.iter.size_hint();
        (
            lower.saturating_add(1).saturating_sub(missing),
            upper
                .and_then(|upper| upper.checked_add(1))
                .map(|upper| upper.saturating_sub(missing)),
        )
    }
}

/// An iterator over disjoint groups of a fixed size. The last group may be
/// smaller.
///
/// This struct is created by the [`grouped()`](Sequence::grouped) method on
/// [`Sequence`].
///
/// You most likely won't need to interact with this struct directly, as it
/// implements the [`Iterator`] trait, but it is nonetheless public because of
/// the `must_use` annotation.
#[must_use = "iterator adaptors are lazy"]
pub struct Grouped<I> {
    iter: Fuse<I>,
    size: usize,
}

impl<I: Iterator> Iterator for Grouped<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.iter.next()?;
        let mut group = Vec::with_capacity(self.size);
        group.push(first);
        group.extend(self.iter.by_ref().take(self.size - 1));
        Some(group)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        (
            lower.div_ceil(self.size),
            upper.map(|upper| upper.div_ceil(self.size)),
        )
    }
}

impl<I: Iterator> Sequence<I> {
    /// Lazily produces overlapping windows of exactly `size` elements, each
    /// window starting one element after the previous one.
    ///
    /// Trailing windows with fewer than `size` elements are dropped: a
    /// sequence of length `L` yields `L - size + 1` windows if `L >= size`,
    /// and no window otherwise.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let windows = Sequence::of(vec![1, 2, 3, 4]).sliding(3).to_list();
    /// assert_eq!(windows, vec![vec![1, 2, 3], vec![2, 3, 4]]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn sliding(self, size: usize) -> Sequence<Sliding<I>>
    where
        I::Item: Clone,
    {
        assert!(size != 0, "sliding window size must be non-zero");
        Sequence::from_source(Sliding {
            iter: self.into_inner().fuse(),
            size,
            window: VecDeque::with_capacity(size),
        })
    }

    /// Lazily produces disjoint groups of `size` elements.
    ///
    /// The last group is kept even if it has fewer than `size` elements, so
    /// that flattening the groups yields the original sequence. No group is
    /// ever empty.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let groups = Sequence::of(vec![1, 2, 3, 4, 5]).grouped(2).to_list();
    /// assert_eq!(groups, vec![vec![1, 2], vec![3, 4], vec![5]]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn grouped(self, size: usize) -> Sequence<Grouped<I>> {
        assert!(size != 0, "group size must be non-zero");
        Sequence::from_source(Grouped {
            iter: self.into_inner().fuse(),
            size,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_grouped_exact() {
        let groups = Sequence::of(vec![1, 2, 3, 4, 5, 6]).grouped(3).to_list();
        assert_eq!(groups, vec![vec![1, 2, 3], vec![4, 5, 6]]);
    }

    #[test]
    fn test_grouped_flatten_reproduces_input() {
        for len in 0..20usize {
            for size in 1..8 {
                let groups = Sequence::from_source(0..len).grouped(size).to_list();
                assert_eq!(groups.len(), len.div_ceil(size));
                assert!(groups.iter().all(|group| !group.is_empty()));
                if let Some(last) = groups.last() {
                    let expected = if len % size == 0 { size } else { len % size };
                    assert_eq!(last.len(), expected);
                }
                let flat = groups.into_iter().flatten().collect::<Vec<_>>();
                assert_eq!(flat, (0..len).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_sliding_window_count() {
        for len in 0..20usize {
            for size in 1..8 {
                let windows = Sequence::from_source(0..len).sliding(size).to_list();
                let expected = (len + 1).saturating_sub(size);
                assert_eq!(windows.len(), expected);
                for (i, window) in windows.iter().enumerate() {
                    assert_eq!(window, &(i..i + size).collect::<Vec<_>>());
                }
            }
        }
    }

    #[test]
    fn test_sliding_shorter_than_window() {
        let windows = Sequence::of(vec![1, 2]).sliding(3).to_list();
        assert!(windows.is_empty());
    }

    #[test]
    fn test_sliding_size_hint() {
        let mut sliding = Sequence::from_source(0..10).sliding(4);
        assert_eq!(sliding.size_hint(), (7, Some(7)));
        sliding.next();
        assert_eq!(sliding.size_hint(), (6, Some(6)));
        assert_eq!(sliding.count(), 6);

        let grouped = Sequence::from_source(0..10).grouped(4);
        assert_eq!(grouped.size_hint(), (3, Some(3)));
    }

    #[test]
    fn test_windows_of_infinite_sequence() {
        let windows = Sequence::iterate(0u32, |x| x + 1).sliding(3).limit(2).to_list();
        assert_eq!(windows, vec![vec![0, 1, 2], vec![1, 2, 3]]);

        let sliding = Sequence::iterate(0u32, |x| x + 1).sliding(3);
        assert_eq!(sliding.size_hint().1, None);

        let groups = Sequence::iterate(0u32, |x| x + 1).grouped(2).limit(2).to_list();
        assert_eq!(groups, vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn test_windows_are_lazy() {
        let pulls = Cell::new(0);
        let mut sliding = Sequence::iterate(0u32, |x| x + 1)
            .peek(|_| pulls.set(pulls.get() + 1))
            .sliding(3);
        assert_eq!(pulls.get(), 0);
        assert_eq!(sliding.next(), Some(vec![0, 1, 2]));
        assert_eq!(pulls.get(), 3);
        assert_eq!(sliding.next(), Some(vec![1, 2, 3]));
        assert_eq!(pulls.get(), 4);

        pulls.set(0);
        let mut grouped = Sequence::iterate(0u32, |x| x + 1)
            .peek(|_| pulls.set(pulls.get() + 1))
            .grouped(5);
        assert_eq!(pulls.get(), 0);
        assert_eq!(grouped.nth(1), Some(vec![5, 6, 7, 8, 9]));
        assert_eq!(pulls.get(), 10);
    }

    #[test]
    #[should_panic(expected = "sliding window size must be non-zero")]
    fn test_sliding_zero() {
        let _ = Sequence::of(vec![1, 2, 3]).sliding(0);
    }

    #[test]
    #[should_panic(expected = "group size must be non-zero")]
    fn test_grouped_zero() {
        let _ = Sequence::of(vec![1, 2, 3]).grouped(0);
    }
}
