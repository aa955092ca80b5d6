// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Zipping sequences together, and the inverse projections.

use super::Sequence;
use std::iter::Zip;
use std::ops::RangeFrom;

impl<I: Iterator> Sequence<I> {
    /// Lazily pairs the elements of this sequence with those of `other`. The
    /// result stops as soon as either side is exhausted.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let pairs = Sequence::of(vec![1, 2, 3]).zip(["a", "b"]).to_list();
    /// assert_eq!(pairs, vec![(1, "a"), (2, "b")]);
    /// ```
    pub fn zip<J: IntoIterator>(self, other: J) -> Sequence<Zip<I, J::IntoIter>> {
        Sequence::from_source(self.into_inner().zip(other))
    }

    /// Lazily combines the elements of this sequence with those of `other`.
    /// The result stops as soon as either side is exhausted.
    pub fn zip_with<J, U, F>(self, other: J, mut combiner: F) -> Sequence<impl Iterator<Item = U>>
    where
        J: IntoIterator,
        F: FnMut(I::Item, J::Item) -> U,
    {
        Sequence::from_source(self.into_inner().zip(other).map(move |(a, b)| combiner(a, b)))
    }

    /// Lazily groups the elements of this sequence with those of `b` and `c`
    /// into flat triples. The result stops as soon as any input is exhausted.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let triples = Sequence::of(vec![1, 2, 3])
    ///     .zip3(["a", "b", "c"], [true, false, true])
    ///     .to_list();
    /// assert_eq!(triples, vec![(1, "a", true), (2, "b", false), (3, "c", true)]);
    /// ```
    pub fn zip3<B, C>(
        self,
        b: B,
        c: C,
    ) -> Sequence<impl Iterator<Item = (I::Item, B::Item, C::Item)>>
    where
        B: IntoIterator,
        C: IntoIterator,
    {
        Sequence::from_source(
            self.into_inner()
                .zip(b)
                .zip(c)
                .map(|((a, b), c)| (a, b, c)),
        )
    }

    /// Lazily groups the elements of this sequence with those of `b`, `c` and
    /// `d` into flat quadruples. The result stops as soon as any input is
    /// exhausted.
    pub fn zip4<B, C, D>(
        self,
        b: B,
        c: C,
        d: D,
    ) -> Sequence<impl Iterator<Item = (I::Item, B::Item, C::Item, D::Item)>>
    where
        B: IntoIterator,
        C: IntoIterator,
        D: IntoIterator,
    {
        Sequence::from_source(
            self.into_inner()
                .zip(b)
                .zip(c)
                .zip(d)
                .map(|(((a, b), c), d)| (a, b, c, d)),
        )
    }

    /// Lazily pairs each element with its 0-based position.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let indexed = Sequence::of(vec!['x', 'y']).zip_with_index().to_list();
    /// assert_eq!(indexed, vec![('x', 0), ('y', 1)]);
    /// ```
    pub fn zip_with_index(self) -> Sequence<Zip<I, RangeFrom<usize>>> {
        Sequence::from_source(self.into_inner().zip(0..))
    }
}

impl<I, A, B> Sequence<I>
where
    I: Iterator<Item = (A, B)>,
    A: Clone,
    B: Clone,
{
    /// Splits a sequence of pairs into 2 sequences, one per component. The
    /// pairs are realized once, in a cache shared by both results.
    ///
    /// ```
    /// # use lazyseq::Sequence;
    /// let (numbers, letters) = Sequence::of(vec![(1, 'a'), (2, 'b')]).unzip();
    /// assert_eq!(letters.to_list(), vec!['a', 'b']);
    /// assert_eq!(numbers.to_list(), vec![1, 2]);
    /// ```
    #[allow(clippy::type_complexity)]
    pub fn unzip(self) -> (Sequence<impl Iterator<Item = A>>, Sequence<impl Iterator<Item = B>>) {
        let (a, b) = self.duplicate();
        (a.map(|(a, _)| a), b.map(|(_, b)| b))
    }
}

impl<I, A, B, C> Sequence<I>
where
    I: Iterator<Item = (A, B, C)>,
    A: Clone,
    B: Clone,
    C: Clone,
{
    /// Splits a sequence of triples into 3 sequences, one per component.
    #[allow(clippy::type_complexity)]
    pub fn unzip3(
        self,
    ) -> (
        Sequence<impl Iterator<Item = A>>,
        Sequence<impl Iterator<Item = B>>,
        Sequence<impl Iterator<Item = C>>,
    ) {
        let (a, b, c) = self.triplicate();
        (
            a.map(|(a, _, _)| a),
            b.map(|(_, b, _)| b),
            c.map(|(_, _, c)| c),
        )
    }
}

impl<I, A, B, C, D> Sequence<I>
where
    I: Iterator<Item = (A, B, C, D)>,
    A: Clone,
    B: Clone,
    C: Clone,
    D: Clone,
{
    /// Splits a sequence of quadruples into 4 sequences, one per component.
    #[allow(clippy::type_complexity)]
    pub fn unzip4(
        self,
    ) -> (
        Sequence<impl Iterator<Item = A>>,
        Sequence<impl Iterator<Item = B>>,
        Sequence<impl Iterator<Item = C>>,
        Sequence<impl Iterator<Item = D>>,
    ) {
        let (a, b, c, d) = self.quadruplicate();
        (
            a.map(|(a, _, _, _)| a),
            b.map(|(_, b, _, _)| b),
            c.map(|(_, _, c, _)| c),
            d.map(|(_, _, _, d)| d),
        )
    }
}
