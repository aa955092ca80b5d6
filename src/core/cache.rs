// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::SourceFailure;
use crate::macros::{log_debug, log_error, log_trace};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// An append-only, index-addressable store that lazily realizes a source on
/// demand.
///
/// Implementers must guarantee that:
/// - the value returned for a given index never changes once realized,
/// - realization is monotonic: index `i + 1` is never realized before index
///   `i`,
/// - the underlying source is pulled at most once per index.
pub trait Materialize {
    /// The type of items stored in this cache.
    type Item;

    /// Returns the item at the given index, realizing the source up to that
    /// index if needed.
    ///
    /// Returns `Ok(None)` if the source is exhausted before reaching the
    /// index, and an error if the source failed at or before that index.
    fn try_get(&self, index: usize) -> Result<Option<Self::Item>, SourceFailure>;

    /// Number of slots realized so far.
    fn realized_len(&self) -> usize;

    /// Whether the source has been fully realized.
    fn is_exhausted(&self) -> bool;

    /// Returns the item at the given index, like [`try_get()`](Self::try_get).
    ///
    /// # Panics
    ///
    /// Panics with the [`SourceFailure`] message if the source failed at or
    /// before that index.
    fn get(&self, index: usize) -> Option<Self::Item> {
        match self.try_get(index) {
            Ok(item) => item,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<M: Materialize + ?Sized> Materialize for Rc<M> {
    type Item = M::Item;

    fn try_get(&self, index: usize) -> Result<Option<Self::Item>, SourceFailure> {
        (**self).try_get(index)
    }

    fn realized_len(&self) -> usize {
        (**self).realized_len()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
}

impl<M: Materialize + ?Sized> Materialize for Arc<M> {
    type Item = M::Item;

    fn try_get(&self, index: usize) -> Result<Option<Self::Item>, SourceFailure> {
        (**self).try_get(index)
    }

    fn realized_len(&self) -> usize {
        (**self).realized_len()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
}

/// State of the source owned by a [`LocalCache`].
enum SourceState<I> {
    /// The source may still produce items.
    Pending(I),
    /// The source is being pulled. Observing this state from another call
    /// means that the pull never completed.
    Pulling,
    /// The source returned [`None`].
    Exhausted,
}

/// A single-threaded materialization cache, meant to be shared via [`Rc`].
///
/// Each realized item is stored once and cloned out on every read. There is no
/// eviction: the cache grows with the furthest index requested so far, and
/// lives as long as its longest-lived reader.
pub struct LocalCache<I: Iterator> {
    realized: RefCell<Vec<I::Item>>,
    state: RefCell<SourceState<I>>,
}

impl<I: Iterator> LocalCache<I> {
    /// Creates a new cache taking ownership of the given source. Nothing is
    /// pulled until the first read.
    pub fn new(source: I) -> Self {
        log_debug!("[local cache] Created a materialization cache");
        Self {
            realized: RefCell::new(Vec::new()),
            state: RefCell::new(SourceState::Pending(source)),
        }
    }
}

impl<I: Iterator> Materialize for LocalCache<I>
where
    I::Item: Clone,
{
    type Item = I::Item;

    fn try_get(&self, index: usize) -> Result<Option<I::Item>, SourceFailure> {
        loop {
            if let Some(item) = self.realized.borrow().get(index) {
                return Ok(Some(item.clone()));
            }

            // No borrow is held while the source runs: a panicking source leaves the
            // state as `Pulling`, and a re-entrant source observes it.
            let previous = std::mem::replace(&mut *self.state.borrow_mut(), SourceState::Pulling);
            let mut source = match previous {
                SourceState::Pending(source) => source,
                SourceState::Exhausted => {
                    *self.state.borrow_mut() = SourceState::Exhausted;
                    return Ok(None);
                }
                SourceState::Pulling => {
                    let index = self.realized_len();
                    log_error!("[local cache] Source is poisoned at index {index}");
                    return Err(SourceFailure::Poisoned { index });
                }
            };

            match source.next() {
                Some(item) => {
                    let mut realized = self.realized.borrow_mut();
                    log_trace!("[local cache] Realized index {}", realized.len());
                    realized.push(item);
                    drop(realized);
                    *self.state.borrow_mut() = SourceState::Pending(source);
                }
                None => {
                    log_debug!(
                        "[local cache] Source exhausted after {} item(s)",
                        self.realized_len()
                    );
                    *self.state.borrow_mut() = SourceState::Exhausted;
                }
            }
        }
    }

    fn realized_len(&self) -> usize {
        self.realized.borrow().len()
    }

    fn is_exhausted(&self) -> bool {
        matches!(*self.state.borrow(), SourceState::Exhausted)
    }
}
