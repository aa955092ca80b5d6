// Copyright 2024-2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Thread-safe materialization cache.

use super::cache::Materialize;
use crate::error::SourceFailure;
use crate::macros::{log_debug, log_error, log_trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

/// A materialization cache that can be read from multiple threads, meant to be
/// shared via [`Arc`](std::sync::Arc).
///
/// The source is owned by a [`Mutex`]: exactly one thread pulls it for a given
/// index, and threads racing for an unrealized index block until the winner
/// publishes it. Realized items live behind a [`RwLock`] that pulls never hold
/// while the source runs, so readers of already realized slots don't wait on a
/// pending pull.
///
/// There is no timeout: a source pull that never returns stalls every reader
/// waiting for an unrealized index.
pub struct SyncCache<I: Iterator> {
    /// Realized items, in source order.
    realized: RwLock<Vec<I::Item>>,
    /// The source, or [`None`] once exhausted. The mutex is poisoned if the
    /// source panics.
    source: Mutex<Option<I>>,
    /// Set once the source has returned [`None`].
    exhausted: AtomicBool,
}

impl<I: Iterator> SyncCache<I> {
    /// Creates a new cache taking ownership of the given source. Nothing is
    /// pulled until the first read.
    pub fn new(source: I) -> Self {
        log_debug!("[sync cache] Created a materialization cache");
        Self {
            realized: RwLock::new(Vec::new()),
            source: Mutex::new(Some(source)),
            exhausted: AtomicBool::new(false),
        }
    }
}

impl<I: Iterator> SyncCache<I>
where
    I::Item: Clone,
{
    /// Reads an already realized slot.
    fn read_slot(&self, index: usize) -> Option<I::Item> {
        // The buffer is only ever appended to, so it is consistent even if a
        // writer panicked.
        self.realized
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }
}

impl<I: Iterator> Materialize for SyncCache<I>
where
    I::Item: Clone,
{
    type Item = I::Item;

    fn try_get(&self, index: usize) -> Result<Option<I::Item>, SourceFailure> {
        if let Some(item) = self.read_slot(index) {
            return Ok(Some(item));
        }

        let mut source = match self.source.lock() {
            Ok(guard) => guard,
            Err(_) => {
                // Slots published before the failure stay readable.
                if let Some(item) = self.read_slot(index) {
                    return Ok(Some(item));
                }
                let index = self.realized_len();
                log_error!("[sync cache] Source is poisoned at index {index}");
                return Err(SourceFailure::Poisoned { index });
            }
        };

        loop {
            // Another thread may have published the slot while we were waiting for
            // the lock.
            if let Some(item) = self.read_slot(index) {
                return Ok(Some(item));
            }
            let Some(iter) = source.as_mut() else {
                return Ok(None);
            };
            match iter.next() {
                Some(item) => {
                    let mut realized = self
                        .realized
                        .write()
                        .unwrap_or_else(PoisonError::into_inner);
                    log_trace!("[sync cache] Realized index {}", realized.len());
                    realized.push(item);
                }
                None => {
                    log_debug!(
                        "[sync cache] Source exhausted after {} item(s)",
                        self.realized_len()
                    );
                    *source = None;
                    self.exhausted.store(true, Ordering::Release);
                }
            }
        }
    }

    fn realized_len(&self) -> usize {
        self.realized
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Acquire)
    }
}
