// Copyright 2025-2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parallel traversal of a [`SharedReplay`](crate::iter::SharedReplay).
//!
//! This is the only place where this crate spawns threads: all the sequence
//! combinators are evaluated on the thread that pulls them.

mod traversal;

use crate::macros::log_error;
use std::num::NonZeroUsize;
pub use traversal::ParallelTraversal;

/// Number of worker threads to spawn for a traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadCount {
    /// Spawn the number of threads returned by
    /// [`std::thread::available_parallelism()`].
    AvailableParallelism,
    /// Spawn the given number of threads.
    Count(NonZeroUsize),
}

impl ThreadCount {
    /// Resolves the number of threads to spawn. Falls back to a single thread
    /// if the available parallelism cannot be queried.
    pub fn count(self) -> NonZeroUsize {
        match self {
            ThreadCount::AvailableParallelism => {
                std::thread::available_parallelism().unwrap_or_else(|_e| {
                    log_error!("Getting the available parallelism failed: {_e}");
                    NonZeroUsize::MIN
                })
            }
            ThreadCount::Count(count) => count,
        }
    }
}

impl TryFrom<usize> for ThreadCount {
    type Error = <NonZeroUsize as TryFrom<usize>>::Error;

    fn try_from(thread_count: usize) -> Result<Self, Self::Error> {
        let count = NonZeroUsize::try_from(thread_count)?;
        Ok(ThreadCount::Count(count))
    }
}

/// Strategy to distribute the indices of a sequence among worker threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexStrategy {
    /// Worker `i` out of `n` processes the indices `i`, `i + n`, `i + 2n`, etc.
    Strided,
    /// Workers claim the next unprocessed index from a shared counter.
    Dynamic,
}

/// Whether the outputs of a parallel traversal follow the order of the
/// sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncounterOrder {
    /// Outputs are in the same order as the corresponding elements.
    Ordered,
    /// Outputs come in no particular order.
    Unordered,
}
