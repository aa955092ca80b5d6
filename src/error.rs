// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors surfaced while realizing a shared sequence.

use thiserror::Error;

/// Failure of the underlying source while a materialization cache was
/// realizing a slot.
///
/// A source is never pulled again after a failure: every reader that reaches
/// the failing index (or any later one) observes this same error, while slots
/// realized before it remain readable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SourceFailure {
    /// The source panicked while producing the item at the given index, or is
    /// still marked as producing it (e.g. when the source re-entered its own
    /// cache).
    #[error("the source panicked while realizing index {index}, the sequence cannot be replayed past it")]
    Poisoned {
        /// Index of the first slot that could not be realized.
        index: usize,
    },
}

impl SourceFailure {
    /// Returns the index of the first slot that could not be realized.
    ///
    /// ```
    /// # use lazyseq::SourceFailure;
    /// let failure = SourceFailure::Poisoned { index: 3 };
    /// assert_eq!(failure.index(), 3);
    /// ```
    pub fn index(&self) -> usize {
        match self {
            SourceFailure::Poisoned { index } => *index,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display_names_index() {
        let failure = SourceFailure::Poisoned { index: 42 };
        assert_eq!(
            failure.to_string(),
            "the source panicked while realizing index 42, the sequence cannot be replayed past it"
        );
    }
}
