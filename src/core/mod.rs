// Copyright 2024-2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Core engine: materialization caches that turn a single-pass source into a
//! replayable, index-addressable store.

mod cache;
mod sync;

pub use cache::{LocalCache, Materialize};
pub use sync::SyncCache;
