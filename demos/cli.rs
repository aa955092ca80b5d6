// Copyright 2025-2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI tool to run examples of sequence pipelines.
//!
//! Run with `RUST_LOG=debug` and the `log` feature to observe the worker
//! threads of parallel traversals.

use clap::{Parser, ValueEnum};
use lazyseq::prelude::*;
use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::hint::black_box;
use std::num::NonZeroUsize;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let traversal = ParallelTraversal {
        num_threads: match cli.num_threads {
            Some(num_threads) => ThreadCount::Count(num_threads),
            None => ThreadCount::AvailableParallelism,
        },
        index_strategy: match cli.index_strategy {
            IndexStrategyCli::Strided => IndexStrategy::Strided,
            IndexStrategyCli::Dynamic => IndexStrategy::Dynamic,
        },
    };

    match cli.scenario {
        Scenario::Sum => {
            let shared = Sequence::from_source(0..black_box(cli.input_size)).share();
            let squares = traversal.map(&shared, EncounterOrder::Unordered, |x| x * x);
            let sum = squares.into_seq().reduce(reducers::sum());
            println!("sum of squares = {sum}");
        }
        Scenario::Fork => {
            let (evens, odds) = Sequence::from_source(0..black_box(cli.input_size)).duplicate();
            let evens = evens.filter(|x| x % 2 == 0).fold_left_mapped(&reducers::count());
            let odds = odds.filter(|x| x % 2 == 1).fold_left_mapped(&reducers::count());
            println!("evens = {evens}, odds = {odds}");
        }
        Scenario::Window => {
            let max_window = Sequence::from_source(0..black_box(cli.input_size))
                .map(|x| x % 1000)
                .sliding(cli.window.get())
                .map(|window| window.into_seq().reduce(reducers::sum()))
                .max_by_key(|sum| *sum);
            println!("max window sum = {max_window:?}");
        }
        Scenario::Cycle => {
            let total = Sequence::from_source(0..black_box(cli.input_size))
                .cycle_times(cli.passes)
                .zip_with_index()
                .map(|(x, i)| x ^ i as u64)
                .reduce(reducers::sum());
            println!("cycled total = {total}");
        }
        Scenario::FindFirst => {
            let input = fill_needles(cli.input_size as usize, cli.density);
            let found = black_box(input)
                .into_seq()
                .zip_with_index()
                .filter(|(needle, _)| *needle)
                .map(|(_, index)| index)
                .find_first();
            println!("found = {found:?}");
        }
    }
}

/// Creates a vector of `input_size` booleans, `density` of which are set to
/// [`true`] (the needles). The needles are sampled with a fixed seed for
/// reproducibility.
fn fill_needles(input_size: usize, density: usize) -> Vec<bool> {
    let mut input = vec![false; input_size];

    let mut rng = ChaCha12Rng::seed_from_u64(42);
    for needle in index::sample(&mut rng, input_size, density.min(input_size)) {
        input[needle] = true;
    }

    input
}

/// CLI tool to run examples of sequence pipelines.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(version)]
struct Cli {
    /// Number of worker threads for parallel scenarios. Default to the
    /// available parallelism.
    #[arg(long)]
    num_threads: Option<NonZeroUsize>,

    /// Policy to distribute indices among threads.
    #[arg(long, value_enum, default_value_t = IndexStrategyCli::Dynamic)]
    index_strategy: IndexStrategyCli,

    /// Scenario to run.
    #[arg(long, value_enum)]
    scenario: Scenario,

    /// Number of items in the input.
    #[arg(long, default_value_t = 1_000_000)]
    input_size: u64,

    /// Size of the sliding windows. Used only for the window scenario.
    #[arg(long, default_value = "16")]
    window: NonZeroUsize,

    /// Number of passes. Used only for the cycle scenario.
    #[arg(long, default_value_t = 3)]
    passes: usize,

    /// Number of items that match the search. Used only for the find-first
    /// scenario.
    #[arg(long, default_value_t = 1)]
    density: usize,
}

/// Policy to distribute indices among threads.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum IndexStrategyCli {
    /// Each worker thread processes every n-th index.
    Strided,
    /// Worker threads claim indices from a shared counter.
    Dynamic,
}

/// Scenario to run.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
enum Scenario {
    /// Sum the squares of a range, in parallel.
    Sum,
    /// Count even and odd numbers over two forks of a single range.
    Fork,
    /// Find the largest sum over sliding windows.
    Window,
    /// Cycle through a range several times.
    Cycle,
    /// Find the first needle.
    FindFirst,
}
