//! Command-line surface (spec §6): `solver <position-file> <thread-count>
//! <time-limit-seconds> [-v]`. Grounded on the teacher's `clap` derive
//! dependency (the hand-rolled `ArgIter` parser in `motors/src/cli.rs` is a
//! relic of supporting a UGI-style REPL; a one-shot solver has no need for
//! that, so this is plain `clap::Parser` the way a small utility binary in
//! the rest of the ecosystem would do it).

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "solver", about = "Weak proof-number solver for Othello endgame positions")]
pub struct Args {
    /// Path to a position file (text board + side line, or hex triple).
    pub position_file: PathBuf,

    /// Number of Lazy-SMP worker threads to run.
    pub thread_count: usize,

    /// Wall-clock search budget, in seconds.
    pub time_limit_seconds: u64,

    /// Print thread count, position summary, TT capacity and hit rate.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
