use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;

use reversi_pns::cli::Args;
use reversi_pns::config::{DEFAULT_TT_SIZE_MB, MAX_THREADS};
use reversi_pns::position::parse_position_file;
use reversi_pns::report::{exit_code, print_summary, print_verbose, RunStats};
use reversi_pns::tt::TranspositionTable;
use reversi_pns::workers::search;

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> reversi_pns::Res<i32> {
    if args.thread_count == 0 || args.thread_count > MAX_THREADS {
        anyhow::bail!("thread-count must be between 1 and {MAX_THREADS}, got {}", args.thread_count);
    }

    let contents = std::fs::read_to_string(&args.position_file)
        .map_err(|e| anyhow::anyhow!("couldn't read '{}': {e}", args.position_file.display()))?;
    let position = parse_position_file(&contents)?;

    let tt = Arc::new(TranspositionTable::with_size_mb(DEFAULT_TT_SIZE_MB));
    let time_limit = Duration::from_secs(args.time_limit_seconds);

    let start = Instant::now();
    let (result, shared) = search(position, args.thread_count, time_limit, Arc::clone(&tt));
    let elapsed = start.elapsed();

    let stats = RunStats {
        nodes: shared.nodes.load(std::sync::atomic::Ordering::Relaxed),
        elapsed,
        result,
        tt_hits: shared.tt_hits.load(std::sync::atomic::Ordering::Relaxed),
        tt_stores: shared.tt_stores.load(std::sync::atomic::Ordering::Relaxed),
    };
    print_summary(&stats);
    if args.verbose {
        print_verbose(&position, args.thread_count, &tt, &stats);
    }

    Ok(exit_code(result))
}
