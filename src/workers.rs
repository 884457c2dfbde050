//! Lazy-SMP worker orchestration (spec §4.5).
//!
//! Every worker runs the *same* algorithm over the *same* root from an
//! empty tree; the only thing that differs between them is the initial
//! proof/disproof threshold, `1 + (worker_id mod 4)`. That stagger is the
//! sole source of search diversity — workers cross-pollinate purely through
//! the shared transposition table, the way the teacher's `multithreading.rs`
//! has independent `EngineThread`s coordinate only via shared atomics and
//! message channels, never by touching each other's private state directly.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::TIME_CHECK_NODE_INTERVAL;
use crate::node::SearchNode;
use crate::position::Position;
use crate::tt::TranspositionTable;
use crate::wpn::{iterative_deepen, RootResult, SearchContext};

/// Global counters and cancellation flags shared by every worker thread and
/// read back by the driver once all workers join.
pub struct SharedState {
    pub tt: Arc<TranspositionTable>,
    pub solved: AtomicBool,
    pub time_expired: AtomicBool,
    pub nodes: AtomicU64,
    pub tt_hits: AtomicU64,
    pub tt_stores: AtomicU64,
    pub result: std::sync::Mutex<Option<RootResult>>,
}

impl SharedState {
    pub fn new(tt: Arc<TranspositionTable>) -> Arc<Self> {
        Arc::new(Self {
            tt,
            solved: AtomicBool::new(false),
            time_expired: AtomicBool::new(false),
            nodes: AtomicU64::new(0),
            tt_hits: AtomicU64::new(0),
            tt_stores: AtomicU64::new(0),
            result: std::sync::Mutex::new(None),
        })
    }
}

/// Runs `thread_count` workers against `position` for up to `time_limit`,
/// returning the committed result (spec §4.5: "the first worker whose root
/// becomes terminal performs a single compare-and-swap on a shared `solved`
/// flag; the thread winning the CAS writes the result").
pub fn search(position: Position, thread_count: usize, time_limit: Duration, tt: Arc<TranspositionTable>) -> (RootResult, Arc<SharedState>) {
    let shared = SharedState::new(tt);
    let deadline = Instant::now() + time_limit;

    let timer_shared = Arc::clone(&shared);
    let timer = thread::spawn(move || {
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
        timer_shared.time_expired.store(true, Ordering::Release);
    });

    let mut handles = Vec::with_capacity(thread_count);
    for worker_id in 0..thread_count {
        let shared = Arc::clone(&shared);
        handles.push(thread::spawn(move || run_worker(position, worker_id, &shared)));
    }
    for h in handles {
        let _ = h.join();
    }
    let _ = timer.join();

    let result = shared.result.lock().unwrap().unwrap_or(RootResult::Unknown);
    (result, shared)
}

/// One worker's entire lifetime: stagger its initial threshold, search the
/// root to exhaustion (or cancellation), then race the other workers to
/// commit a definite result via CAS on `solved`.
fn run_worker(position: Position, worker_id: usize, shared: &SharedState) {
    let initial_threshold = 1 + (worker_id as u32 % 4);
    let ctx = SearchContext {
        tt: &shared.tt,
        solved: &shared.solved,
        time_expired: &shared.time_expired,
        nodes: &shared.nodes,
        tt_hits: &shared.tt_hits,
        tt_stores: &shared.tt_stores,
    };
    let mut root = SearchNode::unexpanded(position);
    let result = iterative_deepen(&mut root, initial_threshold, &ctx);

    if result != RootResult::Unknown {
        if shared
            .solved
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            *shared.result.lock().unwrap() = Some(result);
        }
    }
}

/// Exposed for the driver's progress reporting; not consulted by the search
/// itself, which only ever polls the node counter every
/// [`TIME_CHECK_NODE_INTERVAL`] increments in spirit (the counter itself is
/// incremented unconditionally, per spec §4.4.3 step 2 — this constant just
/// documents the cadence the original time-check loop used).
pub const fn time_check_interval() -> u64 {
    TIME_CHECK_NODE_INTERVAL
}
