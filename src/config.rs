//! Compile-time tuning constants (spec §6 "Configuration").

/// Cap on worker count accepted at runtime.
pub const MAX_THREADS: usize = 256;

/// Default transposition table size if the caller doesn't request a specific one.
pub const DEFAULT_TT_SIZE_MB: usize = 256;

/// Power-of-two stripe-lock count. Should exceed expected worker count by >= 16x
/// (see spec.md §9) to keep contention stochastic.
pub const TT_LOCK_STRIPES: usize = 1 << 16;

/// Sentinel for "proven infinite / infeasible". Must stay well below
/// `u32::MAX / 2` so that `+branch` additions never overflow before clamping.
pub const PN_INF: u32 = 10_000_000;

/// Worker threads report cancellation checks cheaply; this bounds how often we
/// reach for `Instant::now()` while polling the deadline.
pub const TIME_CHECK_NODE_INTERVAL: u64 = 1024;
