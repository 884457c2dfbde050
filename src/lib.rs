//! Parallel weak proof-number (WPN) search over Othello endgame positions.
//!
//! The crate is organized bottom-up: [`bitboard`] is the move-generation
//! kernel, [`position`] wraps it into the (black, white, side) triple used
//! as the transposition-table key, [`tt`] is the shared striped-lock table,
//! [`node`] is the thread-local search tree, [`wpn`] is the recursive
//! AND/OR search itself, and [`workers`] drives N independent Lazy-SMP
//! workers across it.

pub mod bitboard;
pub mod cli;
pub mod config;
pub mod node;
pub mod position;
pub mod report;
pub mod tt;
pub mod workers;
pub mod wpn;

pub use config::PN_INF;
pub use position::{Position, Side};

/// Shared fallible-path alias, matching the teacher's `Res<T> = anyhow::Result<T>` convention.
pub type Res<T> = anyhow::Result<T>;
