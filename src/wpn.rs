//! The Weak Proof Number search core (spec §4.4).
//!
//! OR-nodes are positions where Black is actually to move (after pass
//! resolution); AND-nodes are positions where White is. The search always
//! answers "does Black win", per spec §4.4.1 — draws and White wins both
//! collapse to "lose for Black" at the leaf, and are disambiguated again
//! only at the root (see [`RootResult`]).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::bitboard::MaterialWinner;
use crate::config::PN_INF;
use crate::node::SearchNode;
use crate::position::Side;
use crate::tt::TranspositionTable;

/// Shared, cross-worker state consulted by every `pns_search` call: the TT,
/// the two cancellation flags, and the reporting counters. Cheap to pass
/// around as a `&SearchContext` since it is all either a reference or atomics.
pub struct SearchContext<'a> {
    pub tt: &'a TranspositionTable,
    pub solved: &'a AtomicBool,
    pub time_expired: &'a AtomicBool,
    pub nodes: &'a AtomicU64,
    pub tt_hits: &'a AtomicU64,
    pub tt_stores: &'a AtomicU64,
}

impl<'a> SearchContext<'a> {
    fn should_stop(&self) -> bool {
        self.solved.load(Ordering::Acquire) || self.time_expired.load(Ordering::Acquire)
    }

    fn store(&self, node: &SearchNode) {
        self.tt.store(&node.position, node.proof, node.disproof);
        self.tt_stores.fetch_add(1, Ordering::Relaxed);
    }

    fn refresh(&self, node: &mut SearchNode) {
        if let Some((proof, disproof)) = self.tt.lookup(&node.position) {
            node.proof = proof;
            node.disproof = disproof;
            self.tt_hits.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// A node is terminal only in the two unambiguous cases from spec §4.4.1;
/// `(PN_INF, PN_INF)` (the proven-draw case) is deliberately excluded per
/// the repository convention spec §9's third open question describes —
/// such a node keeps getting revisited until a threshold dismisses it.
fn is_already_terminal(node: &SearchNode) -> bool {
    (node.proof == 0 && node.disproof >= PN_INF) || (node.proof >= PN_INF && node.disproof == 0)
}

fn classify_game_over(node: &mut SearchNode) {
    match node.position.material_winner() {
        MaterialWinner::Black => {
            node.proof = 0;
            node.disproof = PN_INF;
        }
        MaterialWinner::White | MaterialWinner::Draw => {
            node.proof = PN_INF;
            node.disproof = 0;
        }
    }
}

/// Children neither proven nor disproven, per the literal reading of spec
/// §4.4.2: "proven" means `disproof == 0`, "disproven" means `proof == 0`.
fn branch_count(children: &[SearchNode]) -> u32 {
    children.iter().filter(|c| c.disproof != 0 && c.proof != 0).count() as u32
}

fn update_or_node(node: &mut SearchNode) {
    let branch = branch_count(&node.children);
    let proof = node.children.iter().map(|c| c.proof).min().unwrap_or(PN_INF);
    let disproof = node.children.iter().map(|c| c.disproof).max().unwrap_or(0);
    node.proof = proof.min(PN_INF);
    node.disproof = disproof.saturating_add(branch).min(PN_INF);
}

fn update_and_node(node: &mut SearchNode) {
    let branch = branch_count(&node.children);
    let proof = node.children.iter().map(|c| c.proof).max().unwrap_or(0);
    let disproof = node.children.iter().map(|c| c.disproof).min().unwrap_or(PN_INF);
    node.proof = proof.saturating_add(branch).min(PN_INF);
    node.disproof = disproof.min(PN_INF);
}

/// Recursive AND/OR search with weak-proof-number propagation (spec §4.4.3).
/// `proof_limit`/`disproof_limit` are the thresholds this call must exceed
/// before returning control to its caller (or the outer iterative-deepening
/// driver, for the root).
pub fn pns_search(node: &mut SearchNode, proof_limit: u32, disproof_limit: u32, ctx: &SearchContext) {
    if ctx.should_stop() {
        return;
    }
    ctx.nodes.fetch_add(1, Ordering::Relaxed);
    ctx.refresh(node);
    if node.proof >= proof_limit || node.disproof >= disproof_limit {
        return;
    }
    if is_already_terminal(node) {
        ctx.store(node);
        return;
    }
    if node.position.is_game_over() {
        classify_game_over(node);
        ctx.store(node);
        return;
    }

    loop {
        if ctx.should_stop() {
            return;
        }
        if !node.is_expanded() {
            node.expand();
        }
        for child in &mut node.children {
            ctx.refresh(child);
            if is_already_terminal(child) {
                continue;
            }
            if child.position.is_game_over() {
                classify_game_over(child);
            }
        }

        let old = (node.proof, node.disproof);
        let active = node.position.active_side();
        match active {
            Side::Black => update_or_node(node),
            Side::White => update_and_node(node),
        }

        if (node.proof, node.disproof) != old {
            ctx.store(node);
            return;
        }
        if node.proof >= proof_limit || node.disproof >= disproof_limit {
            ctx.store(node);
            return;
        }
        if is_already_terminal(node) {
            ctx.store(node);
            return;
        }

        match active {
            Side::Black => node.children.sort_by_key(|c| c.proof),
            Side::White => node.children.sort_by_key(|c| c.disproof),
        }
        pns_search(&mut node.children[0], proof_limit, disproof_limit, ctx);
    }
}

/// The root's resolved game-theoretic value (spec §4.4.5).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RootResult {
    Win,
    Lose,
    Draw,
    Unknown,
}

pub fn root_result(node: &SearchNode) -> RootResult {
    let proven = node.proof >= PN_INF;
    let disproven = node.disproof >= PN_INF;
    match (proven, disproven) {
        (true, true) => RootResult::Draw,
        (true, false) => RootResult::Lose,
        (false, true) => RootResult::Win,
        (false, false) => RootResult::Unknown,
    }
}

/// One worker's full root search: iterative deepening of the threshold pair
/// (spec §4.4.4), starting from `initial_threshold` (the Lazy-SMP stagger
/// applied in [`crate::workers`]), until the root is terminal or a
/// cancellation flag fires.
pub fn iterative_deepen(root: &mut SearchNode, initial_threshold: u32, ctx: &SearchContext) -> RootResult {
    let mut proof_limit = initial_threshold.min(PN_INF);
    let mut disproof_limit = initial_threshold.min(PN_INF);
    loop {
        pns_search(root, proof_limit, disproof_limit, ctx);
        if ctx.should_stop() {
            return root_result(root);
        }
        if is_already_terminal(root) || root.is_solved() {
            return root_result(root);
        }
        proof_limit = proof_limit.max(root.proof.saturating_add(1)).min(PN_INF);
        disproof_limit = disproof_limit.max(root.disproof.saturating_add(1)).min(PN_INF);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::position::Position;
    use std::sync::atomic::AtomicU64 as AU64;

    fn fresh_ctx() -> (TranspositionTable, AtomicBool, AtomicBool, AU64, AU64, AU64) {
        (
            TranspositionTable::with_capacity(4096),
            AtomicBool::new(false),
            AtomicBool::new(false),
            AU64::new(0),
            AU64::new(0),
            AU64::new(0),
        )
    }

    #[test]
    fn all_black_board_is_immediately_proven_win() {
        let (tt, solved, time_expired, nodes, hits, stores) = fresh_ctx();
        let ctx = SearchContext { tt: &tt, solved: &solved, time_expired: &time_expired, nodes: &nodes, tt_hits: &hits, tt_stores: &stores };
        let pos = Position::new(u64::MAX, 0, Side::Black).unwrap();
        let mut root = SearchNode::unexpanded(pos);
        let result = iterative_deepen(&mut root, 1, &ctx);
        assert_eq!(result, RootResult::Win);
        assert_eq!(root.proof, 0);
        assert!(root.disproof >= PN_INF);
    }

    #[test]
    fn all_white_board_is_immediately_lose() {
        let (tt, solved, time_expired, nodes, hits, stores) = fresh_ctx();
        let ctx = SearchContext { tt: &tt, solved: &solved, time_expired: &time_expired, nodes: &nodes, tt_hits: &hits, tt_stores: &stores };
        let pos = Position::new(0, u64::MAX, Side::Black).unwrap();
        let mut root = SearchNode::unexpanded(pos);
        let result = iterative_deepen(&mut root, 1, &ctx);
        assert_eq!(result, RootResult::Lose);
    }

    #[test]
    fn stopping_immediately_yields_unknown() {
        let (tt, solved, time_expired, nodes, hits, stores) = fresh_ctx();
        solved.store(true, Ordering::Release);
        let ctx = SearchContext { tt: &tt, solved: &solved, time_expired: &time_expired, nodes: &nodes, tt_hits: &hits, tt_stores: &stores };
        let mut root = SearchNode::unexpanded(Position::standard_start());
        let result = iterative_deepen(&mut root, 1, &ctx);
        assert_eq!(result, RootResult::Unknown);
    }

    #[test]
    fn branch_count_excludes_proven_and_disproven_children() {
        let mut proven = SearchNode::unexpanded(Position::standard_start());
        proven.proof = 0;
        proven.disproof = PN_INF;
        let mut disproven = SearchNode::unexpanded(Position::standard_start());
        disproven.proof = PN_INF;
        disproven.disproof = 0;
        let mut unresolved = SearchNode::unexpanded(Position::standard_start());
        unresolved.proof = 3;
        unresolved.disproof = 5;
        let children = vec![proven, disproven, unresolved];
        assert_eq!(branch_count(&children), 1);
    }
}
