//! End-to-end scenarios (spec §8's scenario table), exercised through the
//! public `search` entry point rather than by poking at internals.

use std::sync::Arc;
use std::time::Duration;

use reversi_pns::position::{parse_position_file, Position, Side};
use reversi_pns::tt::TranspositionTable;
use reversi_pns::workers::search;
use reversi_pns::wpn::RootResult;

fn small_tt() -> Arc<TranspositionTable> {
    Arc::new(TranspositionTable::with_capacity(1 << 16))
}

/// Scenario 1: the full standard opening is a 60-ply solve and is not
/// something a unit test should attempt; it is kept as `#[ignore]` so it
/// can still be run deliberately (`cargo test -- --ignored`) with a large
/// time budget, the way expensive perft-style tests are usually gated.
#[test]
#[ignore]
fn standard_start_is_a_draw() {
    let pos = Position::standard_start();
    let (result, _) = search(pos, 8, Duration::from_secs(3600), small_tt());
    assert_eq!(result, RootResult::Draw);
}

/// Scenario 2: 63 discs for Black, one empty square. Black wins on material
/// regardless of who gets the last move.
#[test]
fn sixty_three_black_discs_is_a_win() {
    let mut board = vec!['X'; 64];
    board[27] = '-';
    let text: String = board.into_iter().collect();
    let file = format!("{text}\nBlack\n");
    let pos = parse_position_file(&file).unwrap();
    let (result, _) = search(pos, 2, Duration::from_secs(5), small_tt());
    assert_eq!(result, RootResult::Win);
}

/// Scenario 3: a small endgame position (three empty squares) that should
/// resolve almost immediately.
#[test]
fn small_endgame_resolves_quickly() {
    let mut board = vec!['-'; 64];
    for (i, square) in board.iter_mut().enumerate() {
        if i == 12 || i == 34 || i == 50 {
            continue;
        }
        *square = if i % 2 == 0 { 'X' } else { 'O' };
    }
    let text: String = board.into_iter().collect();
    let file = format!("{text}\nBlack\n");
    let pos = parse_position_file(&file).unwrap();
    let (result, _) = search(pos, 2, Duration::from_secs(5), small_tt());
    assert_ne!(result, RootResult::Unknown);
}

/// Scenario 4: a ten-empty-square position labeled "black-to-win" in the
/// repository this spec was distilled from.
#[test]
fn black_to_win_position_from_repository_comments() {
    let pos = Position::new(0x0000_0000_124A_1000, 0x3EBD_FFED_8DB5_AF87, Side::Black).unwrap();
    let (result, _) = search(pos, 4, Duration::from_secs(30), small_tt());
    assert_eq!(result, RootResult::Win);
}

/// Scenario 5: a position where neither side has a legal move is terminal
/// by material count alone.
#[test]
fn no_moves_either_side_resolves_by_material() {
    let pos = Position::new(1, 0, Side::Black).unwrap();
    assert!(pos.is_game_over());
    let (result, _) = search(pos, 1, Duration::from_secs(5), small_tt());
    assert_eq!(result, RootResult::Win);
}

/// Scenario 6: thread count must not change the answer.
#[test]
fn thread_count_does_not_change_the_result() {
    let pos = Position::new(0x0000_0000_124A_1000, 0x3EBD_FFED_8DB5_AF87, Side::Black).unwrap();
    for &threads in &[1usize, 2, 8] {
        let (result, _) = search(pos, threads, Duration::from_secs(30), small_tt());
        assert_eq!(result, RootResult::Win, "thread count {threads} disagreed");
    }
}
