//! The (black, white, side) triple that is both the search root and the
//! transposition-table key (spec §3), plus the two position-file formats
//! spec §6 requires the driver to read.

use std::fmt::{self, Display, Formatter};

use anyhow::{anyhow, bail, Context};

use crate::bitboard;
use crate::Res;

/// Side to move. `+1`/`-1` encoding (see spec §9) is exposed via [`Side::sign`]
/// so that negating a side is a single arithmetic flip; `Not` gives the same
/// thing as a trait, which reads better at call sites than `-side.sign()`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Side {
    Black,
    White,
}

impl Side {
    pub fn sign(self) -> i32 {
        match self {
            Side::Black => 1,
            Side::White => -1,
        }
    }
}

impl std::ops::Not for Side {
    type Output = Side;
    fn not(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Black => "Black",
            Side::White => "White",
        })
    }
}

/// An Othello position: two bitboards plus the side to move. `Copy` because
/// it's 17 bytes and gets passed by value through the entire search, the
/// way the teacher's small `Board` implementations (e.g. `AtaxxBoard`) do.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Position {
    pub black: u64,
    pub white: u64,
    pub side: Side,
}

impl Position {
    pub fn new(black: u64, white: u64, side: Side) -> Res<Self> {
        if black & white != 0 {
            return Err(anyhow!(
                "overlapping black and white discs (black: {black:#018x}, white: {white:#018x})"
            ));
        }
        Ok(Self { black, white, side })
    }

    pub fn standard_start() -> Self {
        let white = (1u64 << 27) | (1u64 << 36);
        let black = (1u64 << 28) | (1u64 << 35);
        Self { black, white, side: Side::Black }
    }

    /// Legal destinations for the side actually to move, resolving a forced
    /// pass first (spec §4.1 `side-to-play`).
    pub fn legal_moves(&self) -> u64 {
        let active = self.active_side();
        let (player, opponent) = match active {
            Side::Black => (self.black, self.white),
            Side::White => (self.white, self.black),
        };
        bitboard::legal_moves(player, opponent)
    }

    pub fn is_game_over(&self) -> bool {
        bitboard::is_game_over(self.black, self.white)
    }

    /// The side actually to move once a forced pass is resolved.
    pub fn active_side(&self) -> Side {
        bitboard::side_to_play(self.black, self.white, self.side)
    }

    /// Plays `pos` for the side returned by [`Self::active_side`].
    pub fn make_move(&self, pos: u32) -> Position {
        let active = self.active_side();
        let (player, opponent) = match active {
            Side::Black => (self.black, self.white),
            Side::White => (self.white, self.black),
        };
        let (new_player, new_opponent) = bitboard::apply(player, opponent, pos);
        let (black, white) = match active {
            Side::Black => (new_player, new_opponent),
            Side::White => (new_opponent, new_player),
        };
        Position { black, white, side: !active }
    }

    pub fn material_winner(&self) -> bitboard::MaterialWinner {
        bitboard::material_winner(self.black, self.white)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let idx = rank * 8 + file;
                let c = if self.black & (1 << idx) != 0 {
                    'X'
                } else if self.white & (1 << idx) != 0 {
                    'O'
                } else {
                    '-'
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "{} to move", self.side)
    }
}

/// Parses one position file (spec §6): either
/// - a 64-character board line followed by a `B`/`W` side line, or
/// - a single line `<blackHex> <whiteHex> <+1|-1>`.
pub fn parse_position_file(contents: &str) -> Res<Position> {
    let mut lines = contents.lines().filter(|l| !l.trim().is_empty());
    let first = lines.next().context("position file is empty")?;
    let tokens: Vec<&str> = first.split_whitespace().collect();
    if tokens.len() == 3 {
        return parse_hex_form(&tokens);
    }
    let board_line = first.trim();
    let side_line = lines
        .next()
        .context("position file is missing the side-to-move line")?;
    parse_text_form(board_line, side_line)
}

fn parse_hex_form(tokens: &[&str]) -> Res<Position> {
    let black = parse_hex_u64(tokens[0]).context("invalid black bitboard")?;
    let white = parse_hex_u64(tokens[1]).context("invalid white bitboard")?;
    let side = match tokens[2] {
        "+1" => Side::Black,
        "-1" => Side::White,
        other => bail!("side must be '+1' or '-1', got '{other}'"),
    };
    Position::new(black, white, side)
}

fn parse_hex_u64(token: &str) -> Res<u64> {
    let token = token.trim_start_matches("0x").trim_start_matches("0X");
    u64::from_str_radix(token, 16).map_err(|_| anyhow!("couldn't parse '{token}' as hex u64"))
}

fn parse_text_form(board_line: &str, side_line: &str) -> Res<Position> {
    let chars: Vec<char> = board_line.chars().collect();
    if chars.len() != 64 {
        bail!(
            "board line must be exactly 64 characters, got {} ('{board_line}')",
            chars.len()
        );
    }
    let mut black = 0u64;
    let mut white = 0u64;
    for (idx, &c) in chars.iter().enumerate() {
        match c {
            'X' | 'x' | '*' => black |= 1 << idx,
            'O' | 'o' | '0' => white |= 1 << idx,
            '-' | '.' => {}
            other => bail!("unrecognized board character '{other}' at position {idx}"),
        }
    }
    let side = match side_line.trim().chars().next() {
        Some('B') | Some('b') => Side::Black,
        Some('W') | Some('w') => Side::White,
        _ => bail!("side line must start with 'B' or 'W', got '{side_line}'"),
    };
    Position::new(black, white, side)
}
