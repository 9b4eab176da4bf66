//! Castling legality and relocation

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::geometry;
use crate::rules;
use crate::types::{CastlingSide, Color, Coord, File, PieceKind};

use thiserror::Error;

/// Reason why castling is not allowed
#[derive(Debug, Copy, Clone, Error, PartialEq, Eq, Hash)]
pub enum CastlingError {
    #[error("Invalid castling: the king has already moved")]
    KingMoved,
    #[error("Invalid castling: the rook has already moved")]
    RookMoved,
    #[error("Invalid castling: there are pieces between the king and rook")]
    Blocked,
    #[error("Invalid castling: the king is in check")]
    InCheck,
    #[error("Invalid castling: the king would pass through an attacked square")]
    ThroughAttack,
}

#[inline]
const fn home_rank_mask(c: Color, x: u64) -> Bitboard {
    Bitboard::from_raw(match c {
        Color::White => x << 56,
        Color::Black => x,
    })
}

/// Squares strictly between the king and the rook, which must be empty
#[inline]
pub const fn pass(c: Color, s: CastlingSide) -> Bitboard {
    home_rank_mask(
        c,
        match s {
            CastlingSide::King => 0x60,
            CastlingSide::Queen => 0x0e,
        },
    )
}

/// Squares the king steps on while castling, which must not be attacked
///
/// Listed in the order the king visits them.
pub fn transit(c: Color, s: CastlingSide) -> [Coord; 2] {
    let rank = geometry::castling_rank(c);
    match s {
        CastlingSide::King => [
            Coord::from_parts(File::F, rank),
            Coord::from_parts(File::G, rank),
        ],
        CastlingSide::Queen => [
            Coord::from_parts(File::D, rank),
            Coord::from_parts(File::C, rank),
        ],
    }
}

/// Home square of the king of color `c`
#[inline]
pub const fn king_src(c: Color) -> Coord {
    Coord::from_parts(File::E, geometry::castling_rank(c))
}

#[inline]
pub const fn king_dst(c: Color, s: CastlingSide) -> Coord {
    Coord::from_parts(geometry::castling_king_dst(s), geometry::castling_rank(c))
}

#[inline]
pub const fn rook_src(c: Color, s: CastlingSide) -> Coord {
    Coord::from_parts(geometry::castling_rook_src(s), geometry::castling_rank(c))
}

#[inline]
pub const fn rook_dst(c: Color, s: CastlingSide) -> Coord {
    Coord::from_parts(geometry::castling_rook_dst(s), geometry::castling_rank(c))
}

/// Returns the castling side if moving the piece from `src` to `dst` looks like castling
/// for side `c`
///
/// This only happens for an unmoved king of color `c` standing on its home square and moving
/// two files towards one of the rooks. Whether the castling is legal is checked separately
/// by [`validate()`].
pub fn detect(b: &Board, c: Color, src: Coord, dst: Coord) -> Option<CastlingSide> {
    let king = b.get(src)?;
    if !king.is(c, PieceKind::King) || king.has_moved() || src != king_src(c) {
        return None;
    }
    [CastlingSide::King, CastlingSide::Queen]
        .into_iter()
        .find(|&s| dst == king_dst(c, s))
}

/// Checks whether side `c` may castle to side `s` on board `b`
///
/// The conditions are verified in order, and the first failed one is reported.
pub fn validate(b: &Board, c: Color, s: CastlingSide) -> Result<(), CastlingError> {
    let king_pos = king_src(c);
    match b.get(king_pos) {
        Some(p) if p.is(c, PieceKind::King) && !p.has_moved() => {}
        _ => return Err(CastlingError::KingMoved),
    }
    match b.get(rook_src(c, s)) {
        Some(p) if p.is(c, PieceKind::Rook) && !p.has_moved() => {}
        _ => return Err(CastlingError::RookMoved),
    }
    if (b.occupied() & pass(c, s)).is_nonempty() {
        return Err(CastlingError::Blocked);
    }
    if rules::is_in_check(b, c) {
        return Err(CastlingError::InCheck);
    }
    for step in transit(c, s) {
        let mut scratch = *b;
        let king = scratch.take(king_pos);
        scratch.put(step, king);
        if rules::is_in_check(&scratch, c) {
            return Err(CastlingError::ThroughAttack);
        }
    }
    Ok(())
}

/// Relocates the king and the rook to their castled squares and marks both as moved
///
/// The castling must be validated beforehand with [`validate()`].
pub fn apply(b: &mut Board, c: Color, s: CastlingSide) {
    for (src, dst) in [
        (king_src(c), king_dst(c, s)),
        (rook_src(c, s), rook_dst(c, s)),
    ] {
        let mut piece = b.take(src);
        if let Some(p) = piece.as_mut() {
            p.mark_moved();
        }
        b.put(dst, piece);
    }
}
