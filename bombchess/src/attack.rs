use crate::bitboard::Bitboard;
use crate::types::{Color, Coord};

#[inline]
const fn bb(val: u64) -> Bitboard {
    Bitboard::from_raw(val)
}

include!(concat!(env!("OUT_DIR"), "/steps.rs"));

const DIAG_RAYS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const LINE_RAYS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

#[inline]
pub fn king(coord: Coord) -> Bitboard {
    KING_STEPS[coord.index()]
}

#[inline]
pub fn knight(coord: Coord) -> Bitboard {
    KNIGHT_STEPS[coord.index()]
}

/// Squares attacked by a pawn of color `color` standing on `coord`
#[inline]
pub fn pawn(color: Color, coord: Coord) -> Bitboard {
    match color {
        Color::White => WHITE_PAWN_CAPTURES[coord.index()],
        Color::Black => BLACK_PAWN_CAPTURES[coord.index()],
    }
}

fn rays(coord: Coord, occupied: Bitboard, dirs: &[(isize, isize)]) -> Bitboard {
    let mut res = Bitboard::EMPTY;
    for &(delta_file, delta_rank) in dirs {
        let mut p = coord;
        while let Some(np) = p.try_shift(delta_file, delta_rank) {
            res.set(np);
            if occupied.has(np) {
                break;
            }
            p = np;
        }
    }
    res
}

/// Squares reachable by a bishop on `coord`, including the first blocker on each ray
pub fn bishop(coord: Coord, occupied: Bitboard) -> Bitboard {
    rays(coord, occupied, &DIAG_RAYS)
}

/// Squares reachable by a rook on `coord`, including the first blocker on each ray
pub fn rook(coord: Coord, occupied: Bitboard) -> Bitboard {
    rays(coord, occupied, &LINE_RAYS)
}
