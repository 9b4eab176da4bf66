//! Candidate destinations for pieces and attack detection

use crate::attack;
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::geometry;
use crate::types::{Color, Coord, PieceKind};

fn diag_pieces(b: &Board, c: Color) -> Bitboard {
    b.piece2(c, PieceKind::Bishop) | b.piece2(c, PieceKind::Queen)
}

fn line_pieces(b: &Board, c: Color) -> Bitboard {
    b.piece2(c, PieceKind::Rook) | b.piece2(c, PieceKind::Queen)
}

/// Returns `true` if the square `coord` is attacked by any piece of color `color`
///
/// The square itself may be empty or occupied by a piece of any color.
pub fn is_cell_attacked(b: &Board, coord: Coord, color: Color) -> bool {
    // We use the pawn attack map of the opposite color, as we trace the attack back from the
    // target square to the pawn
    let pawn_attacks = attack::pawn(color.inv(), coord);

    // Near attacks
    if (b.piece2(color, PieceKind::Pawn) & pawn_attacks).is_nonempty()
        || (b.piece2(color, PieceKind::King) & attack::king(coord)).is_nonempty()
        || (b.piece2(color, PieceKind::Knight) & attack::knight(coord)).is_nonempty()
    {
        return true;
    }

    // Far attacks
    let all = b.occupied();
    (attack::bishop(coord, all) & diag_pieces(b, color)).is_nonempty()
        || (attack::rook(coord, all) & line_pieces(b, color)).is_nonempty()
}

/// Returns the square of the pawn captured when moving a pawn from `src` to the en passant
/// target `ep`
///
/// The captured pawn stands on the file of the target and on the rank the capturing pawn
/// starts from.
#[inline]
pub fn en_passant_victim(src: Coord, ep: Coord) -> Coord {
    Coord::from_parts(ep.file(), src.rank())
}

fn pawn_destinations(b: &Board, src: Coord, color: Color, ep: Option<Coord>) -> Bitboard {
    let mut res = Bitboard::EMPTY;
    let delta = geometry::pawn_forward_delta(color);

    if let Some(single) = src.try_shift(0, delta) {
        if b.get(single).is_none() {
            res.set(single);
            if src.rank() == geometry::pawn_start_rank(color) {
                if let Some(double) = single.try_shift(0, delta) {
                    if b.get(double).is_none() {
                        res.set(double);
                    }
                }
            }
        }
    }

    let attacks = attack::pawn(color, src);
    res |= attacks & b.color(color.inv());

    if let Some(ep) = ep {
        let victim = en_passant_victim(src, ep);
        if attacks.has(ep)
            && b.get(ep).is_none()
            && b.get(victim)
                .map_or(false, |p| p.is(color.inv(), PieceKind::Pawn))
        {
            res.set(ep);
        }
    }

    res
}

/// Returns the set of candidate destinations for the piece standing on `src`
///
/// The candidates obey the movement rules of the piece, but they are not checked against
/// leaving the own king in check. For pawns, `ep` is the current en passant target, if any.
/// Kings never list castling, as it's processed separately.
///
/// Returns an empty set if `src` is empty.
pub fn destinations(b: &Board, src: Coord, ep: Option<Coord>) -> Bitboard {
    let piece = match b.get(src) {
        Some(p) => p,
        None => return Bitboard::EMPTY,
    };
    let color = piece.color();
    let not_own = !b.color(color);
    match piece.kind() {
        PieceKind::Pawn => pawn_destinations(b, src, color, ep),
        PieceKind::King => attack::king(src) & not_own,
        PieceKind::Knight => attack::knight(src) & not_own,
        PieceKind::Bishop => attack::bishop(src, b.occupied()) & not_own,
        PieceKind::Rook => attack::rook(src, b.occupied()) & not_own,
        PieceKind::Queen => {
            let all = b.occupied();
            (attack::bishop(src, all) | attack::rook(src, all)) & not_own
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};
    use std::str::FromStr;

    fn coord(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    fn set(squares: &[&str]) -> Bitboard {
        squares.iter().map(|s| coord(s)).collect()
    }

    #[test]
    fn test_cell_attacked() {
        let b = Board::from_placement("3R3B/8/3R4/1NP1Q3/3p4/1NP5/5B2/3R1K1k").unwrap();
        assert!(is_cell_attacked(
            &b,
            Coord::from_parts(File::D, Rank::R4),
            Color::White
        ));
        assert!(!is_cell_attacked(
            &b,
            Coord::from_parts(File::D, Rank::R4),
            Color::Black
        ));
        assert!(is_cell_attacked(&b, coord("c3"), Color::Black));
        assert!(is_cell_attacked(&b, coord("g2"), Color::Black));
        assert!(!is_cell_attacked(&b, coord("a8"), Color::Black));
        assert!(!is_cell_attacked(&b, coord("a4"), Color::White));
    }

    #[test]
    fn test_initial() {
        let b = Board::initial();
        assert_eq!(destinations(&b, coord("b1"), None), set(&["a3", "c3"]));
        assert_eq!(destinations(&b, coord("g8"), None), set(&["f6", "h6"]));
        assert_eq!(destinations(&b, coord("e2"), None), set(&["e3", "e4"]));
        assert_eq!(destinations(&b, coord("d7"), None), set(&["d6", "d5"]));
        assert_eq!(destinations(&b, coord("a1"), None), Bitboard::EMPTY);
        assert_eq!(destinations(&b, coord("e1"), None), Bitboard::EMPTY);
        assert_eq!(destinations(&b, coord("d1"), None), Bitboard::EMPTY);
        assert_eq!(destinations(&b, coord("e4"), None), Bitboard::EMPTY);
    }

    #[test]
    fn test_pawn_blocked() {
        let b = Board::from_placement("4k3/8/8/8/3p4/4n3/3PP3/4K3").unwrap();
        assert_eq!(destinations(&b, coord("d2"), None), set(&["d3", "e3"]));
        assert_eq!(destinations(&b, coord("d4"), None), set(&["d3"]));
        assert_eq!(destinations(&b, coord("e2"), None), Bitboard::EMPTY);

        // Double step is only possible from the start rank
        let b = Board::from_placement("4k3/8/8/8/8/4P3/8/4K3").unwrap();
        assert_eq!(destinations(&b, coord("e3"), None), set(&["e4"]));
    }

    #[test]
    fn test_en_passant() {
        let b = Board::from_placement("4k3/8/8/3pP3/8/8/8/4K3").unwrap();
        assert_eq!(destinations(&b, coord("e5"), None), set(&["e6"]));
        assert_eq!(
            destinations(&b, coord("e5"), Some(coord("d6"))),
            set(&["e6", "d6"])
        );
        assert_eq!(en_passant_victim(coord("e5"), coord("d6")), coord("d5"));

        // No enemy pawn to capture
        let b = Board::from_placement("4k3/8/8/4P3/8/8/8/4K3").unwrap();
        assert_eq!(
            destinations(&b, coord("e5"), Some(coord("d6"))),
            set(&["e6"])
        );

        // The target is too far away
        let b = Board::from_placement("4k3/8/8/p3P3/8/8/8/4K3").unwrap();
        assert_eq!(
            destinations(&b, coord("e5"), Some(coord("a6"))),
            set(&["e6"])
        );
    }

    #[test]
    fn test_sliders() {
        let b = Board::from_placement("4k3/8/8/1p6/8/3Q1P2/8/4K3").unwrap();
        let dsts = destinations(&b, coord("d3"), None);
        assert!(dsts.has(coord("b5")));
        assert!(!dsts.has(coord("a6")));
        assert!(!dsts.has(coord("f3")));
        assert!(dsts.has(coord("e3")));
        assert!(dsts.has(coord("d8")));
        assert!(dsts.has(coord("h7")));
        assert!(!dsts.has(coord("e1")));
        assert!(dsts.has(coord("d1")));
        assert_eq!(dsts.len(), 21);
    }

    #[test]
    fn test_king_and_knight() {
        let b = Board::from_placement("8/8/8/8/8/8/1n6/K7").unwrap();
        assert_eq!(
            destinations(&b, coord("a1"), None),
            set(&["a2", "b1", "b2"])
        );
        assert_eq!(
            destinations(&b, coord("b2"), None),
            set(&["a4", "c4", "d3", "d1"])
        );
    }
}
