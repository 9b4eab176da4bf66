//! Explosion caused by captures
//!
//! When a piece is captured, every piece standing next to the capture square is removed from
//! the board, regardless of its color. Pawns are immune to explosions. The capturing piece
//! itself stays on the board.

use crate::attack;
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::piece::PieceId;
use crate::types::{Coord, PieceKind};

use arrayvec::ArrayVec;
use log::debug;

/// Pieces removed by an explosion, together with the squares they stood on
///
/// A square has at most eight neighbours, so the list never overflows.
pub type Debris = ArrayVec<(Coord, PieceId), 8>;

/// Returns the squares affected by an explosion at `center`
///
/// These are the orthogonal and diagonal neighbours of `center` which lie on the board, i.e.
/// exactly the squares a king standing on `center` could step to.
#[inline]
pub fn blast_zone(center: Coord) -> Bitboard {
    attack::king(center)
}

/// Removes all the non-pawn pieces around `center` and returns them
pub fn detonate(b: &mut Board, center: Coord) -> Debris {
    let mut debris = Debris::new();
    for c in blast_zone(center) {
        let immune = match b.get(c) {
            Some(p) => p.kind() == PieceKind::Pawn,
            None => continue,
        };
        if immune {
            continue;
        }
        if let Some(p) = b.take(c) {
            debug!("explosion at {} removes {} from {}", center, p.id(), c);
            debris.push((c, p.id()));
        }
    }
    debris
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;
    use std::str::FromStr;

    fn coord(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    #[test]
    fn test_blast_zone() {
        assert_eq!(blast_zone(coord("e4")).len(), 8);
        assert_eq!(blast_zone(coord("h4")).len(), 5);
        assert_eq!(
            blast_zone(coord("a1")),
            Bitboard::EMPTY
                .with(coord("a2"))
                .with(coord("b2"))
                .with(coord("b1"))
        );
        for c in Coord::iter() {
            assert!(!blast_zone(c).has(c));
        }
    }

    #[test]
    fn test_detonate() {
        let mut b = Board::from_placement("8/8/3qpn2/3kQ3/3PbR2/8/8/4K3").unwrap();
        let debris = detonate(&mut b, coord("e5"));
        // The queen in the center survives, as well as both pawns
        assert_eq!(b.as_placement(), "8/8/4p3/4Q3/3P4/8/8/4K3");
        let removed: Vec<String> = debris
            .iter()
            .map(|(c, id)| format!("{}:{}", c, id))
            .collect();
        assert_eq!(
            removed,
            vec![
                "d6:black_queen",
                "f6:black_knight_1",
                "d5:black_king",
                "e4:black_bishop_1",
                "f4:white_rook_1",
            ]
        );
        assert!(debris
            .iter()
            .any(|&(_, id)| id.kind == PieceKind::King && id.color == Color::Black));
    }

    #[test]
    fn test_detonate_corner() {
        let mut b = Board::from_placement("kr6/pp6/8/8/8/8/8/7K").unwrap();
        let debris = detonate(&mut b, coord("a8"));
        assert_eq!(debris.len(), 1);
        assert_eq!(b.as_placement(), "k7/pp6/8/8/8/8/8/7K");
    }
}
