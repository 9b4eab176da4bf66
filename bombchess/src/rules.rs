//! Check, mate and material predicates over a board snapshot

use crate::bitboard_consts;
use crate::board::Board;
use crate::movegen;
use crate::piece::Piece;
use crate::types::{Color, Coord, PieceKind};

use std::fmt;

use arrayvec::ArrayVec;

/// Move from one square to another, as found by [`legal_moves()`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LegalMove {
    pub src: Coord,
    pub dst: Coord,
}

impl fmt::Display for LegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)
    }
}

/// List of legal moves
///
/// No chess position has more than 218 legal moves, so the list never overflows.
pub type MoveList = ArrayVec<LegalMove, 256>;

/// Piece removed from the board by a move, together with the square it stood on
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Captured {
    pub coord: Coord,
    pub piece: Piece,
}

/// Moves the piece from `src` to `dst` and marks it as moved
///
/// If the piece is a pawn moving diagonally into the en passant target `ep`, the pawn behind
/// the target is removed instead of the contents of `dst`. Returns the captured piece, if any.
///
/// The move is not validated in any way, so the caller must ensure that `dst` is among the
/// candidate destinations of the piece.
pub fn displace(b: &mut Board, src: Coord, dst: Coord, ep: Option<Coord>) -> Option<Captured> {
    let mut piece = b.take(src)?;
    let is_en_passant = piece.kind() == PieceKind::Pawn
        && Some(dst) == ep
        && src.file() != dst.file();
    let victim = if is_en_passant {
        movegen::en_passant_victim(src, dst)
    } else {
        dst
    };
    let captured = b.take(victim).map(|piece| Captured {
        coord: victim,
        piece,
    });
    piece.mark_moved();
    b.put(dst, Some(piece));
    captured
}

/// Returns `true` if the king of color `c` is attacked
///
/// If there is no such king on the board, returns `false`.
pub fn is_in_check(b: &Board, c: Color) -> bool {
    match b.king_pos(c) {
        Some(king) => movegen::is_cell_attacked(b, king, c.inv()),
        None => false,
    }
}

/// Returns `true` if moving from `src` to `dst` doesn't leave the own king in check
///
/// The move must be among the candidate destinations of the piece on `src`.
pub fn is_safe_move(b: &Board, src: Coord, dst: Coord, ep: Option<Coord>) -> bool {
    let color = match b.get(src) {
        Some(p) => p.color(),
        None => return false,
    };
    let mut scratch = *b;
    displace(&mut scratch, src, dst, ep);
    !is_in_check(&scratch, color)
}

fn for_each_legal<F: FnMut(LegalMove) -> bool>(b: &Board, c: Color, ep: Option<Coord>, mut f: F) {
    for (src, _) in b.pieces().filter(|(_, p)| p.color() == c) {
        for dst in movegen::destinations(b, src, ep) {
            if is_safe_move(b, src, dst, ep) && !f(LegalMove { src, dst }) {
                return;
            }
        }
    }
}

/// Returns all the legal moves of side `c`
///
/// Castling is not included, and a promotion counts as one move regardless of the piece chosen.
pub fn legal_moves(b: &Board, c: Color, ep: Option<Coord>) -> MoveList {
    let mut res = MoveList::new();
    for_each_legal(b, c, ep, |mv| {
        res.push(mv);
        true
    });
    res
}

/// Returns `true` if side `c` has at least one legal move
pub fn has_legal_moves(b: &Board, c: Color, ep: Option<Coord>) -> bool {
    let mut found = false;
    for_each_legal(b, c, ep, |_| {
        found = true;
        false
    });
    found
}

/// Returns `true` if side `c` is checkmated
///
/// A side without a king is never checkmated. Losing the king is a separate way to lose.
pub fn is_checkmate(b: &Board, c: Color, ep: Option<Coord>) -> bool {
    is_in_check(b, c) && !has_legal_moves(b, c, ep)
}

/// Returns `true` if side `c` is stalemated
///
/// As with [`is_checkmate()`], a side without a king is never stalemated.
pub fn is_stalemate(b: &Board, c: Color, ep: Option<Coord>) -> bool {
    b.king_pos(c).is_some() && !is_in_check(b, c) && !has_legal_moves(b, c, ep)
}

/// Returns `true` if neither side can ever win because of insufficient material
///
/// Both kings must be on the board. The draw is declared in the following cases:
///
/// - king vs king
/// - king + knight vs king
/// - kings and bishops of the same color
///
/// Note that king + knight vs king + knight is not considered a draw, as one of the sides can
/// intentionally corner itself, allowing its opponent to win.
pub fn is_insufficient_material(b: &Board) -> bool {
    let kings = b.piece2(Color::White, PieceKind::King) | b.piece2(Color::Black, PieceKind::King);
    if b.king_pos(Color::White).is_none() || b.king_pos(Color::Black).is_none() {
        return false;
    }
    let all_without_kings = b.occupied() ^ kings;

    // If we have pieces on both white and black squares, then no draw occurs
    if (all_without_kings & bitboard_consts::CELLS_WHITE).is_nonempty()
        && (all_without_kings & bitboard_consts::CELLS_BLACK).is_nonempty()
    {
        return false;
    }

    // Two kings only
    if all_without_kings.is_empty() {
        return true;
    }

    // King vs king + knight
    let knights =
        b.piece2(Color::White, PieceKind::Knight) | b.piece2(Color::Black, PieceKind::Knight);
    if all_without_kings == knights && knights.len() == 1 {
        return true;
    }

    // All the pieces are of the same cell color, so we just need to ensure they are bishops
    let bishops =
        b.piece2(Color::White, PieceKind::Bishop) | b.piece2(Color::Black, PieceKind::Bishop);
    all_without_kings == bishops
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::str::FromStr;

    fn coord(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    #[test]
    fn test_displace() {
        let mut b = Board::from_placement("4k3/8/8/3pP3/8/8/8/4K3").unwrap();
        let captured = displace(&mut b, coord("e5"), coord("d6"), Some(coord("d6"))).unwrap();
        assert_eq!(captured.coord, coord("d5"));
        assert!(captured.piece.is(Color::Black, PieceKind::Pawn));
        assert_eq!(b.as_placement(), "4k3/8/3P4/8/8/8/8/4K3");
        assert!(b.get(coord("d6")).unwrap().has_moved());

        let mut b = Board::initial();
        assert_eq!(displace(&mut b, coord("g1"), coord("f3"), None), None);
        assert_eq!(
            b.as_placement(),
            "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R"
        );
    }

    #[test]
    fn test_check() {
        let b = Board::from_placement("4k3/8/8/8/8/8/8/r3K3").unwrap();
        assert!(is_in_check(&b, Color::White));
        assert!(!is_in_check(&b, Color::Black));
        assert!(!is_checkmate(&b, Color::White, None));

        // No king, no check
        let b = Board::from_placement("4k3/8/8/8/8/8/8/r7").unwrap();
        assert!(!is_in_check(&b, Color::White));
        assert!(!is_checkmate(&b, Color::White, None));
        assert!(!is_stalemate(&b, Color::White, None));
    }

    #[test]
    fn test_mate() {
        // Fool's mate
        let b = Board::from_placement("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR").unwrap();
        assert!(is_in_check(&b, Color::White));
        assert!(is_checkmate(&b, Color::White, None));
        assert!(!is_stalemate(&b, Color::White, None));
        assert!(legal_moves(&b, Color::White, None).is_empty());
        assert!(has_legal_moves(&b, Color::Black, None));

        // Back rank mate
        let b = Board::from_placement("3R2k1/5ppp/8/8/8/8/8/6K1").unwrap();
        assert!(is_checkmate(&b, Color::Black, None));
    }

    #[test]
    fn test_stalemate() {
        let b = Board::from_placement("7k/5Q2/6K1/8/8/8/8/8").unwrap();
        assert!(!is_in_check(&b, Color::Black));
        assert!(is_stalemate(&b, Color::Black, None));
        assert!(!is_checkmate(&b, Color::Black, None));
        assert!(!is_stalemate(&b, Color::White, None));
    }

    #[test]
    fn test_en_passant_escape() {
        // Capturing en passant the pawn that gives check is only possible with the target set
        let b = Board::from_placement("8/8/8/2k5/3Pp3/8/8/4K2R").unwrap();
        let with_ep = legal_moves(&b, Color::Black, Some(coord("d3")));
        let without_ep = legal_moves(&b, Color::Black, None);
        assert!(with_ep.contains(&LegalMove {
            src: coord("e4"),
            dst: coord("d3")
        }));
        assert_eq!(with_ep.len(), without_ep.len() + 1);
    }

    #[test]
    fn test_legal_moves() {
        let b = Board::initial();
        assert_eq!(legal_moves(&b, Color::White, None).len(), 20);
        assert_eq!(legal_moves(&b, Color::Black, None).len(), 20);

        // Pinned knight cannot move
        let b = Board::from_placement("4r1k1/8/8/8/8/8/4N3/4K3").unwrap();
        let moves = legal_moves(&b, Color::White, None);
        assert_eq!(
            moves.iter().map(ToString::to_string).collect::<BTreeSet<_>>(),
            BTreeSet::from([
                "e1d1".to_string(),
                "e1f1".to_string(),
                "e1d2".to_string(),
                "e1f2".to_string(),
            ]),
        );
    }

    #[test]
    fn test_insufficient_material() {
        let cases = [
            ("4k3/8/8/8/8/8/8/4K3", true),
            ("4k3/8/8/8/8/8/8/4KN2", true),
            ("4k3/8/8/8/8/8/8/3NKN2", false),
            ("4k3/8/8/8/8/8/8/2B1KB2", false),
            ("4kb2/8/8/8/8/8/8/2B1K3", true),
            ("4k3/8/8/8/8/8/4P3/4K3", false),
            ("4k3/8/8/8/8/8/8/4K2R", false),
            ("8/8/8/8/8/8/8/4K3", false),
        ];
        for (placement, expected) in cases {
            let b = Board::from_placement(placement).unwrap();
            assert_eq!(is_insufficient_material(&b), expected, "{}", placement);
        }
    }
}
