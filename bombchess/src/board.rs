//! Board and related things

use crate::bitboard::Bitboard;
use crate::ledger::PositionKey;
use crate::piece::Piece;
use crate::types::{Color, Coord, File, PieceKind, Rank};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing a piece placement (i.e. the first part of FEN)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlacementParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Chess board
///
/// Maps each of the 64 squares to the piece standing there, if any. The board owns its
/// pieces: a piece removed from the board (captured or exploded) is gone.
///
/// The board is a plain value. Cloning it gives an independent snapshot, which is how the
/// engine tries out moves without touching the position it was given.
///
/// Unlike a FEN string, the board doesn't hold the side to move, the en passant square or the
/// move counters. This state belongs to the [`Engine`](crate::engine::Engine) playing the
/// game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    cells: [Option<Piece>; 64],
}

impl Board {
    /// Returns a board without pieces
    #[inline]
    pub const fn empty() -> Board {
        Board { cells: [None; 64] }
    }

    /// Returns a board with the initial position
    ///
    /// Rooks, knights and bishops are tagged `1` on the queen side and `2` on the king side,
    /// pawns are tagged with their file number.
    pub fn initial() -> Board {
        let mut res = Board::empty();
        for (color, rank) in [(Color::White, Rank::R1), (Color::Black, Rank::R8)] {
            let layout = [
                (File::A, PieceKind::Rook, Some(1)),
                (File::B, PieceKind::Knight, Some(1)),
                (File::C, PieceKind::Bishop, Some(1)),
                (File::D, PieceKind::Queen, None),
                (File::E, PieceKind::King, None),
                (File::F, PieceKind::Bishop, Some(2)),
                (File::G, PieceKind::Knight, Some(2)),
                (File::H, PieceKind::Rook, Some(2)),
            ];
            for (file, kind, tag) in layout {
                res.put2(file, rank, Some(Piece::new(kind, color, tag)));
            }
        }
        for file in File::iter() {
            let tag = Some(file.index() as u8 + 1);
            res.put2(file, Rank::R2, Some(Piece::new(PieceKind::Pawn, Color::White, tag)));
            res.put2(file, Rank::R7, Some(Piece::new(PieceKind::Pawn, Color::Black, tag)));
        }
        res
    }

    /// Parses a board from the piece placement part of FEN
    ///
    /// Does the same as [`Board::from_str`]. All the pieces are unmoved. Tags are given in
    /// the order of squares from `a1` to `h8` (rank by rank), counting separately for each
    /// color and kind, and queens and kings stay untagged. So, the placement of the initial
    /// position yields exactly [`Board::initial()`].
    ///
    /// # Example
    ///
    /// ```
    /// # use bombchess::{Board, Coord, File, Rank, Color, PieceKind};
    /// #
    /// let board = Board::from_placement("4k3/8/8/8/8/8/8/R3K2R").unwrap();
    /// let rook = board.get2(File::H, Rank::R1).unwrap();
    /// assert!(rook.is(Color::White, PieceKind::Rook));
    /// assert_eq!(rook.id().to_string(), "white_rook_2");
    /// assert_eq!(board.as_placement(), "4k3/8/8/8/8/8/8/R3K2R");
    /// ```
    pub fn from_placement(s: &str) -> Result<Board, PlacementParseError> {
        Board::from_str(s)
    }

    /// Returns all the squares of the board, indexed by [`Coord::index()`]
    #[inline]
    pub fn cells(&self) -> &[Option<Piece>; 64] {
        &self.cells
    }

    /// Returns the piece on the square with coordinate `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Option<Piece> {
        self.cells[c.index()]
    }

    /// Returns the piece on the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Option<Piece> {
        self.get(Coord::from_parts(file, rank))
    }

    #[inline]
    pub fn get_mut(&mut self, c: Coord) -> Option<&mut Piece> {
        self.cells[c.index()].as_mut()
    }

    /// Puts `piece` to the square with coordinate `c`, replacing its previous contents
    #[inline]
    pub fn put(&mut self, c: Coord, piece: Option<Piece>) {
        self.cells[c.index()] = piece;
    }

    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, piece: Option<Piece>) {
        self.put(Coord::from_parts(file, rank), piece);
    }

    /// Removes the piece from the square with coordinate `c` and returns it
    #[inline]
    pub fn take(&mut self, c: Coord) -> Option<Piece> {
        self.cells[c.index()].take()
    }

    /// Iterates over all the pieces on the board together with their squares
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::iter().filter_map(move |c| self.get(c).map(|p| (c, p)))
    }

    /// Returns the bitboard over all the occupied squares
    pub fn occupied(&self) -> Bitboard {
        self.pieces().map(|(c, _)| c).collect()
    }

    /// Returns the bitboard over all the pieces of color `color`
    pub fn color(&self, color: Color) -> Bitboard {
        self.pieces()
            .filter(|(_, p)| p.color() == color)
            .map(|(c, _)| c)
            .collect()
    }

    /// Returns the bitboard over all the pieces of color `color` and kind `kind`
    pub fn piece2(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces()
            .filter(|(_, p)| p.is(color, kind))
            .map(|(c, _)| c)
            .collect()
    }

    /// Returns the position of the king of color `c`
    ///
    /// Kings can explode in this variant, so the result may be `None`.
    #[inline]
    pub fn king_pos(&self, c: Color) -> Option<Coord> {
        self.pieces()
            .find(|(_, p)| p.is(c, PieceKind::King))
            .map(|(coord, _)| coord)
    }

    /// Returns the key of the position used to detect repetitions
    ///
    /// See [`PositionKey`] for the details.
    pub fn position_key(&self) -> PositionKey {
        PositionKey::new(self)
    }

    /// Wraps the board to allow pretty-printing with the given style `Style`
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`.
    ///
    /// # Example
    ///
    /// ```
    /// # use bombchess::{Board, board::PrettyStyle};
    /// #
    /// let b = Board::initial();
    ///
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    ///  |abcdefgh
    /// "#;
    /// assert_eq!(b.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }

    /// Converts the board into the piece placement part of FEN
    ///
    /// Does the same as `Board::to_string()`.
    #[inline]
    pub fn as_placement(&self) -> String {
        self.to_string()
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::empty()
    }
}

impl FromStr for Board {
    type Err = PlacementParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        type Error = PlacementParseError;

        let mut file = 0_usize;
        let mut rank = 0_usize;
        let mut pos = 0_usize;
        let mut cells: [Option<(PieceKind, Color)>; 64] = [None; 64];
        for b in s.bytes() {
            match b {
                b'1'..=b'8' => {
                    let add = (b - b'0') as usize;
                    if file + add > 8 {
                        return Err(Error::RankOverflow(Rank::from_index(rank)));
                    }
                    file += add;
                    pos += add;
                }
                b'/' => {
                    if file < 8 {
                        return Err(Error::RankUnderflow(Rank::from_index(rank)));
                    }
                    rank += 1;
                    file = 0;
                    if rank >= 8 {
                        return Err(Error::Overflow);
                    }
                }
                _ => {
                    if file >= 8 {
                        return Err(Error::RankOverflow(Rank::from_index(rank)));
                    }
                    cells[pos] =
                        Some(PieceKind::from_char(b as char).ok_or(Error::UnexpectedChar(b as char))?);
                    file += 1;
                    pos += 1;
                }
            };
        }

        if file < 8 {
            return Err(Error::RankUnderflow(Rank::from_index(rank)));
        }
        if rank < 7 {
            return Err(Error::Underflow);
        }

        let mut res = Board::empty();
        let mut counters = [[0_u8; PieceKind::COUNT]; 2];
        for rank in (0..8).rev().map(Rank::from_index) {
            for file in File::iter() {
                let c = Coord::from_parts(file, rank);
                if let Some((kind, color)) = cells[c.index()] {
                    let tag = match kind {
                        PieceKind::King | PieceKind::Queen => None,
                        _ => {
                            let counter = &mut counters[color as usize][kind.index()];
                            *counter += 1;
                            Some(*counter)
                        }
                    };
                    res.put(c, Some(Piece::new(kind, color, tag)));
                }
            }
        }
        Ok(res)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            if rank.index() != 0 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for file in File::iter() {
                let piece = match self.get2(file, rank) {
                    Some(p) => p,
                    None => {
                        empty += 1;
                        continue;
                    }
                };
                if empty != 0 {
                    write!(f, "{}", (b'0' + empty) as char)?;
                    empty = 0;
                }
                write!(f, "{}", piece)?;
            }
            if empty != 0 {
                write!(f, "{}", (b'0' + empty) as char)?;
            }
        }
        Ok(())
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;

    fn cell(p: Option<Piece>) -> char;

    fn fmt(b: &Board, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            write!(f, "{}{}", rank, Self::VERT_FRAME)?;
            for file in File::iter() {
                write!(f, "{}", Self::cell(b.get2(file, rank)))?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in File::iter() {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, " {}", Self::VERT_FRAME)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';

    fn cell(p: Option<Piece>) -> char {
        p.map_or('.', |p| p.as_char())
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const ANGLE_FRAME: char = '┼';

    fn cell(p: Option<Piece>) -> char {
        p.map_or('.', |p| p.kind().as_utf8_char(p.color()))
    }
}

impl<'a> fmt::Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.board, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.board, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INI_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    #[test]
    fn test_initial() {
        assert_eq!(Board::initial().to_string(), INI_PLACEMENT);
        assert_eq!(Board::from_placement(INI_PLACEMENT), Ok(Board::initial()));
        assert_eq!(Board::initial().pieces().count(), 32);
        assert_eq!(Board::initial().occupied().len(), 32);
        assert_eq!(Board::initial().color(Color::Black).len(), 16);
    }

    #[test]
    fn test_tags() {
        let b = Board::initial();
        let tag = |file, rank| b.get2(file, rank).unwrap().id().tag;
        assert_eq!(tag(File::A, Rank::R1), Some(1));
        assert_eq!(tag(File::H, Rank::R8), Some(2));
        assert_eq!(tag(File::G, Rank::R1), Some(2));
        assert_eq!(tag(File::C, Rank::R8), Some(1));
        assert_eq!(tag(File::D, Rank::R1), None);
        assert_eq!(tag(File::E, Rank::R8), None);
        assert_eq!(tag(File::E, Rank::R2), Some(5));
        assert_eq!(tag(File::H, Rank::R7), Some(8));
    }

    #[test]
    fn test_midgame() {
        const PLACEMENT: &str = "1rq1r1k1/1p3ppp/pB3n2/3ppP2/Pbb1P3/1PN2B2/2P2QPP/R1R4K";

        let board = Board::from_placement(PLACEMENT).unwrap();
        assert_eq!(board.as_placement(), PLACEMENT);
        assert!(board
            .get2(File::B, Rank::R4)
            .unwrap()
            .is(Color::Black, PieceKind::Bishop));
        assert!(board
            .get2(File::F, Rank::R2)
            .unwrap()
            .is(Color::White, PieceKind::Queen));
        assert_eq!(
            board.king_pos(Color::White),
            Some(Coord::from_parts(File::H, Rank::R1))
        );
        assert_eq!(
            board.king_pos(Color::Black),
            Some(Coord::from_parts(File::G, Rank::R8))
        );
        assert_eq!(board.piece2(Color::White, PieceKind::Rook).len(), 2);
        assert!(board.pieces().all(|(_, p)| !p.has_moved()));
    }

    #[test]
    fn test_no_king() {
        let board = Board::from_placement("8/8/8/8/8/8/8/4K3").unwrap();
        assert_eq!(board.king_pos(Color::Black), None);
    }

    #[test]
    fn test_take() {
        let mut board = Board::initial();
        let e2 = Coord::from_parts(File::E, Rank::R2);
        let pawn = board.take(e2).unwrap();
        assert!(pawn.is(Color::White, PieceKind::Pawn));
        assert_eq!(board.get(e2), None);
        assert_eq!(board.take(e2), None);
        assert_eq!(board.as_placement(), "rnbqkbnr/pppppppp/8/8/8/8/PPPP1PPP/RNBQKBNR");
    }

    #[test]
    fn test_bad_placement() {
        assert_eq!(
            Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP"),
            Err(PlacementParseError::Underflow)
        );
        assert_eq!(
            Board::from_placement("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(PlacementParseError::UnexpectedChar('9'))
        );
        assert_eq!(
            Board::from_placement("rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(PlacementParseError::RankOverflow(Rank::R7))
        );
        assert_eq!(
            Board::from_placement("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(PlacementParseError::RankUnderflow(Rank::R7))
        );
        assert_eq!(
            Board::from_placement("8/8/8/8/8/8/8/8/8"),
            Err(PlacementParseError::Overflow)
        );
        assert_eq!(
            Board::from_placement("8/8/8/8/8/8/8/3X4"),
            Err(PlacementParseError::UnexpectedChar('X'))
        );
    }

    #[test]
    fn test_pretty_utf8() {
        let res = r#"
8│♜♞♝♛♚♝♞♜
7│♟♟♟♟♟♟♟♟
6│........
5│........
4│........
3│........
2│♙♙♙♙♙♙♙♙
1│♖♘♗♕♔♗♘♖
─┼────────
 │abcdefgh
"#;
        assert_eq!(
            Board::initial().pretty(PrettyStyle::Utf8).to_string().trim(),
            res.trim()
        );
    }
}
