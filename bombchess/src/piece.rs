//! Pieces placed on the board

use crate::types::{Color, PieceKind};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Error parsing [`PromotePiece`]
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PromotePieceParseError {
    /// The string names no piece a pawn may turn into
    #[error("invalid promotion piece type {0:?}")]
    Unknown(String),
}

/// Target piece for promotion
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum PromotePiece {
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
}

impl From<PromotePiece> for PieceKind {
    #[inline]
    fn from(p: PromotePiece) -> Self {
        match p {
            PromotePiece::Knight => PieceKind::Knight,
            PromotePiece::Bishop => PieceKind::Bishop,
            PromotePiece::Rook => PieceKind::Rook,
            PromotePiece::Queen => PieceKind::Queen,
        }
    }
}

impl TryFrom<PieceKind> for PromotePiece {
    type Error = ();

    #[inline]
    fn try_from(p: PieceKind) -> Result<Self, Self::Error> {
        match p {
            PieceKind::Knight => Ok(PromotePiece::Knight),
            PieceKind::Bishop => Ok(PromotePiece::Bishop),
            PieceKind::Rook => Ok(PromotePiece::Rook),
            PieceKind::Queen => Ok(PromotePiece::Queen),
            PieceKind::Pawn | PieceKind::King => Err(()),
        }
    }
}

impl fmt::Display for PromotePiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", PieceKind::from(*self))
    }
}

impl FromStr for PromotePiece {
    type Err = PromotePieceParseError;

    /// Accepts either the piece name (`"queen"`) or its letter (`"q"`), in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "n" | "knight" => Ok(PromotePiece::Knight),
            "b" | "bishop" => Ok(PromotePiece::Bishop),
            "r" | "rook" => Ok(PromotePiece::Rook),
            "q" | "queen" => Ok(PromotePiece::Queen),
            _ => Err(PromotePieceParseError::Unknown(s.to_string())),
        }
    }
}

/// Stable identity of a piece, used when reporting captures and explosions
///
/// The tag tells apart pieces of the same kind and color: `1` and `2` for the rooks, knights
/// and bishops of the initial position, the file number for pawns, and nothing for queens,
/// kings and promoted pieces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PieceId {
    pub color: Color,
    pub kind: PieceKind,
    pub tag: Option<u8>,
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}_{}", self.color, self.kind)?;
        if let Some(tag) = self.tag {
            write!(f, "_{}", tag)?;
        }
        Ok(())
    }
}

/// Chess piece
///
/// The square is not stored here, as the board owns the piece and knows where it stands.
/// The only mutable part is the movement flag, which is set by committed moves and castling.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    tag: Option<u8>,
    moved: bool,
}

impl Piece {
    /// Creates an unmoved piece
    pub const fn new(kind: PieceKind, color: Color, tag: Option<u8>) -> Piece {
        Piece {
            kind,
            color,
            tag,
            moved: false,
        }
    }

    /// Creates the piece a pawn of color `color` turns into
    ///
    /// The new piece is untagged and counts as moved, so a promoted rook can never castle.
    pub const fn promoted(p: PromotePiece, color: Color) -> Piece {
        let kind = match p {
            PromotePiece::Knight => PieceKind::Knight,
            PromotePiece::Bishop => PieceKind::Bishop,
            PromotePiece::Rook => PieceKind::Rook,
            PromotePiece::Queen => PieceKind::Queen,
        };
        Piece {
            kind,
            color,
            tag: None,
            moved: true,
        }
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub const fn has_moved(&self) -> bool {
        self.moved
    }

    #[inline]
    pub const fn is(&self, color: Color, kind: PieceKind) -> bool {
        self.color as u8 == color as u8 && self.kind as u8 == kind as u8
    }

    pub fn mark_moved(&mut self) {
        self.moved = true;
    }

    pub const fn id(&self) -> PieceId {
        PieceId {
            color: self.color,
            kind: self.kind,
            tag: self.tag,
        }
    }

    /// Returns the token of the piece in position keys and board diagrams
    #[inline]
    pub fn as_char(&self) -> char {
        self.kind.as_char(self.color)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}
