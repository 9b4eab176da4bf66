use crate::bitboard::Bitboard;
use crate::types::{File, Rank};

const RANK: [Bitboard; 8] = [
    Bitboard::from_raw(0x00000000000000ff),
    Bitboard::from_raw(0x000000000000ff00),
    Bitboard::from_raw(0x0000000000ff0000),
    Bitboard::from_raw(0x00000000ff000000),
    Bitboard::from_raw(0x000000ff00000000),
    Bitboard::from_raw(0x0000ff0000000000),
    Bitboard::from_raw(0x00ff000000000000),
    Bitboard::from_raw(0xff00000000000000),
];

pub const fn rank(r: Rank) -> Bitboard {
    RANK[r.index()]
}

const FILE: [Bitboard; 8] = [
    Bitboard::from_raw(0x0101010101010101),
    Bitboard::from_raw(0x0202020202020202),
    Bitboard::from_raw(0x0404040404040404),
    Bitboard::from_raw(0x0808080808080808),
    Bitboard::from_raw(0x1010101010101010),
    Bitboard::from_raw(0x2020202020202020),
    Bitboard::from_raw(0x4040404040404040),
    Bitboard::from_raw(0x8080808080808080),
];

pub const fn file(f: File) -> Bitboard {
    FILE[f.index()]
}

/// Light squares (`a8` is light)
pub const CELLS_WHITE: Bitboard = Bitboard::from_raw(0xaa55aa55aa55aa55);
/// Dark squares (`a1` is dark)
pub const CELLS_BLACK: Bitboard = Bitboard::from_raw(0x55aa55aa55aa55aa);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coord;

    #[test]
    fn test_cell_colors() {
        assert!(CELLS_WHITE.has(Coord::from_parts(File::A, Rank::R8)));
        assert!(CELLS_WHITE.has(Coord::from_parts(File::H, Rank::R1)));
        assert!(CELLS_BLACK.has(Coord::from_parts(File::A, Rank::R1)));
        assert!(CELLS_BLACK.has(Coord::from_parts(File::H, Rank::R8)));
        assert_eq!(CELLS_WHITE ^ CELLS_BLACK, Bitboard::FULL);
    }

    #[test]
    fn test_lines() {
        let e4 = Coord::from_parts(File::E, Rank::R4);
        assert!(file(File::E).has(e4));
        assert!(rank(Rank::R4).has(e4));
        assert_eq!((file(File::E) & rank(Rank::R4)), Bitboard::from_coord(e4));
    }
}
