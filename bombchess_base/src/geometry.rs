use crate::types::{CastlingSide, Color, File, Rank};

pub const fn castling_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

pub const fn pawn_start_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

pub const fn promote_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R8,
        Color::Black => Rank::R1,
    }
}

/// Rank index delta of a single pawn step
pub const fn pawn_forward_delta(c: Color) -> isize {
    match c {
        Color::White => -1,
        Color::Black => 1,
    }
}

pub const fn castling_rook_src(s: CastlingSide) -> File {
    match s {
        CastlingSide::King => File::H,
        CastlingSide::Queen => File::A,
    }
}

pub const fn castling_king_dst(s: CastlingSide) -> File {
    match s {
        CastlingSide::King => File::G,
        CastlingSide::Queen => File::C,
    }
}

pub const fn castling_rook_dst(s: CastlingSide) -> File {
    match s {
        CastlingSide::King => File::F,
        CastlingSide::Queen => File::D,
    }
}
