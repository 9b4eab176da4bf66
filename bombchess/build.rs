use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::{env, fs};

use bombchess_base::bitboard::Bitboard;
use bombchess_base::types::Coord;

/// Step patterns as `(delta_file, delta_rank)` pairs, in rank index terms (`-1` is towards rank 8)
const STEP_TABLES: [(&str, &[(isize, isize)]); 4] = [
    (
        "KING_STEPS",
        &[(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)],
    ),
    (
        "KNIGHT_STEPS",
        &[(-2, -1), (-2, 1), (-1, -2), (-1, 2), (2, -1), (2, 1), (1, -2), (1, 2)],
    ),
    ("WHITE_PAWN_CAPTURES", &[(-1, -1), (1, -1)]),
    ("BLACK_PAWN_CAPTURES", &[(-1, 1), (1, 1)]),
];

fn step_table(steps: &[(isize, isize)]) -> [Bitboard; 64] {
    let mut res = [Bitboard::EMPTY; 64];
    for c in Coord::iter() {
        res[c.index()] = steps
            .iter()
            .filter_map(|&(delta_file, delta_rank)| c.try_shift(delta_file, delta_rank))
            .collect();
    }
    res
}

fn write_table<W: Write>(w: &mut W, name: &str, table: &[Bitboard; 64]) -> io::Result<()> {
    writeln!(w, "const {}: [Bitboard; 64] = [", name)?;
    for c in Coord::iter() {
        writeln!(w, "    /*{}*/ bb(0x{:016x}),", c, table[c.index()].as_raw())?;
    }
    writeln!(w, "];")?;
    Ok(())
}

fn gen_steps(out_path: &Path) -> io::Result<()> {
    let mut w = BufWriter::new(fs::File::create(out_path)?);
    for (i, (name, steps)) in STEP_TABLES.iter().enumerate() {
        if i != 0 {
            writeln!(w)?;
        }
        write_table(&mut w, name, &step_table(steps))?;
    }
    w.flush()
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = env::var("OUT_DIR").unwrap();
    gen_steps(&Path::new(&out_dir).join("steps.rs"))
}
