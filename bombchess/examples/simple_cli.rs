// Simple command-line application to play Bomb Chess

use bombchess::{board::PrettyStyle, Color, Coord, Engine, PromotePiece, Transition};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

fn read_line(stdin: &mut impl BufRead, prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().unwrap();
    let mut s = String::new();
    if stdin.read_line(&mut s).unwrap() == 0 {
        return None;
    }
    Some(s.trim().to_string())
}

fn parse_move(s: &str) -> Result<(Coord, Coord, Option<PromotePiece>), String> {
    if s.len() < 4 || !s.is_ascii() {
        return Err(format!("expected a move like \"e2e4\" or \"e7e8q\", got {:?}", s));
    }
    let src = Coord::from_str(&s[..2]).map_err(|e| e.to_string())?;
    let dst = Coord::from_str(&s[2..4]).map_err(|e| e.to_string())?;
    let promote = match &s[4..] {
        "" => None,
        p => Some(PromotePiece::from_str(p).map_err(|e| e.to_string())?),
    };
    Ok((src, dst, promote))
}

fn report(t: &Transition) {
    println!("{}", t.kind);
    if let Some(captured) = t.info.captured {
        println!("Captured {}", captured);
    }
    for (coord, id) in &t.info.exploded {
        println!("Boom! {} on {} exploded", id, coord);
    }
}

fn main() {
    let mut stdin = io::stdin().lock();

    let mut engine = Engine::new();
    let mut board = engine.initialize_board();
    let mut side = Color::White;

    loop {
        println!("{}", board.pretty(PrettyStyle::Ascii));
        let prompt = format!("{} move: ", side);
        let s = match read_line(&mut stdin, &prompt) {
            Some(s) => s,
            None => break,
        };

        let (src, dst, promote) = match parse_move(&s) {
            Ok(mv) => mv,
            Err(e) => {
                println!("Bad move: {}", e);
                println!();
                continue;
            }
        };

        let mut t = match engine.validate_move(&board, src, dst, side, promote) {
            Ok(t) => t,
            Err(e) => {
                println!("Bad move: {}", e);
                println!();
                continue;
            }
        };
        report(&t);

        while let Some(pending) = engine.pending_promotion() {
            let s = match read_line(&mut stdin, "Promote to (queen, rook, bishop, knight): ") {
                Some(s) => s,
                None => return,
            };
            let choice = match PromotePiece::from_str(&s) {
                Ok(p) => p,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };
            // The pawn is definitely there, as the promotion is pending
            t = engine
                .complete_promotion(&t.board, pending.square, choice)
                .unwrap();
            report(&t);
        }

        board = t.board;
        println!();

        if let Some(game_over) = t.info.game_over {
            println!("{}", board.pretty(PrettyStyle::Ascii));
            println!("Game finished: {}", game_over);
            break;
        }
        side = side.inv();
    }
}
