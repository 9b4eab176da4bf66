//! # Bomb Chess rules engine
//!
//! Bomb Chess is played by the usual chess rules with one twist: each capture makes an
//! explosion which removes every piece standing next to the capture square, except pawns.
//! Kings are not immune, so a game may also end when a king explodes.
//!
//! The entry point is [`Engine`], which validates and makes moves for one game, keeps the
//! history needed for the draw rules and detects the end of the game. Positions are
//! represented by [`Board`], a plain value which the engine never mutates in place.
//!
//! # Example
//!
//! ```
//! use bombchess::{Color, Coord, Engine, GameStatus};
//! use std::str::FromStr;
//!
//! let mut engine = Engine::new();
//! let mut board = engine.initialize_board();
//! let mut color = Color::White;
//! for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     let src = Coord::from_str(&mv[..2]).unwrap();
//!     let dst = Coord::from_str(&mv[2..]).unwrap();
//!     let t = engine.validate_move(&board, src, dst, color, None).unwrap();
//!     board = t.board;
//!     if let Some(game_over) = t.info.game_over {
//!         assert_eq!(game_over.status, GameStatus::Checkmate);
//!         assert_eq!(game_over.winner, Some(Color::Black));
//!     }
//!     color = color.inv();
//! }
//! ```

pub mod attack;
pub mod board;
pub mod bomb;
pub mod castling;
pub mod engine;
pub mod ledger;
pub mod movegen;
pub mod piece;
pub mod rules;

pub use bombchess_base::{bitboard, bitboard_consts, geometry, types};

pub use bitboard::Bitboard;
pub use board::Board;
pub use engine::{Engine, EngineState, MoveInfo, RuleError, Rules, Transition, TransitionKind};
pub use ledger::{PositionKey, PositionLedger};
pub use piece::{Piece, PieceId, PromotePiece};
pub use types::{CastlingSide, Color, Coord, File, GameOver, GameStatus, PieceKind, Rank};
