//! Rules engine which plays one game of Bomb Chess

use crate::board::Board;
use crate::bomb::{self, Debris};
use crate::castling::{self, CastlingError};
use crate::geometry;
use crate::ledger::PositionLedger;
use crate::movegen;
use crate::piece::{Piece, PieceId, PromotePiece};
use crate::rules;
use crate::types::{CastlingSide, Color, Coord, GameOver, GameStatus, PieceKind};

use std::fmt;

use log::{debug, info, trace};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reason why a move, castling or promotion is rejected
///
/// Rejection is a normal outcome: the board passed by the caller and the engine state stay
/// exactly as they were before the attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("No piece at the starting position")]
    EmptySource(Coord),
    #[error("You cannot move your opponent's pieces")]
    NotYourPiece(Coord),
    #[error("Invalid move for this piece")]
    IllegalDestination { src: Coord, dst: Coord },
    #[error("You cannot make a move that leaves your king in check")]
    ExposesKing,
    #[error(transparent)]
    Castling(#[from] CastlingError),
    #[error("No pawn at position for promotion")]
    NoPawnToPromote(Coord),
    #[error("The promotion on {0} must be completed first")]
    PromotionPending(Coord),
}

/// Tunable limits of the draw rules
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rules {
    /// Number of half-moves without pawn moves and captures that makes a draw
    pub fifty_move_limit: u16,
    /// Number of occurrences of the same position that makes a draw
    pub repetition_limit: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            fifty_move_limit: 100,
            repetition_limit: 3,
        }
    }
}

/// Pawn which has reached the last rank and waits for the piece to turn into
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PendingPromotion {
    pub square: Coord,
    pub color: Color,
    /// Whether the pawn captured on its way, so the explosion is still due
    pub capture: bool,
}

/// State carried between the moves of a game
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineState {
    pub half_move_clock: u16,
    pub en_passant: Option<Coord>,
    pub pending_promotion: Option<PendingPromotion>,
}

/// En passant details of a transition
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnPassantInfo {
    /// Whether the move captured en passant
    pub capture: bool,
    /// En passant target after the transition
    pub target: Option<Coord>,
    /// En passant target before the transition
    pub prev_target: Option<Coord>,
}

/// What happened during a transition
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveInfo {
    pub captured: Option<PieceId>,
    pub en_passant: EnPassantInfo,
    pub promotion: Option<PromotePiece>,
    pub promotion_pending: bool,
    pub castling: Option<CastlingSide>,
    pub exploded: Debris,
    pub half_move_clock: u16,
    pub game_over: Option<GameOver>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TransitionKind {
    Move,
    PromotionRequired,
    Castling,
    Promotion,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match *self {
            TransitionKind::Move => "Valid move",
            TransitionKind::PromotionRequired => "Valid move, promotion required",
            TransitionKind::Castling => "Castling completed",
            TransitionKind::Promotion => "Promotion completed",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

/// Successful transition from one position to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Position after the transition
    pub board: Board,
    pub kind: TransitionKind,
    pub info: MoveInfo,
}

/// Rules engine for a single game
///
/// The engine doesn't own the board. Instead, each operation takes the current position and
/// returns the new one, leaving the passed board untouched. What the engine keeps between the
/// calls is the state which cannot be deduced from the position: the half-move clock, the en
/// passant target, the pending promotion and the history of positions.
///
/// As the state is mutated by every successful operation, the calls for one game must be
/// serialized, and the board passed to each call must be the one returned by the previous call.
/// The engine doesn't enforce turn order, it's up to the caller to pass the right `mover`.
///
/// # Example
///
/// ```
/// # use bombchess::{Engine, Coord, Color};
/// # use std::str::FromStr;
/// #
/// let mut engine = Engine::new();
/// let board = engine.initialize_board();
///
/// let e2 = Coord::from_str("e2").unwrap();
/// let e4 = Coord::from_str("e4").unwrap();
/// let t = engine.validate_move(&board, e2, e4, Color::White, None).unwrap();
/// assert_eq!(t.kind.to_string(), "Valid move");
/// assert_eq!(engine.en_passant_target(), Some(Coord::from_str("e3").unwrap()));
///
/// let err = engine
///     .validate_move(&t.board, e4, Coord::from_str("e6").unwrap(), Color::White, None)
///     .unwrap_err();
/// assert_eq!(err.to_string(), "Invalid move for this piece");
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    state: EngineState,
    ledger: PositionLedger,
    rules: Rules,
}

impl Engine {
    /// Creates an engine with default rules
    ///
    /// The position history is empty until [`Engine::initialize_board()`] is called.
    pub fn new() -> Engine {
        Engine::default()
    }

    pub fn with_rules(rules: Rules) -> Engine {
        Engine {
            rules,
            ..Engine::default()
        }
    }

    /// Creates an engine for the game starting from the position `b`
    pub fn from_board(b: &Board) -> Engine {
        Engine::from_board_with_rules(b, Rules::default())
    }

    pub fn from_board_with_rules(b: &Board, rules: Rules) -> Engine {
        let mut res = Engine::with_rules(rules);
        res.ledger.push(b);
        res
    }

    /// Starts a new game and returns its initial position
    ///
    /// The state and the history of the previous game, if any, are discarded.
    pub fn initialize_board(&mut self) -> Board {
        let board = Board::initial();
        self.state = EngineState::default();
        self.ledger.clear();
        self.ledger.push(&board);
        board
    }

    #[inline]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    #[inline]
    pub fn ledger(&self) -> &PositionLedger {
        &self.ledger
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[inline]
    pub fn en_passant_target(&self) -> Option<Coord> {
        self.state.en_passant
    }

    #[inline]
    pub fn half_move_clock(&self) -> u16 {
        self.state.half_move_clock
    }

    #[inline]
    pub fn pending_promotion(&self) -> Option<PendingPromotion> {
        self.state.pending_promotion
    }

    /// Validates the move of side `mover` from `src` to `dst` and makes it
    ///
    /// A king move from its home square to the `g` or `c` file is treated as castling, see
    /// [`Engine::process_castling()`].
    ///
    /// If a pawn reaches the last rank, it's replaced with `promotion`. If `promotion` is
    /// `None`, the transition is of kind [`TransitionKind::PromotionRequired`]: the pawn stays
    /// on the last rank, and [`Engine::complete_promotion()`] must be called before any other
    /// move. The explosion and the game end detection are postponed until then.
    pub fn validate_move(
        &mut self,
        b: &Board,
        src: Coord,
        dst: Coord,
        mover: Color,
        promotion: Option<PromotePiece>,
    ) -> Result<Transition, RuleError> {
        let res = self.do_validate_move(b, src, dst, mover, promotion);
        if let Err(e) = &res {
            trace!("rejected move {}{} by {}: {}", src, dst, mover, e);
        }
        res
    }

    fn check_no_pending(&self) -> Result<(), RuleError> {
        match self.state.pending_promotion {
            Some(p) => Err(RuleError::PromotionPending(p.square)),
            None => Ok(()),
        }
    }

    fn do_validate_move(
        &mut self,
        b: &Board,
        src: Coord,
        dst: Coord,
        mover: Color,
        promotion: Option<PromotePiece>,
    ) -> Result<Transition, RuleError> {
        self.check_no_pending()?;
        if let Some(side) = castling::detect(b, mover, src, dst) {
            return self.do_castling(b, mover, side);
        }

        let piece = b.get(src).ok_or(RuleError::EmptySource(src))?;
        if piece.color() != mover {
            return Err(RuleError::NotYourPiece(src));
        }
        let ep = self.state.en_passant;
        if !movegen::destinations(b, src, ep).has(dst) {
            return Err(RuleError::IllegalDestination { src, dst });
        }

        let mut next = *b;
        let captured = rules::displace(&mut next, src, dst, ep);
        if rules::is_in_check(&next, mover) {
            return Err(RuleError::ExposesKing);
        }

        // The move is legal, so we commit it
        let is_pawn = piece.kind() == PieceKind::Pawn;
        if is_pawn || captured.is_some() {
            self.state.half_move_clock = 0;
        } else {
            self.state.half_move_clock = self.state.half_move_clock.saturating_add(1);
        }
        // The ledger sees the relocated position, before promotion and explosion
        self.ledger.push(&next);
        let prev_target = self.state.en_passant.take();
        if is_pawn && src.rank().index().abs_diff(dst.rank().index()) == 2 {
            self.state.en_passant = src.try_shift(0, geometry::pawn_forward_delta(mover));
        }

        let mut info = MoveInfo {
            captured: captured.map(|c| c.piece.id()),
            en_passant: EnPassantInfo {
                capture: captured.map_or(false, |c| c.coord != dst),
                target: self.state.en_passant,
                prev_target,
            },
            half_move_clock: self.state.half_move_clock,
            ..MoveInfo::default()
        };

        if is_pawn && dst.rank() == geometry::promote_rank(mover) {
            match promotion {
                Some(p) => {
                    next.put(dst, Some(Piece::promoted(p, mover)));
                    info.promotion = Some(p);
                }
                None => {
                    self.state.pending_promotion = Some(PendingPromotion {
                        square: dst,
                        color: mover,
                        capture: captured.is_some(),
                    });
                    info.promotion_pending = true;
                    debug!("promotion pending on {} for {}", dst, mover);
                    return Ok(Transition {
                        board: next,
                        kind: TransitionKind::PromotionRequired,
                        info,
                    });
                }
            }
        }

        if captured.is_some() {
            info.exploded = bomb::detonate(&mut next, dst);
        }
        info.game_over = self.finish(&next, mover.inv());
        Ok(Transition {
            board: next,
            kind: TransitionKind::Move,
            info,
        })
    }

    /// Castles side `mover` to side `side`
    ///
    /// Castling never captures, so it never causes an explosion.
    pub fn process_castling(
        &mut self,
        b: &Board,
        mover: Color,
        side: CastlingSide,
    ) -> Result<Transition, RuleError> {
        let res = self.check_no_pending().and_then(|_| self.do_castling(b, mover, side));
        if let Err(e) = &res {
            trace!("rejected castling {} by {}: {}", side, mover, e);
        }
        res
    }

    fn do_castling(
        &mut self,
        b: &Board,
        mover: Color,
        side: CastlingSide,
    ) -> Result<Transition, RuleError> {
        castling::validate(b, mover, side)?;

        let mut next = *b;
        castling::apply(&mut next, mover, side);
        self.state.half_move_clock = self.state.half_move_clock.saturating_add(1);
        self.ledger.push(&next);
        let prev_target = self.state.en_passant.take();

        let mut info = MoveInfo {
            en_passant: EnPassantInfo {
                capture: false,
                target: None,
                prev_target,
            },
            castling: Some(side),
            half_move_clock: self.state.half_move_clock,
            ..MoveInfo::default()
        };
        info.game_over = self.finish(&next, mover.inv());
        Ok(Transition {
            board: next,
            kind: TransitionKind::Castling,
            info,
        })
    }

    /// Turns the pawn on `square` into `choice`
    ///
    /// If there is a pending promotion, `square` must be the square it's pending on. If the
    /// move which brought the pawn there was a capture, the explosion happens now. The ledger
    /// already holds the position from that move, so nothing is appended here.
    pub fn complete_promotion(
        &mut self,
        b: &Board,
        square: Coord,
        choice: PromotePiece,
    ) -> Result<Transition, RuleError> {
        let res = self.do_complete_promotion(b, square, choice);
        if let Err(e) = &res {
            trace!("rejected promotion on {} to {}: {}", square, choice, e);
        }
        res
    }

    fn do_complete_promotion(
        &mut self,
        b: &Board,
        square: Coord,
        choice: PromotePiece,
    ) -> Result<Transition, RuleError> {
        let pawn = b
            .get(square)
            .filter(|p| p.kind() == PieceKind::Pawn)
            .ok_or(RuleError::NoPawnToPromote(square))?;
        let capture = match self.state.pending_promotion {
            Some(p) if p.square != square => return Err(RuleError::PromotionPending(p.square)),
            Some(p) => p.capture,
            None => false,
        };

        let color = pawn.color();
        let mut next = *b;
        next.put(square, Some(Piece::promoted(choice, color)));
        self.state.pending_promotion = None;

        let mut info = MoveInfo {
            en_passant: EnPassantInfo {
                capture: false,
                target: self.state.en_passant,
                prev_target: self.state.en_passant,
            },
            promotion: Some(choice),
            half_move_clock: self.state.half_move_clock,
            ..MoveInfo::default()
        };
        if capture {
            info.exploded = bomb::detonate(&mut next, square);
        }
        info.game_over = self.finish(&next, color.inv());
        Ok(Transition {
            board: next,
            kind: TransitionKind::Promotion,
            info,
        })
    }

    fn finish(&self, b: &Board, side_to_move: Color) -> Option<GameOver> {
        let res = self.check_game_over(b, side_to_move);
        if let Some(game_over) = res {
            info!("game over: {}", game_over);
        }
        res
    }

    /// Checks whether the game has ended in position `b` with `side_to_move` to move
    ///
    /// The rules are tried in the following order, and the first one that applies wins:
    /// checkmate, stalemate, fifty-move rule, repetition, insufficient material, king loss.
    ///
    /// The repetition count is the number of times the position of `b` occurs in the ledger.
    pub fn check_game_over(&self, b: &Board, side_to_move: Color) -> Option<GameOver> {
        let ep = self.state.en_passant;
        if rules::is_checkmate(b, side_to_move, ep) {
            return Some(GameOver::win(GameStatus::Checkmate, side_to_move.inv()));
        }
        if rules::is_stalemate(b, side_to_move, ep) {
            return Some(GameOver::draw(GameStatus::Stalemate));
        }
        if self.state.half_move_clock >= self.rules.fifty_move_limit {
            return Some(GameOver::draw(GameStatus::FiftyMoves));
        }
        if self.ledger.count(b) >= self.rules.repetition_limit {
            return Some(GameOver::draw(GameStatus::Repetition));
        }
        if rules::is_insufficient_material(b) {
            return Some(GameOver::draw(GameStatus::InsufficientMaterial));
        }
        match (b.king_pos(Color::White), b.king_pos(Color::Black)) {
            (Some(_), Some(_)) => None,
            (Some(_), None) => Some(GameOver::win(GameStatus::KingExploded, Color::White)),
            (None, Some(_)) => Some(GameOver::win(GameStatus::KingExploded, Color::Black)),
            (None, None) => Some(GameOver::draw(GameStatus::KingExploded)),
        }
    }
}
