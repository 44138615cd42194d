//! Full game position and the per-piece move applier.
//!
//! A `Position` owns the board plus the non-board state a legal-move
//! generator needs: whose turn it is, the fifty-move clock, castling
//! rights, and the en-passant target. Applying a move mutates a position
//! in place; callers that need the predecessor clone first (see
//! [`crate::move_generation::move_list::MoveList`]).

use std::hash::{Hash, Hasher};

use crate::board::board::Board;
use crate::board::piece::{Color, Piece, PieceKind};
use crate::board::square::Square;
use crate::position::chess_move::Move;
use crate::position::move_counter::{FiftyMoveCounter, MoveCounter};

/// Standard starting position in Forsyth-Edwards Notation.
pub const STARTING_POSITION_FEN: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Compact castling-rights bitmask.
pub type CastlingRights = u8;

pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;

// Home squares the castling rights watch. Row 7 is Light's back rank.
const LIGHT_KINGSIDE_ROOK_HOME: Square = Square::new(7, 7);
const LIGHT_QUEENSIDE_ROOK_HOME: Square = Square::new(7, 0);
const DARK_KINGSIDE_ROOK_HOME: Square = Square::new(0, 7);
const DARK_QUEENSIDE_ROOK_HOME: Square = Square::new(0, 0);

/// Board layout plus side-to-move, clocks, castling rights, and the
/// en-passant target.
///
/// Equality and hashing cover exactly the state that identifies a position
/// for the repetition rule: board layout, side to move, castling rights,
/// and en-passant square. The clocks never distinguish two positions.
#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    move_counter: MoveCounter,
    fifty_move_rule: FiftyMoveCounter,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
}

impl Default for Position {
    fn default() -> Self {
        Position {
            board: Board::new(),
            move_counter: MoveCounter::new(),
            fifty_move_rule: FiftyMoveCounter::new(),
            castling_rights: 0,
            en_passant: None,
        }
    }
}

impl Position {
    /// An empty board with Light to move.
    #[inline]
    pub fn new_empty() -> Self {
        Position::default()
    }

    /// The standard starting position.
    #[inline]
    pub fn new_game() -> Self {
        crate::utils::fen_parser::parse_fen(STARTING_POSITION_FEN)
            .expect("starting FEN should always parse")
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, String> {
        crate::utils::fen_parser::parse_fen(fen)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        crate::utils::fen_generator::generate_fen(self)
    }

    /// Assembles a position from parsed parts (the FEN boundary).
    pub fn from_parts(
        board: Board,
        move_counter: MoveCounter,
        fifty_move_rule: FiftyMoveCounter,
        castling_rights: CastlingRights,
        en_passant: Option<Square>,
    ) -> Self {
        Position {
            board,
            move_counter,
            fifty_move_rule,
            castling_rights,
            en_passant,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.move_counter.side_to_move()
    }

    #[inline]
    pub fn is_lights_turn(&self) -> bool {
        self.move_counter.is_lights_turn()
    }

    #[inline]
    pub fn move_counter(&self) -> &MoveCounter {
        &self.move_counter
    }

    #[inline]
    pub fn fifty_move_rule(&self) -> &FiftyMoveCounter {
        &self.fifty_move_rule
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Applies `mv`, reading the moved piece's kind off the board. Does
    /// nothing when `from` is empty; legality is the generator's contract,
    /// not this method's.
    pub fn make(&mut self, mv: Move) {
        if let Some(piece) = self.board.at(mv.from()) {
            self.apply(piece.kind, mv);
        }
    }

    /// Applies `mv` for a piece of the given kind.
    pub fn apply(&mut self, kind: PieceKind, mv: Move) {
        debug_assert!(
            self.board.at(mv.from()).map(|p| p.kind) == Some(kind),
            "apply dispatched {kind:?} but {} holds {:?}",
            mv.from(),
            self.board.at(mv.from())
        );

        match kind {
            PieceKind::Pawn => self.apply_pawn(mv),
            PieceKind::King => self.apply_king(mv),
            other => self.apply_piece(other, mv),
        }
    }

    /// Queen, bishop, knight, and rook moves.
    fn apply_piece(&mut self, kind: PieceKind, mv: Move) {
        self.record_capture(mv.to());

        if kind == PieceKind::Rook {
            self.clear_rights_watching(mv.from());
        }

        self.board.move_piece(mv.from(), mv.to());
        self.en_passant = None;
        self.finish_halfmove();
    }

    fn apply_king(&mut self, mv: Move) {
        let color = self.color_on(mv.from());
        let from = mv.from();
        let to = mv.to();

        if from.col().abs_diff(to.col()) == 2 {
            // Castling: the rook crosses to the king's far side.
            self.board.move_piece(from, to);

            let row = from.row();
            if to.col() == 6 {
                self.board.move_piece(Square::new(row, 7), Square::new(row, 5));
            } else {
                self.board.move_piece(Square::new(row, 0), Square::new(row, 3));
            }
        } else {
            self.record_capture(to);
            self.board.move_piece(from, to);
        }

        self.castling_rights &= match color {
            Color::Light => !(CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE),
            Color::Dark => !(CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE),
        };
        self.en_passant = None;
        self.finish_halfmove();
    }

    fn apply_pawn(&mut self, mv: Move) {
        let color = self.color_on(mv.from());
        let from = mv.from();
        let to = mv.to();

        if self.en_passant == Some(to) && from.col() != to.col() && self.board.is_empty(to) {
            // En passant: the captured pawn sits beside the destination.
            let victim = match color {
                Color::Light => to.down_one(),
                Color::Dark => to.up_one(),
            };
            self.board.remove(victim);
            self.fifty_move_rule.piece_captured();
        } else {
            self.record_capture(to);
        }

        self.board.remove(from);

        let promotes = match color {
            Color::Light => to.is_top_rank(),
            Color::Dark => to.is_bot_rank(),
        };
        if promotes {
            self.board.place(to, Piece::new(color, promotion_kind(mv)));
        } else {
            self.board.place(to, Piece::new(color, PieceKind::Pawn));
        }

        self.en_passant = if from.col() == to.col() && from.row().abs_diff(to.row()) == 2 {
            Some(match color {
                Color::Light => from.up_one(),
                Color::Dark => from.down_one(),
            })
        } else {
            None
        };

        self.fifty_move_rule.pawn_has_moved();
        self.finish_halfmove();
    }

    fn record_capture(&mut self, to: Square) {
        if self.board.is_occupied(to) {
            self.fifty_move_rule.piece_captured();
            self.clear_rights_watching(to);
        }
    }

    /// Drops the castling right guarding `square`, if any. Covers both a
    /// rook leaving its home corner and a capture landing on one.
    fn clear_rights_watching(&mut self, square: Square) {
        let lost = if square == LIGHT_KINGSIDE_ROOK_HOME {
            CASTLE_LIGHT_KINGSIDE
        } else if square == LIGHT_QUEENSIDE_ROOK_HOME {
            CASTLE_LIGHT_QUEENSIDE
        } else if square == DARK_KINGSIDE_ROOK_HOME {
            CASTLE_DARK_KINGSIDE
        } else if square == DARK_QUEENSIDE_ROOK_HOME {
            CASTLE_DARK_QUEENSIDE
        } else {
            return;
        };

        self.castling_rights &= !lost;
    }

    fn finish_halfmove(&mut self) {
        self.fifty_move_rule.update();
        self.move_counter.increment();
    }

    fn color_on(&self, square: Square) -> Color {
        if self.board.is_light(square) {
            Color::Light
        } else {
            Color::Dark
        }
    }
}

fn promotion_kind(mv: Move) -> PieceKind {
    match mv.promotion() {
        Some(kind) if kind.is_ray() || kind == PieceKind::Knight => kind,
        other => {
            debug_assert!(false, "promotion move {mv} carries {other:?}");
            PieceKind::Queen
        }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.side_to_move() == other.side_to_move()
            && self.castling_rights == other.castling_rights
            && self.en_passant == other.en_passant
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.board.hash(state);
        self.side_to_move().hash(state);
        self.castling_rights.hash(state);
        self.en_passant.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use crate::board::piece::{Color, PieceKind};
    use crate::board::square::Square;
    use crate::position::chess_move::Move;

    #[test]
    fn quiet_move_flips_the_turn_and_ticks_the_clock() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 3 10")
            .expect("FEN should parse");

        pos.make(Move::from_lan("h1h5"));

        assert_eq!(pos.side_to_move(), Color::Dark);
        assert_eq!(pos.fifty_move_rule().count(), 4);
        assert!(pos.board().is_empty(Square::from_lan("h1")));
        assert_eq!(
            pos.board().at(Square::from_lan("h5")).map(|p| p.kind),
            Some(PieceKind::Rook)
        );
    }

    #[test]
    fn captures_and_pawn_moves_reset_the_fifty_clock() {
        let mut pos = Position::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 42 30")
            .expect("FEN should parse");

        pos.make(Move::from_lan("e4d5"));
        assert_eq!(pos.fifty_move_rule().count(), 0);
        assert!(pos.board().is_empty(Square::from_lan("e4")));
        assert_eq!(
            pos.board().at(Square::from_lan("d5")).map(|p| p.kind),
            Some(PieceKind::Pawn)
        );
        assert_eq!(pos.board().occupied().count(), 3);
    }

    #[test]
    fn promotion_places_the_chosen_piece() {
        let mut pos =
            Position::from_fen("8/P3k3/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");

        pos.make(Move::from_lan("a7a8q"));

        let a8 = Square::from_lan("a8");
        assert_eq!(pos.board().at(a8).map(|p| p.kind), Some(PieceKind::Queen));
        assert!(pos.board().is_light(a8));
        assert!(pos.board().pawns().none());
    }

    #[test]
    fn double_push_records_the_skipped_square() {
        let mut pos = Position::new_game();
        pos.make(Move::from_lan("e2e4"));
        assert_eq!(pos.en_passant(), Some(Square::from_lan("e3")));

        pos.make(Move::from_lan("g8f6"));
        assert_eq!(pos.en_passant(), None);
    }

    #[test]
    fn en_passant_capture_removes_the_bypassed_pawn() {
        let mut pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 5")
            .expect("FEN should parse");

        pos.make(Move::from_lan("e5d6"));

        assert!(pos.board().is_empty(Square::from_lan("d5")));
        assert!(pos.board().is_empty(Square::from_lan("e5")));
        assert_eq!(
            pos.board().at(Square::from_lan("d6")).map(|p| p.kind),
            Some(PieceKind::Pawn)
        );
        assert_eq!(pos.fifty_move_rule().count(), 0);
    }

    #[test]
    fn castling_moves_king_and_rook_and_clears_rights() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("FEN should parse");

        pos.make(Move::from_lan("e1g1"));

        assert_eq!(
            pos.board().at(Square::from_lan("g1")).map(|p| p.kind),
            Some(PieceKind::King)
        );
        assert_eq!(
            pos.board().at(Square::from_lan("f1")).map(|p| p.kind),
            Some(PieceKind::Rook)
        );
        assert!(pos.board().is_empty(Square::from_lan("h1")));
        assert_eq!(pos.castling_rights() & 0b0011, 0);
        assert_ne!(pos.castling_rights() & 0b1100, 0);
    }

    #[test]
    fn rook_capture_on_a_home_corner_clears_the_right() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("FEN should parse");

        pos.make(Move::from_lan("a1a8"));

        // Dark lost queenside, Light lost queenside (rook left home).
        assert_eq!(
            pos.castling_rights(),
            super::CASTLE_LIGHT_KINGSIDE | super::CASTLE_DARK_KINGSIDE
        );
    }

    #[test]
    fn equality_ignores_the_clocks() {
        let a = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let b = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 40 31").expect("FEN should parse");
        let c = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").expect("FEN should parse");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
