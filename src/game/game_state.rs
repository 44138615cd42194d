//! Terminal-game classification.
//!
//! Consumes the generator's output (a legal-move count), the position, and
//! a repetition predicate, and decides whether the game continues, is won,
//! or is drawn. Results that only a host application can know about
//! (resignation, timeout, agreement) have constructors here but are never
//! produced by the classifier itself.

use std::fmt;

use crate::board::board::Board;
use crate::board::piece::Color;
use crate::game::history::GameHistory;
use crate::move_generation::generator::MoveGenerator;
use crate::move_generation::threats::is_king_attacked;
use crate::position::position::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Continue,
    Win,
    // No Lose: a win for one player is a loss for the other.
    Draw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reason {
    /// Game still playing (Continue only).
    Nothing,
    /// Both players agreed on a draw (Draw only, host-set).
    Agreement,
    /// One player resigned (Win only, host-set).
    Resignation,
    Checkmate,
    /// No legal moves but the king is not attacked (Draw only).
    Stalemate,
    /// The same position occurred three times (Draw only).
    Repetition,
    /// One hundred halfmoves without a capture or pawn move (Draw only).
    FiftyMoveRule,
    /// Neither player can ever deliver mate (Draw only, USCF rules).
    InsufficientMaterialOnly,
    /// Flag fell against sufficient material (Win only, host-set).
    TimeoutOnly,
    /// Flag fell but the opponent cannot mate (Draw only, host-set).
    TimeoutAndInsufficientMaterial,
}

/// Classification of a position: who, what, and why.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameState {
    pub player: Color,
    pub state: State,
    pub reason: Reason,
}

impl GameState {
    /// Classifies `position` given the number of legal moves there and a
    /// repetition predicate. The predicate is only consulted when no
    /// earlier rule fires.
    pub fn evaluate(
        position: &Position,
        n_legal_moves: usize,
        draw_by_repetition: impl FnOnce() -> bool,
    ) -> GameState {
        let side = position.side_to_move();

        if n_legal_moves == 0 {
            if is_king_attacked(position.board(), side) {
                return GameState {
                    player: side.opposite(),
                    state: State::Win,
                    reason: Reason::Checkmate,
                };
            }
            return GameState {
                player: side,
                state: State::Draw,
                reason: Reason::Stalemate,
            };
        }

        if position.fifty_move_rule().count() >= 100 {
            return GameState {
                player: side,
                state: State::Draw,
                reason: Reason::FiftyMoveRule,
            };
        }

        if is_insufficient_material(position.board()) {
            return GameState {
                player: side,
                state: State::Draw,
                reason: Reason::InsufficientMaterialOnly,
            };
        }

        if draw_by_repetition() {
            return GameState {
                player: side,
                state: State::Draw,
                reason: Reason::Repetition,
            };
        }

        GameState {
            player: side,
            state: State::Continue,
            reason: Reason::Nothing,
        }
    }

    /// Runs the generator on `position` and classifies it, counting
    /// repetitions across `history`.
    pub fn from_position(position: &Position, history: &GameHistory) -> GameState {
        let moves = MoveGenerator::generate(position);
        GameState::evaluate(position, moves.len(), || {
            history.count_matches_of(position) >= 3
        })
    }

    // Host-set results. The classifier never returns these.

    pub fn win_by_resignation(winner: Color) -> GameState {
        GameState {
            player: winner,
            state: State::Win,
            reason: Reason::Resignation,
        }
    }

    pub fn win_by_timeout(winner: Color) -> GameState {
        GameState {
            player: winner,
            state: State::Win,
            reason: Reason::TimeoutOnly,
        }
    }

    pub fn draw_by_agreement() -> GameState {
        GameState {
            player: Color::Light,
            state: State::Draw,
            reason: Reason::Agreement,
        }
    }

    pub fn draw_by_timeout(flagged: Color) -> GameState {
        GameState {
            player: flagged,
            state: State::Draw,
            reason: Reason::TimeoutAndInsufficientMaterial,
        }
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.state != State::Continue
    }

    #[inline]
    pub fn is_game_on(&self) -> bool {
        self.state == State::Continue
    }

    #[inline]
    pub fn is_draw(&self) -> bool {
        self.state == State::Draw
    }

    /// The winning side, if the game is won.
    pub fn winner(&self) -> Option<Color> {
        if self.state == State::Win {
            Some(self.player)
        } else {
            None
        }
    }

    /// `+1` when Light has won, `-1` when Dark has won, `0` otherwise
    /// (draws and running games). Flip the sign with `maximize_light`.
    pub fn value(&self, maximize_light: bool) -> i32 {
        let raw = match self.winner() {
            Some(Color::Light) => 1,
            Some(Color::Dark) => -1,
            None => 0,
        };

        if maximize_light {
            raw
        } else {
            -raw
        }
    }
}

/// USCF insufficient material: K vs K, K+minor vs K, and K+B vs K+B with
/// both bishops on the same square shade. Everything else can mate.
fn is_insufficient_material(board: &Board) -> bool {
    if (board.pawns() | board.rooks() | board.queens()).any() {
        return false;
    }

    let minors = board.knights() | board.bishops();
    let light_minors = minors & board.lights();
    let dark_minors = minors & board.darks();

    match (light_minors.count(), dark_minors.count()) {
        (0, 0) => true,
        (1, 0) | (0, 1) => true,
        (1, 1) => {
            let bishops = board.bishops();
            let light_bishop = (light_minors & bishops).squares().next();
            let dark_bishop = (dark_minors & bishops).squares().next();

            match (light_bishop, dark_bishop) {
                (Some(a), Some(b)) => a.is_light_square() == b.is_light_square(),
                // Knight vs knight or bishop vs knight: mate is possible.
                _ => false,
            }
        }
        _ => false,
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.state != State::Draw {
            match self.player {
                Color::Light => write!(f, "Light")?,
                Color::Dark => write!(f, "Dark")?,
            }
        }

        match self.state {
            State::Continue => write!(f, "'s turn")?,
            State::Win => write!(f, " won")?,
            State::Draw => write!(f, "Draw")?,
        }

        match self.reason {
            Reason::Nothing => Ok(()),
            Reason::Agreement => write!(f, " by agreement"),
            Reason::Resignation => write!(f, " by resignation"),
            Reason::Checkmate => write!(f, " by checkmate"),
            Reason::Stalemate => write!(f, " by stalemate"),
            Reason::Repetition => write!(f, " by repetition"),
            Reason::FiftyMoveRule => write!(f, " by 50 move rule"),
            Reason::InsufficientMaterialOnly => write!(f, " by insufficient material"),
            Reason::TimeoutOnly => write!(f, " by timeout"),
            Reason::TimeoutAndInsufficientMaterial => {
                write!(f, " by timeout with insufficient material")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GameState, Reason, State};
    use crate::board::piece::Color;
    use crate::game::history::GameHistory;
    use crate::position::position::Position;

    fn classify(fen: &str) -> GameState {
        let position = Position::from_fen(fen).expect("FEN should parse");
        GameState::from_position(&position, &GameHistory::new())
    }

    #[test]
    fn fresh_game_continues() {
        let state = classify("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(state.state, State::Continue);
        assert_eq!(state.reason, Reason::Nothing);
        assert_eq!(state.player, Color::Light);
        assert!(state.is_game_on());
    }

    #[test]
    fn scholars_mate_is_a_win_for_light() {
        let state = classify("r1bqkbnr/pppp1Qpp/2n5/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 3");

        assert_eq!(state.state, State::Win);
        assert_eq!(state.reason, Reason::Checkmate);
        assert_eq!(state.winner(), Some(Color::Light));
        assert_eq!(state.value(true), 1);
        assert_eq!(state.value(false), -1);
        assert_eq!(state.to_string(), "Light won by checkmate");
    }

    #[test]
    fn cornered_king_is_stalemated() {
        let state = classify("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");

        assert_eq!(state.state, State::Draw);
        assert_eq!(state.reason, Reason::Stalemate);
        assert_eq!(state.value(true), 0);
    }

    #[test]
    fn hundred_quiet_halfmoves_draw() {
        let state = classify("4k3/7r/8/8/8/8/R7/4K3 w - - 100 80");
        assert_eq!(state.state, State::Draw);
        assert_eq!(state.reason, Reason::FiftyMoveRule);

        let near = classify("4k3/7r/8/8/8/8/R7/4K3 w - - 99 80");
        assert_eq!(near.state, State::Continue);
    }

    #[test]
    fn bare_minor_pieces_cannot_mate() {
        // K+B vs K, either side to move.
        for fen in ["4k3/8/8/8/8/8/8/4KB2 w - - 0 1", "4k3/8/8/8/8/8/8/4KB2 b - - 0 1"] {
            let state = classify(fen);
            assert_eq!(state.state, State::Draw);
            assert_eq!(state.reason, Reason::InsufficientMaterialOnly);
        }

        let knight = classify("4k3/8/8/8/8/8/8/4KN2 w - - 0 1");
        assert_eq!(knight.reason, Reason::InsufficientMaterialOnly);

        let kings = classify("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(kings.reason, Reason::InsufficientMaterialOnly);
    }

    #[test]
    fn same_shade_bishops_cannot_mate_but_opposite_can() {
        // Bishops on f1 and c8 share a shade.
        let same = classify("2b1k3/8/8/8/8/8/8/4KB2 w - - 0 1");
        assert_eq!(same.reason, Reason::InsufficientMaterialOnly);

        // Bishops on f1 and d8 do not.
        let opposite = classify("3bk3/8/8/8/8/8/8/4KB2 w - - 0 1");
        assert_eq!(opposite.state, State::Continue);

        // Knight against knight can still stumble into mate.
        let knights = classify("4k1n1/8/8/8/8/8/8/4KN2 w - - 0 1");
        assert_eq!(knights.state, State::Continue);
    }

    #[test]
    fn pawns_always_count_as_material() {
        let state = classify("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        assert_eq!(state.state, State::Continue);
    }

    #[test]
    fn threefold_repetition_draws() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 10 20")
            .expect("FEN should parse");

        let mut history = GameHistory::new();
        for _ in 0..3 {
            history.push(crate::position::chess_move::Move::invalid(), position.clone());
        }

        let state = GameState::from_position(&position, &history);
        assert_eq!(state.state, State::Draw);
        assert_eq!(state.reason, Reason::Repetition);
    }

    #[test]
    fn host_set_results() {
        let resigned = GameState::win_by_resignation(Color::Dark);
        assert_eq!(resigned.winner(), Some(Color::Dark));
        assert_eq!(resigned.to_string(), "Dark won by resignation");

        let agreed = GameState::draw_by_agreement();
        assert!(agreed.is_draw());
        assert_eq!(agreed.to_string(), "Draw by agreement");
    }
}
