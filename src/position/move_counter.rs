//! Halfmove bookkeeping: whose turn it is and the fifty-move clock.

use crate::board::piece::Color;

/// Count of halfmoves played since the start of the game.
///
/// The parity names the side to move: even counts mean Light is thinking.
/// FEN's fullmove number is derived as `count / 2 + 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveCounter {
    count: u32,
}

impl MoveCounter {
    #[inline]
    pub fn new() -> Self {
        MoveCounter::default()
    }

    /// Seeds the counter from a FEN fullmove number and active colour.
    #[inline]
    pub fn from_fullmoves(fullmoves: u32, side: Color) -> Self {
        let fullmoves = fullmoves.max(1);
        MoveCounter {
            count: (fullmoves - 1) * 2 + side.index() as u32,
        }
    }

    #[inline]
    pub fn is_lights_turn(&self) -> bool {
        self.count % 2 == 0
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        if self.is_lights_turn() {
            Color::Light
        } else {
            Color::Dark
        }
    }

    #[inline]
    pub fn halfmoves(&self) -> u32 {
        self.count
    }

    /// The FEN fullmove number.
    #[inline]
    pub fn fullmoves(&self) -> u32 {
        self.count / 2 + 1
    }

    #[inline]
    pub fn increment(&mut self) {
        self.count += 1;
    }
}

/// Halfmoves since the last irreversible move (capture or pawn move).
///
/// Captures and pawn moves flag a pending reset; the following
/// [`FiftyMoveCounter::update`] then zeroes the clock instead of
/// incrementing it. One hundred halfmoves on the clock is the draw
/// threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FiftyMoveCounter {
    count: u32,
    reset_pending: bool,
}

impl FiftyMoveCounter {
    #[inline]
    pub fn new() -> Self {
        FiftyMoveCounter::default()
    }

    /// Seeds the clock from a FEN halfmove field.
    #[inline]
    pub fn from_count(count: u32) -> Self {
        FiftyMoveCounter {
            count,
            reset_pending: false,
        }
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Flags the move being applied as a capture.
    #[inline]
    pub fn piece_captured(&mut self) {
        self.reset_pending = true;
    }

    /// Flags the move being applied as a pawn move.
    #[inline]
    pub fn pawn_has_moved(&mut self) {
        self.reset_pending = true;
    }

    /// Advances the clock for the move being applied.
    #[inline]
    pub fn update(&mut self) {
        if self.reset_pending {
            self.count = 0;
            self.reset_pending = false;
        } else {
            self.count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FiftyMoveCounter, MoveCounter};
    use crate::board::piece::Color;

    #[test]
    fn parity_names_the_side_to_move() {
        let mut counter = MoveCounter::new();
        assert!(counter.is_lights_turn());
        assert_eq!(counter.side_to_move(), Color::Light);

        counter.increment();
        assert_eq!(counter.side_to_move(), Color::Dark);

        counter.increment();
        assert_eq!(counter.side_to_move(), Color::Light);
    }

    #[test]
    fn fullmove_numbers_follow_fen_convention() {
        let mut counter = MoveCounter::new();
        assert_eq!(counter.fullmoves(), 1);

        counter.increment(); // Light played.
        assert_eq!(counter.fullmoves(), 1);

        counter.increment(); // Dark played.
        assert_eq!(counter.fullmoves(), 2);
    }

    #[test]
    fn fullmove_seeding_preserves_parity() {
        let light = MoveCounter::from_fullmoves(12, Color::Light);
        assert!(light.is_lights_turn());
        assert_eq!(light.fullmoves(), 12);

        let dark = MoveCounter::from_fullmoves(12, Color::Dark);
        assert!(!dark.is_lights_turn());
        assert_eq!(dark.fullmoves(), 12);
    }

    #[test]
    fn fifty_move_clock_resets_on_irreversible_moves() {
        let mut clock = FiftyMoveCounter::new();
        clock.update();
        clock.update();
        assert_eq!(clock.count(), 2);

        clock.pawn_has_moved();
        clock.update();
        assert_eq!(clock.count(), 0);

        clock.update();
        assert_eq!(clock.count(), 1);

        clock.piece_captured();
        clock.update();
        assert_eq!(clock.count(), 0);
    }
}
