//! The position data model: move encoding, halfmove bookkeeping, and the
//! position type the move generator reads and the applier mutates.

pub mod chess_move;
pub mod move_counter;
pub mod position;
