//! Game-level services above the generator: terminal classification and
//! the played-move history with its repetition bookkeeping.

pub mod game_state;
pub mod history;
