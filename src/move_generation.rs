//! Legal move generation: threat maps, checker discovery, the
//! pin-and-check-aware generator itself, and the perft oracle over it.

pub mod attackers;
pub mod generator;
pub mod king_attackers;
pub mod move_list;
pub mod perft;
pub mod threats;
