pub mod board;
pub mod game;
pub mod move_generation;
pub mod position;
pub mod utils;
