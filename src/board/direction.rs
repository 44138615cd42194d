//! Typed direction dispatch.
//!
//! Rays are the eight sliding directions, jumps the eight knight L-shapes.
//! Both inline their bounds test and single step so that callers can walk
//! the board without indirect dispatch. Axis families (lateral, diagonal)
//! are exposed as capability queries rather than separate types.

use crate::board::square::Square;

/// One of the eight sliding directions.
///
/// "Up" points toward the top rank (row 0, rank 8), the direction Light's
/// pawns advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ray {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Ray {
    pub const ALL: [Ray; 8] = [
        Ray::Up,
        Ray::Down,
        Ray::Left,
        Ray::Right,
        Ray::UpLeft,
        Ray::UpRight,
        Ray::DownLeft,
        Ray::DownRight,
    ];

    pub const LATERALS: [Ray; 4] = [Ray::Up, Ray::Down, Ray::Left, Ray::Right];

    pub const DIAGONALS: [Ray; 4] = [Ray::UpLeft, Ray::UpRight, Ray::DownLeft, Ray::DownRight];

    /// Could one more step in this direction stay on the board?
    #[inline]
    pub fn in_bounds(self, from: Square) -> bool {
        match self {
            Ray::Up => !from.is_top_rank(),
            Ray::Down => !from.is_bot_rank(),
            Ray::Left => !from.is_left_file(),
            Ray::Right => !from.is_right_file(),
            Ray::UpLeft => !from.is_top_rank() && !from.is_left_file(),
            Ray::UpRight => !from.is_top_rank() && !from.is_right_file(),
            Ray::DownLeft => !from.is_bot_rank() && !from.is_left_file(),
            Ray::DownRight => !from.is_bot_rank() && !from.is_right_file(),
        }
    }

    /// One step in this direction. Only call when [`Ray::in_bounds`] holds.
    #[inline]
    pub fn step(self, from: Square) -> Square {
        debug_assert!(self.in_bounds(from), "ray step off the board from {from}");

        match self {
            Ray::Up => from.up_one(),
            Ray::Down => from.down_one(),
            Ray::Left => from.left_one(),
            Ray::Right => from.right_one(),
            Ray::UpLeft => from.up_left_one(),
            Ray::UpRight => from.up_right_one(),
            Ray::DownLeft => from.down_left_one(),
            Ray::DownRight => from.down_right_one(),
        }
    }

    /// One checked step: the invalid square when the move would leave the
    /// board.
    #[inline]
    pub fn checked_step(self, from: Square) -> Square {
        if self.in_bounds(from) {
            self.step(from)
        } else {
            Square::invalid()
        }
    }

    #[inline]
    pub fn is_lateral(self) -> bool {
        matches!(self, Ray::Up | Ray::Down | Ray::Left | Ray::Right)
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        !self.is_lateral()
    }

    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Ray::Up | Ray::Down)
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Ray::Left | Ray::Right)
    }
}

/// One of the eight knight L-shapes, named by the long leg first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Jump {
    UpUpLeft,
    UpUpRight,
    UpLeftLeft,
    UpRightRight,
    DownLeftLeft,
    DownRightRight,
    DownDownLeft,
    DownDownRight,
}

impl Jump {
    pub const ALL: [Jump; 8] = [
        Jump::UpUpLeft,
        Jump::UpUpRight,
        Jump::UpLeftLeft,
        Jump::UpRightRight,
        Jump::DownLeftLeft,
        Jump::DownRightRight,
        Jump::DownDownLeft,
        Jump::DownDownRight,
    ];

    /// Would this jump land on the board?
    #[inline]
    pub fn in_bounds(self, from: Square) -> bool {
        let row = from.row();
        let col = from.col();

        match self {
            Jump::UpUpLeft => row >= 2 && col >= 1,
            Jump::UpUpRight => row >= 2 && col <= 6,
            Jump::UpLeftLeft => row >= 1 && col >= 2,
            Jump::UpRightRight => row >= 1 && col <= 5,
            Jump::DownLeftLeft => row <= 6 && col >= 2,
            Jump::DownRightRight => row <= 6 && col <= 5,
            Jump::DownDownLeft => row <= 5 && col >= 1,
            Jump::DownDownRight => row <= 5 && col <= 6,
        }
    }

    /// The landing square. Only call when [`Jump::in_bounds`] holds.
    #[inline]
    pub fn step(self, from: Square) -> Square {
        debug_assert!(self.in_bounds(from), "knight jump off the board from {from}");

        let row = from.row() as i8;
        let col = from.col() as i8;
        let (row, col) = match self {
            Jump::UpUpLeft => (row - 2, col - 1),
            Jump::UpUpRight => (row - 2, col + 1),
            Jump::UpLeftLeft => (row - 1, col - 2),
            Jump::UpRightRight => (row - 1, col + 2),
            Jump::DownLeftLeft => (row + 1, col - 2),
            Jump::DownRightRight => (row + 1, col + 2),
            Jump::DownDownLeft => (row + 2, col - 1),
            Jump::DownDownRight => (row + 2, col + 1),
        };

        Square::new(row as u8, col as u8)
    }

    #[inline]
    pub fn checked_step(self, from: Square) -> Square {
        if self.in_bounds(from) {
            self.step(from)
        } else {
            Square::invalid()
        }
    }
}

/// Direction from a king to one of its checkers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ray(Ray),
    Jump(Jump),
}

impl Direction {
    #[inline]
    pub fn in_bounds(self, from: Square) -> bool {
        match self {
            Direction::Ray(ray) => ray.in_bounds(from),
            Direction::Jump(jump) => jump.in_bounds(from),
        }
    }

    #[inline]
    pub fn step(self, from: Square) -> Square {
        match self {
            Direction::Ray(ray) => ray.step(from),
            Direction::Jump(jump) => jump.step(from),
        }
    }
}
