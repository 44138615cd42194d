//! Attack maps: every square a side currently attacks.

use crate::board::bitboard::BitBoard;
use crate::board::board::Board;
use crate::board::direction::Ray;
use crate::board::piece::{Color, PieceKind};
use crate::board::square::Square;

/// Every square attacked by `attacker`'s pieces.
///
/// The defender's king is removed from the blocking occupancy before rays
/// are traced, so the map stays hot *behind* a checked king: a king may
/// not step backwards along the ray that checks it. Blockers themselves
/// count as attacked (they can be captured); squares beyond them do not.
pub fn attacked_squares(board: &Board, attacker: Color) -> BitBoard {
    let defender_king = board.bb(attacker.opposite(), PieceKind::King);
    let occupied = board.occupied() & !defender_king;

    let mut threats = BitBoard::EMPTY;

    // Pawn diagonals, as two whole-set shifts.
    let pawns = board.bb(attacker, PieceKind::Pawn);
    let (left, right) = match attacker {
        Color::Light => (Ray::UpLeft, Ray::UpRight),
        Color::Dark => (Ray::DownLeft, Ray::DownRight),
    };
    threats |= pawns.shifted(left) | pawns.shifted(right);

    for knight in board.bb(attacker, PieceKind::Knight).squares() {
        threats |= BitBoard::knight_targets(knight);
    }

    for king in board.bb(attacker, PieceKind::King).squares() {
        for ray in Ray::ALL {
            if ray.in_bounds(king) {
                threats.set(ray.step(king));
            }
        }
    }

    let diagonal_movers =
        board.bb(attacker, PieceKind::Bishop) | board.bb(attacker, PieceKind::Queen);
    for piece in diagonal_movers.squares() {
        for ray in Ray::DIAGONALS {
            threats |= trace_ray(piece, ray, occupied);
        }
    }

    let lateral_movers =
        board.bb(attacker, PieceKind::Rook) | board.bb(attacker, PieceKind::Queen);
    for piece in lateral_movers.squares() {
        for ray in Ray::LATERALS {
            threats |= trace_ray(piece, ray, occupied);
        }
    }

    threats
}

/// True when `color`'s king stands on a square the opponent attacks.
pub fn is_king_attacked(board: &Board, color: Color) -> bool {
    let king = board.king_square(color);
    king.is_valid() && attacked_squares(board, color.opposite()).get(king)
}

fn trace_ray(from: Square, ray: Ray, occupied: BitBoard) -> BitBoard {
    let mut attacks = BitBoard::EMPTY;
    let mut cursor = from;

    while ray.in_bounds(cursor) {
        cursor = ray.step(cursor);
        attacks.set(cursor);

        if occupied.get(cursor) {
            break;
        }
    }

    attacks
}
