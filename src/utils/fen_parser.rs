//! FEN-to-Position parser.
//!
//! Builds a fully-populated position from a Forsyth-Edwards Notation
//! string: piece layout, active colour, castling rights, en-passant
//! target, and both clocks.

use crate::board::board::Board;
use crate::board::piece::{Color, Piece};
use crate::board::square::Square;
use crate::position::move_counter::{FiftyMoveCounter, MoveCounter};
use crate::position::position::{
    CastlingRights, Position, CASTLE_DARK_KINGSIDE, CASTLE_DARK_QUEENSIDE,
    CASTLE_LIGHT_KINGSIDE, CASTLE_LIGHT_QUEENSIDE,
};

pub fn parse_fen(fen: &str) -> Result<Position, String> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or("Missing board layout in FEN")?;
    let side_part = parts.next().ok_or("Missing side-to-move in FEN")?;
    let castling_part = parts.next().ok_or("Missing castling rights in FEN")?;
    let en_passant_part = parts.next().ok_or("Missing en-passant square in FEN")?;
    let halfmove_part = parts.next().ok_or("Missing halfmove clock in FEN")?;
    let fullmove_part = parts.next().ok_or("Missing fullmove number in FEN")?;

    if parts.next().is_some() {
        return Err("FEN has extra trailing fields".to_owned());
    }

    let board = parse_board(board_part)?;
    let side = parse_side_to_move(side_part)?;
    let castling_rights = parse_castling_rights(castling_part)?;
    let en_passant = parse_en_passant_square(en_passant_part, side)?;

    let halfmove_clock = halfmove_part
        .parse::<u32>()
        .map_err(|_| format!("Invalid halfmove clock: {halfmove_part}"))?;
    let fullmove_number = fullmove_part
        .parse::<u32>()
        .map_err(|_| format!("Invalid fullmove number: {fullmove_part}"))?;
    if fullmove_number == 0 {
        return Err("Fullmove number must be at least 1".to_owned());
    }

    Ok(Position::from_parts(
        board,
        MoveCounter::from_fullmoves(fullmove_number, side),
        FiftyMoveCounter::from_count(halfmove_clock),
        castling_rights,
        en_passant,
    ))
}

fn parse_board(board_part: &str) -> Result<Board, String> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err("Board layout must contain 8 ranks".to_owned());
    }

    let mut board = Board::new();

    // FEN lists rank 8 first, which is row 0.
    for (row, rank_str) in ranks.iter().enumerate() {
        let mut col = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(format!("Invalid empty-square count '{ch}'"));
                }
                col += empty_count as u8;
                continue;
            }

            let piece = Piece::from_fen_char(ch)
                .ok_or_else(|| format!("Invalid piece character '{ch}' in board layout"))?;

            if col >= 8 {
                return Err("Board rank has too many files".to_owned());
            }

            board.place(Square::new(row as u8, col), piece);
            col += 1;
        }

        if col != 8 {
            return Err("Board rank does not sum to 8 files".to_owned());
        }
    }

    Ok(board)
}

fn parse_side_to_move(side_part: &str) -> Result<Color, String> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(format!("Invalid side-to-move field: {side_part}")),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, String> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;

    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_LIGHT_KINGSIDE,
            'Q' => rights |= CASTLE_LIGHT_QUEENSIDE,
            'k' => rights |= CASTLE_DARK_KINGSIDE,
            'q' => rights |= CASTLE_DARK_QUEENSIDE,
            _ => return Err(format!("Invalid castling rights character: {ch}")),
        }
    }

    Ok(rights)
}

fn parse_en_passant_square(
    en_passant_part: &str,
    side: Color,
) -> Result<Option<Square>, String> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = Square::from_lan(en_passant_part);
    if square.is_invalid() {
        return Err(format!("Invalid en-passant square: {en_passant_part}"));
    }

    // The target sits behind the opponent's double push: rank 6 when Light
    // is to move, rank 3 when Dark is.
    let expected_row = match side {
        Color::Light => 2,
        Color::Dark => 5,
    };
    if square.row() != expected_row {
        return Err(format!(
            "En-passant square {en_passant_part} does not match the side to move"
        ));
    }

    Ok(Some(square))
}
