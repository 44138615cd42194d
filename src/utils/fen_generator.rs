//! Position-to-FEN writer, the inverse of [`crate::utils::fen_parser`].

use crate::board::square::Square;
use crate::position::position::{
    Position, CASTLE_DARK_KINGSIDE, CASTLE_DARK_QUEENSIDE, CASTLE_LIGHT_KINGSIDE,
    CASTLE_LIGHT_QUEENSIDE,
};

pub fn generate_fen(position: &Position) -> String {
    let mut out = String::with_capacity(90);

    write_board(position, &mut out);
    out.push(' ');
    out.push(if position.is_lights_turn() { 'w' } else { 'b' });
    out.push(' ');
    write_castling(position, &mut out);
    out.push(' ');
    match position.en_passant() {
        Some(square) => out.push_str(&square.to_lan()),
        None => out.push('-'),
    }
    out.push_str(&format!(
        " {} {}",
        position.fifty_move_rule().count(),
        position.move_counter().fullmoves()
    ));

    out
}

fn write_board(position: &Position, out: &mut String) {
    let board = position.board();

    // Row 0 is rank 8, FEN's first rank field.
    for row in 0..8u8 {
        let mut empty_run = 0u8;

        for col in 0..8u8 {
            match board.at(Square::new(row, col)) {
                Some(piece) => {
                    if empty_run != 0 {
                        out.push(char::from(b'0' + empty_run));
                        empty_run = 0;
                    }
                    out.push(piece.to_fen_char());
                }
                None => empty_run += 1,
            }
        }

        if empty_run != 0 {
            out.push(char::from(b'0' + empty_run));
        }
        if row != 7 {
            out.push('/');
        }
    }
}

fn write_castling(position: &Position, out: &mut String) {
    let rights = position.castling_rights();
    if rights == 0 {
        out.push('-');
        return;
    }

    if rights & CASTLE_LIGHT_KINGSIDE != 0 {
        out.push('K');
    }
    if rights & CASTLE_LIGHT_QUEENSIDE != 0 {
        out.push('Q');
    }
    if rights & CASTLE_DARK_KINGSIDE != 0 {
        out.push('k');
    }
    if rights & CASTLE_DARK_QUEENSIDE != 0 {
        out.push('q');
    }
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::position::position::{Position, STARTING_POSITION_FEN};

    #[test]
    fn starting_position_round_trips() {
        let pos = Position::new_game();
        assert_eq!(generate_fen(&pos), STARTING_POSITION_FEN);
    }

    #[test]
    fn arbitrary_positions_round_trip() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "4k3/8/8/8/4Pp2/8/8/4K3 b - e3 12 34",
            "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1",
        ];

        for fen in fens {
            let pos = Position::from_fen(fen).expect("FEN should parse");
            assert_eq!(generate_fen(&pos), fen);
        }
    }
}
