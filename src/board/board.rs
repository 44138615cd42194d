//! Piece layout as overlapping bitboards.
//!
//! One bitboard per colour/kind pair. Union views (occupancy, ray pieces,
//! blockers, ...) are derived on demand so the disjointness invariant holds
//! by construction: a square is set in at most one kind board per colour.

use crate::board::bitboard::BitBoard;
use crate::board::piece::{Color, Piece, PieceKind};
use crate::board::square::Square;

/// Piece placement for both sides, indexed `[colour][kind]`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct Board {
    pieces: [[BitBoard; 6]; 2],
}

impl Board {
    #[inline]
    pub fn new() -> Self {
        Board::default()
    }

    /// The bitboard for one colour/kind pair.
    #[inline]
    pub fn bb(&self, color: Color, kind: PieceKind) -> BitBoard {
        self.pieces[color.index()][kind.index()]
    }

    /// All of one colour's pieces.
    #[inline]
    pub fn color(&self, color: Color) -> BitBoard {
        let side = &self.pieces[color.index()];
        side[0] | side[1] | side[2] | side[3] | side[4] | side[5]
    }

    #[inline]
    pub fn lights(&self) -> BitBoard {
        self.color(Color::Light)
    }

    #[inline]
    pub fn darks(&self) -> BitBoard {
        self.color(Color::Dark)
    }

    /// Both colours of one kind.
    #[inline]
    pub fn kind(&self, kind: PieceKind) -> BitBoard {
        self.pieces[0][kind.index()] | self.pieces[1][kind.index()]
    }

    #[inline]
    pub fn pawns(&self) -> BitBoard {
        self.kind(PieceKind::Pawn)
    }

    #[inline]
    pub fn knights(&self) -> BitBoard {
        self.kind(PieceKind::Knight)
    }

    #[inline]
    pub fn bishops(&self) -> BitBoard {
        self.kind(PieceKind::Bishop)
    }

    #[inline]
    pub fn rooks(&self) -> BitBoard {
        self.kind(PieceKind::Rook)
    }

    #[inline]
    pub fn queens(&self) -> BitBoard {
        self.kind(PieceKind::Queen)
    }

    #[inline]
    pub fn kings(&self) -> BitBoard {
        self.kind(PieceKind::King)
    }

    /// Sliding pieces of both colours.
    #[inline]
    pub fn rays(&self) -> BitBoard {
        self.bishops() | self.rooks() | self.queens()
    }

    #[inline]
    pub fn laterals(&self) -> BitBoard {
        self.rooks() | self.queens()
    }

    #[inline]
    pub fn diagonals(&self) -> BitBoard {
        self.bishops() | self.queens()
    }

    /// Non-sliding pieces: pawns, knights, and kings.
    #[inline]
    pub fn blockers(&self) -> BitBoard {
        self.pawns() | self.knights() | self.kings()
    }

    #[inline]
    pub fn occupied(&self) -> BitBoard {
        self.lights() | self.darks()
    }

    #[inline]
    pub fn empty(&self) -> BitBoard {
        !self.occupied()
    }

    /// The king square of one colour, or the invalid square on a malformed
    /// board with no such king.
    pub fn king_square(&self, color: Color) -> Square {
        let kings = self.bb(color, PieceKind::King);
        debug_assert!(kings.count() == 1, "board must hold exactly one {color:?} king");

        kings.squares().next().unwrap_or(Square::invalid())
    }

    /// The piece on `square`, if any.
    pub fn at(&self, square: Square) -> Option<Piece> {
        for color in [Color::Light, Color::Dark] {
            for kind in PieceKind::ALL {
                if self.bb(color, kind).get(square) {
                    return Some(Piece::new(color, kind));
                }
            }
        }

        None
    }

    #[inline]
    pub fn is_occupied(&self, square: Square) -> bool {
        self.occupied().get(square)
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        !self.is_occupied(square)
    }

    #[inline]
    pub fn is_pawn(&self, square: Square) -> bool {
        self.pawns().get(square)
    }

    #[inline]
    pub fn is_king(&self, square: Square) -> bool {
        self.kings().get(square)
    }

    #[inline]
    pub fn is_light(&self, square: Square) -> bool {
        self.lights().get(square)
    }

    #[inline]
    pub fn is_dark(&self, square: Square) -> bool {
        self.darks().get(square)
    }

    /// Places `piece` on `square`, displacing whatever was there.
    pub fn place(&mut self, square: Square, piece: Piece) {
        self.remove(square);
        self.pieces[piece.color.index()][piece.kind.index()].set(square);
    }

    /// Clears `square` on every bitboard.
    pub fn remove(&mut self, square: Square) {
        for side in &mut self.pieces {
            for bb in side.iter_mut() {
                bb.clear(square);
            }
        }
    }

    /// Moves the piece on `from` to `to`, removing any victim on `to`
    /// first. `from` must be occupied.
    pub fn move_piece(&mut self, from: Square, to: Square) {
        debug_assert!(self.is_occupied(from), "no piece to move on {from}");

        if let Some(piece) = self.at(from) {
            self.remove(to);
            self.pieces[piece.color.index()][piece.kind.index()].clear(from);
            self.pieces[piece.color.index()][piece.kind.index()].set(to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Board;
    use crate::board::piece::{Color, Piece, PieceKind};
    use crate::board::square::Square;

    fn piece(color: Color, kind: PieceKind) -> Piece {
        Piece::new(color, kind)
    }

    #[test]
    fn place_query_remove() {
        let mut board = Board::new();
        let e4 = Square::from_lan("e4");

        board.place(e4, piece(Color::Light, PieceKind::Queen));
        assert_eq!(board.at(e4), Some(piece(Color::Light, PieceKind::Queen)));
        assert!(board.is_occupied(e4));
        assert!(board.is_light(e4));

        board.remove(e4);
        assert!(board.is_empty(e4));
        assert_eq!(board.at(e4), None);
    }

    #[test]
    fn placing_over_a_piece_keeps_boards_disjoint() {
        let mut board = Board::new();
        let d5 = Square::from_lan("d5");

        board.place(d5, piece(Color::Light, PieceKind::Knight));
        board.place(d5, piece(Color::Dark, PieceKind::Rook));

        assert_eq!(board.at(d5), Some(piece(Color::Dark, PieceKind::Rook)));
        assert_eq!(board.occupied().count(), 1);
        assert!(board.lights().none());
    }

    #[test]
    fn capture_via_move_piece() {
        let mut board = Board::new();
        let a1 = Square::from_lan("a1");
        let a8 = Square::from_lan("a8");

        board.place(a1, piece(Color::Light, PieceKind::Rook));
        board.place(a8, piece(Color::Dark, PieceKind::Rook));
        board.move_piece(a1, a8);

        assert_eq!(board.at(a8), Some(piece(Color::Light, PieceKind::Rook)));
        assert!(board.is_empty(a1));
        assert_eq!(board.occupied().count(), 1);
    }

    #[test]
    fn union_views_partition_by_capability() {
        let mut board = Board::new();
        board.place(Square::from_lan("a1"), piece(Color::Light, PieceKind::Rook));
        board.place(Square::from_lan("c1"), piece(Color::Light, PieceKind::Bishop));
        board.place(Square::from_lan("d1"), piece(Color::Light, PieceKind::Queen));
        board.place(Square::from_lan("b1"), piece(Color::Light, PieceKind::Knight));
        board.place(Square::from_lan("e1"), piece(Color::Light, PieceKind::King));
        board.place(Square::from_lan("a2"), piece(Color::Light, PieceKind::Pawn));

        assert_eq!(board.rays().count(), 3);
        assert_eq!(board.laterals().count(), 2);
        assert_eq!(board.diagonals().count(), 2);
        assert_eq!(board.blockers().count(), 3);
        assert_eq!(board.occupied().count(), 6);
    }

    #[test]
    fn king_square_lookup() {
        let mut board = Board::new();
        let g1 = Square::from_lan("g1");
        let g8 = Square::from_lan("g8");
        board.place(g1, piece(Color::Light, PieceKind::King));
        board.place(g8, piece(Color::Dark, PieceKind::King));

        assert_eq!(board.king_square(Color::Light), g1);
        assert_eq!(board.king_square(Color::Dark), g8);
    }
}
