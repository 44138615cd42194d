//! The legal move generator.
//!
//! Organised around king safety from the start rather than filtering
//! pseudo-legal moves afterwards: checkers are found first, absolute pins
//! next, and every emission path below consults them. Per call the
//! generator snapshots the position into scratch bitboards; it never
//! outlives the call or retains the borrowed position.

use crate::board::bitboard::BitBoard;
use crate::board::board::Board;
use crate::board::direction::{Direction, Jump, Ray};
use crate::board::piece::{Color, PieceKind};
use crate::board::square::Square;
use crate::move_generation::attackers::{find_attacking_jump, find_attacking_ray};
use crate::move_generation::king_attackers::{KingAttacker, KingAttackers};
use crate::move_generation::move_list::MoveList;
use crate::move_generation::threats::{attacked_squares, is_king_attacked};
use crate::position::chess_move::Move;
use crate::position::position::{
    Position, CASTLE_DARK_KINGSIDE, CASTLE_DARK_QUEENSIDE, CASTLE_LIGHT_KINGSIDE,
    CASTLE_LIGHT_QUEENSIDE,
};

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Per-call scratch state for one `generate` run.
pub struct MoveGenerator<'a> {
    position: &'a Position,
    board: &'a Board,
    our_color: Color,
    their_color: Color,

    occupied: BitBoard,
    empty: BitBoard,
    ours: BitBoard,
    theirs: BitBoard,
    our_king: Square,

    our_laterals: BitBoard,
    our_diagonals: BitBoard,
    their_laterals: BitBoard,
    their_diagonals: BitBoard,

    /// Squares the enemy attacks, with our king lifted off the board so it
    /// cannot retreat along a checking ray.
    threats: BitBoard,

    /// Our pieces that may not leave their pin ray.
    our_absolute_pins: BitBoard,

    legal_moves: MoveList,
}

impl<'a> MoveGenerator<'a> {
    /// Every legal move at `position`, paired with its successor position.
    pub fn generate(position: &Position) -> MoveList {
        let mut gen = MoveGenerator::preprocess(position);
        gen.run();
        gen.legal_moves
    }

    fn preprocess(position: &'a Position) -> Self {
        let board = position.board();
        let our_color = position.side_to_move();
        let their_color = our_color.opposite();

        let ours = board.color(our_color);
        let theirs = board.color(their_color);

        MoveGenerator {
            position,
            board,
            our_color,
            their_color,

            occupied: board.occupied(),
            empty: board.empty(),
            ours,
            theirs,
            our_king: board.king_square(our_color),

            our_laterals: ours & board.laterals(),
            our_diagonals: ours & board.diagonals(),
            their_laterals: theirs & board.laterals(),
            their_diagonals: theirs & board.diagonals(),

            threats: attacked_squares(board, their_color),
            our_absolute_pins: BitBoard::EMPTY,

            legal_moves: MoveList::new(),
        }
    }

    fn run(&mut self) {
        let attackers = KingAttackers::find(self.board, self.our_king, self.their_color);

        // King moves are legal under any number of checkers.
        self.gen_king_moves();

        match attackers.len() {
            0 => {
                self.gen_pin_moves(false);
                self.gen_free_moves();
                self.gen_castling_moves();
                self.gen_en_passant_moves();
            }
            1 => {
                // Pins first: block-and-capture must not recruit a pinned
                // piece.
                self.gen_pin_moves(true);
                if let Some(attacker) = attackers.get(0) {
                    self.gen_block_and_capture(attacker);
                }
                self.gen_en_passant_moves();
            }
            // Double check: nothing but the king can help.
            _ => {}
        }
    }

    // ---------------------------------------------------------- king moves

    fn gen_king_moves(&mut self) {
        let open = !(self.ours | self.threats);

        for ray in Ray::ALL {
            if !ray.in_bounds(self.our_king) {
                continue;
            }

            let to = ray.step(self.our_king);
            if open.get(to) {
                self.legal_moves
                    .push(PieceKind::King, Move::new(self.our_king, to), self.position);
            }
        }
    }

    // ----------------------------------------------------------------- pins

    /// Finds absolute pins against our king. With `search_only` the pins
    /// are only recorded; otherwise each pinned piece's legal moves along
    /// its pin ray are emitted as well.
    fn gen_pin_moves(&mut self, search_only: bool) {
        // Family fast-reject: a pin needs an enemy ray piece of the
        // matching family somewhere on the cross or X through our king.
        if (self.their_diagonals & BitBoard::diagonal_x(self.our_king)).any() {
            for ray in Ray::DIAGONALS {
                self.search_and_generate_pins(ray, search_only);
            }
        }

        if (self.their_laterals & BitBoard::lateral_cross(self.our_king)).any() {
            for ray in Ray::LATERALS {
                self.search_and_generate_pins(ray, search_only);
            }
        }
    }

    fn search_and_generate_pins(&mut self, ray: Ray, search_only: bool) {
        let matching_enemy_rays = if ray.is_lateral() {
            self.their_laterals
        } else {
            self.their_diagonals
        };

        let mut candidate: Option<Square> = None;
        let mut cursor = self.our_king;

        while ray.in_bounds(cursor) {
            cursor = ray.step(cursor);

            if !self.occupied.get(cursor) {
                continue;
            }

            if self.ours.get(cursor) {
                if candidate.is_some() {
                    // Two of ours shield the king along this ray.
                    return;
                }
                candidate = Some(cursor);
                continue;
            }

            // First enemy piece along the ray.
            if let Some(pinned) = candidate {
                if matching_enemy_rays.get(cursor) {
                    self.our_absolute_pins.set(pinned);

                    if !search_only {
                        self.gen_pinned_piece_moves(pinned, cursor, ray);
                    }
                }
            }
            return;
        }
    }

    /// Moves of an absolutely pinned piece: slides on the pin ray between
    /// king and pinner, plus the pinner capture, when the piece's attack
    /// family covers the ray.
    fn gen_pinned_piece_moves(&mut self, pinned: Square, pinner: Square, ray: Ray) {
        let Some(piece) = self.board.at(pinned) else {
            return;
        };

        match piece.kind {
            PieceKind::Knight => {
                // Pinned knights never move.
            }
            PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen => {
                let slides = (ray.is_lateral() && piece.kind.is_lateral())
                    || (ray.is_diagonal() && piece.kind.is_diagonal());
                if !slides {
                    return;
                }

                let mut to = ray.step(self.our_king);
                while to != pinner {
                    if to != pinned {
                        self.legal_moves
                            .push(piece.kind, Move::new(pinned, to), self.position);
                    }
                    to = ray.step(to);
                }
                self.legal_moves
                    .push(piece.kind, Move::new(pinned, pinner), self.position);
            }
            PieceKind::Pawn => self.gen_pinned_pawn_moves(pinned, pinner, ray),
            PieceKind::King => {
                debug_assert!(false, "a king cannot be pinned to itself");
            }
        }
    }

    fn gen_pinned_pawn_moves(&mut self, pawn: Square, pinner: Square, ray: Ray) {
        if ray.is_vertical() {
            // Pushes stay on the pin file.
            let (forward, start_row) = match self.our_color {
                Color::Light => (Ray::Up, 6),
                Color::Dark => (Ray::Down, 1),
            };

            let push1 = forward.checked_step(pawn);
            if push1.is_valid() && self.empty.get(push1) {
                self.legal_moves
                    .push(PieceKind::Pawn, Move::new(pawn, push1), self.position);

                if pawn.row() == start_row {
                    let push2 = forward.step(push1);
                    if self.empty.get(push2) {
                        self.legal_moves
                            .push(PieceKind::Pawn, Move::new(pawn, push2), self.position);
                    }
                }
            }
        } else if ray.is_diagonal() {
            // The only capture that keeps the pin appeased is the pinner
            // itself, one step along the pawn's attack diagonal.
            let capture_rays = match self.our_color {
                Color::Light => [Ray::UpLeft, Ray::UpRight],
                Color::Dark => [Ray::DownLeft, Ray::DownRight],
            };
            let promotion_row = match self.our_color {
                Color::Light => 0,
                Color::Dark => 7,
            };

            for capture_ray in capture_rays {
                if capture_ray.checked_step(pawn) != pinner {
                    continue;
                }

                if pinner.row() == promotion_row {
                    for kind in PROMOTION_KINDS {
                        self.legal_moves.push(
                            PieceKind::Pawn,
                            Move::with_promotion(pawn, pinner, kind),
                            self.position,
                        );
                    }
                } else {
                    self.legal_moves
                        .push(PieceKind::Pawn, Move::new(pawn, pinner), self.position);
                }
            }
        }
        // A horizontally pinned pawn has no moves.
    }

    // ------------------------------------------------------ check responses

    /// One checker: every non-king answer either blocks the checking ray
    /// or captures the checker. Walks the squares from the king toward the
    /// checker and recruits unpinned pieces that can reach each one.
    fn gen_block_and_capture(&mut self, attacker: &KingAttacker) {
        let Some(attacker_piece) = self.board.at(attacker.square) else {
            debug_assert!(false, "checker square {} is empty", attacker.square);
            return;
        };

        // Rays can be blocked; knights and pawns can only be captured.
        let mut square = if attacker_piece.is_ray() {
            match attacker.dir {
                Direction::Ray(ray) if ray.in_bounds(self.our_king) => ray.step(self.our_king),
                _ => attacker.square,
            }
        } else {
            attacker.square
        };

        loop {
            let not_pinned = !self.our_absolute_pins;

            let lateral_helpers =
                self.our_laterals & BitBoard::lateral_cross(square) & not_pinned;
            if lateral_helpers.any() {
                for ray in Ray::LATERALS {
                    self.capture_with_ray(square, lateral_helpers, ray);
                }
            }

            let diagonal_helpers =
                self.our_diagonals & BitBoard::diagonal_x(square) & not_pinned;
            if diagonal_helpers.any() {
                for ray in Ray::DIAGONALS {
                    self.capture_with_ray(square, diagonal_helpers, ray);
                }
            }

            let knight_helpers =
                self.board.knights() & self.ours & BitBoard::knight_targets(square) & not_pinned;
            if knight_helpers.any() {
                for jump in Jump::ALL {
                    self.capture_with_knight(square, knight_helpers, jump);
                }
            }

            if square == attacker.square {
                break;
            }
            square = attacker.dir.step(square);
        }

        self.gen_pawn_block_and_capture(attacker, attacker_piece.is_ray());
    }

    /// Emits a block or capture onto `victim` by the nearest helper along
    /// `ray`, if one exists.
    fn capture_with_ray(&mut self, victim: Square, helpers: BitBoard, ray: Ray) {
        let mover = find_attacking_ray(victim, self.board, helpers, ray);
        if mover.is_valid() {
            self.legal_moves.push_any(Move::new(mover, victim), self.position);
        }
    }

    fn capture_with_knight(&mut self, victim: Square, helpers: BitBoard, jump: Jump) {
        let mover = find_attacking_jump(victim, helpers, jump);
        if mover.is_valid() {
            self.legal_moves
                .push(PieceKind::Knight, Move::new(mover, victim), self.position);
        }
    }

    /// Pawn answers to a single checker: pushes (and double pushes, and
    /// push promotions) onto the squares strictly between king and a ray
    /// checker, captures (and capture promotions) onto the checker itself.
    fn gen_pawn_block_and_capture(&mut self, attacker: &KingAttacker, attacker_is_ray: bool) {
        let useful_pawns = self.ours & self.board.pawns() & !self.our_absolute_pins;
        if useful_pawns.none() {
            return;
        }

        // Directions here run from the square to be reached back to the
        // pawn that could reach it.
        let (toward_pawn, capture_origins, promotion_row, start_row) = match self.our_color {
            Color::Light => (Ray::Down, [Ray::DownLeft, Ray::DownRight], 0u8, 6u8),
            Color::Dark => (Ray::Up, [Ray::UpLeft, Ray::UpRight], 7u8, 1u8),
        };

        if attacker_is_ray {
            if let Direction::Ray(ray) = attacker.dir {
                let mut square = ray.step(self.our_king);

                while square != attacker.square {
                    // Push one square onto the blocking square.
                    let pawn1 = toward_pawn.checked_step(square);
                    if pawn1.is_valid() && useful_pawns.get(pawn1) {
                        if square.row() == promotion_row {
                            for kind in PROMOTION_KINDS {
                                self.legal_moves.push(
                                    PieceKind::Pawn,
                                    Move::with_promotion(pawn1, square, kind),
                                    self.position,
                                );
                            }
                        } else {
                            self.legal_moves.push(
                                PieceKind::Pawn,
                                Move::new(pawn1, square),
                                self.position,
                            );
                        }
                    }

                    // Double push through an empty intermediate square.
                    if pawn1.is_valid() && self.empty.get(pawn1) {
                        let pawn2 = toward_pawn.checked_step(pawn1);
                        if pawn2.is_valid()
                            && useful_pawns.get(pawn2)
                            && pawn2.row() == start_row
                        {
                            self.legal_moves.push(
                                PieceKind::Pawn,
                                Move::new(pawn2, square),
                                self.position,
                            );
                        }
                    }

                    square = ray.step(square);
                }
            }
        }

        // Captures of the checker itself.
        for origin in capture_origins {
            let pawn = origin.checked_step(attacker.square);
            if pawn.is_invalid() || !useful_pawns.get(pawn) {
                continue;
            }

            if attacker.square.row() == promotion_row {
                for kind in PROMOTION_KINDS {
                    self.legal_moves.push(
                        PieceKind::Pawn,
                        Move::with_promotion(pawn, attacker.square, kind),
                        self.position,
                    );
                }
            } else {
                self.legal_moves.push(
                    PieceKind::Pawn,
                    Move::new(pawn, attacker.square),
                    self.position,
                );
            }
        }
    }

    // ------------------------------------------------------------ free moves

    /// No checkers: every unpinned piece moves freely. Kings are covered
    /// by the dedicated pass, pinned pieces by the pin pass.
    fn gen_free_moves(&mut self) {
        for square in (self.ours & !self.our_absolute_pins).squares() {
            let Some(piece) = self.board.at(square) else {
                continue;
            };

            match piece.kind {
                PieceKind::Pawn => self.gen_free_pawn_moves(square),
                PieceKind::Rook => {
                    for ray in Ray::LATERALS {
                        self.gen_ray_moves(square, PieceKind::Rook, ray);
                    }
                }
                PieceKind::Bishop => {
                    for ray in Ray::DIAGONALS {
                        self.gen_ray_moves(square, PieceKind::Bishop, ray);
                    }
                }
                PieceKind::Queen => {
                    for ray in Ray::ALL {
                        self.gen_ray_moves(square, PieceKind::Queen, ray);
                    }
                }
                PieceKind::Knight => self.gen_free_knight_moves(square),
                PieceKind::King => {}
            }
        }
    }

    fn gen_ray_moves(&mut self, from: Square, kind: PieceKind, ray: Ray) {
        let mut to = from;

        while ray.in_bounds(to) {
            to = ray.step(to);

            if self.occupied.get(to) {
                if self.theirs.get(to) {
                    self.legal_moves.push(kind, Move::new(from, to), self.position);
                }
                break;
            }

            self.legal_moves.push(kind, Move::new(from, to), self.position);
        }
    }

    fn gen_free_knight_moves(&mut self, from: Square) {
        for jump in Jump::ALL {
            let to = jump.checked_step(from);
            if to.is_valid() && !self.ours.get(to) {
                self.legal_moves
                    .push(PieceKind::Knight, Move::new(from, to), self.position);
            }
        }
    }

    fn gen_free_pawn_moves(&mut self, pawn: Square) {
        let (forward, capture_rays, promotion_row, start_row) = match self.our_color {
            Color::Light => (Ray::Up, [Ray::UpLeft, Ray::UpRight], 0u8, 6u8),
            Color::Dark => (Ray::Down, [Ray::DownLeft, Ray::DownRight], 7u8, 1u8),
        };

        let push1 = forward.checked_step(pawn);
        if push1.is_valid() && self.empty.get(push1) {
            if push1.row() == promotion_row {
                for kind in PROMOTION_KINDS {
                    self.legal_moves.push(
                        PieceKind::Pawn,
                        Move::with_promotion(pawn, push1, kind),
                        self.position,
                    );
                }
            } else {
                self.legal_moves
                    .push(PieceKind::Pawn, Move::new(pawn, push1), self.position);

                if pawn.row() == start_row {
                    let push2 = forward.step(push1);
                    if self.empty.get(push2) {
                        self.legal_moves
                            .push(PieceKind::Pawn, Move::new(pawn, push2), self.position);
                    }
                }
            }
        }

        for capture_ray in capture_rays {
            let to = capture_ray.checked_step(pawn);
            if to.is_invalid() || !self.theirs.get(to) {
                continue;
            }

            if to.row() == promotion_row {
                for kind in PROMOTION_KINDS {
                    self.legal_moves.push(
                        PieceKind::Pawn,
                        Move::with_promotion(pawn, to, kind),
                        self.position,
                    );
                }
            } else {
                self.legal_moves
                    .push(PieceKind::Pawn, Move::new(pawn, to), self.position);
            }
        }
    }

    // ------------------------------------------------------ special moves

    /// Castles, only reachable with no checkers. The rights bits are
    /// verified against the actual king and rook placement so a loose FEN
    /// cannot conjure a castle out of thin air.
    fn gen_castling_moves(&mut self) {
        let rights = self.position.castling_rights();
        let (kingside, queenside, row) = match self.our_color {
            Color::Light => (CASTLE_LIGHT_KINGSIDE, CASTLE_LIGHT_QUEENSIDE, 7u8),
            Color::Dark => (CASTLE_DARK_KINGSIDE, CASTLE_DARK_QUEENSIDE, 0u8),
        };

        let king_home = Square::new(row, 4);
        if self.our_king != king_home {
            return;
        }

        let our_rooks = self.board.bb(self.our_color, PieceKind::Rook);

        if rights & kingside != 0 && our_rooks.get(Square::new(row, 7)) {
            let f = Square::new(row, 5);
            let g = Square::new(row, 6);

            if self.empty.get(f)
                && self.empty.get(g)
                && !self.threats.get(f)
                && !self.threats.get(g)
            {
                self.legal_moves
                    .push(PieceKind::King, Move::new(king_home, g), self.position);
            }
        }

        if rights & queenside != 0 && our_rooks.get(Square::new(row, 0)) {
            let d = Square::new(row, 3);
            let c = Square::new(row, 2);
            let b = Square::new(row, 1);

            // The knight square only needs to be empty; the king never
            // crosses it.
            if self.empty.get(d)
                && self.empty.get(c)
                && self.empty.get(b)
                && !self.threats.get(d)
                && !self.threats.get(c)
            {
                self.legal_moves
                    .push(PieceKind::King, Move::new(king_home, c), self.position);
            }
        }
    }

    /// En passant. Candidates are cheap to enumerate but the capture
    /// removes two pieces from one rank at once, which no pin ray
    /// describes; each candidate is validated on a scratch copy instead.
    fn gen_en_passant_moves(&mut self) {
        let Some(target) = self.position.en_passant() else {
            return;
        };

        let capture_origins = match self.our_color {
            Color::Light => [Ray::DownLeft, Ray::DownRight],
            Color::Dark => [Ray::UpLeft, Ray::UpRight],
        };
        let our_pawns = self.ours & self.board.pawns();

        for origin in capture_origins {
            let pawn = origin.checked_step(target);
            if pawn.is_invalid() || !our_pawns.get(pawn) {
                continue;
            }

            let mv = Move::new(pawn, target);
            let mut scratch = self.position.clone();
            scratch.apply(PieceKind::Pawn, mv);

            if !is_king_attacked(scratch.board(), self.our_color) {
                self.legal_moves.push(PieceKind::Pawn, mv, self.position);
            }
        }
    }
}
