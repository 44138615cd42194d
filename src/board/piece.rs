//! Piece identity: colour, kind, and capability predicates.

use std::fmt;

/// Side to move / piece colour. Light is the side FEN calls `w`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }
}

/// Piece kind (colour is tracked separately).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Sliding piece: bishop, rook, or queen.
    #[inline]
    pub const fn is_ray(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Attacks along ranks and files.
    #[inline]
    pub const fn is_lateral(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Queen)
    }

    /// Attacks along diagonals.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Queen)
    }
}

/// A coloured piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Piece { color, kind }
    }

    #[inline]
    pub const fn is_light(self) -> bool {
        matches!(self.color, Color::Light)
    }

    #[inline]
    pub const fn is_dark(self) -> bool {
        matches!(self.color, Color::Dark)
    }

    #[inline]
    pub const fn is_pawn(self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    #[inline]
    pub const fn is_knight(self) -> bool {
        matches!(self.kind, PieceKind::Knight)
    }

    #[inline]
    pub const fn is_king(self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    #[inline]
    pub const fn is_ray(self) -> bool {
        self.kind.is_ray()
    }

    #[inline]
    pub const fn is_lateral(self) -> bool {
        self.kind.is_lateral()
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.kind.is_diagonal()
    }

    /// The FEN character: uppercase for Light, lowercase for Dark.
    pub fn to_fen_char(self) -> char {
        let ch = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        if self.is_light() {
            ch.to_ascii_uppercase()
        } else {
            ch
        }
    }

    /// Parses a FEN piece character.
    pub fn from_fen_char(ch: char) -> Option<Self> {
        let color = if ch.is_ascii_uppercase() {
            Color::Light
        } else if ch.is_ascii_lowercase() {
            Color::Dark
        } else {
            return None;
        };

        let kind = match ch.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };

        Some(Piece::new(color, kind))
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece({})", self.to_fen_char())
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_char())
    }
}
