//! Linear game history with line-oriented persistence.
//!
//! Every applied move appends a `(Move, Position)` pair; the newest entry
//! is the current state of the game. The on-disk format is one line per
//! entry, `<move-LAN><tab><position-FEN>`, and a blank line terminates the
//! stream.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::move_generation::move_list::MovePositionPair;
use crate::position::chess_move::Move;
use crate::position::position::Position;
use crate::utils::fen_parser::parse_fen;

pub type HistoryResult<T> = Result<T, HistoryError>;

#[derive(Debug)]
pub enum HistoryError {
    Io(std::io::Error),
    InvalidMove { line: usize, text: String },
    InvalidPosition { line: usize, message: String },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Io(err) => write!(f, "history file I/O failed: {err}"),
            HistoryError::InvalidMove { line, text } => {
                write!(f, "line {line}: invalid move token {text:?}")
            }
            HistoryError::InvalidPosition { line, message } => {
                write!(f, "line {line}: invalid position: {message}")
            }
        }
    }
}

impl Error for HistoryError {}

impl From<std::io::Error> for HistoryError {
    fn from(err: std::io::Error) -> Self {
        HistoryError::Io(err)
    }
}

/// Ordered sequence of played moves and the positions they produced.
#[derive(Clone, Debug, Default)]
pub struct GameHistory {
    entries: Vec<MovePositionPair>,
}

impl GameHistory {
    #[inline]
    pub fn new() -> Self {
        GameHistory::default()
    }

    /// Appends a played move and the position it produced.
    pub fn push(&mut self, mv: Move, position: Position) {
        self.entries.push(MovePositionPair { mv, position });
    }

    /// The newest entry: the current state of the game.
    #[inline]
    pub fn current(&self) -> Option<&MovePositionPair> {
        self.entries.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries oldest first.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, MovePositionPair> {
        self.entries.iter()
    }

    /// Iterates entries newest first, the direction repetition checks walk.
    #[inline]
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &MovePositionPair> {
        self.entries.iter().rev()
    }

    /// How many entries hold a position equal to `position` (clock fields
    /// ignored, per position equality). The current entry counts.
    pub fn count_matches_of(&self, position: &Position) -> usize {
        self.iter_newest_first()
            .filter(|pair| &pair.position == position)
            .count()
    }

    /// How many entries repeat the current position, itself included.
    pub fn count_matches(&self) -> usize {
        match self.current() {
            Some(current) => self.count_matches_of(&current.position),
            None => 0,
        }
    }

    /// Draw by repetition: the current position stands on the board for at
    /// least the third time.
    pub fn is_threefold_repetition(&self) -> bool {
        self.count_matches() >= 3
    }

    /// Writes the history to `path`, one `<move>\t<fen>` line per entry
    /// followed by a terminating blank line.
    pub fn save(&self, path: impl AsRef<Path>) -> HistoryResult<()> {
        let path = path.as_ref();
        let mut file = fs::File::create(path)?;

        for pair in &self.entries {
            writeln!(file, "{}\t{}", pair.mv.to_lan(), pair.position.to_fen())?;
        }
        writeln!(file)?;

        log::debug!("saved {} history entries to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Reads a history previously written by [`GameHistory::save`]. A
    /// blank line ends the stream; anything after it is ignored.
    pub fn load(path: impl AsRef<Path>) -> HistoryResult<GameHistory> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let mut history = GameHistory::new();
        let mut terminated_at = None;

        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                terminated_at = Some(idx);
                break;
            }

            let (move_token, fen) = match line.split_once(char::is_whitespace) {
                Some((mv, rest)) => (mv, rest.trim()),
                None => {
                    return Err(HistoryError::InvalidMove {
                        line: idx + 1,
                        text: line.to_owned(),
                    })
                }
            };

            let mv = Move::from_lan(move_token);
            if mv.is_invalid() {
                return Err(HistoryError::InvalidMove {
                    line: idx + 1,
                    text: move_token.to_owned(),
                });
            }

            let position = parse_fen(fen).map_err(|message| HistoryError::InvalidPosition {
                line: idx + 1,
                message,
            })?;

            history.push(mv, position);
        }

        if let Some(end) = terminated_at {
            let trailing = content
                .lines()
                .skip(end + 1)
                .filter(|line| !line.trim().is_empty())
                .count();
            if trailing > 0 {
                log::warn!(
                    "{}: ignoring {trailing} non-empty lines after the blank terminator",
                    path.display()
                );
            }
        }

        log::debug!("loaded {} history entries from {}", history.len(), path.display());
        Ok(history)
    }
}

impl<'a> IntoIterator for &'a GameHistory {
    type Item = &'a MovePositionPair;
    type IntoIter = std::slice::Iter<'a, MovePositionPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
