use crate::core::entities::Status;
use std::fmt;

pub struct AppError {
    pub message: String,
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.message)
    }
}

impl From<GameError> for AppError {
    fn from(e: GameError) -> Self {
        AppError {
            message: e.to_string(),
        }
    }
}

/// Why a column refused a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveFault {
    ColumnFull,
    OutOfRange,
}

impl fmt::Display for MoveFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveFault::ColumnFull => write!(f, "full"),
            MoveFault::OutOfRange => write!(f, "out of range"),
        }
    }
}

/// Errors raised by a game session.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("invalid move: column {column} is {reason}")]
    InvalidMove { column: usize, reason: MoveFault },

    #[error("not your turn")]
    NotMyTurn,

    #[error("game is over ({0})")]
    GameOver(Status),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("connection is closed")]
    ClosedConnection,

    #[error("protocol error: {0}")]
    Protocol(String),
}

impl GameError {
    /// Errors after which the session can't go on.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GameError::Connection(_) | GameError::ClosedConnection | GameError::Protocol(_)
        )
    }
}
