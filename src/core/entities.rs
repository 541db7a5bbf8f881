use serde::Deserialize;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Player {
    PlayerOne,
    PlayerTwo,
}

impl Player {
    pub fn name(&self) -> &str {
        match self {
            Self::PlayerOne => "player one",
            Self::PlayerTwo => "player two",
        }
    }

    pub fn opponent(&self) -> Self {
        match self {
            Self::PlayerOne => Self::PlayerTwo,
            Self::PlayerTwo => Self::PlayerOne,
        }
    }

    pub fn cell(&self) -> Cell {
        match self {
            Self::PlayerOne => Cell::PlayerOne,
            Self::PlayerTwo => Cell::PlayerTwo,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    PlayerOne,
    PlayerTwo,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        *self == Cell::Empty
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    InProgress,
    IWon,
    ILost,
    Tie,
    Error,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InProgress => "in progress",
            Self::IWon => "you won",
            Self::ILost => "you lost",
            Self::Tie => "tie",
            Self::Error => "error",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub rows: usize,
    pub columns: usize,
}

impl Dimensions {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    pub fn cells(&self) -> usize {
        self.rows * self.columns
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self { rows: 6, columns: 7 }
    }
}
