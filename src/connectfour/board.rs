use crate::core::entities::{Cell, Dimensions};
use crate::core::errors::{GameError, MoveFault};
use std::fmt;

/// Row 0 is the top of the grid; pieces settle at the highest free row index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    dimensions: Dimensions,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(dimensions: Dimensions) -> Self {
        Board {
            dimensions,
            cells: vec![Cell::Empty; dimensions.cells()],
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.dimensions.rows || col >= self.dimensions.columns {
            return None;
        }

        Some(self.cells[self.index(row, col)])
    }

    /// Pieces stacked in `col`; 0 for a column outside the grid.
    pub fn column_height(&self, col: usize) -> usize {
        if col >= self.dimensions.columns {
            return 0;
        }

        (0..self.dimensions.rows)
            .filter(|row| !self.cells[self.index(*row, col)].is_empty())
            .count()
    }

    pub fn check_drop(&self, col: usize) -> Result<usize, GameError> {
        if col >= self.dimensions.columns {
            return Err(GameError::InvalidMove {
                column: col,
                reason: MoveFault::OutOfRange,
            });
        }

        (0..self.dimensions.rows)
            .rev()
            .find(|row| self.cells[self.index(*row, col)].is_empty())
            .ok_or(GameError::InvalidMove {
                column: col,
                reason: MoveFault::ColumnFull,
            })
    }

    /// Drops `cell` into `col` and returns the row it landed on.
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, GameError> {
        let row = self.check_drop(col)?;
        let index = self.index(row, col);
        self.cells[index] = cell;

        Ok(row)
    }

    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    pub fn empty_cells(&self) -> usize {
        self.cells.len() - self.filled()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.dimensions.columns)
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.dimensions.columns + col
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => '.',
                    Cell::PlayerOne => 'X',
                    Cell::PlayerTwo => 'O',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }

        Ok(())
    }
}
