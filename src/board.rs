//! Board: fixed grid of locked cells, collision checks and line clearing.

use crate::tetromino::{Shape, TetrominoKind};
use std::collections::VecDeque;

/// Single cell: empty or filled by a locked piece of the given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoKind),
}

impl Cell {
    #[inline]
    pub fn is_filled(self) -> bool {
        matches!(self, Self::Filled(_))
    }
}

/// Integer board coordinate; `y` may be negative above the visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Board grid. y=0 is top; rows are stored [0..height].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// rows[y][x] = cell. rows[0] is top.
    rows: VecDeque<Vec<Cell>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        let rows = (0..height).map(|_| vec![Cell::Empty; width]).collect();
        Self {
            width,
            height,
            rows,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(c) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *c = cell;
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn filled_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|c| c.is_filled())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    /// True if `shape` placed with its top-left at `pos` leaves the side walls,
    /// reaches the floor, or overlaps a locked cell. Cells above row 0 are only
    /// checked against the side walls.
    pub fn collides(&self, shape: &Shape, pos: Position) -> bool {
        shape.filled_cells().any(|(dx, dy)| {
            let x = pos.x + dx;
            let y = pos.y + dy;
            if x < 0 || x >= self.width as i32 || y >= self.height as i32 {
                return true;
            }
            y >= 0 && self.get(x as usize, y as usize).is_some_and(Cell::is_filled)
        })
    }

    /// Removes every full row, bottom to top, inserting an empty row at the top for
    /// each. Returns the number of rows cleared.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = self.height;
        while y > 0 {
            let row = y - 1;
            if self.rows[row].iter().all(|c| c.is_filled()) {
                self.rows.remove(row);
                self.rows.push_front(vec![Cell::Empty; self.width]);
                cleared += 1;
                // Same index now holds the row that was above; check it again.
            } else {
                y -= 1;
            }
        }
        cleared
    }
}
