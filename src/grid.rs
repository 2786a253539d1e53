use crate::Coords;

/// Fixed-size playing field. Cells are addressed as `(column, row)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: i32,
    rows: i32,
}

impl Grid {
    /// Callers validate the dimensions first, see `GameConfig::validate`.
    pub fn new(cols: i32, rows: i32) -> Self {
        debug_assert!(cols > 0 && rows > 0);
        Grid { cols, rows }
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn area(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn contains(&self, (x, y): Coords) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Coords> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |y| (0..cols).map(move |x| (x, y)))
    }
}
