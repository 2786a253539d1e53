use std::convert::TryFrom;

use crate::Coords;
use crate::error::TermError;
use crate::game::{Renderer, Snapshot};
use crate::grid::Grid;
use crate::term::{TermCoords, TermInt, TermManager};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

/// Draws the board centred in the terminal, inside a one cell border.
pub struct TermRenderer {
    term: TermManager,
    grid: Grid,
    origin: TermCoords,
    board: TermCoords,
    last: Option<Snapshot>,
}

impl TermRenderer {
    pub fn new(term: TermManager, grid: Grid) -> Result<Self, TermError> {
        let (width, height) = term.size();
        let board = board_size(&grid)?;
        let (need_width, need_height) = board;

        if need_width > width || need_height > height {
            return Err(TermError::TooSmall { width, height, need_width, need_height });
        }

        let origin = ((width - need_width) / 2, (height - need_height) / 2);
        Ok(TermRenderer { term, grid, origin, board, last: None })
    }

    pub fn term(&mut self) -> &mut TermManager {
        &mut self.term
    }

    /// Clears the screen and draws `snapshot` from scratch.
    pub fn redraw(&mut self, snapshot: &Snapshot) -> Result<(), TermError> {
        self.term.clear()?;
        self.term.draw_borders(self.origin, self.board)?;
        self.last = None;
        self.render(snapshot)
    }

    fn to_term(&self, (x, y): Coords) -> Option<TermCoords> {
        if !self.grid.contains((x, y)) {
            return None;
        }

        Some((self.origin.0 + 1 + x as TermInt, self.origin.1 + 1 + y as TermInt))
    }

    fn put(&mut self, pos: Coords, ch: char) -> Result<(), TermError> {
        match self.to_term(pos) {
            Some(at) => self.term.print_at(at, ch),
            None => Ok(()),
        }
    }
}

impl Renderer for TermRenderer {
    type Error = TermError;

    fn render(&mut self, snapshot: &Snapshot) -> Result<(), TermError> {
        if let Some(last) = self.last.take() {
            let stale = last.segments.iter()
                .chain(std::iter::once(&last.food))
                .filter(|pos| **pos != snapshot.food && !snapshot.segments.contains(pos));
            for pos in stale {
                self.put(*pos, ' ')?;
            }
        }

        self.put(snapshot.food, FOOD_CHAR)?;
        for (i, pos) in snapshot.segments.iter().enumerate() {
            let ch = if i == 0 { head_char(&snapshot.segments) } else { SNAKE_BODY_CHAR };
            self.put(*pos, ch)?;
        }

        self.last = Some(snapshot.clone());
        self.term.flush()
    }

    fn game_lost(&mut self, snapshot: &Snapshot) -> Result<(), TermError> {
        for pos in &snapshot.segments {
            self.put(*pos, DEAD_SNAKE_CHAR)?;
        }

        self.last = Some(snapshot.clone());
        self.term.flush()
    }
}

/// Terminal cells needed for the grid plus its border.
pub fn board_size(grid: &Grid) -> Result<TermCoords, TermError> {
    let too_large = || TermError::BoardTooLarge { cols: grid.cols(), rows: grid.rows() };
    let width = TermInt::try_from(grid.cols() as i64 + 2).map_err(|_| too_large())?;
    let height = TermInt::try_from(grid.rows() as i64 + 2).map_err(|_| too_large())?;
    Ok((width, height))
}

/// Points away from the neck, so the head shows where the snake is going.
fn head_char(segments: &[Coords]) -> char {
    match segments {
        [(hx, hy), (nx, ny), ..] => match (hx - nx, hy - ny) {
            (0, -1) => '^',
            (0, 1) => 'v',
            (-1, 0) => '<',
            (1, 0) => '>',
            _ => '@',
        },
        _ => '@',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_char_follows_neck() {
        assert_eq!(head_char(&[(2, 2), (2, 3)]), '^');
        assert_eq!(head_char(&[(2, 3), (2, 2), (2, 1)]), 'v');
        assert_eq!(head_char(&[(1, 0), (2, 0)]), '<');
        assert_eq!(head_char(&[(3, 0), (2, 0)]), '>');
        assert_eq!(head_char(&[(3, 0)]), '@');
    }

    #[test]
    fn test_board_size_adds_border() {
        assert_eq!(board_size(&Grid::new(40, 21)).ok(), Some((42, 23)));
        assert_eq!(board_size(&Grid::new(65533, 1)).ok(), Some((65535, 3)));
    }

    #[test]
    fn test_board_size_rejects_grids_past_terminal_range() {
        for &(cols, rows) in &[(65535, 65534), (65534, 10), (10, 65534), (i32::MAX, 1)] {
            let res = board_size(&Grid::new(cols, rows));
            assert!(
                matches!(res, Err(TermError::BoardTooLarge { cols: c, rows: r }) if c == cols && r == rows),
                "{}x{} gave {:?}", cols, rows, res
            );
        }
    }
}
