use crate::Coords;
use crate::grid::Grid;
use Direction::*;

/// Where a freshly grown segment waits until the next shift moves it into place.
pub const GROWTH_SENTINEL: Coords = (-1, -1);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> Coords {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfBite,
}

#[derive(Debug, Clone)]
pub struct Snake {
    body: Vec<Coords>,
    direction: Direction,
    // true once an advance has happened since the last accepted turn
    change_available: bool,
    pending_growth: u32,
}

impl Snake {
    /// `body` lists the segments head first and must not be empty.
    pub fn new(body: Vec<Coords>, direction: Direction) -> Self {
        debug_assert!(!body.is_empty());
        Snake { body, direction, change_available: false, pending_growth: 0 }
    }

    pub fn segments(&self) -> &[Coords] {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    /// Requests a turn. Both axis components have to change, so same-axis
    /// input (including a reversal) is dropped. At most one turn is taken
    /// per advance.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        let (new_x, new_y) = new_direction.delta();
        let (cur_x, cur_y) = self.direction.delta();

        if new_x != cur_x && new_y != cur_y && self.change_available {
            self.direction = new_direction;
            self.change_available = false;
            true
        } else {
            false
        }
    }

    pub fn advance(&mut self) {
        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }

        let (dx, dy) = self.direction.delta();
        let head = &mut self.body[0];
        head.0 += dx;
        head.1 += dy;

        if self.pending_growth > 0 {
            self.body.push(GROWTH_SENTINEL);
            self.pending_growth -= 1;
        }

        self.change_available = true;
    }

    pub fn grow(&mut self) {
        self.pending_growth += 1;
    }

    pub fn occupies(&self, pos: Coords, exclude_head: bool) -> bool {
        let skip = if exclude_head { 1 } else { 0 };
        self.body.iter().skip(skip).any(|segment| *segment == pos)
    }

    pub fn collision(&self, grid: &Grid) -> Option<Collision> {
        let head = self.head();

        if !grid.contains(head) {
            Some(Collision::Wall)
        } else if self.occupies(head, true) {
            Some(Collision::SelfBite)
        } else {
            None
        }
    }

    pub fn head_collided(&self, grid: &Grid) -> bool {
        self.collision(grid).is_some()
    }
}
