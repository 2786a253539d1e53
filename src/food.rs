use crate::Coords;
use crate::grid::Grid;
use crate::snake::Snake;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Random picks tried before falling back to listing the free cells.
const MAX_RANDOM_ATTEMPTS: usize = 64;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct FoodUpdate {
    pub eaten: bool,
    /// No free cell was left to move the food to.
    pub grid_full: bool,
}

#[derive(Debug, Clone)]
pub struct Food {
    position: Coords,
}

impl Food {
    pub fn new(position: Coords) -> Self {
        Food { position }
    }

    pub fn position(&self) -> Coords {
        self.position
    }

    pub fn check_eaten(&self, snake: &Snake) -> bool {
        self.position == snake.head()
    }

    /// Picks a grid cell the snake does not cover, or `None` if there is none.
    pub fn respawn<R: Rng>(grid: &Grid, snake: &Snake, rng: &mut R) -> Option<Coords> {
        for _ in 0..MAX_RANDOM_ATTEMPTS {
            let candidate = (rng.gen_range(0..grid.cols()), rng.gen_range(0..grid.rows()));
            if !snake.occupies(candidate, false) {
                return Some(candidate);
            }
        }

        debug!("random food placement missed {} times, listing free cells", MAX_RANDOM_ATTEMPTS);
        let choices: Vec<Coords> = grid.cells().filter(|pos| !snake.occupies(*pos, false)).collect();
        choices.choose(rng).copied()
    }

    /// Feeds the snake if its head reached the food, then moves the food off
    /// the snake. Food that is still free stays where it is.
    pub fn update<R: Rng>(&mut self, grid: &Grid, snake: &mut Snake, rng: &mut R) -> FoodUpdate {
        let eaten = self.check_eaten(snake);
        if eaten {
            snake.grow();
        }

        let mut grid_full = false;
        if snake.occupies(self.position, false) {
            match Food::respawn(grid, snake, rng) {
                Some(pos) => {
                    debug!(from = ?self.position, to = ?pos, "food moved");
                    self.position = pos;
                }
                None => grid_full = true,
            }
        }

        FoodUpdate { eaten, grid_full }
    }
}
