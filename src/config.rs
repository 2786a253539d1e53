use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::Coords;
use crate::error::ConfigError;
use crate::grid::Grid;
use crate::snake::Direction;

/// The step interval is `SPEED_CEILING - speed` milliseconds.
pub const SPEED_CEILING: u32 = 230;

const DEFAULT_COLS: i32 = 40;
const DEFAULT_ROWS: i32 = 21;
const DEFAULT_SPEED: u32 = 150;

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub cols: i32,
    pub rows: i32,
    pub speed: u32,
    /// Head first.
    pub initial_snake: Vec<Coords>,
    pub initial_direction: Direction,
    pub initial_food: Coords,
    /// Fixed seed for food placement; a fresh one is drawn when `None`.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            speed: DEFAULT_SPEED,
            initial_snake: vec![(15, 15), (15, 14)],
            initial_direction: Direction::Down,
            initial_food: (23, 12),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Board of the given size with the snake in the middle and the food
    /// further along the head's row. The snake has two segments, heading down
    /// (or right on a single row), unless the grid has fewer than three cells.
    /// A 1x1 grid has no room for food and fails validation.
    pub fn new(cols: i32, rows: i32) -> Self {
        let center = (cols / 2, rows / 2);
        let (initial_direction, neck) = if rows >= 2 {
            (Direction::Down, (center.0, center.1 - 1))
        } else {
            (Direction::Right, (center.0 - 1, center.1))
        };

        let mut initial_snake = vec![center];
        if cols as i64 * rows as i64 >= 3 {
            initial_snake.push(neck);
        }

        let preferred = ((center.0 + 1 + cols / 4) % cols.max(1), center.1);
        let initial_food = first_free_cell(cols, rows, preferred, &initial_snake);

        GameConfig {
            cols,
            rows,
            initial_snake,
            initial_direction,
            initial_food,
            ..Default::default()
        }
    }

    /// Reads `SNAKE_COLS`, `SNAKE_ROWS`, `SNAKE_SPEED` and `SNAKE_SEED`.
    /// Setting either dimension switches to the centred layout of `new`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cols = parse_var::<i32>("SNAKE_COLS")?;
        let rows = parse_var::<i32>("SNAKE_ROWS")?;

        let mut config = match (cols, rows) {
            (None, None) => GameConfig::default(),
            (cols, rows) => GameConfig::new(cols.unwrap_or(DEFAULT_COLS), rows.unwrap_or(DEFAULT_ROWS)),
        };

        if let Some(speed) = parse_var("SNAKE_SPEED")? {
            config.speed = speed;
        }
        config.seed = parse_var("SNAKE_SEED")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols <= 0 || self.rows <= 0 {
            return Err(ConfigError::EmptyGrid { cols: self.cols, rows: self.rows });
        }

        if self.speed >= SPEED_CEILING {
            return Err(ConfigError::SpeedOutOfRange { speed: self.speed, max: SPEED_CEILING });
        }

        if self.initial_snake.is_empty() {
            return Err(ConfigError::EmptySnake);
        }

        let grid = self.grid();
        let outside = self.initial_snake.iter()
            .chain(std::iter::once(&self.initial_food))
            .find(|pos| !grid.contains(**pos));
        if let Some(pos) = outside {
            return Err(ConfigError::OutsideGrid(*pos));
        }

        if self.initial_snake.contains(&self.initial_food) {
            return Err(ConfigError::FoodOnSnake(self.initial_food));
        }

        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.cols, self.rows)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(SPEED_CEILING.saturating_sub(self.speed) as u64)
    }
}

/// `preferred`, or the next cell after it in row-major order (wrapping) that
/// the snake leaves free. Falls back to `preferred` when there is none.
fn first_free_cell(cols: i32, rows: i32, preferred: Coords, snake: &[Coords]) -> Coords {
    if cols <= 0 || rows <= 0 {
        return preferred;
    }

    let (cols, area) = (cols as i64, cols as i64 * rows as i64);
    let start = preferred.1 as i64 * cols + preferred.0 as i64;
    (0..area)
        .map(|i| (start + i) % area)
        .map(|idx| ((idx % cols) as i32, (idx / cols) as i32))
        .find(|pos| !snake.contains(pos))
        .unwrap_or(preferred)
}

fn parse_var<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) => value.trim().parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(None),
    }
}
