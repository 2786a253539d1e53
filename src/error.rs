use crate::Coords;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has an invalid value: {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error("grid must have at least one row and one column, got {cols}x{rows}")]
    EmptyGrid { cols: i32, rows: i32 },
    #[error("speed must be below {max}, got {speed}")]
    SpeedOutOfRange { speed: u32, max: u32 },
    #[error("the snake needs at least one segment")]
    EmptySnake,
    #[error("cell {0:?} is outside the grid")]
    OutsideGrid(Coords),
    #[error("food at {0:?} starts on the snake")]
    FoodOnSnake(Coords),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Term(#[from] TermError),
}

#[derive(Debug, Error)]
pub enum TermError {
    #[error("terminal is {width}x{height}, the board needs {need_width}x{need_height}")]
    TooSmall { width: u16, height: u16, need_width: u16, need_height: u16 },
    #[error("a {cols}x{rows} grid does not fit in any terminal")]
    BoardTooLarge { cols: i32, rows: i32 },
    #[error("terminal I/O failed: {0}")]
    Io(String),
}

impl TermError {
    pub fn io(err: impl std::fmt::Display) -> Self {
        TermError::Io(err.to_string())
    }
}
