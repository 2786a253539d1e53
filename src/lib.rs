//! Grid snake: the game rules live in `grid`, `snake`, `food` and `game`,
//! which know nothing about terminals. `term`, `input`, `render` and `app`
//! are the crossterm front end.

pub mod app;
pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod render;
pub mod snake;
pub mod term;

/// Grid cell as `(column, row)`. May lie outside the grid.
pub type Coords = (i32, i32);
