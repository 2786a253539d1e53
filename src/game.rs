use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use crate::Coords;
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::food::Food;
use crate::grid::Grid;
use crate::snake::{Collision, Direction, Snake};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameState {
    Paused,
    Running,
    Lost,
    /// The snake covers the whole grid.
    Won,
}

impl GameState {
    pub fn is_over(self) -> bool {
        matches!(self, GameState::Lost | GameState::Won)
    }
}

/// What the renderer gets to see after a step. The head is `segments[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub segments: Vec<Coords>,
    pub food: Coords,
}

/// Display side of the game. The loop never reads anything back from it.
pub trait Renderer {
    type Error;

    fn render(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error>;

    fn game_lost(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error>;

    fn game_won(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error> {
        self.render(snapshot)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Nothing to do yet, either paused or waiting for the interval.
    Idle,
    Stepped,
    /// The game is over, stop scheduling ticks.
    Finished,
}

pub struct GameLoop {
    config: GameConfig,
    grid: Grid,
    snake: Snake,
    food: Food,
    state: GameState,
    loss_cause: Option<Collision>,
    interval: Duration,
    last_step: Duration,
    rng: StdRng,
}

impl GameLoop {
    /// Fails if `config` does not pass `GameConfig::validate`.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(GameLoop {
            grid: config.grid(),
            snake: Snake::new(config.initial_snake.clone(), config.initial_direction),
            food: Food::new(config.initial_food),
            state: GameState::Paused,
            loss_cause: None,
            interval: config.tick_interval(),
            last_step: Duration::from_millis(0),
            rng,
            config,
        })
    }

    /// Puts every entity back to its starting position. The RNG keeps its
    /// sequence so a new round gets different food.
    pub fn reset(&mut self) {
        self.snake = Snake::new(self.config.initial_snake.clone(), self.config.initial_direction);
        self.food = Food::new(self.config.initial_food);
        self.state = GameState::Paused;
        self.loss_cause = None;
        self.last_step = Duration::from_millis(0);
        info!("game reset");
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn loss_cause(&self) -> Option<Collision> {
        self.loss_cause
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { segments: self.snake.segments().to_vec(), food: self.food.position() }
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            GameState::Paused => GameState::Running,
            GameState::Running => GameState::Paused,
            over => over,
        };
        info!(state = ?self.state, "pause toggled");
    }

    /// A direction key also starts the game if it was paused.
    pub fn input(&mut self, direction: Direction) {
        if self.state.is_over() {
            return;
        }

        if self.state == GameState::Paused {
            info!("resumed by direction input");
            self.state = GameState::Running;
        }

        if self.snake.set_direction(direction) {
            debug!(?direction, "turn accepted");
        }
    }

    /// Called by the host clock with a monotonic timestamp.
    pub fn tick<R: Renderer>(&mut self, now: Duration, renderer: &mut R) -> Result<Tick, R::Error> {
        if self.state.is_over() {
            return Ok(Tick::Finished);
        }

        let elapsed = now.checked_sub(self.last_step).unwrap_or_default();
        if self.state != GameState::Running || elapsed < self.interval {
            return Ok(Tick::Idle);
        }

        self.last_step = now;
        self.step(renderer)
    }

    fn step<R: Renderer>(&mut self, renderer: &mut R) -> Result<Tick, R::Error> {
        self.snake.advance();
        trace!(head = ?self.snake.head(), len = self.snake.len(), "step");

        if let Some(collision) = self.snake.collision(&self.grid) {
            info!(?collision, head = ?self.snake.head(), len = self.snake.len(), "game lost");
            self.state = GameState::Lost;
            self.loss_cause = Some(collision);
            renderer.game_lost(&self.snapshot())?;
            return Ok(Tick::Finished);
        }

        let fed = self.food.update(&self.grid, &mut self.snake, &mut self.rng);
        if fed.eaten {
            debug!(len = self.snake.len(), "food eaten");
        }

        if fed.grid_full {
            info!(len = self.snake.len(), "grid filled, game won");
            self.state = GameState::Won;
            renderer.game_won(&self.snapshot())?;
            return Ok(Tick::Finished);
        }

        renderer.render(&self.snapshot())?;
        Ok(Tick::Stepped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Snapshot>,
        lost: Vec<Snapshot>,
        won: Vec<Snapshot>,
    }

    impl Renderer for Recorder {
        type Error = Infallible;

        fn render(&mut self, snapshot: &Snapshot) -> Result<(), Infallible> {
            self.frames.push(snapshot.clone());
            Ok(())
        }

        fn game_lost(&mut self, snapshot: &Snapshot) -> Result<(), Infallible> {
            self.lost.push(snapshot.clone());
            Ok(())
        }

        fn game_won(&mut self, snapshot: &Snapshot) -> Result<(), Infallible> {
            self.won.push(snapshot.clone());
            Ok(())
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn config(cols: i32, rows: i32, snake: Vec<Coords>, direction: Direction, food: Coords) -> GameConfig {
        GameConfig {
            cols,
            rows,
            initial_snake: snake,
            initial_direction: direction,
            initial_food: food,
            seed: Some(5),
            ..GameConfig::default()
        }
    }

    fn new_game(config: GameConfig) -> GameLoop {
        GameLoop::new(config).unwrap()
    }

    fn tick(game: &mut GameLoop, now: u64, rec: &mut Recorder) -> Tick {
        match game.tick(ms(now), rec) {
            Ok(t) => t,
            Err(never) => match never {},
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let no_snake = GameConfig { initial_snake: vec![], ..GameConfig::default() };
        assert_eq!(GameLoop::new(no_snake).err(), Some(ConfigError::EmptySnake));

        let empty = GameConfig { cols: 0, rows: 0, ..GameConfig::default() };
        assert_eq!(GameLoop::new(empty).err(), Some(ConfigError::EmptyGrid { cols: 0, rows: 0 }));
    }

    #[test]
    fn test_timestamp_going_backwards_idles() {
        let mut game = new_game(config(5, 5, vec![(2, 1), (2, 0)], Direction::Down, (0, 4)));
        let mut rec = Recorder::default();
        game.toggle_pause();
        assert_eq!(tick(&mut game, 500, &mut rec), Tick::Stepped);

        assert_eq!(tick(&mut game, 100, &mut rec), Tick::Idle);
        assert_eq!(tick(&mut game, 0, &mut rec), Tick::Idle);
        assert_eq!(game.snake().head(), (2, 2));

        // Steps are still measured from the last one taken.
        assert_eq!(tick(&mut game, 579, &mut rec), Tick::Idle);
        assert_eq!(tick(&mut game, 580, &mut rec), Tick::Stepped);
        assert_eq!(rec.frames.len(), 2);
    }

    #[test]
    fn test_starts_paused_and_idles() {
        let mut game = new_game(GameConfig::default());
        let mut rec = Recorder::default();

        assert_eq!(game.state(), GameState::Paused);
        assert_eq!(tick(&mut game, 1000, &mut rec), Tick::Idle);
        assert!(rec.frames.is_empty());
    }

    #[test]
    fn test_steps_only_after_interval() {
        let mut game = new_game(config(5, 5, vec![(2, 1), (2, 0)], Direction::Down, (0, 4)));
        let mut rec = Recorder::default();
        game.toggle_pause();

        assert_eq!(tick(&mut game, 79, &mut rec), Tick::Idle);
        assert_eq!(tick(&mut game, 80, &mut rec), Tick::Stepped);
        assert_eq!(tick(&mut game, 120, &mut rec), Tick::Idle);
        assert_eq!(tick(&mut game, 160, &mut rec), Tick::Stepped);

        assert_eq!(rec.frames.len(), 2);
        assert_eq!(rec.frames[1], Snapshot { segments: vec![(2, 3), (2, 2)], food: (0, 4) });
    }

    #[test]
    fn test_down_scenario_keeps_running() {
        let mut game = new_game(config(5, 5, vec![(2, 2), (2, 1)], Direction::Down, (4, 4)));
        let mut rec = Recorder::default();
        game.toggle_pause();

        assert_eq!(tick(&mut game, 100, &mut rec), Tick::Stepped);
        assert_eq!(game.snake().segments(), &[(2, 3), (2, 2)]);
        assert_eq!(game.state(), GameState::Running);
    }

    #[test]
    fn test_wall_ends_game() {
        let mut game = new_game(config(5, 5, vec![(0, 0), (1, 0)], Direction::Left, (4, 4)));
        let mut rec = Recorder::default();
        game.toggle_pause();

        assert_eq!(tick(&mut game, 100, &mut rec), Tick::Finished);
        assert_eq!(game.state(), GameState::Lost);
        assert_eq!(game.loss_cause(), Some(Collision::Wall));
        assert_eq!(rec.lost.len(), 1);
        assert_eq!(rec.lost[0].segments[0], (-1, 0));
        assert!(rec.frames.is_empty());

        // Lost is terminal
        game.toggle_pause();
        game.input(Direction::Up);
        assert_eq!(game.state(), GameState::Lost);
        assert_eq!(tick(&mut game, 1000, &mut rec), Tick::Finished);
        assert_eq!(rec.lost.len(), 1);
    }

    #[test]
    fn test_self_bite_ends_game() {
        let snake = vec![(2, 2), (2, 3), (3, 3), (3, 2), (3, 1)];
        let mut game = new_game(config(6, 6, snake, Direction::Right, (0, 0)));
        let mut rec = Recorder::default();
        game.toggle_pause();

        assert_eq!(tick(&mut game, 100, &mut rec), Tick::Finished);
        assert_eq!(game.loss_cause(), Some(Collision::SelfBite));
    }

    #[test]
    fn test_direction_input_unpauses() {
        let mut game = new_game(GameConfig::default());

        game.input(Direction::Left);

        assert_eq!(game.state(), GameState::Running);
        // The latch only opens after the first step.
        assert_eq!(game.snake().direction(), Direction::Down);
    }

    #[test]
    fn test_pause_toggles() {
        let mut game = new_game(GameConfig::default());
        let mut rec = Recorder::default();

        game.toggle_pause();
        assert_eq!(game.state(), GameState::Running);
        game.toggle_pause();
        assert_eq!(game.state(), GameState::Paused);
        assert_eq!(tick(&mut game, 500, &mut rec), Tick::Idle);
    }

    #[test]
    fn test_eating_grows_on_next_step() {
        let mut game = new_game(config(8, 8, vec![(2, 2), (2, 1)], Direction::Down, (2, 3)));
        let mut rec = Recorder::default();
        game.toggle_pause();

        tick(&mut game, 100, &mut rec);
        assert_eq!(game.snake().len(), 2);
        assert_eq!(game.snake().pending_growth(), 1);
        assert!(!game.snake().occupies(game.food().position(), false));

        tick(&mut game, 200, &mut rec);
        assert_eq!(game.snake().len(), 3);
        assert!(!game.snake().occupies(game.food().position(), false));

        tick(&mut game, 300, &mut rec);
        // The grown segment has taken over the previous tail cell.
        assert_eq!(&game.snake().segments()[..3], &[(2, 5), (2, 4), (2, 3)]);
    }

    #[test]
    fn test_filling_the_grid_wins() {
        // Runs the 2x2 ring clockwise, eating on every step.
        let snake = vec![(1, 1), (1, 0), (0, 0)];
        let mut game = new_game(config(2, 2, snake, Direction::Left, (0, 1)));
        let mut rec = Recorder::default();
        game.toggle_pause();

        assert_eq!(tick(&mut game, 100, &mut rec), Tick::Stepped);
        assert_eq!(game.food().position(), (0, 0));
        game.input(Direction::Up);
        assert_eq!(tick(&mut game, 200, &mut rec), Tick::Stepped);
        assert_eq!(game.food().position(), (1, 0));
        game.input(Direction::Right);

        assert_eq!(tick(&mut game, 300, &mut rec), Tick::Finished);
        assert_eq!(game.state(), GameState::Won);
        assert_eq!(rec.won.len(), 1);
        assert_eq!(game.loss_cause(), None);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut game = new_game(config(5, 5, vec![(0, 0), (1, 0)], Direction::Left, (4, 4)));
        let mut rec = Recorder::default();
        game.toggle_pause();
        tick(&mut game, 100, &mut rec);
        assert_eq!(game.state(), GameState::Lost);

        game.reset();

        assert_eq!(game.state(), GameState::Paused);
        assert_eq!(game.loss_cause(), None);
        assert_eq!(game.snapshot(), Snapshot { segments: vec![(0, 0), (1, 0)], food: (4, 4) });
    }
}
