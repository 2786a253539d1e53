use std::{thread::sleep, time::{Duration, Instant}};

use tracing::info;

use crate::config::GameConfig;
use crate::error::{AppError, TermError};
use crate::game::{GameLoop, GameState, Tick};
use crate::input::{InputEvent, is_ctrl_c, map_key};
use crate::render::TermRenderer;
use crate::term::TermManager;

const POLL_INTERVAL_MS: u64 = 5;

/// How a round ended from the player's point of view.
enum Outcome {
    Over,
    Quit,
}

pub struct SnakeApp {
    game: GameLoop,
    renderer: TermRenderer,
}

impl SnakeApp {
    pub fn new(config: GameConfig) -> Result<Self, AppError> {
        let game = GameLoop::new(config.clone())?;
        let mut renderer = TermRenderer::new(TermManager::new()?, config.grid())?;
        if let Err(e) = renderer.term().setup() {
            renderer.term().restore();
            return Err(e.into());
        }

        Ok(SnakeApp { game, renderer })
    }

    /// Plays rounds until the player quits. The terminal is restored on
    /// every way out.
    pub fn run(&mut self) -> Result<(), TermError> {
        let res = self.run_rounds();
        self.renderer.term().restore();
        res
    }

    fn run_rounds(&mut self) -> Result<(), TermError> {
        if !self.show_intro()? {
            return Ok(());
        }

        loop {
            if let Outcome::Quit = self.play()? {
                return Ok(());
            }

            // Quit if the user CTRL+C's after the game
            if is_ctrl_c(&self.renderer.term().read_key_blocking()?) {
                return Ok(());
            }

            self.game.reset();
        }
    }

    fn show_intro(&mut self) -> Result<bool, TermError> {
        let snapshot = self.game.snapshot();
        self.renderer.redraw(&snapshot)?;

        let term = self.renderer.term();
        term.show_message(&[
            "Arrow keys or WASD to move",
            "Space or Esc to pause",
            "CTRL+C to quit",
            "",
            "Press any key to begin"
        ])?;

        let go_on = !is_ctrl_c(&term.read_key_blocking()?);
        term.hide_message()?;
        Ok(go_on)
    }

    fn play(&mut self) -> Result<Outcome, TermError> {
        let snapshot = self.game.snapshot();
        self.renderer.redraw(&snapshot)?;
        self.show_pause_message()?;

        let start = Instant::now();
        info!("round started");

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            for key_ev in self.renderer.term().read_key_events_queue()? {
                match map_key(&key_ev) {
                    Some(InputEvent::Quit) => return Ok(Outcome::Quit),
                    Some(InputEvent::TogglePause) => {
                        self.game.toggle_pause();
                        self.show_pause_message()?;
                    }
                    Some(InputEvent::Turn(dir)) => {
                        let was_paused = self.game.state() == GameState::Paused;
                        self.game.input(dir);
                        if was_paused {
                            self.renderer.term().hide_message()?;
                        }
                    }
                    None => {}
                }
            }

            if let Tick::Finished = self.game.tick(start.elapsed(), &mut self.renderer)? {
                self.game_over()?;
                return Ok(Outcome::Over);
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn show_pause_message(&mut self) -> Result<(), TermError> {
        let term = self.renderer.term();
        if self.game.state() == GameState::Paused {
            term.show_message(&["Paused", "Press Space to resume", "or Ctrl+C to quit"])
        } else {
            term.hide_message()
        }
    }

    fn game_over(&mut self) -> Result<(), TermError> {
        let title = if self.game.state() == GameState::Won {"You won!"} else {"You have lost ):"};
        info!(state = ?self.game.state(), cause = ?self.game.loss_cause(), "round over");

        self.renderer.term().show_message(&[
            title,
            "",
            "Press any key to play again,",
            "or CTRL+C to quit."
        ])
    }
}
