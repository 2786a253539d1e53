use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction::{self, *};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Turn(Direction),
    TogglePause,
    Quit,
}

pub fn map_key(ev: &KeyEvent) -> Option<InputEvent> {
    if is_ctrl_c(ev) {
        return Some(InputEvent::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(InputEvent::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Left => Some(InputEvent::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Down => Some(InputEvent::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Right => Some(InputEvent::Turn(Right)),
        KeyCode::Char(' ') | KeyCode::Esc => Some(InputEvent::TogglePause),
        _ => None,
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
