use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

use crate::error::TermError;

pub type TermInt = u16;
pub type TermCoords = (TermInt, TermInt);

type TermResult<T = ()> = Result<T, TermError>;

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: TermCoords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> TermResult<Self> {
        let (width, height) = terminal::size().map_err(TermError::io)?;
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None })
    }

    pub fn setup(&mut self) -> TermResult {
        execute!(self.stdout, EnterAlternateScreen).map_err(TermError::io)?;
        terminal::enable_raw_mode().map_err(TermError::io)?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).map_err(TermError::io)
    }

    /// Best effort, this also runs while bailing out on an error.
    pub fn restore(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen);
    }

    pub fn read_key_blocking(&self) -> TermResult<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().map_err(TermError::io)? {
                return Ok(ev);
            }
        }
    }

    pub fn read_key_events_queue(&self) -> TermResult<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1)).map_err(TermError::io)? {
            if let Event::Key(ev) = read().map_err(TermError::io)? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    pub fn size(&self) -> TermCoords {
        (self.width, self.height)
    }

    /// Frame of `size` with its top left corner at `origin`.
    pub fn draw_borders(&mut self, origin: TermCoords, size: TermCoords) -> TermResult {
        let (width, height) = size;
        let (left, top) = origin;
        let end_x = left + width - 1;
        let end_y = top + height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == width - 1 {'+'} else {'-'};
            self.print_at((left + x, top), ch)?;
            self.print_at((left + x, end_y), ch)?;
        }

        for y in 1..height - 1 {
            self.print_at((left, top + y), '|')?;
            self.print_at((end_x, top + y), '|')?;
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> TermResult {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message { width: msg_width, height: msg_height, top_left });
        self.flush()
    }

    pub fn hide_message(&mut self) -> TermResult {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                if let Some(ch) = self.screen.get(self.index((x, y))).copied() {
                    self.print_at_no_save((x, y), ch)?;
                }
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: TermCoords, ch: char) -> TermResult {
        let idx = self.index(pos);
        if let Some(cell) = self.screen.get_mut(idx) {
            *cell = ch;
        }

        // Keep an open message box on top of whatever is drawn below it.
        if self.covered_by_message(pos) {
            return Ok(());
        }

        self.print_at_no_save(pos, ch)
    }

    pub fn clear(&mut self) -> TermResult {
        execute!(self.stdout, terminal::Clear(ClearType::All)).map_err(TermError::io)?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> TermResult {
        self.stdout.flush().map_err(TermError::io)
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, (x, y): TermCoords) -> usize {
        self.width as usize * y as usize + x as usize
    }

    fn covered_by_message(&self, (x, y): TermCoords) -> bool {
        match &self.current_msg {
            Some(msg) => {
                x >= msg.top_left.0 && x < msg.top_left.0 + msg.width &&
                y >= msg.top_left.1 && y < msg.top_left.1 + msg.height
            }
            None => false,
        }
    }

    fn print_at_no_save(&mut self, pos: TermCoords, ch: char) -> TermResult {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch)).map_err(TermError::io)
    }
}
