//! Terminal input source
//!
//! Reads crossterm events without blocking and maps them onto the lock
//! screen's input vocabulary. Mouse positions are reported in terminal
//! cells, which is the coordinate space the gesture is captured in.

use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use mousepass_core::{Error, InputEvent, InputSource, Result};

/// Non-blocking reader of crossterm events
#[derive(Debug, Default)]
pub struct TerminalInput;

impl TerminalInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for TerminalInput {
    fn poll_event(&mut self) -> Result<Option<InputEvent>> {
        while event::poll(Duration::ZERO).map_err(|e| Error::Input(e.to_string()))? {
            let raw = event::read().map_err(|e| Error::Input(e.to_string()))?;
            if let Some(mapped) = translate(raw) {
                return Ok(Some(mapped));
            }
        }
        Ok(None)
    }
}

/// Map one terminal event, or `None` if the lock screen does not use it
pub fn translate(event: Event) -> Option<InputEvent> {
    match event {
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::Key(key) => translate_key(key),
        _ => None,
    }
}

fn translate_mouse(mouse: MouseEvent) -> Option<InputEvent> {
    let (x, y) = (f64::from(mouse.column), f64::from(mouse.row));
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(InputEvent::PointerMove(x, y)),
        MouseEventKind::Down(_) => Some(InputEvent::PointerDown(x, y)),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Enter => Some(InputEvent::Confirm),
        KeyCode::Esc => Some(InputEvent::Cancel),
        KeyCode::F(2) => Some(InputEvent::ToggleGestureMode),
        KeyCode::F(3) => Some(InputEvent::StartEnroll),
        KeyCode::Backspace => Some(InputEvent::Backspace),
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(InputEvent::Character(c))
        }
        _ => None,
    }
}
