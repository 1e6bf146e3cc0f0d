//! Input layer: turns raw terminal events into the three game commands.
//!
//! Keyboard and the on-screen touch zones write the same `InputState`, so
//! `compute::tick` never knows where a command came from.

use std::collections::HashMap;
use std::ops::Range;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Fire,
}

/// Held / not-held flag per command.  Written by the adapter, read once per
/// tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    move_left: bool,
    move_right: bool,
    fire: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, command: Command) {
        self.set(command, true);
    }

    pub fn release(&mut self, command: Command) {
        self.set(command, false);
    }

    pub fn is_held(&self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_left,
            Command::MoveRight => self.move_right,
            Command::Fire => self.fire,
        }
    }

    /// Read the fire signal and clear it.
    pub fn take_fire(&mut self) -> bool {
        std::mem::take(&mut self.fire)
    }

    fn set(&mut self, command: Command, held: bool) {
        match command {
            Command::MoveLeft => self.move_left = held,
            Command::MoveRight => self.move_right = held,
            Command::Fire => self.fire = held,
        }
    }
}

// ── Touch zones ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchZone {
    Left,
    Right,
    Shoot,
}

impl TouchZone {
    pub fn command(&self) -> Command {
        match self {
            TouchZone::Left => Command::MoveLeft,
            TouchZone::Right => Command::MoveRight,
            TouchZone::Shoot => Command::Fire,
        }
    }
}

/// Screen placement of the three touch zones: one terminal row, three
/// column ranges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TouchLayout {
    pub row: u16,
    pub left: Range<u16>,
    pub shoot: Range<u16>,
    pub right: Range<u16>,
}

impl TouchLayout {
    pub fn zone_at(&self, column: u16, row: u16) -> Option<TouchZone> {
        if row != self.row {
            return None;
        }
        if self.left.contains(&column) {
            Some(TouchZone::Left)
        } else if self.shoot.contains(&column) {
            Some(TouchZone::Shoot)
        } else if self.right.contains(&column) {
            Some(TouchZone::Right)
        } else {
            None
        }
    }
}

// ── Adapter ───────────────────────────────────────────────────────────────────

/// Requests that are not game commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Quit,
    Restart,
    /// Terminal resized to `(columns, rows)`.
    Resize(u16, u16),
}

pub fn command_for(code: &KeyCode) -> Option<Command> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::MoveRight),
        KeyCode::Char(' ') => Some(Command::Fire),
        _ => None,
    }
}

/// Translates crossterm events into `InputState` writes.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable**: proper `Press` / `Repeat` / `Release`
///   events, so a key stays held until it is released.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Movement keys expire after `hold_window` frames of
///   silence, which must outlast the OS repeat interval.
pub struct InputAdapter {
    keyboard_enhanced: bool,
    hold_window: u64,
    /// Movement command → frame its key was last seen.
    key_frame: HashMap<Command, u64>,
    touch_layout: TouchLayout,
    pressed_zone: Option<TouchZone>,
}

impl InputAdapter {
    pub fn new(keyboard_enhanced: bool, hold_window: u64) -> Self {
        InputAdapter {
            keyboard_enhanced,
            hold_window,
            key_frame: HashMap::new(),
            touch_layout: TouchLayout::default(),
            pressed_zone: None,
        }
    }

    pub fn set_touch_layout(&mut self, layout: TouchLayout) {
        self.touch_layout = layout;
    }

    /// Apply one event.  Returns a `Control` for events outside the game's
    /// command set.
    pub fn handle_event(
        &mut self,
        event: &Event,
        frame: u64,
        input: &mut InputState,
    ) -> Option<Control> {
        match event {
            Event::Key(key) => self.handle_key(key, frame, input),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse, input);
                None
            }
            Event::Resize(columns, rows) => Some(Control::Resize(*columns, *rows)),
            _ => None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, frame: u64, input: &mut InputState) -> Option<Control> {
        if key.kind == KeyEventKind::Press {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Some(Control::Quit)
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Some(Control::Quit)
                }
                KeyCode::Char('r') | KeyCode::Char('R') => return Some(Control::Restart),
                _ => {}
            }
        }

        let command = command_for(&key.code)?;
        match key.kind {
            KeyEventKind::Press => {
                input.press(command);
                if command != Command::Fire {
                    self.key_frame.insert(command, frame);
                }
            }
            // Repeat keeps movement alive but never re-arms Fire
            KeyEventKind::Repeat => {
                if command != Command::Fire {
                    input.press(command);
                    self.key_frame.insert(command, frame);
                }
            }
            KeyEventKind::Release => {
                input.release(command);
                self.key_frame.remove(&command);
            }
        }
        None
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, input: &mut InputState) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(zone) = self.touch_layout.zone_at(mouse.column, mouse.row) {
                    input.press(zone.command());
                    self.pressed_zone = Some(zone);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(zone) = self.pressed_zone.take() {
                    input.release(zone.command());
                }
            }
            _ => {}
        }
    }

    /// Release movement keys that have gone quiet.  No-op on terminals that
    /// report key releases.
    pub fn expire(&mut self, frame: u64, input: &mut InputState) {
        if self.keyboard_enhanced {
            return;
        }
        let window = self.hold_window;
        let touched = self.pressed_zone.map(|zone| zone.command());
        self.key_frame.retain(|command, last| {
            let fresh = frame.saturating_sub(*last) <= window;
            if !fresh && touched != Some(*command) {
                input.release(*command);
            }
            fresh
        });
    }
}
