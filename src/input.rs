//! Input mapping from window events to scene commands.
//!
//! The scene never polls a window. Presentation glue feeds winit events into
//! an [`Input`], which tracks the pointer and turns key presses and clicks
//! into [`Command`]s. The glue drains the queued commands once per frame and
//! hands them to [`Scene::handle`](crate::Scene::handle).
//!
//! | Key | Command |
//! |---|---|
//! | Right / Left | next / previous year |
//! | S | toggle statistics |
//! | R | toggle rainbow mode |
//! | E | explosion at the pointer |
//! | W | weather override |
//! | C | clear effects |
//! | Space | restart the autoplay counter |
//! | Escape | quit |
//!
//! ```
//! use airglow::input::{Command, Input, Key};
//!
//! let mut input = Input::new();
//! input.key_down(Key::E);
//! input.key_down(Key::E); // held: no repeat
//! assert_eq!(input.drain(), vec![Command::Explode]);
//! ```

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Keys the scene reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Space,
    Escape,
    S,
    R,
    E,
    W,
    C,
    Other(u32),
}

impl From<WinitKeyCode> for Key {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::ArrowLeft => Key::Left,
            WinitKeyCode::ArrowRight => Key::Right,
            WinitKeyCode::Space => Key::Space,
            WinitKeyCode::Escape => Key::Escape,
            WinitKeyCode::KeyS => Key::S,
            WinitKeyCode::KeyR => Key::R,
            WinitKeyCode::KeyE => Key::E,
            WinitKeyCode::KeyW => Key::W,
            WinitKeyCode::KeyC => Key::C,
            _ => Key::Other(key as u32),
        }
    }
}

/// A discrete request for the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    NextYear,
    PreviousYear,
    ToggleStatistics,
    ToggleRainbow,
    /// Explosion at the current pointer position.
    Explode,
    /// Replace the weather with one matching the current index value.
    Weather,
    ClearEffects,
    RestartAutoplay,
    /// Primary button pressed at a screen position.
    Click(Vec2),
    /// Not handled by the scene; the glue should stop its loop.
    Quit,
}

impl Command {
    /// Command bound to `key`, if any.
    pub fn for_key(key: Key) -> Option<Command> {
        match key {
            Key::Right => Some(Command::NextYear),
            Key::Left => Some(Command::PreviousYear),
            Key::S => Some(Command::ToggleStatistics),
            Key::R => Some(Command::ToggleRainbow),
            Key::E => Some(Command::Explode),
            Key::W => Some(Command::Weather),
            Key::C => Some(Command::ClearEffects),
            Key::Space => Some(Command::RestartAutoplay),
            Key::Escape => Some(Command::Quit),
            Key::Other(_) => None,
        }
    }
}

/// Pointer position plus queued commands.
#[derive(Debug, Default)]
pub struct Input {
    pointer: Vec2,
    keys_held: HashSet<Key>,
    commands: Vec<Command>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer position in screen pixels.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer = position;
    }

    /// Queue the command bound to `key`, ignoring auto-repeat while held.
    pub fn key_down(&mut self, key: Key) {
        if !self.keys_held.insert(key) {
            return;
        }
        if let Some(command) = Command::for_key(key) {
            self.commands.push(command);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.keys_held.remove(&key);
    }

    /// Queue a click at the current pointer position.
    pub fn primary_click(&mut self) {
        self.commands.push(Command::Click(self.pointer));
    }

    /// Take every queued command in arrival order.
    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    let key = Key::from(code);
                    match event.state {
                        ElementState::Pressed => self.key_down(key),
                        ElementState::Released => self.key_up(key),
                    }
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.primary_click(),
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::for_key(Key::Right), Some(Command::NextYear));
        assert_eq!(Command::for_key(Key::Left), Some(Command::PreviousYear));
        assert_eq!(Command::for_key(Key::Space), Some(Command::RestartAutoplay));
        assert_eq!(Command::for_key(Key::Other(7)), None);
    }

    #[test]
    fn test_winit_key_mapping() {
        assert_eq!(Key::from(WinitKeyCode::KeyW), Key::W);
        assert_eq!(Key::from(WinitKeyCode::ArrowRight), Key::Right);
        assert!(matches!(Key::from(WinitKeyCode::KeyQ), Key::Other(_)));
    }

    #[test]
    fn test_held_key_does_not_repeat() {
        let mut input = Input::new();
        input.key_down(Key::R);
        input.key_down(Key::R);
        input.key_up(Key::R);
        input.key_down(Key::R);
        assert_eq!(input.drain(), vec![Command::ToggleRainbow, Command::ToggleRainbow]);
        assert!(input.drain().is_empty());
    }

    #[test]
    fn test_click_uses_pointer() {
        let mut input = Input::new();
        input.pointer_moved(Vec2::new(12.0, 34.0));
        input.primary_click();
        assert_eq!(input.drain(), vec![Command::Click(Vec2::new(12.0, 34.0))]);
    }

    #[test]
    fn test_unbound_keys_are_tracked_but_silent() {
        let mut input = Input::new();
        input.key_down(Key::Other(99));
        assert!(input.drain().is_empty());
        assert!(input.keys_held.contains(&Key::Other(99)));
    }
}
