//! Input event data consumed by the drawing tools.

use crate::camera::Camera;
use crate::geometry::Vector2;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };
}

/// A mouse event in both coordinate spaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseEventData {
    pub screen_pos: Vector2,
    pub world_pos: Vector2,
    pub button: MouseButton,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl MouseEventData {
    /// Event from a screen position, converted through the camera.
    pub fn from_screen(camera: &Camera, screen_pos: Vector2, button: MouseButton, modifiers: Modifiers) -> Self {
        Self {
            screen_pos,
            world_pos: camera.screen_to_world(screen_pos),
            button,
            shift: modifiers.shift,
            ctrl: modifiers.ctrl,
            alt: modifiers.alt,
        }
    }

    /// Event from a world position, converted through the camera.
    pub fn from_world(camera: &Camera, world_pos: Vector2, button: MouseButton, modifiers: Modifiers) -> Self {
        Self {
            screen_pos: camera.world_to_screen(world_pos),
            world_pos,
            button,
            shift: modifiers.shift,
            ctrl: modifiers.ctrl,
            alt: modifiers.alt,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            shift: self.shift,
            ctrl: self.ctrl,
            alt: self.alt,
        }
    }
}

/// A key press. `key` uses DOM-style names (`"Escape"`, `"Enter"`, `"c"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEventData {
    pub key: String,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyEventData {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            shift: false,
            ctrl: false,
            alt: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.shift = modifiers.shift;
        self.ctrl = modifiers.ctrl;
        self.alt = modifiers.alt;
        self
    }

    /// Case-insensitive key name comparison.
    pub fn is(&self, name: &str) -> bool {
        self.key.eq_ignore_ascii_case(name)
    }

    /// The typed character for single-character keys.
    pub fn char(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}
