//! Input adapter
//!
//! Collapses every raw trigger (jump key, mouse click, touch) into one abstract
//! command. There is no debounce: each raw event is its own command.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Raw trigger from the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawInput {
    /// Key pressed, identified by its layout-independent code (e.g. `"Space"`)
    KeyDown { code: String },
    PointerClick,
    TouchStart,
    /// Start or retry button on the start/end screen
    StartPressed,
}

/// What the game should do in response to input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Jump,
    Start,
}

/// Maps raw triggers to commands
#[derive(Debug, Clone)]
pub struct InputAdapter {
    jump_key: String,
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new("Space")
    }
}

impl InputAdapter {
    pub fn new(jump_key: impl Into<String>) -> Self {
        Self {
            jump_key: jump_key.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.jump_key.clone())
    }

    pub fn jump_key(&self) -> &str {
        &self.jump_key
    }

    pub fn translate(&self, raw: &RawInput) -> Option<Command> {
        match raw {
            RawInput::KeyDown { code } if *code == self.jump_key => Some(Command::Jump),
            RawInput::KeyDown { .. } => None,
            RawInput::PointerClick | RawInput::TouchStart => Some(Command::Jump),
            RawInput::StartPressed => Some(Command::Start),
        }
    }
}
