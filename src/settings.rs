//! Key bindings and visual preferences
//!
//! Nothing is stored: the page can hand over a JSON blob, otherwise defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAction {
    MoveLeft,
    MoveRight,
    Start,
    Replay,
    Quit,
    ToggleAutopilot,
}

impl KeyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAction::MoveLeft => "Move left",
            KeyAction::MoveRight => "Move right",
            KeyAction::Start => "Start",
            KeyAction::Replay => "Play again",
            KeyAction::Quit => "Quit",
            KeyAction::ToggleAutopilot => "Demo mode",
        }
    }

    /// Held for as long as the key is down, rather than fired once
    pub fn is_held(&self) -> bool {
        matches!(self, KeyAction::MoveLeft | KeyAction::MoveRight)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no key bound to {}", .0.as_str())]
    Unbound(KeyAction),
}

/// DOM `KeyboardEvent.key` names per action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub start: Vec<String>,
    pub replay: Vec<String>,
    pub quit: Vec<String>,
    pub autopilot: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: keys(&["ArrowLeft", "a", "A"]),
            right: keys(&["ArrowRight", "d", "D"]),
            start: keys(&[" "]),
            replay: keys(&[" ", "Enter"]),
            quit: keys(&["Escape", "q", "Q"]),
            autopilot: keys(&["i", "I"]),
        }
    }
}

impl KeyBindings {
    fn table(&self) -> [(KeyAction, &Vec<String>); 6] {
        [
            (KeyAction::MoveLeft, &self.left),
            (KeyAction::MoveRight, &self.right),
            (KeyAction::Start, &self.start),
            (KeyAction::Replay, &self.replay),
            (KeyAction::Quit, &self.quit),
            (KeyAction::ToggleAutopilot, &self.autopilot),
        ]
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keys: KeyBindings,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// High contrast palette
    pub high_contrast: bool,
    /// Keep the clouds still
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keys: KeyBindings::default(),
            show_fps: false,
            high_contrast: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse settings; every action must keep at least one key
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        for (action, names) in settings.keys.table() {
            if names.is_empty() {
                return Err(SettingsError::Unbound(action));
            }
        }
        Ok(settings)
    }

    /// Parse settings, falling back to defaults on any problem
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings: {}", e);
                Self::default()
            }
        }
    }

    /// Actions bound to a key, in binding-table order
    pub fn actions_for_key(&self, key: &str) -> Vec<KeyAction> {
        self.keys
            .table()
            .into_iter()
            .filter(|(_, names)| names.iter().any(|n| n == key))
            .map(|(action, _)| action)
            .collect()
    }
}
