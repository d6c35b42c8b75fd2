use std::fmt;
use std::str::FromStr;

use crossterm::event::{
    KeyCode as CrosstermKeyCode, KeyEvent as CrosstermKeyEvent,
    KeyModifiers as CrosstermKeyModifiers,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Unknown,
    Char(char),
    Enter,
    Tab,
    BackTab,
    Esc,
    Backspace,
    Delete,
    Home,
    End,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers(u8);

impl KeyModifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const CONTROL: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);
    /// Command key on macOS, Windows key elsewhere.
    pub const SUPER: Self = Self(1 << 3);

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }
}

impl From<CrosstermKeyEvent> for KeyEvent {
    fn from(event: CrosstermKeyEvent) -> Self {
        Self {
            code: map_key_code(event.code),
            modifiers: map_key_modifiers(event.modifiers),
        }
    }
}

fn map_key_code(code: CrosstermKeyCode) -> KeyCode {
    match code {
        CrosstermKeyCode::Char(ch) => KeyCode::Char(ch),
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Tab => KeyCode::Tab,
        CrosstermKeyCode::BackTab => KeyCode::BackTab,
        CrosstermKeyCode::Esc => KeyCode::Esc,
        CrosstermKeyCode::Backspace => KeyCode::Backspace,
        CrosstermKeyCode::Delete => KeyCode::Delete,
        CrosstermKeyCode::Home => KeyCode::Home,
        CrosstermKeyCode::End => KeyCode::End,
        CrosstermKeyCode::Left => KeyCode::Left,
        CrosstermKeyCode::Right => KeyCode::Right,
        CrosstermKeyCode::Up => KeyCode::Up,
        CrosstermKeyCode::Down => KeyCode::Down,
        _ => KeyCode::Unknown,
    }
}

fn map_key_modifiers(modifiers: CrosstermKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::NONE;
    for (from, to) in [
        (CrosstermKeyModifiers::SHIFT, KeyModifiers::SHIFT),
        (CrosstermKeyModifiers::CONTROL, KeyModifiers::CONTROL),
        (CrosstermKeyModifiers::ALT, KeyModifiers::ALT),
        (CrosstermKeyModifiers::SUPER, KeyModifiers::SUPER),
        (CrosstermKeyModifiers::META, KeyModifiers::SUPER),
    ] {
        if modifiers.contains(from) {
            out = out.union(to);
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid key chord '{0}'")]
pub struct KeyChordParseError(String);

/// A key plus the modifier sets that trigger it. Any one listed modifier set
/// matches, so `ctrl+enter|super+enter` fires on either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    code: KeyCode,
    alternatives: Vec<KeyModifiers>,
}

impl KeyChord {
    pub fn new(code: KeyCode, alternatives: Vec<KeyModifiers>) -> Self {
        Self { code, alternatives }
    }

    /// Modifier+Enter: control, or command on macOS.
    pub fn commit_and_continue() -> Self {
        Self::new(
            KeyCode::Enter,
            vec![KeyModifiers::CONTROL, KeyModifiers::SUPER],
        )
    }

    pub fn matches(&self, key: KeyEvent) -> bool {
        key.code == self.code
            && self
                .alternatives
                .iter()
                .any(|mods| !mods.is_empty() && key.modifiers.contains(*mods))
    }
}

impl Default for KeyChord {
    fn default() -> Self {
        Self::commit_and_continue()
    }
}

impl FromStr for KeyChord {
    type Err = KeyChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut code = None;
        let mut alternatives = Vec::new();
        for alternative in s.split('|') {
            let mut mods = KeyModifiers::NONE;
            let mut alt_code = None;
            for part in alternative.split('+').map(|p| p.trim().to_ascii_lowercase()) {
                match part.as_str() {
                    "ctrl" | "control" => mods = mods.union(KeyModifiers::CONTROL),
                    "alt" | "option" => mods = mods.union(KeyModifiers::ALT),
                    "shift" => mods = mods.union(KeyModifiers::SHIFT),
                    "super" | "cmd" | "meta" => mods = mods.union(KeyModifiers::SUPER),
                    "enter" | "return" => alt_code = Some(KeyCode::Enter),
                    "tab" => alt_code = Some(KeyCode::Tab),
                    "esc" | "escape" => alt_code = Some(KeyCode::Esc),
                    other => {
                        let mut chars = other.chars();
                        match (chars.next(), chars.next()) {
                            (Some(ch), None) => alt_code = Some(KeyCode::Char(ch)),
                            _ => return Err(KeyChordParseError(s.to_string())),
                        }
                    }
                }
            }
            // Every alternative needs a modifier.
            let (Some(alt_code), false) = (alt_code, mods.is_empty()) else {
                return Err(KeyChordParseError(s.to_string()));
            };
            if code.is_some_and(|existing| existing != alt_code) {
                return Err(KeyChordParseError(s.to_string()));
            }
            code = Some(alt_code);
            alternatives.push(mods);
        }
        code.map(|code| Self::new(code, alternatives))
            .ok_or_else(|| KeyChordParseError(s.to_string()))
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self.code {
            KeyCode::Enter => "enter".to_string(),
            KeyCode::Tab => "tab".to_string(),
            KeyCode::Esc => "esc".to_string(),
            KeyCode::Char(ch) => ch.to_string(),
            _ => "unknown".to_string(),
        };
        for (idx, mods) in self.alternatives.iter().enumerate() {
            if idx > 0 {
                f.write_str("|")?;
            }
            for (flag, name) in [
                (KeyModifiers::CONTROL, "ctrl+"),
                (KeyModifiers::ALT, "alt+"),
                (KeyModifiers::SHIFT, "shift+"),
                (KeyModifiers::SUPER, "super+"),
            ] {
                if mods.contains(flag) {
                    f.write_str(name)?;
                }
            }
            f.write_str(&key)?;
        }
        Ok(())
    }
}

impl Serialize for KeyChord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for KeyChord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
