use std::fmt;

use serde::{Deserialize, Serialize};

pub const BACKSPACE: &str = "Backspace";
pub const TAB: &str = "Tab";

/// A recorded key: a visible character, the word-boundary space, or one of
/// the two control keys the session understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Key {
    Char(char),
    Space,
    Backspace,
    Tab,
}

impl Key {
    pub fn from_char(ch: char) -> Self {
        if ch == ' ' { Key::Space } else { Key::Char(ch) }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(ch) => write!(f, "{ch}"),
            Key::Space => f.write_str(" "),
            Key::Backspace => f.write_str(BACKSPACE),
            Key::Tab => f.write_str(TAB),
        }
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for Key {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            BACKSPACE => return Ok(Key::Backspace),
            TAB => return Ok(Key::Tab),
            _ => {}
        }
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(Key::from_char(ch)),
            _ => Err(format!("unrecognized key {value:?}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeystrokeEvent {
    pub timestamp_ms: f64,
    pub key: Key,
    pub word_index: usize,
    pub char_index: usize,
}
