//! The static key table: two octaves (C4–B5) laid over the computer keyboard.
//!
//! Input codes are the decimal key codes of the label characters, so the
//! lower row `Z S X D C V G B H N J M` plays C4–B4 and the upper row
//! `Q 2 W 3 E R 5 T 6 Y 7 U` plays C5–B5.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Whether a key is drawn as a white (natural) or black (accidental) key.
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    White,
    Black,
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyDefinition {
    pub input_code: &'static str,
    pub label: &'static str,
    pub note_name: &'static str,
    pub frequency_hz: f64,
    pub key_class: KeyClass,
}

const fn key(
    input_code: &'static str,
    label: &'static str,
    note_name: &'static str,
    frequency_hz: f64,
    key_class: KeyClass,
) -> KeyDefinition {
    KeyDefinition {
        input_code,
        label,
        note_name,
        frequency_hz,
        key_class,
    }
}

use KeyClass::{Black, White};

pub static KEYS: [KeyDefinition; 24] = [
    // Lower octave: C4–B4
    key("90", "Z", "C", 261.63, White),
    key("83", "S", "C#", 277.18, Black),
    key("88", "X", "D", 293.66, White),
    key("68", "D", "D#", 311.13, Black),
    key("67", "C", "E", 329.63, White),
    key("86", "V", "F", 349.23, White),
    key("71", "G", "F#", 370.0, Black),
    key("66", "B", "G", 392.0, White),
    key("72", "H", "G#", 415.3, Black),
    key("78", "N", "A", 440.0, White),
    key("74", "J", "A#", 466.16, Black),
    key("77", "M", "B", 493.88, White),
    // Upper octave: C5–B5
    key("81", "Q", "C", 523.25, White),
    key("50", "2", "C#", 554.37, Black),
    key("87", "W", "D", 587.33, White),
    key("51", "3", "D#", 622.25, Black),
    key("69", "E", "E", 659.26, White),
    key("82", "R", "F", 698.46, White),
    key("53", "5", "F#", 740.0, Black),
    key("84", "T", "G", 784.0, White),
    key("54", "6", "G#", 830.61, Black),
    key("89", "Y", "A", 880.0, White),
    key("55", "7", "A#", 932.33, Black),
    key("85", "U", "B", 987.77, White),
];

/// Input code for a typed character, or `None` for anything that is not an
/// ASCII letter or digit. Letters are case-insensitive.
pub fn input_code_for_char(c: char) -> Option<String> {
    if c.is_ascii_alphanumeric() {
        Some((c.to_ascii_uppercase() as u32).to_string())
    } else {
        None
    }
}

/// O(1) lookup from input code to frequency, built once from a key table.
#[derive(Debug, Clone)]
pub struct KeyFrequencyIndex {
    keys: &'static [KeyDefinition],
    frequencies: HashMap<&'static str, f64>,
    positions: HashMap<&'static str, usize>,
}

impl KeyFrequencyIndex {
    pub fn new(keys: &'static [KeyDefinition]) -> Self {
        let mut frequencies = HashMap::with_capacity(keys.len());
        let mut positions = HashMap::with_capacity(keys.len());
        for (position, def) in keys.iter().enumerate() {
            // First definition wins if a table repeats a code
            if positions.contains_key(def.input_code) {
                continue;
            }
            frequencies.insert(def.input_code, def.frequency_hz);
            positions.insert(def.input_code, position);
        }

        Self {
            keys,
            frequencies,
            positions,
        }
    }

    pub fn lookup_frequency(&self, input_code: &str) -> Option<f64> {
        self.frequencies.get(input_code).copied()
    }

    pub fn definition(&self, input_code: &str) -> Option<&'static KeyDefinition> {
        let keys = self.keys;
        self.positions.get(input_code).map(|&i| &keys[i])
    }

    /// Resolve a code to the table's own `'static` copy of it.
    pub fn canonical(&self, input_code: &str) -> Option<&'static str> {
        self.definition(input_code).map(|def| def.input_code)
    }

    pub fn keys(&self) -> &'static [KeyDefinition] {
        self.keys
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

impl Default for KeyFrequencyIndex {
    fn default() -> Self {
        Self::new(&KEYS)
    }
}
