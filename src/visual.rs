//! Visual feedback: which keys look pressed, and the background color that
//! follows the most recently started note.

use std::{collections::HashSet, fmt};

/// Reference range for the hue mapping. Frequencies outside it extrapolate.
pub const HUE_LOW_HZ: f64 = 260.0;
pub const HUE_HIGH_HZ: f64 = 1000.0;

const BACKGROUND_SATURATION: f64 = 20.0;
const BACKGROUND_LIGHTNESS: f64 = 15.0;

/// Linear map from [260 Hz, 1000 Hz] onto [0°, 360°]. Not clamped.
pub fn hue_for_frequency(frequency_hz: f64) -> f64 {
    (frequency_hz - HUE_LOW_HZ) / (HUE_HIGH_HZ - HUE_LOW_HZ) * 360.0
}

/// HSL color, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslColor {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl HslColor {
    /// The background for a note at `frequency_hz`.
    pub fn background_for(frequency_hz: f64) -> Self {
        Self {
            hue: hue_for_frequency(frequency_hz),
            saturation: BACKGROUND_SATURATION,
            lightness: BACKGROUND_LIGHTNESS,
        }
    }

    /// sRGB bytes. Hues outside [0, 360) wrap, as in CSS.
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (byte(r), byte(g), byte(b))
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// What the renderer needs to draw: active keys and the background.
#[derive(Debug, Clone, Default)]
pub struct VisualState {
    active: HashSet<String>,
    background: Option<HslColor>,
}

impl VisualState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_active(&mut self, input_code: &str, active: bool) {
        if active {
            self.active.insert(input_code.to_string());
        } else {
            self.active.remove(input_code);
        }
    }

    pub fn is_key_active(&self, input_code: &str) -> bool {
        self.active.contains(input_code)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn note_started(&mut self, frequency_hz: f64) {
        self.background = Some(HslColor::background_for(frequency_hz));
    }

    /// `None` until the first note is played.
    pub fn background(&self) -> Option<HslColor> {
        self.background
    }
}
