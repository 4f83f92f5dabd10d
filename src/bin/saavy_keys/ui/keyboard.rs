//! Piano widget: two octaves of keys, highlighted while they sound.
//!
//! The same layout is used for drawing and for mapping mouse positions back
//! to keys, so clicks always land on what is on screen.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use saavy_keys::{
    keys::{KeyClass, KeyDefinition},
    visual::VisualState,
};

const WHITE_KEY_COUNT: u16 = 14;
const MIN_WHITE_KEY_WIDTH: u16 = 3;

/// Screen rectangles for every key, black keys last (they sit on top).
pub struct KeyboardLayout {
    keys: Vec<(&'static KeyDefinition, Rect)>,
}

impl KeyboardLayout {
    pub fn new(area: Rect, keys: &'static [KeyDefinition]) -> Self {
        let white_width = (area.width / WHITE_KEY_COUNT).max(MIN_WHITE_KEY_WIDTH);
        let black_width = (white_width * 2 / 3).max(1);
        let black_height = (area.height * 3 / 5).max(1);
        let right_edge = area.x + area.width;

        let mut whites = Vec::with_capacity(keys.len());
        let mut blacks = Vec::with_capacity(keys.len());
        let mut white_index = 0u16;

        for def in keys {
            match def.key_class {
                KeyClass::White => {
                    let x = area.x + white_index * white_width;
                    if x < right_edge {
                        let width = white_width.min(right_edge - x);
                        whites.push((def, Rect::new(x, area.y, width, area.height)));
                    }
                    white_index += 1;
                }
                KeyClass::Black => {
                    // Straddles the boundary with the previous white key
                    let boundary = area.x + white_index * white_width;
                    let x = boundary.saturating_sub(black_width / 2 + black_width % 2);
                    if x >= area.x && x + black_width <= right_edge {
                        blacks.push((def, Rect::new(x, area.y, black_width, black_height)));
                    }
                }
            }
        }

        whites.extend(blacks);
        Self { keys: whites }
    }

    /// The key drawn at a terminal cell, black keys taking precedence.
    pub fn key_at(&self, column: u16, row: u16) -> Option<&'static KeyDefinition> {
        self.keys
            .iter()
            .rev()
            .find(|(_, rect)| {
                column >= rect.x
                    && column < rect.x + rect.width
                    && row >= rect.y
                    && row < rect.y + rect.height
            })
            .map(|(def, _)| *def)
    }

    pub fn keys(&self) -> &[(&'static KeyDefinition, Rect)] {
        &self.keys
    }
}

fn key_style(def: &KeyDefinition, active: bool) -> Style {
    match (def.key_class, active) {
        (KeyClass::White, false) => Style::default().bg(Color::White).fg(Color::Black),
        (KeyClass::Black, false) => Style::default().bg(Color::Black).fg(Color::Gray),
        (KeyClass::White, true) => Style::default()
            .bg(Color::LightCyan)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
        (KeyClass::Black, true) => Style::default()
            .bg(Color::Cyan)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    }
}

/// Render the keyboard and return its layout for hit testing.
pub fn render_keyboard(
    frame: &mut Frame,
    area: Rect,
    keys: &'static [KeyDefinition],
    visuals: &VisualState,
) -> KeyboardLayout {
    let block = Block::default().title(" Keys ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = KeyboardLayout::new(inner, keys);

    for (def, rect) in layout.keys() {
        let style = key_style(def, visuals.is_key_active(def.input_code));

        // Labels sit at the bottom of each key
        let padding = rect.height.saturating_sub(2) as usize;
        let mut lines: Vec<Line> = vec![Line::from(""); padding];
        lines.push(Line::from(def.note_name));
        lines.push(Line::from(def.label));

        let key = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::default().borders(match def.key_class {
                KeyClass::White => Borders::RIGHT,
                KeyClass::Black => Borders::NONE,
            }));
        frame.render_widget(key, *rect);
    }

    layout
}
