//! Terminal rendering for the keyboard.
//!
//! ```text
//!   ┌ saavy keys ───────────────────────────────────────┐
//!   │ sine square sawtooth triangle  voices  hsl  Peak  │
//!   ├ Keys ─────────────────────────────────────────────┤
//!   │ ▌S▐ ▌D▐   ▌G▐ ▌H▐ ▌J▐   ▌2▐ ▌3▐   ▌5▐ ▌6▐ ▌7▐     │
//!   │  Z   X   C   V   B   N   M   Q   W   E   R   T …  │
//!   ├ Output ─────────────────┬ Spectrum ───────────────┤
//!   │ ∿∿∿∿∿∿                  │  ╱╲                     │
//!   └─────────────────────────┴─────────────────────────┘
//!    help line
//! ```
//!
//! The whole screen is painted with the background colour of the last note.

mod keyboard;
mod spectrum;
mod status;
mod waveform;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Paragraph},
    Frame,
};

use saavy_keys::{keys::KeyDefinition, visual::VisualState};

pub use keyboard::KeyboardLayout;
pub use spectrum::SpectrumAnalyzer;
pub use status::{AudioStats, StatusLine};

use keyboard::render_keyboard;
use spectrum::render_spectrum;
use status::render_status;
use waveform::render_waveform;

/// Everything a frame needs, borrowed from the app.
pub struct View<'a> {
    pub keys: &'static [KeyDefinition],
    pub visuals: &'a VisualState,
    pub status: StatusLine,
    pub scope: &'a [f32],
    pub master_gain: f32,
    pub spectrum: &'a [(f64, f64)],
}

/// Draw one frame and return the key layout for mouse hit testing.
pub fn render(frame: &mut Frame, view: &View) -> KeyboardLayout {
    let area = frame.area();

    let background = view
        .visuals
        .background()
        .map(|color| {
            let (r, g, b) = color.to_rgb();
            Color::Rgb(r, g, b)
        })
        .unwrap_or(Color::Reset);
    frame.render_widget(Block::default().style(Style::default().bg(background)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Min(8),    // Keys
            Constraint::Length(10), // Scope + spectrum
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    render_status(
        frame,
        chunks[0],
        &view.status,
        &AudioStats::from_buffer(view.scope),
    );

    let layout = render_keyboard(frame, chunks[1], view.keys, view.visuals);

    let scopes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_waveform(
        frame,
        scopes[0],
        view.scope,
        view.status.sample_rate,
        view.master_gain,
    );
    render_spectrum(frame, scopes[1], view.spectrum);

    let help = Paragraph::new(" [Z-U / S-7] Play  [Mouse] Play  [Tab/←→] Waveform  [Esc] Quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);

    layout
}
