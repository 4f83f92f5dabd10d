//! Status bar: waveform, voices, background colour and output levels.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use saavy_keys::{dsp::Waveform, visual::HslColor};

pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub struct StatusLine {
    pub waveform: Waveform,
    pub active_voices: usize,
    pub background: Option<HslColor>,
    pub sample_rate: f32,
    pub channels: usize,
    pub running: bool,
}

pub fn render_status(frame: &mut Frame, area: Rect, status: &StatusLine, stats: &AudioStats) {
    let block = Block::default().title(" saavy keys ").borders(Borders::ALL);

    let waveforms: Vec<Span> = Waveform::ALL
        .iter()
        .map(|&w| {
            let style = if w == status.waveform {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!(" {} ", w), style)
        })
        .collect();

    let (state_symbol, state_color) = if status.running {
        ("▶ running", Color::Green)
    } else {
        ("⏸ suspended", Color::Yellow)
    };
    let background = status
        .background
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".into());

    let mut spans = waveforms;
    spans.extend([
        Span::raw("  "),
        Span::styled(
            format!("voices: {}  ", status.active_voices),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{}  ", state_symbol),
            Style::default().fg(state_color),
        ),
        Span::styled(
            format!("{}  ", background),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!(
                "{:.1}kHz x{}  ",
                status.sample_rate / 1000.0,
                status.channels
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
