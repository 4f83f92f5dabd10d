//! Oscilloscope of the most recent output.
//!
//! The vertical range follows the master gain, which is where a single
//! voice peaks, and widens when chords go past it.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Braille packs two dots per cell horizontally.
const POINTS_PER_COLUMN: usize = 2;

/// Reduce `samples` to at most `points` (time in ms, sample) pairs, keeping
/// the largest-magnitude sample of each bucket so peaks survive.
fn decimate(samples: &[f32], points: usize, sample_rate: f32) -> Vec<(f64, f64)> {
    if samples.is_empty() || points == 0 {
        return Vec::new();
    }
    let bucket = samples.len().div_ceil(points);
    let ms_per_sample = 1000.0 / sample_rate.max(1.0) as f64;

    samples
        .chunks(bucket)
        .enumerate()
        .map(|(i, chunk)| {
            let loudest = chunk
                .iter()
                .copied()
                .fold(0.0f32, |acc, s| if s.abs() > acc.abs() { s } else { acc });
            ((i * bucket) as f64 * ms_per_sample, loudest as f64)
        })
        .collect()
}

pub fn render_waveform(
    frame: &mut Frame,
    area: Rect,
    audio_buffer: &[f32],
    sample_rate: f32,
    master_gain: f32,
) {
    let peak = audio_buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    let clipping = peak > 1.0;

    let title = if clipping {
        Span::styled(
            " Output (clipping) ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw(" Output ")
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let columns = area.width.saturating_sub(2) as usize;
    let data = decimate(audio_buffer, columns * POINTS_PER_COLUMN, sample_rate);
    let span_ms = audio_buffer.len() as f64 * 1000.0 / sample_rate.max(1.0) as f64;
    let range = master_gain.max(peak).max(1e-3) as f64;

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(if clipping { Color::Red } else { Color::Cyan }))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, span_ms])
                .labels(vec!["0".to_string(), format!("{span_ms:.0} ms")])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-range, range])
                .labels(vec![format!("-{range:.2}"), format!("{range:.2}")])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
