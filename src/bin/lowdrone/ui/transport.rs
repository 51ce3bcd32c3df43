//! Transport bar widget - shows play state, the session's note and noise, and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use lowdrone::{device::DeviceFactory, SignalGraphController};

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_transport<F: DeviceFactory>(
    frame: &mut Frame,
    area: Rect,
    drone: &SignalGraphController<F>,
    audio_stats: &AudioStats,
) {
    let block = Block::default().title(" lowdrone ").borders(Borders::ALL);

    let playing = drone.is_playing();
    let play_symbol = if playing { "▶" } else { "■" };
    let play_state_str = if playing { "Playing" } else { "Stopped" };

    // A playing session keeps its note and color until the next start
    let config = drone.config();
    let (note, color) = match drone.session() {
        Some(session) => (session.note, session.noise_color),
        None => (config.note, config.noise_color),
    };
    let queued = if playing && (config.note != note || config.noise_color != color) {
        format!("(next: {} {})  ", config.note.name(), config.noise_color.name())
    } else {
        String::new()
    };

    let sample_rate = match drone.sample_rate() {
        Some(sr) => format!("{:.1}kHz  ", sr as f32 / 1000.0),
        None => "no device  ".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} {}  ", play_symbol, play_state_str),
            Style::default().fg(if playing { Color::Green } else { Color::Yellow }),
        ),
        Span::styled(
            format!("{} {:.2} Hz  ", note.name(), note.frequency()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{} noise  ", color.name()),
            Style::default().fg(Color::White),
        ),
        Span::styled(queued, Style::default().fg(Color::DarkGray)),
        Span::styled(sample_rate, Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", audio_stats.peak, audio_stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
