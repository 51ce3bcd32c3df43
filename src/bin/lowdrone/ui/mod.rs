//! TUI module for lowdrone
//!
//! Draws the transport, the parameter sliders and live views of the output,
//! and turns key presses into controller calls.

mod sliders;
mod spectrum;
mod transport;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use std::time::Duration;

use super::app::Lowdrone;

use sliders::render_sliders;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use transport::{render_transport, AudioStats};
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

pub struct UiApp {
    app: Lowdrone,
    /// Most recent output samples, oldest first
    audio_buffer: Vec<f32>,
    /// Built once the device reports its sample rate
    spectrum: Option<SpectrumAnalyzer>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(app: Lowdrone) -> Self {
        Self {
            app,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.app.shutdown();
        Ok(())
    }

    /// Pull tapped samples, keeping the last VIS_BUFFER_SIZE
    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.app.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }
        if !received {
            return;
        }

        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }

        if self.spectrum.is_none() {
            if let Some(sample_rate) = self.app.drone.sample_rate() {
                self.spectrum = Some(SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate as f32));
            }
        }
        if let Some(spectrum) = self.spectrum.as_mut() {
            spectrum.update(&self.audio_buffer);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.app.toggle_playback(),
            KeyCode::Up => self.app.select_previous(),
            KeyCode::Down => self.app.select_next(),
            KeyCode::Left => self.app.adjust(-1),
            KeyCode::Right => self.app.adjust(1),
            KeyCode::Char('n') => self.app.next_note(),
            KeyCode::Char('c') => self.app.toggle_noise_color(),
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Length(8), // Sliders
                Constraint::Min(8),    // Waveform + spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_transport(frame, chunks[0], &self.app.drone, &stats);
        render_sliders(frame, chunks[1], &self.app.drone, self.app.selected_param());

        let views = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        render_waveform(frame, views[0], &self.audio_buffer);
        let spectrum = self.spectrum.as_ref().map(|s| s.data()).unwrap_or(&[]);
        render_spectrum(frame, views[1], spectrum);

        let help = match &self.app.status {
            Some(message) => Paragraph::new(format!(" {message}"))
                .style(Style::default().fg(Color::Red)),
            None => Paragraph::new(
                " [Space] Play/Stop  [↑↓] Select  [←→] Adjust  [N] Note  [C] Noise  [Q] Quit",
            )
            .style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(help, chunks[3]);
    }
}
