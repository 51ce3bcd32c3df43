//! Spectrum analyzer widget
//!
//! Windowed FFT of the output tap, averaged into log-spaced bands so the
//! slope of the noise bed reads as a straight line.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

const BANDS: usize = 40;
const MIN_FREQ: f32 = 20.0;
const FLOOR_DB: f64 = -100.0;
/// Weight kept from the previous frame (0 = no smoothing)
const SMOOTHING: f64 = 0.6;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin range `[start, end)` summed into each band
    bands: Vec<(usize, usize)>,
    /// (log10 of band center in Hz, level in dB)
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        // Hann window
        let denom = buffer_len.saturating_sub(1).max(1) as f32;
        let window = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        let half = (buffer_len / 2).max(1);
        let bin_hz = sample_rate / buffer_len.max(1) as f32;
        let max_freq = (sample_rate / 2.0).max(MIN_FREQ * 2.0);
        let ratio = max_freq / MIN_FREQ;

        let edge = |i: usize| MIN_FREQ * ratio.powf(i as f32 / BANDS as f32);
        let mut bands = Vec::with_capacity(BANDS);
        let mut spectrum = Vec::with_capacity(BANDS);
        for i in 0..BANDS {
            let (lo, hi) = (edge(i), edge(i + 1));
            let start = ((lo / bin_hz).floor() as usize).min(half - 1);
            // Narrow low bands still cover at least one bin
            let end = ((hi / bin_hz).ceil() as usize).clamp(start + 1, half);
            bands.push((start, end));
            spectrum.push((((lo * hi).sqrt() as f64).log10(), FLOOR_DB));
        }

        Self {
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            bands,
            spectrum,
        }
    }

    /// Analyze a buffer of exactly the configured length; others are ignored
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for ((start, end), (_, level)) in self.bands.iter().zip(self.spectrum.iter_mut()) {
            let bins = &self.scratch[*start..*end];
            let power = bins.iter().map(|c| c.norm_sqr()).sum::<f32>() / bins.len() as f32;
            let db = (10.0 * (power.max(1e-12) as f64).log10()).max(FLOOR_DB);
            *level = SMOOTHING * *level + (1.0 - SMOOTHING) * db;
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let (min_x, max_x) = spectrum
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), (x, _)| (lo.min(*x), hi.max(*x)));
    let (min_x, max_x) = if min_x < max_x { (min_x, max_x) } else { (1.0, 4.0) };

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 20.0])
                .labels(vec!["-100", "-40", "20"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
