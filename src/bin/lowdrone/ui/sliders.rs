//! Parameter sliders

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use lowdrone::{
    device::DeviceFactory,
    dsp::lfo::{gain_swing, period_from_frequency},
    ParamName, SignalGraphController,
};

const BAR_WIDTH: usize = 24;

fn title(name: ParamName) -> &'static str {
    match name {
        ParamName::ToneGain => "Tone level",
        ParamName::ModulatorARate => "Tone LFO rate",
        ParamName::ModulatorADepth => "Tone LFO depth",
        ParamName::NoiseGain => "Noise level",
        ParamName::ModulatorBRate => "Noise LFO rate",
        ParamName::ModulatorBDepth => "Noise LFO depth",
    }
}

fn label<F: DeviceFactory>(drone: &SignalGraphController<F>, name: ParamName) -> String {
    let value = drone.parameter(name);
    match name {
        ParamName::ToneGain | ParamName::NoiseGain => format!("{:.3}", value),
        ParamName::ModulatorARate | ParamName::ModulatorBRate => {
            format!("{:.2} Hz ({:.1} s)", value, period_from_frequency(value))
        }
        ParamName::ModulatorADepth | ParamName::ModulatorBDepth => {
            let base = if name == ParamName::ModulatorADepth {
                drone.parameter(ParamName::ToneGain)
            } else {
                drone.parameter(ParamName::NoiseGain)
            };
            let (low, high) = gain_swing(base, value);
            format!("±{:.3} ({:.3}..{:.3})", value, low, high)
        }
    }
}

fn bar(name: ParamName, value: f32) -> String {
    let range = name.range();
    let fraction = (value - range.start()) / (range.end() - range.start());
    let filled = ((fraction * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn render_sliders<F: DeviceFactory>(
    frame: &mut Frame,
    area: Rect,
    drone: &SignalGraphController<F>,
    selected: ParamName,
) {
    let block = Block::default().title(" Controls ").borders(Borders::ALL);

    let lines: Vec<Line> = ParamName::ALL
        .into_iter()
        .map(|name| {
            let style = if name == selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let marker = if name == selected { "▸" } else { " " };
            Line::from(vec![
                Span::styled(format!(" {} {:<16}", marker, title(name)), style),
                Span::styled(bar(name, drone.parameter(name)), Style::default().fg(Color::Cyan)),
                Span::styled(format!("  {}", label(drone, name)), style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
