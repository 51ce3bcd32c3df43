//! lowdrone - terminal drone generator
//!
//! Run with: cargo run --bin lowdrone

mod app;
mod ui;

use app::Lowdrone;
use lowdrone::SynthConfig;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Only warnings and errors, so the log does not fight the TUI for the screen
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .init();

    let mut terminal = ratatui::init();
    let result = Lowdrone::new(SynthConfig::default()).run(&mut terminal);
    ratatui::restore();
    result
}
