//! Application state behind the TUI: the controller and what the user has selected.

use color_eyre::eyre::Result as EyreResult;
use ratatui::DefaultTerminal;
use rtrb::{Consumer, Producer, RingBuffer};

use lowdrone::{
    device::{CpalDevice, DeviceFactory},
    graph::GraphCommand,
    DroneError, ParamName, SignalGraphController, SynthConfig,
};

use super::ui::UiApp;

/// Output samples buffered between the audio callback and the scope
const TAP_CAPACITY: usize = 16_384;

/// Slider steps from one end of a parameter's range to the other
const SLIDER_STEPS: f32 = 200.0;

/// Opens the default cpal output with the scope tap attached.
pub struct StreamFactory {
    tap: Option<Producer<f32>>,
}

impl DeviceFactory for StreamFactory {
    type Device = CpalDevice;

    fn open(&mut self, commands: Consumer<GraphCommand>) -> Result<CpalDevice, DroneError> {
        CpalDevice::open_default(commands, self.tap.take())
    }
}

pub struct Lowdrone {
    pub drone: SignalGraphController<StreamFactory>,
    pub audio_rx: Consumer<f32>,
    /// Index into `ParamName::ALL`
    pub selected: usize,
    /// Last error shown in the help bar
    pub status: Option<String>,
}

impl Lowdrone {
    pub fn new(config: SynthConfig) -> Self {
        let (tap, audio_rx) = RingBuffer::new(TAP_CAPACITY);
        let factory = StreamFactory { tap: Some(tap) };
        Self {
            drone: SignalGraphController::with_config(factory, config),
            audio_rx,
            selected: 0,
            status: None,
        }
    }

    /// Take over the terminal until the user quits
    pub fn run(self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        UiApp::new(self).run(terminal)
    }

    pub fn selected_param(&self) -> ParamName {
        ParamName::ALL[self.selected]
    }

    pub fn toggle_playback(&mut self) {
        if self.drone.is_playing() {
            self.drone.stop();
            self.status = None;
        } else {
            let result = self.drone.start();
            self.report(result);
        }
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % ParamName::ALL.len();
    }

    pub fn select_previous(&mut self) {
        self.selected = (self.selected + ParamName::ALL.len() - 1) % ParamName::ALL.len();
    }

    /// Move the selected slider by `steps` and write it through the controller
    pub fn adjust(&mut self, steps: i32) {
        let name = self.selected_param();
        let value = nudge(name, self.drone.parameter(name), steps);
        let result = self.drone.set_parameter(name.as_str(), value);
        self.report(result);
    }

    pub fn next_note(&mut self) {
        let note = self.drone.config().note.next();
        self.drone.set_note(note);
    }

    pub fn toggle_noise_color(&mut self) {
        let color = self.drone.config().noise_color.toggled();
        self.drone.set_noise_color(color);
    }

    pub fn shutdown(&mut self) {
        self.drone.stop();
    }

    fn report(&mut self, result: Result<(), DroneError>) {
        self.status = result.err().map(|err| err.to_string());
    }
}

/// Step a value along its parameter's range, clamped to the ends
fn nudge(name: ParamName, value: f32, steps: i32) -> f32 {
    let range = name.range();
    let step = (range.end() - range.start()) / SLIDER_STEPS;
    (value + step * steps as f32).clamp(*range.start(), *range.end())
}
