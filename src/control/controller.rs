use tracing::{debug, info, warn};

use crate::{
    config::{NoiseColor, ScaleNote, SynthConfig},
    context::AudioContext,
    control::params::{ParamBinding, ParamName, ParameterSet},
    device::DeviceFactory,
    error::DroneError,
    graph::{
        gain::GainNode, lfo::LfoNode, noise::NoiseNode, oscillator::OscNode, Destination, NodeId,
        NodeKind, ParamKind, Topology,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

/// The nodes of one play session. They are attached together and detached
/// together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSession {
    pub tone: NodeId,
    pub noise: NodeId,
    /// Tone level, modulated by `lfo_a`
    pub gain_a: NodeId,
    /// Noise level, modulated by `lfo_b`
    pub gain_b: NodeId,
    pub lfo_a: NodeId,
    pub lfo_b: NodeId,
    pub note: ScaleNote,
    pub noise_color: NoiseColor,
}

impl PlaybackSession {
    pub fn nodes(&self) -> [NodeId; 6] {
        [
            self.tone,
            self.noise,
            self.gain_a,
            self.gain_b,
            self.lfo_a,
            self.lfo_b,
        ]
    }

    /// Which live node property a parameter drives in this session
    pub fn binding(&self, name: ParamName) -> ParamBinding {
        let node = match name {
            ParamName::ToneGain => self.gain_a,
            ParamName::NoiseGain => self.gain_b,
            ParamName::ModulatorARate | ParamName::ModulatorADepth => self.lfo_a,
            ParamName::ModulatorBRate | ParamName::ModulatorBDepth => self.lfo_b,
        };
        ParamBinding {
            node,
            param: name.kind(),
        }
    }
}

/// Play/stop state machine for the drone.
///
/// The controller owns the parameters and, once started for the first time,
/// the audio context. Parameters can be written at any time. While stopped
/// they are only stored. While playing they are also sent to the live nodes.
///
/// # Example
/// ```
/// use lowdrone::{device::OfflineDevice, SignalGraphController};
///
/// let mut drone = SignalGraphController::new(OfflineDevice::factory(48_000));
/// drone.set_parameter("tone-gain", 0.5).unwrap();
/// drone.start().unwrap();
/// assert!(drone.is_playing());
///
/// let mut block = vec![0.0; 512];
/// drone.device_mut().unwrap().render(&mut block);
/// drone.stop();
/// assert!(!drone.is_playing());
/// ```
pub struct SignalGraphController<F: DeviceFactory> {
    factory: F,
    config: SynthConfig,
    context: Option<AudioContext<F::Device>>,
    params: ParameterSet,
    session: Option<PlaybackSession>,
    state: PlaybackState,
}

impl<F: DeviceFactory> SignalGraphController<F> {
    pub fn new(factory: F) -> Self {
        Self::with_config(factory, SynthConfig::default())
    }

    pub fn with_config(factory: F, config: SynthConfig) -> Self {
        Self {
            factory,
            config,
            context: None,
            params: ParameterSet::new(),
            session: None,
            state: PlaybackState::Stopped,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    /// Stored value of a parameter, playing or not
    pub fn parameter(&self, name: ParamName) -> f32 {
        self.params.value(name)
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    /// The control-side graph, once the context exists
    pub fn topology(&self) -> Option<&Topology> {
        self.context.as_ref().map(|c| c.topology())
    }

    pub fn device(&self) -> Option<&F::Device> {
        self.context.as_ref().map(|c| c.device())
    }

    pub fn device_mut(&mut self) -> Option<&mut F::Device> {
        self.context.as_mut().map(|c| c.device_mut())
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.context.as_ref().map(|c| c.sample_rate())
    }

    /// Note for the next session. A playing tone keeps its frequency.
    pub fn set_note(&mut self, note: ScaleNote) {
        debug!(note = note.name(), "note selected");
        self.config.note = note;
    }

    /// Noise color for the next session
    pub fn set_noise_color(&mut self, color: NoiseColor) {
        debug!(color = color.name(), "noise color selected");
        self.config.noise_color = color;
    }

    /// Build the session graph and start playing.
    ///
    /// Does nothing when already playing. On error the controller stays
    /// stopped and no session node is left in the graph.
    pub fn start(&mut self) -> Result<(), DroneError> {
        if self.is_playing() {
            debug!("start while playing ignored");
            return Ok(());
        }
        self.config.validate()?;

        if self.context.is_none() {
            let context = AudioContext::open(&mut self.factory, self.config.command_capacity)?;
            info!(sample_rate = context.sample_rate(), "audio context opened");
            self.context = Some(context);
        }
        let Some(context) = self.context.as_mut() else {
            return Err(DroneError::device("audio context was not opened"));
        };

        context.resume()?;

        // The device stays resumed on failure so a stalled queue can drain
        // before the next attempt
        let session = Self::build_session(context, &self.config, &self.params)?;

        self.params.bind_all(|name| session.binding(name));
        self.session = Some(session);
        self.state = PlaybackState::Playing;
        info!(
            note = session.note.name(),
            noise = session.noise_color.name(),
            "playing"
        );
        Ok(())
    }

    fn build_session(
        context: &mut AudioContext<F::Device>,
        config: &SynthConfig,
        params: &ParameterSet,
    ) -> Result<PlaybackSession, DroneError> {
        let noise_buffer = config
            .noise_color
            .generate(context.sample_rate(), config.noise_duration_secs)?;

        let mut patch = context.patch();
        let tone = patch.add(NodeKind::Oscillator, OscNode::sine(config.note.frequency()));
        let noise = patch.add(NodeKind::NoiseSource, NoiseNode::looping(noise_buffer));
        let gain_a = patch.add(
            NodeKind::Gain,
            GainNode::new(params.value(ParamName::ToneGain)),
        );
        let gain_b = patch.add(
            NodeKind::Gain,
            GainNode::new(params.value(ParamName::NoiseGain)),
        );
        let lfo_a = patch.add(
            NodeKind::Lfo,
            LfoNode::sine(
                params.value(ParamName::ModulatorARate),
                params.value(ParamName::ModulatorADepth),
            ),
        );
        let lfo_b = patch.add(
            NodeKind::Lfo,
            LfoNode::sine(
                params.value(ParamName::ModulatorBRate),
                params.value(ParamName::ModulatorBDepth),
            ),
        );

        patch
            .connect(tone, Destination::Node(gain_a))
            .connect(gain_a, Destination::Output)
            .connect(noise, Destination::Node(gain_b))
            .connect(gain_b, Destination::Output)
            .connect(lfo_a, Destination::Param(gain_a, ParamKind::Gain))
            .connect(lfo_b, Destination::Param(gain_b, ParamKind::Gain));
        patch.commit()?;

        Ok(PlaybackSession {
            tone,
            noise,
            gain_a,
            gain_b,
            lfo_a,
            lfo_b,
            note: config.note,
            noise_color: config.noise_color,
        })
    }

    /// Tear down the session. Stored parameter values are kept.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            debug!("stop while stopped ignored");
            return;
        };
        self.params.unbind_all();
        self.state = PlaybackState::Stopped;

        if let Some(context) = self.context.as_mut() {
            if let Err(err) = context.detach(session.nodes().to_vec()) {
                warn!(%err, "suspending output until teardown is delivered");
                if let Err(err) = context.suspend() {
                    warn!(%err, "could not suspend output");
                }
            }
        }
        info!("stopped");
    }

    /// Write a parameter by its control name, e.g. `"tone-gain"`.
    pub fn set_parameter(&mut self, name: &str, value: f32) -> Result<(), DroneError> {
        self.set(name.parse()?, value)
    }

    /// Store a parameter and, while playing, forward it to its node.
    ///
    /// Nothing changes if the value is out of range or cannot be delivered.
    pub fn set(&mut self, name: ParamName, value: f32) -> Result<(), DroneError> {
        name.validate(value)?;

        let param = self.params.get_mut(name);
        if let (Some(binding), Some(context)) = (param.binding(), self.context.as_mut()) {
            context.set_param(binding.node, binding.param, value)?;
        }
        param.store(value);
        debug!(%name, value, bound = param.is_bound(), "parameter set");
        Ok(())
    }
}

impl<F: DeviceFactory> std::fmt::Debug for SignalGraphController<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalGraphController")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("session", &self.session)
            .field("params", &self.params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::OfflineDevice;

    fn controller() -> SignalGraphController<impl DeviceFactory<Device = OfflineDevice>> {
        SignalGraphController::new(OfflineDevice::factory(8_000))
    }

    #[test]
    fn context_is_opened_lazily_and_kept() {
        let mut drone = controller();
        assert!(drone.topology().is_none());

        drone.start().unwrap();
        assert_eq!(drone.sample_rate(), Some(8_000));
        drone.stop();
        assert!(drone.topology().is_some());
    }

    #[test]
    fn session_binds_every_parameter() {
        let mut drone = controller();
        drone.start().unwrap();
        let session = *drone.session().unwrap();

        for param in drone.parameters().iter() {
            assert_eq!(param.binding(), Some(session.binding(param.name())));
        }
        assert_eq!(
            session.binding(ParamName::ModulatorBDepth),
            ParamBinding {
                node: session.lfo_b,
                param: ParamKind::Depth
            }
        );
    }

    #[test]
    fn stop_unbinds_but_keeps_values() {
        let mut drone = controller();
        drone.start().unwrap();
        drone.set(ParamName::NoiseGain, 0.6).unwrap();
        drone.stop();

        assert!(drone.parameters().iter().all(|p| !p.is_bound()));
        assert_eq!(drone.parameter(ParamName::NoiseGain), 0.6);
        assert!(drone.session().is_none());
    }

    #[test]
    fn invalid_value_changes_nothing() {
        let mut drone = controller();
        let err = drone.set(ParamName::ModulatorARate, 9.0).unwrap_err();
        assert!(matches!(err, DroneError::InvalidArgument { .. }));
        assert_eq!(drone.parameter(ParamName::ModulatorARate), 0.2);
    }

    #[test]
    fn invalid_config_fails_start_before_opening_device() {
        let mut drone = SignalGraphController::with_config(
            OfflineDevice::factory(8_000),
            SynthConfig::new().noise_duration(0.0),
        );
        assert!(drone.start().is_err());
        assert_eq!(drone.state(), PlaybackState::Stopped);
        assert!(drone.topology().is_none());
    }

    #[test]
    fn note_change_waits_for_next_session() {
        let mut drone = controller();
        drone.start().unwrap();
        drone.set_note(ScaleNote::E2);
        assert_eq!(drone.session().map(|s| s.note), Some(ScaleNote::A1));

        drone.stop();
        drone.start().unwrap();
        assert_eq!(drone.session().map(|s| s.note), Some(ScaleNote::E2));
    }
}
