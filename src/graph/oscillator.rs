use crate::dsp::oscillator::SineOscillator;
use crate::graph::node::{GraphNode, ParamKind, RenderCtx};

/*
Tone Oscillator
===============

The drone's voice: a pure sine at a fixed bass frequency. A sine has no
harmonics, so at 55 Hz it is felt as much as heard. Small speakers will
barely reproduce it, which is why the noise bed rides along on its own path.

The frequency is set when the node is built and stays put for the session.
Loudness movement comes from the gain stage the tone feeds, not from here.

Example usage:
  let tone = OscNode::sine(ScaleNote::A1.frequency());
*/

pub struct OscNode {
    osc: SineOscillator,
    frequency: f32,
}

impl OscNode {
    pub fn sine(frequency: f32) -> Self {
        Self {
            osc: SineOscillator::new(),
            frequency: frequency.clamp(20.0, 20_000.0),
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.osc.render(out, self.frequency, ctx.sample_rate);
    }

    fn get_param(&self, param: ParamKind) -> Option<f32> {
        match param {
            ParamKind::Frequency => Some(self.frequency),
            _ => None,
        }
    }

    fn set_param(&mut self, param: ParamKind, value: f32) -> bool {
        match param {
            ParamKind::Frequency => {
                // Clamp to audible range (20 Hz - 20 kHz)
                self.frequency = value.clamp(20.0, 20_000.0);
                true
            }
            _ => false,
        }
    }
}
