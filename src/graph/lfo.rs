use crate::{
    dsp::oscillator::SineOscillator,
    graph::node::{GraphNode, ParamKind, RenderCtx},
};

/*
LFO (Low Frequency Oscillator)
==============================

A sine running at a sub-audio rate whose output is scaled by a depth:

    out = depth × sin(2π × rate × t)

Wired into a gain parameter, this swings the level around its base value:

  let lfo = LfoNode::sine(0.2, 0.08);   // 5 second swell, ±0.08
  // gain level moves through [base - 0.08, base + 0.08]

Rate and depth are live parameters. Changing the rate keeps the current
phase, so a slider drag bends the swell instead of restarting it. Changing the
depth takes effect on the next sample.

See `dsp/lfo.rs` for typical rates and the swing math.
*/

pub struct LfoNode {
    osc: SineOscillator,
    rate: f32,  // Hz
    depth: f32, // Peak deviation added to the target
}

impl LfoNode {
    pub fn sine(rate: f32, depth: f32) -> Self {
        Self {
            osc: SineOscillator::new(),
            rate: rate.max(0.0),
            depth: depth.max(0.0),
        }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }
}

impl GraphNode for LfoNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = self.depth * self.osc.next_sample(self.rate, ctx.sample_rate);
        }
    }

    fn get_param(&self, param: ParamKind) -> Option<f32> {
        match param {
            ParamKind::Rate => Some(self.rate),
            ParamKind::Depth => Some(self.depth),
            _ => None,
        }
    }

    fn set_param(&mut self, param: ParamKind, value: f32) -> bool {
        match param {
            ParamKind::Rate => {
                self.rate = value.max(0.0);
                true
            }
            ParamKind::Depth => {
                self.depth = value.max(0.0);
                true
            }
            _ => false,
        }
    }
}
