use crate::{
    dsp::gain::apply_modulated_gain,
    graph::node::{GraphNode, ParamKind, RenderCtx},
};

/*
Gain Stage
==========

Scales whatever is connected to its input by a level. The level has a base
value (set from the controls) plus whatever is connected to its gain
parameter, usually an LFO:

    Tone ──▶ GainNode(base 0.25) ──▶ output
                    ▲
      LfoNode ──────┘ (gain param)

Per sample:
    out[i] = input[i] × max(0, base + modulation[i])

Each signal path gets its own gain stage. Sharing one between the tone and the
noise bed would make the tone's LFO pump the noise too, so the graph never
does that.
*/

pub struct GainNode {
    gain: f32,
}

impl GainNode {
    pub fn new(gain: f32) -> Self {
        Self {
            gain: gain.max(0.0),
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let len = out.len();
        out.copy_from_slice(&ctx.input[..len]);
        apply_modulated_gain(out, self.gain, &ctx.modulation[..len]);
    }

    fn get_param(&self, param: ParamKind) -> Option<f32> {
        match param {
            ParamKind::Gain => Some(self.gain),
            _ => None,
        }
    }

    fn set_param(&mut self, param: ParamKind, value: f32) -> bool {
        match param {
            ParamKind::Gain => {
                self.gain = value.max(0.0);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_input_by_base_gain() {
        let mut node = GainNode::new(0.5);
        let input = [1.0, -1.0, 0.5, 0.0];
        let modulation = [0.0; 4];
        let ctx = RenderCtx {
            sample_rate: 48_000.0,
            input: &input,
            modulation: &modulation,
        };
        let mut out = [0.0; 4];

        node.render_block(&mut out, &ctx);

        assert_eq!(out, [0.5, -0.5, 0.25, 0.0]);
    }

    #[test]
    fn modulation_adds_to_base_gain() {
        let mut node = GainNode::new(0.25);
        let input = [1.0; 3];
        let modulation = [0.25, -0.25, -1.0];
        let ctx = RenderCtx {
            sample_rate: 48_000.0,
            input: &input,
            modulation: &modulation,
        };
        let mut out = [0.0; 3];

        node.render_block(&mut out, &ctx);

        assert_eq!(out, [0.5, 0.0, 0.0]);
    }

    #[test]
    fn set_param_updates_base_level() {
        let mut node = GainNode::new(0.25);
        assert!(node.set_param(ParamKind::Gain, 0.75));
        assert_eq!(node.get_param(ParamKind::Gain), Some(0.75));
        assert!(!node.set_param(ParamKind::Rate, 1.0));
    }
}
