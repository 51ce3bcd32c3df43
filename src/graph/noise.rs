use crate::graph::node::{GraphNode, RenderCtx};

/*
Looping Noise Source
====================

Plays a pre-rendered noise buffer on repeat. Synthesizing pink noise live
would need the Kellet filter in the callback. Generating a few seconds up
front (see `dsp/noise.rs`) and looping it costs one copy per block instead.

    buffer:   [n0 n1 n2 ... nN-1]
    playback:  n0 n1 ... nN-1 n0 n1 ... nN-1 n0 ...
                              ^ seam

The seam between nN-1 and n0 is a small discontinuity once per loop. It is
documented and left alone; under a drone it is not audible.

The buffer is moved in whole when the node is built on the control thread,
so the audio thread never allocates for it.
*/

pub struct NoiseNode {
    samples: Vec<f32>,
    position: usize,
}

impl NoiseNode {
    /// Loop `samples` forever, starting at index 0.
    pub fn looping(samples: Vec<f32>) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Index of the next sample to be played
    pub fn position(&self) -> usize {
        self.position
    }
}

impl GraphNode for NoiseNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        if self.samples.is_empty() {
            out.fill(0.0);
            return;
        }

        // Copy in contiguous runs up to the seam, then wrap
        let mut written = 0;
        while written < out.len() {
            let available = self.samples.len() - self.position;
            let run = available.min(out.len() - written);
            out[written..written + run]
                .copy_from_slice(&self.samples[self.position..self.position + run]);
            written += run;
            self.position = (self.position + run) % self.samples.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(node: &mut NoiseNode, frames: usize) -> Vec<f32> {
        let silent = vec![0.0; frames];
        let ctx = RenderCtx {
            sample_rate: 48_000.0,
            input: &silent,
            modulation: &silent,
        };
        let mut out = vec![0.0; frames];
        node.render_block(&mut out, &ctx);
        out
    }

    #[test]
    fn loops_back_to_start_after_last_sample() {
        let mut node = NoiseNode::looping(vec![0.1, 0.2, 0.3]);
        let out = render(&mut node, 7);
        assert_eq!(out, vec![0.1, 0.2, 0.3, 0.1, 0.2, 0.3, 0.1]);
        assert_eq!(node.position(), 1);
    }

    #[test]
    fn continues_across_blocks() {
        let mut node = NoiseNode::looping(vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(render(&mut node, 3), vec![1.0, 2.0, 3.0]);
        assert_eq!(render(&mut node, 3), vec![4.0, 1.0, 2.0]);
    }

    #[test]
    fn empty_buffer_renders_silence() {
        let mut node = NoiseNode::looping(Vec::new());
        assert!(node.is_empty());
        assert_eq!(render(&mut node, 4), vec![0.0; 4]);
    }

    #[test]
    fn block_longer_than_buffer_wraps_multiple_times() {
        let mut node = NoiseNode::looping(vec![0.5, -0.5]);
        let out = render(&mut node, 9);
        assert_eq!(out.len(), 9);
        assert_eq!(out[8], 0.5);
        assert_eq!(node.len(), 2);
    }
}
