//! Gain-stage primitives.

/*
Modulated Gain
==============

A gain stage multiplies a signal by a level. Here the level itself moves: a
slow LFO is summed onto a fixed base level, one value per sample.

    level[i]  = max(0, base + modulation[i])
    output[i] = input[i] × level[i]

Example: tone gain with base = 0.25 and an LFO of depth 0.08
    LFO = -1.0  →  level = 0.25 - 0.08 = 0.17
    LFO =  0.0  →  level = 0.25
    LFO = +1.0  →  level = 0.25 + 0.08 = 0.33

The base acts as a DC offset under the LFO. As long as depth ≤ base the level
never crosses zero. If someone turns the depth past the base we clamp at zero
rather than letting the level go negative, which would flip the signal's
polarity and sound like a click at every zero crossing of the level.


Summing Inputs
--------------

When several sources feed the same input (or the same parameter), their
signals add. Two LFOs into one gain parameter sum their swings; two sources
into the output sink sum their audio. No normalization happens at a sum:
levels are the gain stages' job.
*/

/// Level actually applied for a base value plus a modulation offset.
#[inline]
pub fn effective_gain(base: f32, modulation: f32) -> f32 {
    (base + modulation).max(0.0)
}

/// Multiply `signal` in place by `base + modulation[i]`, clamped at zero.
#[inline]
pub fn apply_modulated_gain(signal: &mut [f32], base: f32, modulation: &[f32]) {
    debug_assert_eq!(signal.len(), modulation.len());

    for (s, &m) in signal.iter_mut().zip(modulation.iter()) {
        *s *= effective_gain(base, m);
    }
}

/// Add `source` into `acc` sample by sample.
#[inline]
pub fn sum_in_place(acc: &mut [f32], source: &[f32]) {
    debug_assert_eq!(acc.len(), source.len());

    for (a, &s) in acc.iter_mut().zip(source.iter()) {
        *a += s;
    }
}
