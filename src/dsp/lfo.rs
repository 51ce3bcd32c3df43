//! Low Frequency Oscillator (LFO) helpers.

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running at sub-audio frequencies. The waveform math
is identical to an audio oscillator (see `dsp/oscillator.rs`), only slower.

Vocabulary
----------

  control-rate  Frequencies below human hearing: ~0.01 Hz to ~20 Hz.
                These oscillators move parameters rather than make sound.

  rate          How many full cycles per second. 0.2 Hz = one swell every
                five seconds.

  depth         Peak deviation the LFO adds to its target. The LFO's
                bipolar output (-1..+1) is scaled by depth before it is summed
                onto the target's base value.

  swing         The interval the target moves through:
                  [base - depth, base + depth]


Drone-friendly Rates
--------------------

    0.01 - 0.1 Hz   Glacial breathing, barely perceived as motion
    0.1 - 0.5 Hz    Slow swells (the defaults live here)
    0.5 - 5 Hz      Audible pulsing, tremolo territory

We cap rates at 5 Hz. Past that the modulation stops reading as "breathing"
and starts to sound like an effect.
*/

/// Calculate LFO period in seconds from frequency.
///
/// # Example
/// ```
/// use lowdrone::dsp::lfo::period_from_frequency;
/// let period = period_from_frequency(0.2);
/// assert!((period - 5.0).abs() < 1e-5); // 0.2 Hz = 5 s swell
/// ```
#[inline]
pub fn period_from_frequency(frequency_hz: f32) -> f32 {
    1.0 / frequency_hz
}

/// Range a gain moves through for a base level and LFO depth.
///
/// The lower bound is clamped at zero, matching what the gain stage applies.
#[inline]
pub fn gain_swing(base: f32, depth: f32) -> (f32, f32) {
    ((base - depth).max(0.0), base + depth)
}
