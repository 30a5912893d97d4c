//! Continuous-phase sine generation.

/*
Continuous-Phase Synthesis
==========================

The classic way to run an oscillator is to carry phase state between calls:
each render advances an accumulator and the next buffer picks up where the
last one stopped. That works until something else (a splice, a dropped
buffer, a parameter change) shifts where "here" is.

This module takes the other approach: phase is always derived from the
absolute sample clock, never carried. Sample i of a tone is

    sin(2π · f · (start_offset + i − padding) / sample_rate)

Two buffers rendered independently for adjacent clock positions are
guaranteed phase-consistent, which is what lets the splice engine treat
frames as pure values instead of oscillator state.

The `padding` argument grows the buffer by `padding` samples on BOTH sides
of the logical frame, so a caller that wants look-behind/look-ahead context
for splice analysis gets it in one call. The padded region is the same
waveform extended backwards and forwards in time, not silence.

Phase is accumulated in f64. At 44.1kHz the sample clock passes 2^24 (where
f32 stops resolving individual samples) in about six minutes, which a drone
synth will happily exceed.

There is no input validation: a zero frequency yields DC, a negative one a
reflected sine. Garbage in, garbage out.
*/

use std::f64::consts::TAU;

/// Fill `out` with a sine at `frequency` Hz starting `padding` samples
/// before the absolute sample position `start_offset`.
///
/// `out.len()` is `sample_count + 2 * padding` by the caller's construction;
/// this function just renders whatever length it is handed.
#[inline]
pub fn tone_into(
    out: &mut [f32],
    frequency: f32,
    sample_rate: f32,
    start_offset: u64,
    padding: usize,
) {
    let step = TAU * f64::from(frequency) / f64::from(sample_rate);

    for (i, sample) in out.iter_mut().enumerate() {
        let t = start_offset as i64 + i as i64 - padding as i64;
        *sample = (step * t as f64).sin() as f32;
    }
}

/// Allocating convenience wrapper around [`tone_into`].
///
/// Returns `sample_count + 2 * padding` samples.
pub fn tone(
    frequency: f32,
    sample_count: usize,
    padding: usize,
    start_offset: u64,
    sample_rate: f32,
) -> Vec<f32> {
    let mut out = vec![0.0; sample_count + 2 * padding];
    tone_into(&mut out, frequency, sample_rate, start_offset, padding);
    out
}
