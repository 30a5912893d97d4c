//! Low-level DSP primitives for the synthesis and splicing core.
//!
//! Everything in here is allocation-free on the hot path and realtime-safe,
//! so the stream drivers can call into it from the audio callback. These
//! modules stay focused on the signal math; note ownership, control messages
//! and scheduling live in [`crate::synth`].

/// Fourier partial lists for square, triangle and sawtooth waveforms.
pub mod harmonics;
/// Frame-boundary crossfading: zero-crossing search splice and linear ramp splice.
pub mod splice;
/// Continuous-phase sine generation from absolute sample time.
pub mod tone;

pub use splice::{RampSplicer, Splicer};
