pub mod dsp;
pub mod scale; // Pitch classes, interval patterns, scale generation
pub mod synth; // Frame synthesis, stream drivers, stochastic composer

/// Sample rate of the reference configuration (Hz).
pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;

/// Default crossfade window for the zero-crossing splicer: 100ms of audio.
pub const DEFAULT_CROSSFADE_WINDOW: usize = DEFAULT_SAMPLE_RATE as usize / 10;
