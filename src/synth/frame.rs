//! Additive frame synthesis.

use crate::dsp::tone::tone_into;
use crate::synth::Note;

/// Renders one padded working buffer per callback by summing a sine per
/// active note and normalizing by note count.
///
/// The synthesizer owns the active note list and the master volume, both
/// updated between buffers by whatever drives it. Rendering has no side
/// effects beyond the returned buffer: phase comes from the absolute sample
/// clock passed in, never from internal oscillator state.
///
/// Normalizing by note count is an energy bound, not a loudness model:
/// adding a note always reduces every note's relative contribution, and the
/// output magnitude never exceeds the master volume while note amplitudes
/// stay within [-1, 1].
pub struct FrameSynthesizer {
    notes: Vec<Note>,
    master_volume: f32,
    sample_rate: f32,
    frame_size: usize,
    window: usize,
    scratch: Vec<f32>,
    voice: Vec<f32>,
}

impl FrameSynthesizer {
    /// `update_hz` sets the nominal callback cadence; the frame size is
    /// `sample_rate / update_hz` samples. `window` is the crossfade padding
    /// added on both sides of each rendered frame.
    pub fn new(sample_rate: f32, update_hz: f32, window: usize) -> Self {
        Self {
            notes: Vec::new(),
            master_volume: 1.0,
            sample_rate,
            frame_size: frame_size_for(sample_rate, update_hz),
            window,
            scratch: Vec::new(),
            voice: Vec::new(),
        }
    }

    /// Replace the active note list wholesale. Takes effect on the next
    /// rendered frame; never mid-buffer.
    pub fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Master volume, clamped to [0, 1].
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Recompute the frame size for a new update rate.
    pub fn set_update_rate(&mut self, update_hz: f32) {
        self.frame_size = frame_size_for(self.sample_rate, update_hz);
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn set_window(&mut self, window: usize) {
        self.window = window;
    }

    /// Render `window + sample_count + window` samples starting `window`
    /// samples before absolute position `start_offset`.
    ///
    /// An empty note list synthesizes silence; that is a degenerate input,
    /// not an error.
    pub fn render_padded(&mut self, sample_count: usize, start_offset: u64) -> &[f32] {
        let len = sample_count + 2 * self.window;
        self.scratch.resize(len, 0.0);
        self.scratch.fill(0.0);

        if self.notes.is_empty() {
            return &self.scratch;
        }

        self.voice.resize(len, 0.0);
        for note in &self.notes {
            tone_into(
                &mut self.voice,
                note.frequency,
                self.sample_rate,
                start_offset,
                self.window,
            );
            for (out, &sample) in self.scratch.iter_mut().zip(&self.voice) {
                *out += note.amplitude * sample;
            }
        }

        let norm = self.master_volume / self.notes.len() as f32;
        for sample in &mut self.scratch {
            *sample *= norm;
        }

        &self.scratch
    }
}

impl Default for FrameSynthesizer {
    /// Reference configuration: 44.1kHz, one frame per second, 100ms window.
    fn default() -> Self {
        Self::new(
            crate::DEFAULT_SAMPLE_RATE,
            1.0,
            crate::DEFAULT_CROSSFADE_WINDOW,
        )
    }
}

fn frame_size_for(sample_rate: f32, update_hz: f32) -> usize {
    ((sample_rate / update_hz) as usize).max(1)
}
