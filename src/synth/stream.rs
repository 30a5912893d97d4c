//! Stream drivers: the code the audio callback actually talks to.
//!
//! A driver produces one frame per `produce_buffer` call. Each call drains
//! pending control messages, renders raw samples, splices them onto the
//! previous frame's tail and hands the result back with a continuation
//! status. The whole path is soft-real-time: no locks, no blocking I/O, and
//! after the first call no allocation unless the requested size changes.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::dsp::splice::{RampSplicer, Splicer};
use crate::dsp::tone::tone_into;
use crate::synth::composer::{StochasticComposer, VOICES};
use crate::synth::frame::FrameSynthesizer;
use crate::synth::message::ControlMessage;
#[cfg(feature = "rtrb")]
use crate::synth::message::MessageReceiver;

/// Two-valued continuation signal handed to the audio sink with each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// Keep pulling buffers.
    Continue,
    /// The stream is done; the sink should stop after this buffer.
    Complete,
}

/// Driver for the multi-note synth: caller-controlled note list,
/// zero-crossing splicing.
pub struct StreamDriver {
    synth: FrameSynthesizer,
    splicer: Splicer,
    frame: Vec<f32>,
    clock: u64,
    status: StreamStatus,
    #[cfg(feature = "rtrb")]
    rx: Option<Consumer<ControlMessage>>,
}

impl StreamDriver {
    pub fn new(synth: FrameSynthesizer) -> Self {
        let splicer = Splicer::new(synth.window());
        Self {
            synth,
            splicer,
            frame: Vec::new(),
            clock: 0,
            status: StreamStatus::Continue,
            #[cfg(feature = "rtrb")]
            rx: None,
        }
    }

    /// Attach the consuming end of a control channel.
    #[cfg(feature = "rtrb")]
    pub fn with_control(mut self, rx: Consumer<ControlMessage>) -> Self {
        self.rx = Some(rx);
        self
    }

    pub fn synth(&self) -> &FrameSynthesizer {
        &self.synth
    }

    pub fn status(&self) -> StreamStatus {
        self.status
    }

    /// Wall-clock duration of one frame at the current update rate.
    pub fn buffer_duration(&self) -> Duration {
        Duration::from_secs_f32(self.synth.frame_size() as f32 / self.synth.sample_rate())
    }

    /// Resume producing. The crossfade tail is cleared so nothing from
    /// before a stop leaks into the restarted stream.
    pub fn start(&mut self) {
        self.splicer.reset();
        self.status = StreamStatus::Continue;
    }

    /// Signal completion. Stopping an already-stopped stream is a no-op.
    /// For a click-free shutdown, ramp the volume down first (see
    /// [`crate::synth::message::Controller::stop`]).
    pub fn stop(&mut self) {
        self.status = StreamStatus::Complete;
    }

    /// Apply one control message. Public so feature-reduced builds and
    /// same-thread callers can drive the synth without a channel.
    pub fn apply(&mut self, msg: ControlMessage) {
        match msg {
            ControlMessage::SetVolume(v) => self.synth.set_master_volume(v),
            ControlMessage::SetNotes(notes) => self.synth.set_notes(notes),
            ControlMessage::SetScale(root, interval) => {
                // The multi-note synth has no scale; the ambience driver
                // handles this one.
                debug!(%root, %interval, "scale change ignored by multi-note driver");
            }
            ControlMessage::SetUpdateRate(hz) => {
                self.synth.set_update_rate(hz);
                self.clamp_window(self.synth.frame_size());
            }
            ControlMessage::Stop => self.stop(),
        }
    }

    fn drain_control(&mut self) {
        #[cfg(feature = "rtrb")]
        while let Some(msg) = self.rx.as_mut().and_then(MessageReceiver::pop) {
            self.apply(msg);
        }
    }

    /// Keep the frame longer than twice the crossfade window, shrinking the
    /// window when the frame is too short for it.
    fn clamp_window(&mut self, frame_size: usize) {
        if 2 * self.splicer.window() >= frame_size {
            let window = frame_size / 4;
            self.splicer.set_window(window);
            self.synth.set_window(window);
        }
    }

    /// Render and splice one frame of `requested` samples.
    pub fn produce_buffer(&mut self, requested: usize) -> (&[f32], StreamStatus) {
        self.drain_control();
        self.clamp_window(requested);

        let padded = self.synth.render_padded(requested, self.clock);
        self.frame.resize(requested, 0.0);
        self.splicer.splice(padded, &mut self.frame);

        self.clock += requested as u64;
        (&self.frame, self.status)
    }
}

/// Driver for the generative ambience synth: tonic plus two random degrees
/// per frame, linear-ramp splicing, occasional scale drift.
pub struct AmbienceDriver<R: Rng> {
    composer: StochasticComposer<R>,
    splicer: RampSplicer,
    volume: f32,
    sample_rate: f32,
    frame_size: usize,
    frame: Vec<f32>,
    voice: Vec<f32>,
    mix: Vec<f32>,
    clock: u64,
    status: StreamStatus,
    #[cfg(feature = "rtrb")]
    rx: Option<Consumer<ControlMessage>>,
}

impl<R: Rng> AmbienceDriver<R> {
    /// The crossfade window is a quarter of the frame, which comfortably
    /// satisfies the frame > 2·window invariant at every size.
    pub fn new(sample_rate: f32, update_hz: f32, rng: R) -> Self {
        let frame_size = ((sample_rate / update_hz) as usize).max(1);
        Self {
            composer: StochasticComposer::new(rng),
            splicer: RampSplicer::new(frame_size / 4),
            volume: 0.5,
            sample_rate,
            frame_size,
            frame: Vec::new(),
            voice: Vec::new(),
            mix: Vec::new(),
            clock: 0,
            status: StreamStatus::Continue,
            #[cfg(feature = "rtrb")]
            rx: None,
        }
    }

    #[cfg(feature = "rtrb")]
    pub fn with_control(mut self, rx: Consumer<ControlMessage>) -> Self {
        self.rx = Some(rx);
        self
    }

    pub fn composer(&self) -> &StochasticComposer<R> {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut StochasticComposer<R> {
        &mut self.composer
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn status(&self) -> StreamStatus {
        self.status
    }

    pub fn buffer_duration(&self) -> Duration {
        Duration::from_secs_f32(self.frame_size as f32 / self.sample_rate)
    }

    pub fn start(&mut self) {
        self.splicer.reset();
        self.status = StreamStatus::Continue;
    }

    pub fn stop(&mut self) {
        self.status = StreamStatus::Complete;
    }

    pub fn apply(&mut self, msg: ControlMessage) {
        match msg {
            ControlMessage::SetVolume(v) => self.set_volume(v),
            ControlMessage::SetScale(root, interval) => self.composer.set_scale(root, interval),
            ControlMessage::SetUpdateRate(hz) => {
                self.frame_size = ((self.sample_rate / hz) as usize).max(1);
            }
            ControlMessage::SetNotes(_) => {
                debug!("note list ignored by ambience driver");
            }
            ControlMessage::Stop => self.stop(),
        }
    }

    fn drain_control(&mut self) {
        #[cfg(feature = "rtrb")]
        while let Some(msg) = self.rx.as_mut().and_then(MessageReceiver::pop) {
            self.apply(msg);
        }
    }

    /// Render one frame: three voices rendered with a quarter-frame of
    /// lookahead, each ramp-blended against the shared previous tail, then
    /// mixed by unweighted average.
    pub fn produce_buffer(&mut self, requested: usize) -> (&[f32], StreamStatus) {
        self.drain_control();

        let window = requested / 4;
        if self.splicer.window() != window {
            self.splicer.set_window(window);
        }

        let len = requested + window;
        self.mix.resize(len, 0.0);
        self.mix.fill(0.0);
        self.voice.resize(len, 0.0);

        let voices = self.composer.next_voices();
        for frequency in voices {
            tone_into(&mut self.voice, frequency, self.sample_rate, self.clock, 0);
            for sample in &mut self.voice {
                *sample *= self.volume;
            }
            self.splicer.blend_against_tail(&mut self.voice);

            for (out, &sample) in self.mix.iter_mut().zip(&self.voice) {
                *out += sample / VOICES as f32;
            }
        }
        self.splicer.commit_tail(&self.mix);

        self.frame.clear();
        self.frame.extend_from_slice(&self.mix[..requested]);

        self.clock += requested as u64;
        (&self.frame, self.status)
    }
}
