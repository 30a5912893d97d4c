//! Cross-thread control messages.
//!
//! The audio callback and the control surface live on different threads.
//! Rather than sharing mutable state behind a lock, the control side pushes
//! messages into a wait-free SPSC ring buffer and the driver drains them at
//! the top of each buffer production call. A message is applied atomically
//! between buffers, so the callback never observes a half-updated note list
//! and never blocks on a lock.

#[cfg(feature = "rtrb")]
use std::time::Duration;

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::scale::{Interval, PitchClass};
use crate::synth::Note;

#[derive(Debug, Clone)]
pub enum ControlMessage {
    /// Master volume, clamped to [0, 1] on apply.
    SetVolume(f32),
    /// Replace the active note list wholesale.
    SetNotes(Vec<Note>),
    /// Switch the generative scale. Takes effect on the next callback.
    SetScale(PitchClass, Interval),
    /// Change the callback cadence; the frame size is recomputed.
    SetUpdateRate(f32),
    /// Cease producing after the current buffer. A begun buffer always
    /// completes.
    Stop,
}

/// Abstraction over the consuming end of a control channel, so drivers can
/// be driven without rtrb in tests and feature-reduced builds.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ControlMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        Consumer::pop(self).ok()
    }
}

/// Create a control channel holding up to `capacity` in-flight messages.
#[cfg(feature = "rtrb")]
pub fn control_channel(
    capacity: usize,
) -> (Producer<ControlMessage>, Consumer<ControlMessage>) {
    RingBuffer::new(capacity)
}

/// Control-thread handle over the producing end of a channel.
///
/// Implements the graceful stop contract: ramp the master volume to zero,
/// wait at least one buffer duration so the silent frame actually plays,
/// then signal the stream to cease. This avoids a terminal click.
#[cfg(feature = "rtrb")]
pub struct Controller {
    tx: Producer<ControlMessage>,
    buffer_duration: Duration,
}

#[cfg(feature = "rtrb")]
impl Controller {
    pub fn new(tx: Producer<ControlMessage>, buffer_duration: Duration) -> Self {
        Self {
            tx,
            buffer_duration,
        }
    }

    /// Returns false when the channel is full and the message was dropped.
    pub fn send(&mut self, msg: ControlMessage) -> bool {
        self.tx.push(msg).is_ok()
    }

    pub fn set_volume(&mut self, volume: f32) -> bool {
        self.send(ControlMessage::SetVolume(volume))
    }

    pub fn set_notes(&mut self, notes: Vec<Note>) -> bool {
        self.send(ControlMessage::SetNotes(notes))
    }

    pub fn set_scale(&mut self, root: PitchClass, interval: Interval) -> bool {
        self.send(ControlMessage::SetScale(root, interval))
    }

    pub fn set_update_rate(&mut self, update_hz: f32) -> bool {
        self.send(ControlMessage::SetUpdateRate(update_hz))
    }

    /// Fade out, wait one buffer, then stop the stream.
    pub fn stop(&mut self) -> bool {
        if !self.set_volume(0.0) {
            return false;
        }
        std::thread::sleep(self.buffer_duration);
        self.send(ControlMessage::Stop)
    }
}
