// Purpose: note ownership, frame synthesis and the stream drivers that sit
// directly behind the audio callback. This layer composes the dsp primitives.

pub mod composer;
pub mod frame;
pub mod message;
pub mod note;
pub mod stream;

pub use composer::StochasticComposer;
pub use frame::FrameSynthesizer;
pub use message::ControlMessage;
pub use note::Note;
pub use stream::{AmbienceDriver, StreamDriver, StreamStatus};
