#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One sounding tone: a frequency in Hz and a mix amplitude.
///
/// Amplitude is nominally in [0, 1]; the harmonic-series generators emit
/// negative amplitudes for phase-inverted partials and the mixer passes the
/// sign through. Order within a note list does not affect the sound.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub frequency: f32,
    pub amplitude: f32,
}

impl Note {
    pub fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            frequency,
            amplitude,
        }
    }
}

impl From<(f32, f32)> for Note {
    fn from((frequency, amplitude): (f32, f32)) -> Self {
        Self::new(frequency, amplitude)
    }
}
