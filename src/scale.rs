//! Musical scale generation.
//!
//! Maps a root pitch class and a diatonic interval pattern to eight absolute
//! frequencies, indexed out of a three-octave equal-tempered table anchored
//! at C4 = 261.6256 Hz (A4 = 440 Hz, octave ratio 2:1). Scales are plain
//! values: regenerated wholesale on any root or interval change, never
//! mutated in place.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration errors: an unrecognized root or interval name. The caller's
/// active scale is left untouched when these are reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
    #[error("unknown root pitch class: {0:?}")]
    UnknownRoot(String),
    #[error("unknown interval pattern: {0:?}")]
    UnknownInterval(String),
}

/// The twelve pitch classes, written with flats as in the scale tables.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchClass {
    C,
    Db,
    D,
    Eb,
    E,
    F,
    Gb,
    G,
    Ab,
    A,
    Bb,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Db,
        PitchClass::D,
        PitchClass::Eb,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Gb,
        PitchClass::G,
        PitchClass::Ab,
        PitchClass::A,
        PitchClass::Bb,
        PitchClass::B,
    ];

    /// Semitone offset from C.
    pub fn semitone(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Db => "Db",
            PitchClass::D => "D",
            PitchClass::Eb => "Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Gb => "Gb",
            PitchClass::G => "G",
            PitchClass::Ab => "Ab",
            PitchClass::A => "A",
            PitchClass::Bb => "Bb",
            PitchClass::B => "B",
        }
    }
}

impl FromStr for PitchClass {
    type Err = ScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PitchClass::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| ScaleError::UnknownRoot(s.to_owned()))
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recognized octave-spanning interval patterns.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Major,
    Minor,
    /// Mixolydian flavor: major with a flattened seventh.
    Seven,
}

impl Interval {
    pub const ALL: [Interval; 3] = [Interval::Major, Interval::Minor, Interval::Seven];

    /// Semitone offsets of the eight degrees, tonic through octave.
    pub fn pattern(self) -> [usize; 8] {
        match self {
            Interval::Major => [0, 2, 4, 5, 7, 9, 11, 12],
            Interval::Minor => [0, 2, 3, 5, 7, 8, 10, 12],
            Interval::Seven => [0, 2, 4, 5, 7, 9, 10, 12],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Interval::Major => "major",
            Interval::Minor => "minor",
            Interval::Seven => "seven",
        }
    }
}

impl FromStr for Interval {
    type Err = ScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .iter()
            .copied()
            .find(|i| i.name() == s)
            .ok_or_else(|| ScaleError::UnknownInterval(s.to_owned()))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of degrees in a generated scale.
pub const DEGREES: usize = 8;

/// Equal-tempered C4..B4, A4 = 440 Hz.
const BASE_OCTAVE: [f32; 12] = [
    261.6256, 277.1826, 293.6648, 311.1270, 329.6276, 349.2282, 369.9944, 391.9954, 415.3047,
    440.0000, 466.1638, 493.8833,
];

/// Three-octave table lookup: index 0 is C4, each octave doubles.
fn table_frequency(index: usize) -> f32 {
    BASE_OCTAVE[index % 12] * (1 << (index / 12)) as f32
}

/// An immutable eight-degree scale of absolute frequencies.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    root: PitchClass,
    interval: Interval,
    degrees: [f32; DEGREES],
}

impl Scale {
    /// Build a scale by indexing the frequency table at
    /// `root offset + semitone` for each pattern entry. Deterministic:
    /// identical inputs always yield identical frequencies.
    pub fn generate(root: PitchClass, interval: Interval) -> Self {
        let offset = root.semitone();
        let mut degrees = [0.0; DEGREES];
        for (degree, semitone) in degrees.iter_mut().zip(interval.pattern()) {
            *degree = table_frequency(offset + semitone);
        }

        Self {
            root,
            interval,
            degrees,
        }
    }

    /// Parse-and-generate convenience for string control surfaces.
    pub fn parse(root: &str, interval: &str) -> Result<Self, ScaleError> {
        Ok(Self::generate(root.parse()?, interval.parse()?))
    }

    pub fn degrees(&self) -> &[f32; DEGREES] {
        &self.degrees
    }

    /// First degree of the scale.
    pub fn tonic(&self) -> f32 {
        self.degrees[0]
    }

    pub fn root(&self) -> PitchClass {
        self.root
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }
}
