//! Generative note selection for the ambience synth.

use rand::Rng;
use tracing::debug;

use crate::scale::{Interval, PitchClass, Scale};

/// Voices sounding simultaneously in ambience mode.
pub const VOICES: usize = 3;

/// Picks which scale degrees sound on each callback and occasionally drifts
/// to a new scale.
///
/// The randomness source is injected so tests can seed it: anything
/// implementing [`rand::Rng`] works, typically `StdRng::seed_from_u64` in
/// tests and `StdRng::from_entropy` in a live synth.
pub struct StochasticComposer<R: Rng> {
    rng: R,
    scale: Scale,
    /// Percent chance per callback of redrawing root and interval.
    /// Default 5.
    pub mutation_percent: u32,
}

impl<R: Rng> StochasticComposer<R> {
    /// Start in C major, the ambience synth's home scale.
    pub fn new(rng: R) -> Self {
        Self::with_scale(rng, Scale::generate(PitchClass::C, Interval::Major))
    }

    pub fn with_scale(rng: R, scale: Scale) -> Self {
        Self {
            rng,
            scale,
            mutation_percent: 5,
        }
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn set_scale(&mut self, root: PitchClass, interval: Interval) {
        self.scale = Scale::generate(root, interval);
    }

    /// Select this callback's three voices: the tonic plus two degrees drawn
    /// uniformly (and independently) from the current scale.
    ///
    /// The occasional scale mutation is rolled after selection, so a redraw
    /// affects the next callback's voices, never the current buffer.
    pub fn next_voices(&mut self) -> [f32; VOICES] {
        let degrees = self.scale.degrees();
        let voices = [
            self.scale.tonic(),
            degrees[self.rng.gen_range(0..degrees.len())],
            degrees[self.rng.gen_range(0..degrees.len())],
        ];

        if self.rng.gen_range(0..100) < self.mutation_percent {
            let root = PitchClass::ALL[self.rng.gen_range(0..PitchClass::ALL.len())];
            let interval = Interval::ALL[self.rng.gen_range(0..Interval::ALL.len())];
            debug!(%root, %interval, "drifting to a new scale");
            self.scale = Scale::generate(root, interval);
        }

        voices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_first_voice_is_always_the_tonic() {
        let mut composer = StochasticComposer::new(StdRng::seed_from_u64(7));
        for _ in 0..100 {
            let tonic = composer.scale().tonic();
            let voices = composer.next_voices();
            assert_eq!(voices[0], tonic);
        }
    }

    #[test]
    fn test_voices_come_from_the_scale() {
        let mut composer = StochasticComposer::new(StdRng::seed_from_u64(11));
        for _ in 0..200 {
            let degrees = *composer.scale().degrees();
            let voices = composer.next_voices();
            for v in voices {
                assert!(degrees.contains(&v), "{v} not in current scale");
            }
        }
    }

    #[test]
    fn test_no_mutation_when_disabled() {
        let mut composer = StochasticComposer::new(StdRng::seed_from_u64(3));
        composer.mutation_percent = 0;

        let original = composer.scale().clone();
        for _ in 0..100 {
            composer.next_voices();
        }
        assert_eq!(composer.scale(), &original);
    }

    #[test]
    fn test_mutation_rate_is_roughly_five_percent() {
        let mut composer = StochasticComposer::new(StdRng::seed_from_u64(42));

        let mut changes = 0;
        for _ in 0..4_000 {
            let before = composer.scale().clone();
            composer.next_voices();
            if composer.scale() != &before {
                changes += 1;
            }
        }

        // Expected ~200; a redraw landing on the same scale (1 in 36)
        // undercounts slightly. Generous bounds keep this deterministic
        // check meaningful without tuning to one seed.
        assert!(
            (60..400).contains(&changes),
            "unexpected mutation count: {changes}"
        );
    }

    #[test]
    fn test_set_scale_takes_effect_immediately() {
        let mut composer = StochasticComposer::new(StdRng::seed_from_u64(1));
        composer.mutation_percent = 0;
        composer.set_scale(PitchClass::A, Interval::Minor);

        let voices = composer.next_voices();
        assert!((voices[0] - 440.0).abs() < 1e-3);
    }
}
