//! Harmonic-series decomposition of the classic waveforms.

/*
Fourier Partials
================

Any periodic waveform can be written as a sum of sinusoids at integer
multiples of a fundamental frequency. Truncating that series at `order`
partials gives a band-limited approximation that an additive synth can play
directly as a list of (frequency, amplitude) pairs.

  square    odd harmonics 1, 3, 5, ...   amplitude 4/(π·h)
  triangle  odd harmonics 1, 3, 5, ...   amplitude 8/π² · (−1)^k / (2k+1)²
  sawtooth  all harmonics 1, 2, 3, ...   amplitude 2/π · (−1)^h / h

The alternating signs are not an error: a negative amplitude is a partial
mixed in with inverted phase, which is exactly what the triangle and
sawtooth series require. Downstream mixing code multiplies samples by the
amplitude, so the sign passes straight through.

Higher orders sharpen the corners of the waveform at the cost of one sine
evaluation per partial per sample. Order 20 is already hard to tell from
the ideal shape by ear.
*/

use std::f32::consts::PI;

use crate::synth::Note;

/// Band-limited square wave: `order` odd partials of `fundamental`.
pub fn square_wave(fundamental: f32, order: usize) -> Vec<Note> {
    (0..order)
        .map(|k| {
            let h = (2 * k + 1) as f32;
            Note::new(fundamental * h, (4.0 / PI) / h)
        })
        .collect()
}

/// Band-limited triangle wave: `order` odd partials with 1/h² falloff and
/// alternating sign.
pub fn triangle_wave(fundamental: f32, order: usize) -> Vec<Note> {
    (0..order)
        .map(|k| {
            let h = (2 * k + 1) as f32;
            let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
            Note::new(fundamental * h, (8.0 / (PI * PI)) * sign / (h * h))
        })
        .collect()
}

/// Band-limited sawtooth wave: `order` consecutive partials with 1/h
/// falloff and alternating sign.
pub fn sawtooth_wave(fundamental: f32, order: usize) -> Vec<Note> {
    (1..=order)
        .map(|h| {
            let sign = if h % 2 == 0 { 1.0 } else { -1.0 };
            Note::new(fundamental * h as f32, (2.0 / PI) * sign / h as f32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-6, "expected {b}, got {a}");
    }

    #[test]
    fn test_square_wave_partials() {
        let notes = square_wave(100.0, 4);

        assert_eq!(notes.len(), 4);
        let freqs: Vec<f32> = notes.iter().map(|n| n.frequency).collect();
        assert_eq!(freqs, vec![100.0, 300.0, 500.0, 700.0]);

        assert_close(notes[0].amplitude, 4.0 / PI);
        assert_close(notes[1].amplitude, 4.0 / (3.0 * PI));
        assert_close(notes[2].amplitude, 4.0 / (5.0 * PI));
        assert_close(notes[3].amplitude, 4.0 / (7.0 * PI));
    }

    #[test]
    fn test_triangle_wave_partials() {
        let notes = triangle_wave(200.0, 3);

        assert_eq!(notes.len(), 3);
        let freqs: Vec<f32> = notes.iter().map(|n| n.frequency).collect();
        assert_eq!(freqs, vec![200.0, 600.0, 1000.0]);

        assert_close(notes[0].amplitude, 8.0 / (PI * PI));
        assert_close(notes[1].amplitude, -8.0 / (9.0 * PI * PI));
        assert_close(notes[2].amplitude, 8.0 / (25.0 * PI * PI));
    }

    #[test]
    fn test_sawtooth_wave_partials() {
        let notes = sawtooth_wave(100.0, 4);

        assert_eq!(notes.len(), 4);
        let freqs: Vec<f32> = notes.iter().map(|n| n.frequency).collect();
        assert_eq!(freqs, vec![100.0, 200.0, 300.0, 400.0]);

        assert_close(notes[0].amplitude, -2.0 / PI);
        assert_close(notes[1].amplitude, 1.0 / PI);
        assert_close(notes[2].amplitude, -2.0 / (3.0 * PI));
        assert_close(notes[3].amplitude, 1.0 / (2.0 * PI));
    }

    #[test]
    fn test_falloff_shapes() {
        // Square and sawtooth fall off as 1/h, triangle as 1/h².
        let square = square_wave(100.0, 8);
        let triangle = triangle_wave(100.0, 8);

        for k in 1..8 {
            let h = (2 * k + 1) as f32;
            assert_close(square[k].amplitude * h, square[0].amplitude);
            assert_close(triangle[k].amplitude.abs() * h * h, triangle[0].amplitude);
        }
    }
}
