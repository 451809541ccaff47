use std::f32::consts::PI;

use super::{require_positive, AudioFilter};
use crate::constants::{CHANNELS, VIBRATO_ADD_DELAY_FRAMES, VIBRATO_BASE_DELAY_SEC};
use crate::error::FilterError;
use crate::ring::DelayRing;

/// Pitch vibrato from a sine-swept fractional delay.
///
/// Depth is a percentage of the base modulation span; the read position is
/// reconstructed with 4-point Hermite interpolation. The output is fully
/// wet, so a zero depth degrades to a fixed
/// [`VIBRATO_ADD_DELAY_FRAMES`]-frame delay.
pub struct VibratoFilter {
    ring: DelayRing,
    depth: f32,
    max_delay: f32,
    phase: f32,
    phase_step: f32,
}

impl VibratoFilter {
    pub fn new(lfo_freq: f32, depth_percent: f32, sample_rate: u32) -> Result<Self, FilterError> {
        let lfo_freq = require_positive("lfoFreq", lfo_freq)?;
        if !(0.0..=100.0).contains(&depth_percent) {
            return Err(FilterError::InvalidParameter {
                name: "depth",
                expected: "within 0..=100 percent",
                value: depth_percent,
            });
        }

        let span = VIBRATO_BASE_DELAY_SEC * sample_rate as f64;
        if span < 1.0 {
            return Err(FilterError::InvalidParameter {
                name: "sampleRate",
                expected: "high enough for one frame of modulation",
                value: sample_rate as f32,
            });
        }
        let max_delay = span.ceil() as usize;
        let capacity = 2 * max_delay + VIBRATO_ADD_DELAY_FRAMES + 4;

        Ok(Self {
            ring: DelayRing::new(capacity),
            depth: depth_percent / 100.0,
            max_delay: max_delay as f32,
            phase: 0.0,
            phase_step: lfo_freq / sample_rate as f32,
        })
    }
}

/// 4-point, 3rd-order Hermite interpolation between `y[1]` and `y[2]`.
fn hermite(x: f32, y: [f32; 4]) -> f32 {
    let c0 = y[1];
    let c1 = 0.5 * (y[2] - y[0]);
    let c2 = y[0] - 2.5 * y[1] + 2.0 * y[2] - 0.5 * y[3];
    let c3 = 0.5 * (y[3] - y[0]) + 1.5 * (y[1] - y[2]);
    ((c3 * x + c2) * x + c1) * x + c0
}

impl AudioFilter for VibratoFilter {
    fn process(&mut self, samples: &mut [f32]) {
        for frame in samples.chunks_exact_mut(CHANNELS) {
            let lfo = ((2.0 * PI * self.phase).sin() + 1.0) * 0.5;
            self.phase += self.phase_step;
            if self.phase >= 1.0 {
                self.phase -= 1.0;
            }

            let delay = lfo * self.depth * self.max_delay + VIBRATO_ADD_DELAY_FRAMES as f32;
            let ipart = delay as usize;
            let frac = delay - ipart as f32;

            self.ring.store(frame[0], frame[1]);

            // delay >= 3 keeps ipart - 1 inside written history.
            let mut left = [0.0f32; 4];
            let mut right = [0.0f32; 4];
            for (i, (l, r)) in left.iter_mut().zip(right.iter_mut()).enumerate() {
                let [rl, rr] = self.ring.read_back(ipart - 1 + i);
                *l = rl;
                *r = rr;
            }

            frame[0] = hermite(frac, left);
            frame[1] = hermite(frac, right);
            self.ring.advance();
        }
    }

    fn reset(&mut self) {
        self.ring.clear();
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            VibratoFilter::new(0.0, 50.0, 48000),
            Err(FilterError::InvalidParameter { name: "lfoFreq", .. })
        ));
        for depth in [-1.0, 100.5, f32::NAN] {
            assert!(matches!(
                VibratoFilter::new(5.0, depth, 48000),
                Err(FilterError::InvalidParameter { name: "depth", .. })
            ));
        }
        assert!(VibratoFilter::new(5.0, 100.0, 48000).is_ok());

        // The 2 ms modulation span falls short of one frame below 500 Hz.
        for rate in [0, 1, 499] {
            assert!(matches!(
                VibratoFilter::new(5.0, 50.0, rate),
                Err(FilterError::InvalidParameter { name: "sampleRate", .. })
            ));
        }
        assert!(VibratoFilter::new(5.0, 50.0, 500).is_ok());
    }

    #[test]
    fn zero_depth_is_a_fixed_delay() {
        let mut vibrato = VibratoFilter::new(5.0, 0.0, 1000).unwrap();
        let mut samples = vec![0.0f32; 16 * 2];
        samples[0] = 1.0;
        samples[1] = -1.0;
        vibrato.process(&mut samples);

        assert_eq!(samples[3 * 2], 1.0);
        assert_eq!(samples[3 * 2 + 1], -1.0);
        let stray: f32 = samples
            .iter()
            .enumerate()
            .filter(|(i, _)| i / 2 != 3)
            .map(|(_, s)| s.abs())
            .sum();
        assert_eq!(stray, 0.0);
    }

    #[test]
    fn dc_passes_through_after_warmup() {
        let mut vibrato = VibratoFilter::new(5.0, 50.0, 1000).unwrap();
        let mut samples = vec![0.5f32; 100 * 2];
        vibrato.process(&mut samples);

        for (i, &s) in samples.iter().enumerate().skip(10 * 2) {
            assert_eq!(s, 0.5, "sample {i} diverged from DC");
        }
    }

    #[test]
    fn depth_modulates_the_delay() {
        let ramp: Vec<f32> = (0..300 * 2).map(|i| (i / 2) as f32 * 1e-3).collect();

        let mut deep = VibratoFilter::new(5.0, 100.0, 48000).unwrap();
        let mut flat = VibratoFilter::new(5.0, 0.0, 48000).unwrap();

        let mut a = ramp.clone();
        deep.process(&mut a);
        let mut b = ramp;
        flat.process(&mut b);

        assert_ne!(a, b);
    }

    #[test]
    fn split_processing_matches_single_pass() {
        let mut rng = StdRng::seed_from_u64(31);
        let input: Vec<f32> = (0..500 * 2).map(|_| rng.gen_range(-1.0f32..1.0)).collect();

        let mut whole = VibratoFilter::new(5.0, 50.0, 48000).unwrap();
        let mut split = VibratoFilter::new(5.0, 50.0, 48000).unwrap();

        let mut a = input.clone();
        whole.process(&mut a);

        let mut b = input;
        let (head, tail) = b.split_at_mut(111 * 2);
        split.process(head);
        split.process(tail);

        assert_eq!(a, b);
    }
}
