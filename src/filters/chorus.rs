use std::f32::consts::PI;

use super::{require_finite, require_positive, AudioFilter};
use crate::constants::{CHANNELS, CHORUS_MAX_DELAY_FRAMES};
use crate::error::FilterError;
use crate::ring::DelayRing;

/// Chorus built from a single LFO-modulated delay tap.
///
/// The instantaneous delay is `delay + depth * sin(2*pi*n/period)` seconds,
/// read from the ring with linear interpolation between the two straddling
/// frames. Depth is capped at the base delay so the tap never reaches into
/// the future.
pub struct ChorusFilter {
    ring: DelayRing,
    delay_s: f32,
    depth_s: f32,
    sample_rate: f32,
    mix_dry: f32,
    mix_wet: f32,
    lfo_ptr: u32,
    lfo_period: u32,
}

impl ChorusFilter {
    pub fn new(
        delay_ms: f32,
        depth_ms: f32,
        lfo_freq: f32,
        dry_wet: f32,
        sample_rate: u32,
    ) -> Result<Self, FilterError> {
        let lfo_freq = require_positive("lfoFreq", lfo_freq)?;
        if !delay_ms.is_finite() || delay_ms < 0.0 {
            return Err(FilterError::InvalidParameter {
                name: "delayMs",
                expected: "finite and non-negative",
                value: delay_ms,
            });
        }
        if !depth_ms.is_finite() || depth_ms < 0.0 {
            return Err(FilterError::InvalidParameter {
                name: "depthMs",
                expected: "finite and non-negative",
                value: depth_ms,
            });
        }

        let delay_s = delay_ms / 1000.0;
        let depth_s = depth_ms.min(delay_ms) / 1000.0;

        // The interpolated read touches delay_int + 1 frames back; validate
        // the peak excursion fits the ring now so process() stays branch-free.
        let peak_frames = ((delay_s + depth_s) * sample_rate as f32) as usize + 1;
        if peak_frames >= CHORUS_MAX_DELAY_FRAMES {
            return Err(FilterError::InvalidParameter {
                name: "delayMs",
                expected: "short enough to fit the 4096 frame delay ring",
                value: delay_ms,
            });
        }

        let dry_wet = require_finite("dryWet", dry_wet)?.clamp(0.0, 1.0);
        let lfo_period = (((1.0 / lfo_freq) * sample_rate as f32) as u32).max(1);

        Ok(Self {
            ring: DelayRing::new(CHORUS_MAX_DELAY_FRAMES),
            delay_s,
            depth_s,
            sample_rate: sample_rate as f32,
            mix_dry: 1.0 - 0.5 * dry_wet,
            mix_wet: 0.5 * dry_wet,
            lfo_ptr: 0,
            lfo_period,
        })
    }
}

impl AudioFilter for ChorusFilter {
    fn process(&mut self, samples: &mut [f32]) {
        for frame in samples.chunks_exact_mut(CHANNELS) {
            let in_l = frame[0];
            let in_r = frame[1];

            let delay_s = self.delay_s
                + self.depth_s * (2.0 * PI * self.lfo_ptr as f32 / self.lfo_period as f32).sin();
            self.lfo_ptr += 1;
            if self.lfo_ptr >= self.lfo_period {
                self.lfo_ptr = 0;
            }

            // Write before read so a zero delay reads the current frame.
            self.ring.store(in_l, in_r);

            let delay_frames = delay_s * self.sample_rate;
            let delay_int = delay_frames as usize;
            let frac = delay_frames - delay_int as f32;

            let [a_l, a_r] = self.ring.read_back(delay_int);
            let [b_l, b_r] = self.ring.read_back(delay_int + 1);
            let wet_l = a_l * (1.0 - frac) + b_l * frac;
            let wet_r = a_r * (1.0 - frac) + b_r * frac;

            frame[0] = self.mix_dry * in_l + self.mix_wet * wet_l;
            frame[1] = self.mix_dry * in_r + self.mix_wet * wet_r;
            self.ring.advance();
        }
    }

    fn reset(&mut self) {
        self.ring.clear();
        self.lfo_ptr = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn rejects_bad_construction() {
        assert!(matches!(
            ChorusFilter::new(25.0, 1.0, 0.0, 0.8, 48000),
            Err(FilterError::InvalidParameter { name: "lfoFreq", .. })
        ));
        assert!(matches!(
            ChorusFilter::new(f32::NAN, 1.0, 0.5, 0.8, 48000),
            Err(FilterError::InvalidParameter { name: "delayMs", .. })
        ));
        assert!(matches!(
            ChorusFilter::new(25.0, -1.0, 0.5, 0.8, 48000),
            Err(FilterError::InvalidParameter { name: "depthMs", .. })
        ));
        // 200 ms at 48 kHz needs 9600 frames, more than the ring holds.
        assert!(matches!(
            ChorusFilter::new(200.0, 1.0, 0.5, 0.8, 48000),
            Err(FilterError::InvalidParameter { name: "delayMs", .. })
        ));
    }

    #[test]
    fn depth_is_capped_at_the_base_delay() {
        // 50 ms of depth on a 10 ms delay caps to 10 ms, which fits.
        assert!(ChorusFilter::new(10.0, 50.0, 0.5, 0.8, 48000).is_ok());
    }

    #[test]
    fn zero_dry_wet_is_passthrough() {
        let mut chorus = ChorusFilter::new(25.0, 1.0, 0.5, 0.0, 48000).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let mut samples: Vec<f32> = (0..256).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
        let reference = samples.clone();
        chorus.process(&mut samples);
        assert_eq!(samples, reference);
    }

    #[test]
    fn constant_delay_shifts_an_impulse() {
        // depth 0 keeps the tap at 10 frames; drywet 1.0 splits the mix
        // evenly between dry and wet.
        let mut chorus = ChorusFilter::new(10.0, 0.0, 0.5, 1.0, 1000).unwrap();
        let mut samples = vec![0.0f32; 32 * 2];
        samples[0] = 1.0;
        samples[1] = 1.0;
        chorus.process(&mut samples);

        let left: Vec<f32> = samples.chunks_exact(2).map(|f| f[0]).collect();
        assert!((left[0] - 0.5).abs() < 1e-5);
        assert!((left[9] + left[10] - 0.5).abs() < 1e-5);
        assert_eq!(left[20], 0.0);
    }

    #[test]
    fn lfo_sweeps_the_tap() {
        let ramp: Vec<f32> = (0..400 * 2).map(|i| (i / 2) as f32 * 1e-3).collect();

        let mut modulated = ChorusFilter::new(10.0, 5.0, 2.5, 1.0, 1000).unwrap();
        let mut fixed = ChorusFilter::new(10.0, 0.0, 2.5, 1.0, 1000).unwrap();

        let mut a = ramp.clone();
        modulated.process(&mut a);
        let mut b = ramp;
        fixed.process(&mut b);

        assert_ne!(a, b);
    }

    #[test]
    fn split_processing_matches_single_pass() {
        let mut rng = StdRng::seed_from_u64(5);
        let input: Vec<f32> = (0..600 * 2).map(|_| rng.gen_range(-1.0f32..1.0)).collect();

        let mut whole = ChorusFilter::new(25.0, 1.0, 0.5, 0.8, 48000).unwrap();
        let mut split = ChorusFilter::new(25.0, 1.0, 0.5, 0.8, 48000).unwrap();

        let mut a = input.clone();
        whole.process(&mut a);

        let mut b = input;
        let (head, tail) = b.split_at_mut(123 * 2);
        split.process(head);
        split.process(tail);

        assert_eq!(a, b);
    }
}
