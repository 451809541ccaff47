use std::f64::consts::PI;

use super::{require_finite, require_positive, AudioFilter};
use crate::constants::CHANNELS;
use crate::error::FilterError;

/// Amplitude tremolo driven by a precomputed one-period sine wavetable.
///
/// The table holds `sample_rate / lfo_freq` gain values in
/// `[1 - depth, 1]`, starting at the sine peak so playback opens at unity
/// gain. Both channels share one read index.
pub struct TremoloFilter {
    wavetable: Vec<f32>,
    index: usize,
}

impl TremoloFilter {
    pub fn new(lfo_freq: f32, depth: f32, sample_rate: u32) -> Result<Self, FilterError> {
        let lfo_freq = require_positive("lfoFreq", lfo_freq)?;
        let depth = require_finite("depth", depth)?.clamp(0.0, 1.0);

        let len = (sample_rate as f32 / lfo_freq) as usize;
        if len == 0 {
            return Err(FilterError::EmptyWavetable {
                lfo_freq,
                sample_rate,
            });
        }

        let offset = 1.0 - depth as f64 / 2.0;
        let mut wavetable = Vec::with_capacity(len);
        for i in 0..len {
            let env = lfo_freq as f64 * i as f64 / sample_rate as f64;
            let env = ((env + 0.25) % 1.0 * 2.0 * PI).sin();
            wavetable.push((env * (1.0 - offset.abs()) + offset) as f32);
        }
        wavetable[0] = 1.0;

        Ok(Self {
            wavetable,
            index: 0,
        })
    }
}

impl AudioFilter for TremoloFilter {
    fn process(&mut self, samples: &mut [f32]) {
        for frame in samples.chunks_exact_mut(CHANNELS) {
            let gain = self.wavetable[self.index];
            self.index += 1;
            if self.index >= self.wavetable.len() {
                self.index = 0;
            }
            frame[0] *= gain;
            frame[1] *= gain;
        }
    }

    fn reset(&mut self) {
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            TremoloFilter::new(0.0, 0.9, 48000),
            Err(FilterError::InvalidParameter { name: "lfoFreq", .. })
        ));
        // An LFO faster than the sample rate has no table entries at all.
        assert!(matches!(
            TremoloFilter::new(96000.0, 0.9, 48000),
            Err(FilterError::EmptyWavetable { .. })
        ));
        assert!(TremoloFilter::new(48000.0, 0.9, 48000).is_ok());
    }

    #[test]
    fn first_frame_is_unscaled() {
        let mut tremolo = TremoloFilter::new(4.0, 0.9, 48000).unwrap();
        let mut frame = [0.8f32, -0.6];
        tremolo.process(&mut frame);
        assert_eq!(frame, [0.8, -0.6]);
    }

    #[test]
    fn gain_is_periodic() {
        // 4 Hz at 48 kHz repeats every 12000 frames.
        let mut tremolo = TremoloFilter::new(4.0, 0.9, 48000).unwrap();
        let mut samples = vec![1.0f32; 24000 * 2];
        tremolo.process(&mut samples);

        for frame in [0usize, 1, 1234, 5999, 11999] {
            assert_eq!(
                samples[frame * 2],
                samples[(frame + 12000) * 2],
                "gain diverged at frame {frame}"
            );
        }
    }

    #[test]
    fn depth_bounds_the_gain() {
        let mut tremolo = TremoloFilter::new(4.0, 0.9, 48000).unwrap();
        let mut samples = vec![1.0f32; 12000 * 2];
        tremolo.process(&mut samples);

        let min = samples.iter().copied().fold(f32::INFINITY, f32::min);
        let max = samples.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!((min - 0.1).abs() < 1e-6, "trough should be 1 - depth, got {min}");
        assert_eq!(max, 1.0);
    }

    #[test]
    fn split_processing_matches_single_pass() {
        let input: Vec<f32> = (0..256 * 2).map(|i| ((i % 7) as f32 - 3.0) * 0.1).collect();

        let mut whole = TremoloFilter::new(50.0, 0.5, 48000).unwrap();
        let mut split = TremoloFilter::new(50.0, 0.5, 48000).unwrap();

        let mut a = input.clone();
        whole.process(&mut a);

        let mut b = input;
        let (head, tail) = b.split_at_mut(100 * 2);
        split.process(head);
        split.process(tail);

        assert_eq!(a, b);
    }
}
