use super::biquad::{BiquadCoeffs, BiquadState};
use super::{require_finite, require_positive, AudioFilter};
use crate::constants::{CHANNELS, WAHWAH_FREQ_WARP, WAHWAH_LFO_SKIP_SAMPLES};
use crate::error::FilterError;

/// Wah-wah: a bandpass whose center frequency rides a cosine LFO.
///
/// The LFO position maps to a normalized frequency in `[freq_offset, 1]`,
/// warped exponentially toward the low end, and the biquad is rebuilt from
/// it once every [`WAHWAH_LFO_SKIP_SAMPLES`] frames. The LFO start phase is
/// given in degrees. The output is fully wet.
pub struct WahwahFilter {
    lfo_skip: f64,
    start_phase: f64,
    freq_offset: f64,
    depth: f64,
    resonance: f64,
    sample_rate: f64,
    coeffs: BiquadCoeffs,
    left: BiquadState,
    right: BiquadState,
    skip_count: u64,
}

impl WahwahFilter {
    pub fn new(
        lfo_freq: f32,
        lfo_start_phase: f32,
        freq_offset: f32,
        depth: f32,
        resonance: f32,
        sample_rate: u32,
    ) -> Result<Self, FilterError> {
        let lfo_freq = require_positive("lfoFreq", lfo_freq)?;
        let lfo_start_phase = require_finite("lfoStartPhase", lfo_start_phase)?;
        let resonance = require_positive("resonance", resonance)?;

        Ok(Self {
            lfo_skip: lfo_freq as f64 * 2.0 * std::f64::consts::PI / sample_rate as f64,
            start_phase: (lfo_start_phase as f64).to_radians(),
            freq_offset: require_finite("freqOffset", freq_offset)?.clamp(0.0, 1.0) as f64,
            depth: require_finite("depth", depth)?.clamp(0.0, 1.0) as f64,
            resonance: resonance as f64,
            sample_rate: sample_rate as f64,
            // Placeholder, rebuilt on the first frame.
            coeffs: BiquadCoeffs {
                b0: 0.0,
                b1: 0.0,
                b2: 0.0,
                a1: 0.0,
                a2: 0.0,
            },
            left: BiquadState::default(),
            right: BiquadState::default(),
            skip_count: 0,
        })
    }

    fn update_coeffs(&mut self) {
        let lfo = self.skip_count as f64 * self.lfo_skip + self.start_phase;
        let f = (1.0 + lfo.cos()) / 2.0;
        let f = f * self.depth * (1.0 - self.freq_offset) + self.freq_offset;
        let f = ((f - 1.0) * WAHWAH_FREQ_WARP).exp();
        self.coeffs =
            BiquadCoeffs::bandpass(f * self.sample_rate / 2.0, self.resonance, self.sample_rate);
    }
}

impl AudioFilter for WahwahFilter {
    fn process(&mut self, samples: &mut [f32]) {
        for frame in samples.chunks_exact_mut(CHANNELS) {
            // Counter increments before the LFO is sampled, like the phaser.
            let due = self.skip_count % WAHWAH_LFO_SKIP_SAMPLES == 0;
            self.skip_count += 1;
            if due {
                self.update_coeffs();
            }

            frame[0] = self.left.process(frame[0] as f64, &self.coeffs) as f32;
            frame[1] = self.right.process(frame[1] as f64, &self.coeffs) as f32;
        }
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.skip_count = 0;
    }
}
