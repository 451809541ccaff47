use std::f64::consts::PI;

use super::{require_finite, require_positive, AudioFilter};
use crate::constants::{
    CHANNELS, PHASER_LFO_SHAPE, PHASER_LFO_SKIP_SAMPLES, PHASER_MAX_STAGES, PHASER_MIN_STAGES,
};
use crate::error::FilterError;

const MAX_STAGES: usize = PHASER_MAX_STAGES as usize;

/// Cascaded allpass phaser with feedback.
///
/// The stage gain follows a cosine LFO reshaped by an exponential curve,
/// recomputed once every [`PHASER_LFO_SKIP_SAMPLES`] frames and held in
/// between. The LFO start phase is given in degrees.
pub struct PhaserFilter {
    lfo_skip: f64,
    start_phase: f64,
    feedback: f32,
    depth: f64,
    dry_wet: f32,
    stages: usize,
    old: [[f32; MAX_STAGES]; 2],
    fb_out: [f32; 2],
    gain: f32,
    skip_count: u64,
}

impl PhaserFilter {
    pub fn new(
        lfo_freq: f32,
        lfo_start_phase: f32,
        feedback: f32,
        depth: f32,
        dry_wet: f32,
        stages: u32,
        sample_rate: u32,
    ) -> Result<Self, FilterError> {
        let lfo_freq = require_positive("lfoFreq", lfo_freq)?;
        let lfo_start_phase = require_finite("lfoStartPhase", lfo_start_phase)?;
        if !(PHASER_MIN_STAGES..=PHASER_MAX_STAGES).contains(&stages) {
            return Err(FilterError::StageCountOutOfRange(stages));
        }

        Ok(Self {
            lfo_skip: lfo_freq as f64 * 2.0 * PI / sample_rate as f64,
            start_phase: (lfo_start_phase as f64).to_radians(),
            feedback: require_finite("feedback", feedback)?.clamp(0.0, 0.95),
            depth: require_finite("depth", depth)?.clamp(0.0, 1.0) as f64,
            dry_wet: require_finite("dryWet", dry_wet)?.clamp(0.0, 1.0),
            stages: stages as usize,
            old: [[0.0; MAX_STAGES]; 2],
            fb_out: [0.0; 2],
            gain: 0.0,
            skip_count: 0,
        })
    }
}

impl AudioFilter for PhaserFilter {
    fn process(&mut self, samples: &mut [f32]) {
        for frame in samples.chunks_exact_mut(CHANNELS) {
            let input = [frame[0], frame[1]];
            let mut m = [
                input[0] + self.fb_out[0] * self.feedback,
                input[1] + self.fb_out[1] * self.feedback,
            ];

            // The counter increments before the LFO is sampled, so the
            // held gain for frames n..n+19 comes from position n+1.
            let due = self.skip_count % PHASER_LFO_SKIP_SAMPLES == 0;
            self.skip_count += 1;
            if due {
                let lfo = self.skip_count as f64 * self.lfo_skip + self.start_phase;
                let g = 0.5 * (1.0 + lfo.cos());
                let g = ((g * PHASER_LFO_SHAPE).exp() - 1.0) / (PHASER_LFO_SHAPE.exp() - 1.0);
                self.gain = (1.0 - g * self.depth) as f32;
            }

            for c in 0..CHANNELS {
                for s in 0..self.stages {
                    let tmp = self.old[c][s];
                    self.old[c][s] = self.gain * tmp + m[c];
                    m[c] = tmp - self.gain * self.old[c][s];
                }
                self.fb_out[c] = m[c];
            }

            frame[0] = m[0] * self.dry_wet + input[0] * (1.0 - self.dry_wet);
            frame[1] = m[1] * self.dry_wet + input[1] * (1.0 - self.dry_wet);
        }
    }

    fn reset(&mut self) {
        self.old = [[0.0; MAX_STAGES]; 2];
        self.fb_out = [0.0; 2];
        self.gain = 0.0;
        self.skip_count = 0;
    }
}
