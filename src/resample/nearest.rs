//! Nearest-neighbor resampler.
//!
//! Emits the most recently consumed input frame for every output position.
//! No anti-aliasing at all, but the cheapest option and bit-transparent at a
//! ratio of exactly 1.0.

use crate::error::ResampleError;

use super::validate_ratio;

pub struct NearestResampler {
    ratio: f64,
    step: f64,
    /// Phase accumulator sharing the sinc resampler's convention: rests at
    /// or above 1.0 between calls, consume subtracts 1.0, emit adds `step`.
    time: f64,
    last: [f32; 2],
}

impl NearestResampler {
    pub fn new(ratio: f64) -> Result<Self, ResampleError> {
        let ratio = validate_ratio(ratio)?;
        Ok(Self {
            ratio,
            step: 1.0 / ratio,
            time: 1.0,
            last: [0.0; 2],
        })
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn set_ratio(&mut self, ratio: f64) -> Result<(), ResampleError> {
        let ratio = validate_ratio(ratio)?;
        self.ratio = ratio;
        self.step = 1.0 / ratio;
        Ok(())
    }

    pub fn process(&mut self, input: &[f32], output: &mut [f32]) -> usize {
        let in_frames = input.len() / 2;
        let capacity = output.len() / 2;
        let mut consumed = 0;
        let mut written = 0;

        loop {
            while self.time >= 1.0 {
                if consumed == in_frames {
                    return written;
                }
                self.last = [input[2 * consumed], input[2 * consumed + 1]];
                consumed += 1;
                self.time -= 1.0;
            }

            while self.time < 1.0 {
                if written < capacity {
                    output[2 * written] = self.last[0];
                    output[2 * written + 1] = self.last[1];
                    written += 1;
                }
                self.time += self.step;
            }
        }
    }

    pub fn reset(&mut self) {
        self.time = 1.0;
        self.last = [0.0; 2];
    }
}
