//! Null resampler for bypass and testing.

use crate::error::ResampleError;

use super::validate_ratio;

/// Copies input to output untouched. Construction and every later ratio
/// change insist on an exact 1:1 ratio; anything else belongs to a real
/// resampler.
pub struct PassthroughResampler;

impl PassthroughResampler {
    pub fn new(ratio: f64) -> Result<Self, ResampleError> {
        Self::check(ratio)?;
        Ok(Self)
    }

    pub fn ratio(&self) -> f64 {
        1.0
    }

    pub fn set_ratio(&mut self, ratio: f64) -> Result<(), ResampleError> {
        Self::check(ratio)
    }

    pub fn process(&mut self, input: &[f32], output: &mut [f32]) -> usize {
        let frames = (input.len() / 2).min(output.len() / 2);
        output[..frames * 2].copy_from_slice(&input[..frames * 2]);
        frames
    }

    pub fn reset(&mut self) {}

    fn check(ratio: f64) -> Result<(), ResampleError> {
        let ratio = validate_ratio(ratio)?;
        if ratio != 1.0 {
            return Err(ResampleError::PassthroughRatio(ratio));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_input_exactly() {
        let mut resampler = PassthroughResampler::new(1.0).unwrap();
        let input: Vec<f32> = (0..40).map(|n| n as f32 / 40.0).collect();
        let mut output = vec![0.0f32; 40];
        let produced = resampler.process(&input, &mut output);

        assert_eq!(produced, 20);
        assert_eq!(input, output);
    }

    #[test]
    fn bounded_by_output_capacity() {
        let mut resampler = PassthroughResampler::new(1.0).unwrap();
        let input = vec![0.25f32; 20];
        let mut output = vec![0.0f32; 8];
        let produced = resampler.process(&input, &mut output);

        assert_eq!(produced, 4);
        assert!(output.iter().all(|&s| s == 0.25));
    }

    #[test]
    fn rejects_drift_away_from_unity() {
        let mut resampler = PassthroughResampler::new(1.0).unwrap();
        assert!(resampler.set_ratio(1.0).is_ok());
        assert!(matches!(
            resampler.set_ratio(1.001),
            Err(ResampleError::PassthroughRatio(_))
        ));
    }
}
