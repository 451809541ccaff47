//! Sample format conversion between 16-bit PCM and normalized float.
//!
//! A single portable scalar path; there is no runtime dispatch. Both
//! directions convert `min(out.len(), input.len())` samples.

use crate::constants::{INT16_MAX_F, INT16_MIN_F, INT16_SCALE};

/// Convert interleaved s16 PCM to normalized float, applying `gain`.
///
/// `gain` of 1.0 maps the full s16 range onto [-1.0, 1.0).
pub fn s16_to_float(out: &mut [f32], input: &[i16], gain: f32) {
    let scale = gain / INT16_SCALE;
    for (dst, src) in out.iter_mut().zip(input) {
        *dst = *src as f32 * scale;
    }
}

/// Convert normalized float to interleaved s16 PCM.
///
/// Samples are scaled, rounded to nearest and saturated: anything above 1.0
/// clamps to `i16::MAX` instead of wrapping.
pub fn float_to_s16(out: &mut [i16], input: &[f32]) {
    for (dst, src) in out.iter_mut().zip(input) {
        let scaled = (*src * INT16_SCALE).round();
        *dst = scaled.clamp(INT16_MIN_F, INT16_MAX_F) as i16;
    }
}

/// Copy float samples while applying `gain`.
pub fn copy_with_gain(out: &mut [f32], input: &[f32], gain: f32) {
    for (dst, src) in out.iter_mut().zip(input) {
        *dst = *src * gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_i16_value() {
        let all: Vec<i16> = (i16::MIN..=i16::MAX).collect();
        let mut floats = vec![0.0f32; all.len()];
        let mut back = vec![0i16; all.len()];

        s16_to_float(&mut floats, &all, 1.0);
        float_to_s16(&mut back, &floats);

        assert_eq!(all, back);
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        let input = [1.5f32, -1.5, 1.0, -1.0, 40.0, -40.0];
        let mut out = [0i16; 6];
        float_to_s16(&mut out, &input);
        assert_eq!(out, [32767, -32768, 32767, -32768, 32767, -32768]);
    }

    #[test]
    fn rounds_to_nearest() {
        let input = [1.5 / 32768.0, 1.4 / 32768.0, -1.5 / 32768.0];
        let mut out = [0i16; 3];
        float_to_s16(&mut out, &input);
        assert_eq!(out, [2, 1, -2]);
    }

    #[test]
    fn gain_scales_conversion() {
        let input = [16384i16, -16384];
        let mut out = [0.0f32; 2];
        s16_to_float(&mut out, &input, 0.5);
        assert!((out[0] - 0.25).abs() < 1e-7);
        assert!((out[1] + 0.25).abs() < 1e-7);
    }

    #[test]
    fn copy_with_gain_scales() {
        let input = [0.5f32, -0.5, 1.0];
        let mut out = [0.0f32; 3];
        copy_with_gain(&mut out, &input, 0.5);
        assert_eq!(out, [0.25, -0.25, 0.5]);
    }
}
