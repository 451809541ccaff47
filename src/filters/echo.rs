use super::{require_finite, AudioFilter};
use crate::constants::CHANNELS;
use crate::error::FilterError;
use crate::ring::DelayRing;

struct EchoTap {
    ring: DelayRing,
    feedback: f32,
}

/// Multi-tap feedback echo.
///
/// Every tap owns its delay line; all taps read in parallel, the summed
/// echo is scaled by `amp` and added to the dry signal, and each tap then
/// records the dry input plus its own feedback share of that echo.
pub struct EchoFilter {
    taps: Vec<EchoTap>,
    amp: f32,
}

impl EchoFilter {
    /// Build from parallel `delays_ms`/`feedbacks` lists. Extra entries in
    /// the longer list are ignored; an empty pairing or a delay that rounds
    /// to zero frames is an error.
    pub fn new(
        delays_ms: &[f32],
        feedbacks: &[f32],
        amp: f32,
        sample_rate: u32,
    ) -> Result<Self, FilterError> {
        let amp = require_finite("amp", amp)?;

        let count = delays_ms.len().min(feedbacks.len());
        if count == 0 {
            return Err(FilterError::NoEchoTaps);
        }

        let mut taps = Vec::with_capacity(count);
        for (&delay_ms, &feedback) in delays_ms.iter().zip(feedbacks.iter()) {
            let delay_ms = require_finite("delayMs", delay_ms)?;
            let frames = (delay_ms * sample_rate as f32 / 1000.0 + 0.5) as usize;
            if frames == 0 {
                return Err(FilterError::ZeroDelay {
                    delay_ms,
                    sample_rate,
                });
            }
            taps.push(EchoTap {
                ring: DelayRing::new(frames),
                feedback: require_finite("feedback", feedback)?.clamp(0.0, 1.0),
            });
        }

        Ok(Self { taps, amp })
    }
}

impl AudioFilter for EchoFilter {
    fn process(&mut self, samples: &mut [f32]) {
        for frame in samples.chunks_exact_mut(CHANNELS) {
            let mut echo_l = 0.0;
            let mut echo_r = 0.0;
            for tap in self.taps.iter() {
                let [l, r] = tap.ring.frame();
                echo_l += l;
                echo_r += r;
            }
            echo_l *= self.amp;
            echo_r *= self.amp;

            let out_l = frame[0] + echo_l;
            let out_r = frame[1] + echo_r;

            // Taps record the dry input plus their feedback share before
            // the frame is overwritten with the wet mix.
            for tap in self.taps.iter_mut() {
                tap.ring.store(
                    frame[0] + tap.feedback * echo_l,
                    frame[1] + tap.feedback * echo_r,
                );
                tap.ring.advance();
            }

            frame[0] = out_l;
            frame[1] = out_r;
        }
    }

    fn reset(&mut self) {
        for tap in self.taps.iter_mut() {
            tap.ring.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn impulse(frames: usize) -> Vec<f32> {
        let mut samples = vec![0.0; frames * 2];
        samples[0] = 1.0;
        samples[1] = 1.0;
        samples
    }

    #[test]
    fn rejects_bad_construction() {
        assert!(matches!(
            EchoFilter::new(&[], &[], 0.2, 48000),
            Err(FilterError::NoEchoTaps)
        ));
        assert!(matches!(
            EchoFilter::new(&[0.0], &[0.5], 0.2, 48000),
            Err(FilterError::ZeroDelay { .. })
        ));
        assert!(matches!(
            EchoFilter::new(&[f32::NAN], &[0.5], 0.2, 48000),
            Err(FilterError::InvalidParameter { .. })
        ));
        assert!(matches!(
            EchoFilter::new(&[200.0], &[0.5], f32::INFINITY, 48000),
            Err(FilterError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn impulse_echoes_decay_geometrically() {
        // 10 ms at 1 kHz is a 10 frame delay; each pass through the loop
        // scales by feedback * amp = 0.1.
        let mut echo = EchoFilter::new(&[10.0], &[0.5], 0.2, 1000).unwrap();
        let mut samples = impulse(31);
        echo.process(&mut samples);

        let left: Vec<f32> = samples.chunks_exact(2).map(|f| f[0]).collect();
        assert_eq!(left[0], 1.0);
        assert!((left[10] - 0.2).abs() < 1e-6);
        assert!((left[20] - 0.02).abs() < 1e-6);
        assert!((left[30] - 0.002).abs() < 1e-6);
        for n in [1, 5, 9, 11, 19, 25] {
            assert_eq!(left[n], 0.0, "unexpected signal at frame {n}");
        }
    }

    #[test]
    fn taps_sum_in_parallel() {
        let mut echo = EchoFilter::new(&[5.0, 10.0], &[0.0, 0.0], 1.0, 1000).unwrap();
        let mut samples = impulse(12);
        echo.process(&mut samples);

        let left: Vec<f32> = samples.chunks_exact(2).map(|f| f[0]).collect();
        assert_eq!(left[5], 1.0);
        assert_eq!(left[10], 1.0);
        assert_eq!(left[7], 0.0);
    }

    #[test]
    fn extra_delay_entries_are_ignored() {
        // Only one feedback value, so only the 5 ms tap is built.
        let mut echo = EchoFilter::new(&[5.0, 10.0], &[0.0], 1.0, 1000).unwrap();
        let mut samples = impulse(12);
        echo.process(&mut samples);

        let left: Vec<f32> = samples.chunks_exact(2).map(|f| f[0]).collect();
        assert_eq!(left[5], 1.0);
        assert_eq!(left[10], 0.0);
    }

    #[test]
    fn split_processing_matches_single_pass() {
        let mut rng = StdRng::seed_from_u64(9);
        let input: Vec<f32> = (0..1087 * 2).map(|_| rng.gen_range(-1.0f32..1.0)).collect();

        let mut whole = EchoFilter::new(&[200.0, 330.0], &[0.6, 0.3], 0.4, 48000).unwrap();
        let mut split = EchoFilter::new(&[200.0, 330.0], &[0.6, 0.3], 0.4, 48000).unwrap();

        let mut a = input.clone();
        whole.process(&mut a[..1037 * 2]);
        whole.process(&mut a[1037 * 2..]);

        let mut b = input.clone();
        split.process(&mut b[..37 * 2]);
        split.process(&mut b[37 * 2..1037 * 2]);
        split.process(&mut b[1037 * 2..]);

        assert_eq!(a, b);
    }
}
