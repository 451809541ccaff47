//! PCM resampling, three quality modes behind one surface:
//!
//! | Type | Quality | CPU Cost |
//! |---|---|---|
//! | [`PassthroughResampler`] | Bit-exact copy (ratio 1.0 only) | None |
//! | [`NearestResampler`] | No anti-aliasing (fast path) | Very low |
//! | [`SincResampler`] | Windowed-sinc polyphase | Medium |
//!
//! All modes share the same streaming contract: state carries across calls,
//! so any chunking of the input produces the same output as one whole call.
//! The ratio is `target_rate / source_rate`; N input frames produce about
//! `N * ratio` output frames.

pub mod nearest;
pub mod passthrough;
pub mod sinc;

pub use nearest::NearestResampler;
pub use passthrough::PassthroughResampler;
pub use sinc::SincResampler;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::OUTPUT_HEADROOM_FRAMES;
use crate::error::ResampleError;

/// Resampler quality selector, as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResamplerQuality {
    Nearest,
    #[default]
    Sinc,
    Null,
}

impl ResamplerQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Sinc => "sinc",
            Self::Null => "null",
        }
    }
}

/// Unified resampler enum; the algorithm is chosen at construction time.
pub enum Resampler {
    Nearest(NearestResampler),
    Sinc(SincResampler),
    Null(PassthroughResampler),
}

impl Resampler {
    /// Nearest-neighbor resampler (no anti-aliasing, minimal CPU).
    pub fn nearest(ratio: f64) -> Result<Self, ResampleError> {
        Ok(Self::Nearest(NearestResampler::new(ratio)?))
    }

    /// Windowed-sinc polyphase resampler (recommended).
    pub fn sinc(ratio: f64) -> Result<Self, ResampleError> {
        Ok(Self::Sinc(SincResampler::new(ratio)?))
    }

    /// Null resampler for bypass and testing; the ratio must be exactly 1.0.
    pub fn null(ratio: f64) -> Result<Self, ResampleError> {
        Ok(Self::Null(PassthroughResampler::new(ratio)?))
    }

    /// The current resampling ratio (output frames per input frame).
    pub fn ratio(&self) -> f64 {
        match self {
            Self::Nearest(r) => r.ratio(),
            Self::Sinc(r) => r.ratio(),
            Self::Null(r) => r.ratio(),
        }
    }

    /// Consume `input` (interleaved stereo) and write resampled frames into
    /// `output`. Returns the number of frames written. Input is always fully
    /// consumed; frames that do not fit into `output` are dropped, so size
    /// `output` with [`Resampler::max_output_frames`].
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) -> usize {
        match self {
            Self::Nearest(r) => r.process(input, output),
            Self::Sinc(r) => r.process(input, output),
            Self::Null(r) => r.process(input, output),
        }
    }

    /// Retune the ratio without touching history or phase, so continuous
    /// drift correction stays click-free.
    pub fn set_ratio(&mut self, ratio: f64) -> Result<(), ResampleError> {
        match self {
            Self::Nearest(r) => r.set_ratio(ratio),
            Self::Sinc(r) => r.set_ratio(ratio),
            Self::Null(r) => r.set_ratio(ratio),
        }
    }

    /// Upper bound on the frames `process` can produce for `input_frames`
    /// input frames at the current ratio.
    pub fn max_output_frames(&self, input_frames: usize) -> usize {
        (input_frames as f64 * self.ratio()).ceil() as usize + OUTPUT_HEADROOM_FRAMES
    }

    /// Zero all history and rewind the phase accumulator.
    pub fn reset(&mut self) {
        match self {
            Self::Nearest(r) => r.reset(),
            Self::Sinc(r) => r.reset(),
            Self::Null(r) => r.reset(),
        }
    }
}

/// Shared construction check: the ratio must be positive and finite.
pub(crate) fn validate_ratio(ratio: f64) -> Result<f64, ResampleError> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(ratio)
    } else {
        Err(ResampleError::InvalidRatio(ratio))
    }
}

/// Factory signature stored in the [`ResamplerRegistry`].
pub type ResamplerFactory = fn(f64) -> Result<Resampler, ResampleError>;

/// Maps a quality selector to the factory that builds it.
///
/// Built once at startup and handed to the pipeline driver as immutable
/// configuration; there is no global backend table.
pub struct ResamplerRegistry {
    entries: Vec<(ResamplerQuality, ResamplerFactory)>,
}

impl ResamplerRegistry {
    /// A registry with no factories. Useful when embedding only a custom
    /// subset of algorithms.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// A registry with the three built-in algorithms.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(ResamplerQuality::Nearest, Resampler::nearest);
        registry.register(ResamplerQuality::Sinc, Resampler::sinc);
        registry.register(ResamplerQuality::Null, Resampler::null);
        registry
    }

    /// Register `factory` for `quality`, replacing any existing entry.
    pub fn register(&mut self, quality: ResamplerQuality, factory: ResamplerFactory) {
        self.entries.retain(|(q, _)| *q != quality);
        self.entries.push((quality, factory));
    }

    /// Build a resampler of the given quality.
    pub fn create(&self, quality: ResamplerQuality, ratio: f64) -> Result<Resampler, ResampleError> {
        let (_, factory) = self
            .entries
            .iter()
            .find(|(q, _)| *q == quality)
            .ok_or(ResampleError::UnknownQuality(quality.as_str()))?;
        debug!("creating '{}' resampler, ratio {:.6}", quality.as_str(), ratio);
        factory(ratio)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResamplerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
