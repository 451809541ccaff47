//! Real-time audio processing for interleaved stereo PCM: a DSP effect
//! chain feeding ratio-based resampling, driven block by block through
//! [`AudioPipeline`].
//!
//! The crate is synchronous and allocation-free on the hot path; callers
//! own the thread and the cadence. See [`pipeline`] for the lifecycle and
//! [`resample`] for the quality trade-offs.

pub mod config;
pub mod constants;
pub mod convert;
pub mod error;
pub mod filters;
pub mod pipeline;
pub mod resample;
pub mod ring;
pub mod sink;

pub use config::{
    ChorusConfig, EchoConfig, EffectConfig, PhaserConfig, PipelineConfig, TremoloConfig,
    VibratoConfig, WahwahConfig,
};
pub use error::{FilterError, PipelineError, ResampleError};
pub use filters::{AudioFilter, FilterChain};
pub use pipeline::{AudioBlock, AudioPipeline, PipelineState};
pub use resample::{Resampler, ResamplerQuality, ResamplerRegistry};
pub use sink::{AudioSink, MemorySink, NullSink};
