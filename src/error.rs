use thiserror::Error;

/// Construction failures of a single DSP filter.
///
/// Filters validate everything up front; once built, `process` never fails.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A delay expressed in milliseconds rounded down to zero frames.
    #[error("delay of {delay_ms} ms at {sample_rate} Hz yields an empty delay line")]
    ZeroDelay { delay_ms: f32, sample_rate: u32 },

    #[error("echo needs at least one delay/feedback tap pair")]
    NoEchoTaps,

    #[error("phaser stages must be in 1..=24, got {0}")]
    StageCountOutOfRange(u32),

    #[error("tremolo wavetable is empty ({lfo_freq} Hz LFO at {sample_rate} Hz)")]
    EmptyWavetable { lfo_freq: f32, sample_rate: u32 },

    #[error("{name} must be {expected}, got {value}")]
    InvalidParameter {
        name: &'static str,
        expected: &'static str,
        value: f32,
    },
}

/// Construction and ratio-change failures of the resampler engine.
#[derive(Debug, Error)]
pub enum ResampleError {
    #[error("resampling ratio must be positive and finite, got {0}")]
    InvalidRatio(f64),

    #[error("null resampler requires a 1:1 ratio, got {0}")]
    PassthroughRatio(f64),

    #[error("no resampler registered for quality '{0}'")]
    UnknownQuality(&'static str),
}

/// Errors surfaced by the pipeline driver.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline is not configured")]
    NotConfigured,

    #[error("pipeline is already configured; tear it down first")]
    AlreadyConfigured,

    #[error("pipeline is not running")]
    NotRunning,

    #[error("sample rates must be nonzero ({source_rate} Hz -> {target_rate} Hz)")]
    InvalidRate { source_rate: u32, target_rate: u32 },

    #[error("playback speed must be positive and finite, got {0}")]
    InvalidSpeed(f64),

    #[error("filter construction failed: {0}")]
    Filter(#[from] FilterError),

    #[error("resampler error: {0}")]
    Resample(#[from] ResampleError),

    #[error("sink write failed: {0}")]
    Sink(#[from] std::io::Error),
}
