//! `AudioPipeline`: ties conversion → filter chain → resampler → sink.
//!
//! The driver owns the scratch buffers and a three-state lifecycle,
//! `Uninitialized → Configured → Running`. All hot-path work happens in
//! [`AudioPipeline::submit`]; everything else is bookkeeping around it.
//! Rate control writes a single scalar that the next submit picks up, so
//! drift correction never touches resampler history mid-stream.

use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::constants::CHANNELS;
use crate::convert::{copy_with_gain, float_to_s16, s16_to_float};
use crate::error::PipelineError;
use crate::filters::FilterChain;
use crate::resample::{Resampler, ResamplerRegistry};
use crate::sink::AudioSink;

/// One block of interleaved stereo input, in either supported sample format.
#[derive(Debug, Clone, Copy)]
pub enum AudioBlock<'a> {
    S16(&'a [i16]),
    F32(&'a [f32]),
}

impl AudioBlock<'_> {
    /// Whole frames in the block; a trailing half frame is ignored.
    pub fn frames(&self) -> usize {
        let samples = match self {
            Self::S16(pcm) => pcm.len(),
            Self::F32(pcm) => pcm.len(),
        };
        samples / CHANNELS
    }
}

/// Driver lifecycle. Transitions are explicit; there are no implicit
/// restarts or reconfigurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Uninitialized,
    Configured,
    Running,
}

/// Owns the full processing path and drives blocks through it.
pub struct AudioPipeline {
    registry: ResamplerRegistry,
    state: PipelineState,
    resampler: Option<Resampler>,
    chain: Option<FilterChain>,
    sink: Option<Box<dyn AudioSink>>,
    source_rate: u32,
    target_rate: u32,
    /// `target_rate / source_rate`, fixed at configure time.
    base_ratio: f64,
    speed: f64,
    drift_adjust: f64,
    /// Effective ratio applied on the next submit.
    current_ratio: f64,
    volume: f32,
    muted: bool,
    paused: bool,
    rate_control_delta: f64,
    float_buf: Vec<f32>,
    resampled: Vec<f32>,
    s16_buf: Vec<i16>,
}

impl AudioPipeline {
    /// A driver with the three built-in resampler qualities registered.
    pub fn new() -> Self {
        Self::with_registry(ResamplerRegistry::default())
    }

    /// A driver over a caller-assembled registry. The registry is immutable
    /// once handed over.
    pub fn with_registry(registry: ResamplerRegistry) -> Self {
        Self {
            registry,
            state: PipelineState::Uninitialized,
            resampler: None,
            chain: None,
            sink: None,
            source_rate: 0,
            target_rate: 0,
            base_ratio: 1.0,
            speed: 1.0,
            drift_adjust: 1.0,
            current_ratio: 1.0,
            volume: 1.0,
            muted: false,
            paused: false,
            rate_control_delta: 0.0,
            float_buf: Vec::new(),
            resampled: Vec::new(),
            s16_buf: Vec::new(),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Build the filter chain and resampler from `config` and take ownership
    /// of `sink`. Only valid from `Uninitialized`; on any construction error
    /// the driver is left untouched.
    pub fn configure(
        &mut self,
        config: &PipelineConfig,
        sink: Box<dyn AudioSink>,
    ) -> Result<(), PipelineError> {
        if self.state != PipelineState::Uninitialized {
            return Err(PipelineError::AlreadyConfigured);
        }
        if config.source_rate == 0 || config.target_rate == 0 {
            return Err(PipelineError::InvalidRate {
                source_rate: config.source_rate,
                target_rate: config.target_rate,
            });
        }

        // Build both stages before committing any state.
        let chain = FilterChain::from_config(&config.effects, config.source_rate)?;
        let ratio = config.target_rate as f64 / config.source_rate as f64;
        let resampler = self.registry.create(config.quality, ratio)?;

        let effect_count = chain.len();
        self.chain = Some(chain);
        self.resampler = Some(resampler);
        self.sink = Some(sink);
        self.source_rate = config.source_rate;
        self.target_rate = config.target_rate;
        self.base_ratio = ratio;
        self.speed = 1.0;
        self.drift_adjust = 1.0;
        self.current_ratio = ratio;
        self.volume = config.volume.max(0.0);
        self.rate_control_delta = config.rate_control_delta.max(0.0);
        self.muted = false;
        self.paused = false;
        self.state = PipelineState::Configured;

        info!(
            "pipeline configured: {} Hz -> {} Hz ('{}' resampler, ratio {:.6}), {} effect(s)",
            config.source_rate,
            config.target_rate,
            config.quality.as_str(),
            ratio,
            effect_count
        );
        Ok(())
    }

    /// Enter `Running`. Starting an already running driver is a no-op.
    pub fn start(&mut self) -> Result<(), PipelineError> {
        match self.state {
            PipelineState::Uninitialized => Err(PipelineError::NotConfigured),
            PipelineState::Running => Ok(()),
            PipelineState::Configured => {
                self.state = PipelineState::Running;
                info!("pipeline started");
                Ok(())
            }
        }
    }

    /// Leave `Running` and rewind all carried DSP state, so the next start
    /// begins from silence.
    pub fn stop(&mut self) -> Result<(), PipelineError> {
        if self.state == PipelineState::Uninitialized {
            return Err(PipelineError::NotConfigured);
        }
        if let Some(resampler) = self.resampler.as_mut() {
            resampler.reset();
        }
        if let Some(chain) = self.chain.as_mut() {
            chain.reset();
        }
        self.drift_adjust = 1.0;
        self.current_ratio = self.base_ratio * self.speed;
        self.state = PipelineState::Configured;
        debug!("pipeline stopped");
        Ok(())
    }

    /// Drop every processing context and return to `Uninitialized`. Valid
    /// from any state.
    pub fn teardown(&mut self) {
        self.resampler = None;
        self.chain = None;
        self.sink = None;
        self.float_buf = Vec::new();
        self.resampled = Vec::new();
        self.s16_buf = Vec::new();
        self.source_rate = 0;
        self.target_rate = 0;
        self.base_ratio = 1.0;
        self.speed = 1.0;
        self.drift_adjust = 1.0;
        self.current_ratio = 1.0;
        self.volume = 1.0;
        self.muted = false;
        self.paused = false;
        self.rate_control_delta = 0.0;
        self.state = PipelineState::Uninitialized;
        info!("pipeline torn down");
    }

    /// Push one block through convert → chain → resample → sink.
    ///
    /// Returns the number of frames delivered to the sink. While muted or
    /// paused the block is accepted and dropped.
    pub fn submit(&mut self, input: AudioBlock<'_>) -> Result<usize, PipelineError> {
        if self.state != PipelineState::Running {
            return Err(PipelineError::NotRunning);
        }
        if self.muted || self.paused {
            return Ok(0);
        }
        let frames = input.frames();
        if frames == 0 {
            return Ok(0);
        }
        let samples = frames * CHANNELS;

        self.float_buf.resize(samples, 0.0);
        match input {
            AudioBlock::S16(pcm) => {
                s16_to_float(&mut self.float_buf, &pcm[..samples], self.volume);
            }
            AudioBlock::F32(pcm) => {
                copy_with_gain(&mut self.float_buf, &pcm[..samples], self.volume);
            }
        }

        if let Some(chain) = self.chain.as_mut() {
            chain.process(&mut self.float_buf);
        }

        let resampler = self.resampler.as_mut().ok_or(PipelineError::NotRunning)?;
        resampler.set_ratio(self.current_ratio)?;
        let capacity = resampler.max_output_frames(frames) * CHANNELS;
        self.resampled.resize(capacity, 0.0);
        let written = resampler.process(&self.float_buf, &mut self.resampled);
        let out = &self.resampled[..written * CHANNELS];

        let sink = self.sink.as_mut().ok_or(PipelineError::NotRunning)?;
        let result = if sink.prefers_float() {
            sink.write_float(out)
        } else {
            self.s16_buf.resize(out.len(), 0);
            float_to_s16(&mut self.s16_buf, out);
            sink.write_s16(&self.s16_buf)
        };
        if let Err(e) = result {
            warn!("sink write failed: {e}");
            return Err(e.into());
        }
        Ok(written)
    }

    /// Nudge the effective ratio from sink buffer occupancy, keeping the
    /// device fed without audible pitch steps.
    ///
    /// `writable_frames` is how many frames the sink buffer can still
    /// accept; a half-full buffer leaves the ratio at its base value.
    /// Returns the ratio the next submit will use. A zero `buffer_capacity`
    /// leaves the ratio unchanged.
    pub fn rate_control(&mut self, writable_frames: usize, buffer_capacity: usize) -> f64 {
        if buffer_capacity == 0 {
            return self.current_ratio;
        }
        let half = buffer_capacity as f64 / 2.0;
        let direction = ((writable_frames as f64 - half) / half).clamp(-1.0, 1.0);
        self.drift_adjust = 1.0 + self.rate_control_delta * direction;
        self.current_ratio = self.base_ratio * self.speed * self.drift_adjust;
        self.current_ratio
    }

    /// Scale the effective ratio for slow motion (`> 1.0`) or fast forward
    /// (`< 1.0`) without touching resampler state.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), PipelineError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(PipelineError::InvalidSpeed(speed));
        }
        self.speed = speed;
        self.current_ratio = self.base_ratio * self.speed * self.drift_adjust;
        Ok(())
    }

    /// Directly override the ratio the next submit will use. External rate
    /// control loops can drive this instead of [`AudioPipeline::rate_control`].
    pub fn set_ratio(&mut self, ratio: f64) -> Result<(), PipelineError> {
        if self.state == PipelineState::Uninitialized {
            return Err(PipelineError::NotConfigured);
        }
        self.current_ratio = crate::resample::validate_ratio(ratio)?;
        Ok(())
    }

    /// The ratio the next submit will apply.
    pub fn current_ratio(&self) -> f64 {
        self.current_ratio
    }

    /// Input gain applied during format conversion. Negative values and NaN
    /// clamp to silence.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.max(0.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// While muted, submit accepts and drops input.
    pub fn set_mute(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// While paused, submit accepts and drops input.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for AudioPipeline {
    fn default() -> Self {
        Self::new()
    }
}
