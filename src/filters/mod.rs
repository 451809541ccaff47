pub mod biquad;
pub mod chorus;
pub mod echo;
pub mod phaser;
pub mod tremolo;
pub mod vibrato;
pub mod wahwah;

use tracing::debug;

use crate::config::EffectConfig;
use crate::constants::*;
use crate::error::FilterError;

/// Trait for audio effects that process interleaved stereo f32 frames.
/// Buffer layout: [L, R, L, R, ...], normalized to [-1, 1].
pub trait AudioFilter: Send {
    /// Process samples in-place.
    fn process(&mut self, samples: &mut [f32]);
    /// Reset delay lines and oscillator state.
    fn reset(&mut self);
}

/// NaN and infinity gate for parameters that are clamped rather than
/// range-checked. `clamp` would pass NaN straight through.
pub(crate) fn require_finite(name: &'static str, value: f32) -> Result<f32, FilterError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FilterError::InvalidParameter {
            name,
            expected: "finite",
            value,
        })
    }
}

pub(crate) fn require_positive(name: &'static str, value: f32) -> Result<f32, FilterError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(FilterError::InvalidParameter {
            name,
            expected: "positive and finite",
            value,
        })
    }
}

/// An ordered chain of audio effects, constructed from an effect list.
///
/// Effects run strictly in list order, each seeing the previous effect's
/// output, and always at the source sample rate (the chain sits before the
/// resampler).
pub struct FilterChain {
    filters: Vec<Box<dyn AudioFilter>>,
}

impl FilterChain {
    /// Build a chain from configuration. Missing parameters take the
    /// defaults from [`crate::constants`]; any invalid parameter aborts the
    /// whole chain.
    pub fn from_config(effects: &[EffectConfig], sample_rate: u32) -> Result<Self, FilterError> {
        let mut filters: Vec<Box<dyn AudioFilter>> = Vec::with_capacity(effects.len());

        for effect in effects {
            let filter: Box<dyn AudioFilter> = match effect {
                EffectConfig::Echo(e) => Box::new(echo::EchoFilter::new(
                    e.delay_ms.as_deref().unwrap_or(&[DEFAULT_ECHO_DELAY_MS]),
                    e.feedback.as_deref().unwrap_or(&[DEFAULT_ECHO_FEEDBACK]),
                    e.amp.unwrap_or(DEFAULT_ECHO_AMP),
                    sample_rate,
                )?),
                EffectConfig::Chorus(c) => Box::new(chorus::ChorusFilter::new(
                    c.delay_ms.unwrap_or(DEFAULT_CHORUS_DELAY_MS),
                    c.depth_ms.unwrap_or(DEFAULT_CHORUS_DEPTH_MS),
                    c.lfo_freq.unwrap_or(DEFAULT_CHORUS_LFO_FREQ),
                    c.dry_wet.unwrap_or(DEFAULT_CHORUS_DRY_WET),
                    sample_rate,
                )?),
                EffectConfig::Phaser(p) => Box::new(phaser::PhaserFilter::new(
                    p.lfo_freq.unwrap_or(DEFAULT_PHASER_LFO_FREQ),
                    p.lfo_start_phase.unwrap_or(DEFAULT_PHASER_LFO_START_PHASE),
                    p.feedback.unwrap_or(DEFAULT_PHASER_FEEDBACK),
                    p.depth.unwrap_or(DEFAULT_PHASER_DEPTH),
                    p.dry_wet.unwrap_or(DEFAULT_PHASER_DRY_WET),
                    p.stages.unwrap_or(DEFAULT_PHASER_STAGES),
                    sample_rate,
                )?),
                EffectConfig::Wahwah(w) => Box::new(wahwah::WahwahFilter::new(
                    w.lfo_freq.unwrap_or(DEFAULT_WAHWAH_LFO_FREQ),
                    w.lfo_start_phase.unwrap_or(DEFAULT_WAHWAH_LFO_START_PHASE),
                    w.freq_offset.unwrap_or(DEFAULT_WAHWAH_FREQ_OFFSET),
                    w.depth.unwrap_or(DEFAULT_WAHWAH_DEPTH),
                    w.resonance.unwrap_or(DEFAULT_WAHWAH_RESONANCE),
                    sample_rate,
                )?),
                EffectConfig::Tremolo(t) => Box::new(tremolo::TremoloFilter::new(
                    t.lfo_freq.unwrap_or(DEFAULT_TREMOLO_LFO_FREQ),
                    t.depth.unwrap_or(DEFAULT_TREMOLO_DEPTH),
                    sample_rate,
                )?),
                EffectConfig::Vibrato(v) => Box::new(vibrato::VibratoFilter::new(
                    v.lfo_freq.unwrap_or(DEFAULT_VIBRATO_LFO_FREQ),
                    v.depth.unwrap_or(DEFAULT_VIBRATO_DEPTH_PERCENT),
                    sample_rate,
                )?),
            };
            filters.push(filter);
        }

        debug!("built filter chain with {} effect(s)", filters.len());
        Ok(Self { filters })
    }

    /// Process audio through every effect, strictly in chain order.
    pub fn process(&mut self, samples: &mut [f32]) {
        for filter in self.filters.iter_mut() {
            filter.process(samples);
        }
    }

    /// Reset all effect states (delay lines, oscillators).
    pub fn reset(&mut self) {
        for filter in self.filters.iter_mut() {
            filter.reset();
        }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
