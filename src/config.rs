use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_RATE_CONTROL_DELTA, DEFAULT_VOLUME};
use crate::resample::ResamplerQuality;

/// Everything needed to configure an [`crate::pipeline::AudioPipeline`],
/// loadable from TOML files or JSON strings.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    pub source_rate: u32,
    pub target_rate: u32,
    #[serde(default)]
    pub quality: ResamplerQuality,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default = "default_rate_control_delta")]
    pub rate_control_delta: f64,
    // Keep this last: TOML wants plain values before arrays of tables.
    #[serde(default)]
    pub effects: Vec<EffectConfig>,
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

fn default_rate_control_delta() -> f64 {
    DEFAULT_RATE_CONTROL_DELTA
}

/// One entry of the effect chain. Unset parameters fall back to the
/// defaults in [`crate::constants`] when the chain is built.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EffectConfig {
    Echo(EchoConfig),
    Chorus(ChorusConfig),
    Phaser(PhaserConfig),
    Wahwah(WahwahConfig),
    Tremolo(TremoloConfig),
    Vibrato(VibratoConfig),
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct EchoConfig {
    /// Per-tap delays; pairs up with `feedback`, extra entries are dropped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amp: Option<f32>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChorusConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_ms: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfo_freq: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_wet: Option<f32>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PhaserConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfo_freq: Option<f32>,
    /// Degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfo_start_phase: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_wet: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WahwahConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfo_freq: Option<f32>,
    /// Degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfo_start_phase: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freq_offset: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resonance: Option<f32>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TremoloConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfo_freq: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f32>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct VibratoConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfo_freq: Option<f32>,
    /// Percentage of the base modulation span, 0 to 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f32>,
}

impl PipelineConfig {
    /// Read a TOML configuration file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let config_str = std::fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&config_str)?;
        Ok(config)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
