//! Central constants for the audio pipeline.
//!
//! All magic numbers in `src/**` live here so they can be tuned in one place
//! and remain consistent across modules.

// ── Sample / PCM ─────────────────────────────────────────────────────────────

/// Stereo channel count used throughout the pipeline.
pub const CHANNELS: usize = 2;

/// Scale factor between normalized float and 16-bit PCM.
pub const INT16_SCALE: f32 = 32_768.0;

pub const INT16_MAX_F: f32 = 32_767.0;
pub const INT16_MIN_F: f32 = -32_768.0;

// ── Resampler ────────────────────────────────────────────────────────────────

/// Base tap count of the windowed-sinc filter. Grows when downsampling to
/// keep the same stopband attenuation.
pub const SINC_TAPS: usize = 16;

/// Number of precomputed polyphase sub-filters; the fractional phase is
/// quantized to one of these.
pub const SINC_PHASES: usize = 256;

/// Normalized cutoff of the sinc kernel, leaving headroom below Nyquist.
pub const SINC_CUTOFF: f64 = 0.825;

/// Extra frames added to `max_output_frames` so phase rounding can never
/// overrun a caller-sized buffer.
pub const OUTPUT_HEADROOM_FRAMES: usize = 2;

// ── Echo ─────────────────────────────────────────────────────────────────────

pub const DEFAULT_ECHO_DELAY_MS: f32 = 200.0;
pub const DEFAULT_ECHO_FEEDBACK: f32 = 0.5;
pub const DEFAULT_ECHO_AMP: f32 = 0.2;

// ── Chorus ───────────────────────────────────────────────────────────────────

/// Ring capacity of the chorus delay line, in frames.
pub const CHORUS_MAX_DELAY_FRAMES: usize = 4096;

pub const DEFAULT_CHORUS_DELAY_MS: f32 = 25.0;
pub const DEFAULT_CHORUS_DEPTH_MS: f32 = 1.0;
pub const DEFAULT_CHORUS_LFO_FREQ: f32 = 0.5;
pub const DEFAULT_CHORUS_DRY_WET: f32 = 0.8;

// ── Phaser ───────────────────────────────────────────────────────────────────

/// The phaser samples its LFO once every this many frames, holding the
/// all-pass gain constant in between.
pub const PHASER_LFO_SKIP_SAMPLES: u64 = 20;

/// Exponent of the gain-shaping curve applied to the cosine LFO.
pub const PHASER_LFO_SHAPE: f64 = 4.0;

pub const PHASER_MIN_STAGES: u32 = 1;
pub const PHASER_MAX_STAGES: u32 = 24;

pub const DEFAULT_PHASER_LFO_FREQ: f32 = 0.4;
pub const DEFAULT_PHASER_LFO_START_PHASE: f32 = 0.0;
pub const DEFAULT_PHASER_FEEDBACK: f32 = 0.0;
pub const DEFAULT_PHASER_DEPTH: f32 = 0.4;
pub const DEFAULT_PHASER_DRY_WET: f32 = 0.5;
pub const DEFAULT_PHASER_STAGES: u32 = 2;

// ── Wah-wah ──────────────────────────────────────────────────────────────────

/// The wah-wah recomputes its band-pass coefficients once every this many
/// frames; coefficients hold constant in between.
pub const WAHWAH_LFO_SKIP_SAMPLES: u64 = 30;

/// Exponential warp applied to the LFO-swept center frequency so the sweep
/// covers the audible range perceptually evenly.
pub const WAHWAH_FREQ_WARP: f64 = 6.0;

pub const DEFAULT_WAHWAH_LFO_FREQ: f32 = 1.5;
pub const DEFAULT_WAHWAH_LFO_START_PHASE: f32 = 0.0;
pub const DEFAULT_WAHWAH_FREQ_OFFSET: f32 = 0.3;
pub const DEFAULT_WAHWAH_DEPTH: f32 = 0.7;
pub const DEFAULT_WAHWAH_RESONANCE: f32 = 2.5;

// ── Tremolo ──────────────────────────────────────────────────────────────────

pub const DEFAULT_TREMOLO_LFO_FREQ: f32 = 4.0;
pub const DEFAULT_TREMOLO_DEPTH: f32 = 0.9;

// ── Vibrato ──────────────────────────────────────────────────────────────────

/// Base modulation span of the vibrato delay line (seconds).
pub const VIBRATO_BASE_DELAY_SEC: f64 = 0.002;

/// Fixed delay added on top of the modulated read position so the 4-point
/// interpolation window never reaches past the newest sample.
pub const VIBRATO_ADD_DELAY_FRAMES: usize = 3;

pub const DEFAULT_VIBRATO_LFO_FREQ: f32 = 5.0;
pub const DEFAULT_VIBRATO_DEPTH_PERCENT: f32 = 50.0;

// ── Pipeline ─────────────────────────────────────────────────────────────────

pub const DEFAULT_VOLUME: f32 = 1.0;

/// Strength of buffer-occupancy drift correction: a half-empty deviation of
/// the sink buffer skews the resampling ratio by at most this fraction.
pub const DEFAULT_RATE_CONTROL_DELTA: f64 = 0.005;
