use std::f64::consts::PI;

/// One second-order IIR section with `a0` already divided out, so
/// [`BiquadState::process`] runs on five multiplies per sample.
#[derive(Clone)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

/// Direct Form I delay taps for a single channel. The wah-wah keeps one
/// per stereo side so its sweep never bleeds across channels.
#[derive(Clone, Default)]
pub struct BiquadState {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

impl BiquadCoeffs {
    /// Constant-skirt-gain band-pass, peak gain set by `q`.
    ///
    /// There is no in-place retune; the wah-wah builds a fresh set at
    /// every step of its warped sweep.
    pub fn bandpass(freq: f64, q: f64, sample_rate: f64) -> Self {
        let omega0 = 2.0 * PI * freq / sample_rate;
        let sin_omega0 = omega0.sin();
        let cos_omega0 = omega0.cos();
        let alpha = sin_omega0 / (2.0 * q);

        let a0 = 1.0 + alpha;
        Self {
            b0: alpha / a0,
            b1: 0.0,
            b2: -alpha / a0,
            a1: -2.0 * cos_omega0 / a0,
            a2: (1.0 - alpha) / a0,
        }
    }
}

impl BiquadState {
    /// Advance the section by one sample.
    ///
    /// A non-finite result flushes the taps and yields silence for that
    /// sample; the feedback path would hold a NaN forever otherwise.
    pub fn process(&mut self, input: f64, coeffs: &BiquadCoeffs) -> f64 {
        let output = coeffs.b0 * input + coeffs.b1 * self.x1 + coeffs.b2 * self.x2
            - coeffs.a1 * self.y1
            - coeffs.a2 * self.y2;

        if !output.is_finite() {
            self.x1 = 0.0;
            self.x2 = 0.0;
            self.y1 = 0.0;
            self.y2 = 0.0;
            return 0.0;
        }

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;
        output
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}
