//! Butterworth Low-Pass Filter — 2-pole recursive band conditioning
//!
//! Second-order recursive low-pass section designed with a bilinear-style
//! transform, matching the analog Butterworth prototype (`√2` damping).
//! Cascaded after [`HighPassFilter`](crate::high_pass::HighPassFilter) it
//! completes the band-pass stage that isolates QRS energy from a raw ECG.
//!
//! Design: let `k = 2·fs / (2π·fc)`, then
//!
//! ```text
//! a = k² + k·√2 + 1
//! b = 2 − 2k²
//! c = k² − k·√2 + 1
//! y[n] = (x[n] + 2·x[n-1] + x[n-2] − b·y[n-1] − c·y[n-2]) / a
//! ```
//!
//! Unity DC gain holds exactly: `a + b + c = 4` for every design, so a
//! held constant `v` converges to `v`.
//!
//! Being a true Butterworth section the poles are complex (damping
//! `1/√2`), so the step response rings slightly before settling — about
//! 7% peak overshoot at `fc/fs = 0.2`. The legacy design this reproduces
//! behaves identically.
//!
//! ## Example
//!
//! ```rust
//! use biopulse_core::butterworth::ButterworthLowPass;
//!
//! let mut lp = ButterworthLowPass::new(100.0, 20.0).unwrap();
//! let out = lp.process(&vec![1.0; 300]);
//! // Converges to the held value
//! assert!((out[299] - 1.0).abs() < 1e-9);
//! // Ringing stays bounded
//! assert!(out.iter().all(|&y| y < 1.08));
//! ```

use crate::types::{check_band, DspResult, Sample};
use std::f64::consts::{PI, SQRT_2};

/// Second-order Butterworth low-pass filter (direct form I).
#[derive(Debug, Clone)]
pub struct ButterworthLowPass {
    /// Denominator normalization `k² + k√2 + 1`.
    a: f64,
    /// Feedback coefficient `2 − 2k²`.
    b: f64,
    /// Feedback coefficient `k² − k√2 + 1`.
    c: f64,
    /// Output history, most recent first.
    y1: Sample,
    y2: Sample,
    /// Input history, most recent first.
    x1: Sample,
    x2: Sample,
}

impl ButterworthLowPass {
    /// Create a 2-pole low-pass for the given sampling rate and cutoff.
    ///
    /// Fails if the rate is not positive or the cutoff is outside the
    /// open Nyquist band `(0, fs/2)`.
    pub fn new(sample_rate_hz: f64, cutoff_hz: f64) -> DspResult<Self> {
        check_band(sample_rate_hz, cutoff_hz)?;
        let k = 2.0 * sample_rate_hz / (2.0 * PI * cutoff_hz);
        Ok(Self {
            a: k * k + k * SQRT_2 + 1.0,
            b: 2.0 - 2.0 * k * k,
            c: k * k - k * SQRT_2 + 1.0,
            y1: 0.0,
            y2: 0.0,
            x1: 0.0,
            x2: 0.0,
        })
    }

    /// Process a single sample.
    #[inline]
    pub fn process_sample(&mut self, x: Sample) -> Sample {
        let y = (x + 2.0 * self.x1 + self.x2 - self.b * self.y1 - self.c * self.y2) / self.a;
        self.y2 = self.y1;
        self.y1 = y;
        self.x2 = self.x1;
        self.x1 = x;
        y
    }

    /// Process a block of samples.
    pub fn process(&mut self, input: &[Sample]) -> Vec<Sample> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Last output sample.
    pub fn value(&self) -> Sample {
        self.y1
    }

    /// Filter coefficients `(a, b, c)`.
    pub fn coefficients(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    /// Reset history to the zero initial state.
    pub fn reset(&mut self) {
        self.y1 = 0.0;
        self.y2 = 0.0;
        self.x1 = 0.0;
        self.x2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DspError;

    #[test]
    fn test_unity_dc_gain_identity() {
        // a + b + c = 4 for every band, which makes the DC gain exactly 1
        for &fc in &[1.0, 5.0, 12.0, 20.0, 40.0] {
            let lp = ButterworthLowPass::new(100.0, fc).unwrap();
            let (a, b, c) = lp.coefficients();
            assert!((a + b + c - 4.0).abs() < 1e-9, "fc={fc}");
        }
    }

    #[test]
    fn test_constant_input_converges_to_value() {
        let mut lp = ButterworthLowPass::new(100.0, 20.0).unwrap();
        let out = lp.process(&vec![42.0; 400]);
        assert!((out[399] - 42.0).abs() < 1e-9, "got {}", out[399]);
    }

    #[test]
    fn test_step_response_settles_with_bounded_ringing() {
        // The complex-pole pair rings: peak ~7.4% above the target at
        // fc/fs = 0.2, then settles. Verify the bound and the settling.
        let mut lp = ButterworthLowPass::new(100.0, 20.0).unwrap();
        let out = lp.process(&vec![1.0; 300]);
        let peak = out.iter().cloned().fold(f64::MIN, f64::max);
        assert!(peak < 1.08, "overshoot too large: {peak}");
        assert!(peak > 1.0, "Butterworth step should ring slightly");
        for &y in &out[200..] {
            assert!((y - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_narrower_band_rings_less() {
        let mut lp = ButterworthLowPass::new(100.0, 5.0).unwrap();
        let out = lp.process(&vec![1.0; 800]);
        let peak = out.iter().cloned().fold(f64::MIN, f64::max);
        assert!(peak < 1.05, "fc=5 overshoot: {peak}");
        assert!((out[799] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_degenerate_construction() {
        assert!(matches!(
            ButterworthLowPass::new(-1.0, 20.0),
            Err(DspError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            ButterworthLowPass::new(100.0, 60.0),
            Err(DspError::CutoffOutsideNyquist { .. })
        ));
        assert!(ButterworthLowPass::new(100.0, 0.0).is_err());
    }

    #[test]
    fn test_reset_matches_fresh_instance() {
        let mut lp = ButterworthLowPass::new(100.0, 20.0).unwrap();
        lp.process(&[9.0, -3.0, 14.0, 2.0]);
        lp.reset();
        let mut fresh = ButterworthLowPass::new(100.0, 20.0).unwrap();
        let input = [1.0, 2.0, 3.0];
        assert_eq!(lp.process(&input), fresh.process(&input));
    }

    #[test]
    fn test_deterministic_replay() {
        let input: Vec<f64> = (0..500).map(|i| ((i as f64) * 0.21).cos() * 12.0).collect();
        let mut a = ButterworthLowPass::new(100.0, 20.0).unwrap();
        let mut b = ButterworthLowPass::new(100.0, 20.0).unwrap();
        assert_eq!(a.process(&input), b.process(&input));
    }
}
