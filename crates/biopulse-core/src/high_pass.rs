//! High-Pass Filter — Single-pole recursive baseline removal
//!
//! Removes baseline wander and DC offset from a sampled biosignal using a
//! first-order recursive high-pass section. Cascade with
//! [`ButterworthLowPass`](crate::butterworth::ButterworthLowPass) to form
//! the band-pass conditioning stage.
//!
//! Difference equation: `y[n] = α·y[n-1] + α·(x[n] - x[n-1])`
//! with `α = 1 / (1 + 2π·fc/fs)`.
//!
//! ## Example
//!
//! ```rust
//! use biopulse_core::high_pass::HighPassFilter;
//!
//! // 1 Hz cutoff at a 100 Hz ECG sampling rate
//! let mut hp = HighPassFilter::new(100.0, 1.0).unwrap();
//! // A constant input has no AC content: the output decays to zero
//! let out = hp.process(&vec![500.0; 1200]);
//! assert!(out[1199].abs() < 1e-9);
//! ```

use crate::types::{check_band, DspResult, Sample};
use std::f64::consts::PI;

/// Single-pole recursive high-pass filter.
#[derive(Debug, Clone)]
pub struct HighPassFilter {
    /// Pole coefficient, derived once at construction.
    alpha: f64,
    /// Previous output sample.
    prev_output: Sample,
    /// Previous input sample.
    prev_input: Sample,
}

impl HighPassFilter {
    /// Create a high-pass filter for the given sampling rate and cutoff.
    ///
    /// Fails if the rate is not positive or the cutoff is outside the
    /// open Nyquist band `(0, fs/2)`.
    pub fn new(sample_rate_hz: f64, cutoff_hz: f64) -> DspResult<Self> {
        check_band(sample_rate_hz, cutoff_hz)?;
        let alpha = 1.0 / (1.0 + 2.0 * PI * cutoff_hz / sample_rate_hz);
        Ok(Self {
            alpha,
            prev_output: 0.0,
            prev_input: 0.0,
        })
    }

    /// Process a single sample.
    #[inline]
    pub fn process_sample(&mut self, x: Sample) -> Sample {
        let y = self.alpha * self.prev_output + self.alpha * (x - self.prev_input);
        self.prev_output = y;
        self.prev_input = x;
        y
    }

    /// Process a block of samples.
    pub fn process(&mut self, input: &[Sample]) -> Vec<Sample> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Last output sample.
    pub fn value(&self) -> Sample {
        self.prev_output
    }

    /// Pole coefficient.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Reset history to the zero initial state.
    pub fn reset(&mut self) {
        self.prev_output = 0.0;
        self.prev_input = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DspError;

    #[test]
    fn test_constant_input_decays_to_zero() {
        let mut hp = HighPassFilter::new(100.0, 1.0).unwrap();
        let out = hp.process(&vec![500.0; 2000]);
        // DC is fully rejected well before the tail
        assert!(out[1000].abs() < 1e-9, "got {}", out[1000]);
        assert!(out[1999].abs() < 1e-12);
    }

    #[test]
    fn test_first_sample_passes_step_scaled_by_alpha() {
        let mut hp = HighPassFilter::new(100.0, 1.0).unwrap();
        let y = hp.process_sample(1.0);
        assert!((y - hp.alpha()).abs() < 1e-15);
    }

    #[test]
    fn test_alpha_in_unit_interval() {
        let hp = HighPassFilter::new(100.0, 1.0).unwrap();
        assert!(hp.alpha() > 0.0 && hp.alpha() < 1.0);
        // Lower cutoff -> alpha closer to 1 (wider passband)
        let hp_low = HighPassFilter::new(100.0, 0.1).unwrap();
        assert!(hp_low.alpha() > hp.alpha());
    }

    #[test]
    fn test_rejects_degenerate_construction() {
        assert!(matches!(
            HighPassFilter::new(0.0, 1.0),
            Err(DspError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            HighPassFilter::new(100.0, 50.0),
            Err(DspError::CutoffOutsideNyquist { .. })
        ));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut hp = HighPassFilter::new(100.0, 1.0).unwrap();
        hp.process(&[3.0, -2.0, 7.0]);
        hp.reset();
        assert_eq!(hp.value(), 0.0);
        let mut fresh = HighPassFilter::new(100.0, 1.0).unwrap();
        assert_eq!(hp.process_sample(1.5), fresh.process_sample(1.5));
    }

    #[test]
    fn test_deterministic_replay() {
        let input: Vec<f64> = (0..300).map(|i| ((i as f64) * 0.37).sin() * 40.0).collect();
        let mut a = HighPassFilter::new(100.0, 1.0).unwrap();
        let mut b = HighPassFilter::new(100.0, 1.0).unwrap();
        assert_eq!(a.process(&input), b.process(&input));
    }
}
