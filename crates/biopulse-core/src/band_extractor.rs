//! Band Extractor — High-pass / low-pass cascade
//!
//! Cascades a single-pole high-pass with a 2-pole Butterworth low-pass to
//! isolate one frequency band of a sampled biosignal. The ECG beat
//! detector runs this at 1–20 Hz; the same block extracts any other
//! band-limited channel, e.g. an 8–12 Hz alpha band from an EEG lead.
//!
//! ## Example
//!
//! ```rust
//! use biopulse_core::band_extractor::BandExtractor;
//!
//! // ECG conditioning band at 100 Hz
//! let mut band = BandExtractor::new(100.0, 1.0, 20.0).unwrap();
//! // A held constant has no in-band energy
//! let out = band.process(&vec![512.0; 1500]);
//! assert!(out[1499].abs() < 1e-6);
//! ```

use crate::butterworth::ButterworthLowPass;
use crate::high_pass::HighPassFilter;
use crate::types::{DspResult, Sample};

/// Band-pass conditioning stage: high-pass followed by low-pass.
///
/// Owns both filter sections by value; one instance per channel.
#[derive(Debug, Clone)]
pub struct BandExtractor {
    high_pass: HighPassFilter,
    low_pass: ButterworthLowPass,
}

impl BandExtractor {
    /// Create a band extractor.
    ///
    /// `high_cutoff_hz` is the high-pass corner (lower band edge),
    /// `low_cutoff_hz` the low-pass corner (upper band edge). Each corner
    /// is validated against the Nyquist band independently.
    pub fn new(sample_rate_hz: f64, high_cutoff_hz: f64, low_cutoff_hz: f64) -> DspResult<Self> {
        Ok(Self {
            high_pass: HighPassFilter::new(sample_rate_hz, high_cutoff_hz)?,
            low_pass: ButterworthLowPass::new(sample_rate_hz, low_cutoff_hz)?,
        })
    }

    /// Run one raw sample through both sections; returns the bandpass value.
    #[inline]
    pub fn process_sample(&mut self, x: Sample) -> Sample {
        let hp = self.high_pass.process_sample(x);
        self.low_pass.process_sample(hp)
    }

    /// Process a block of samples.
    pub fn process(&mut self, input: &[Sample]) -> Vec<Sample> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Last bandpass output.
    pub fn value(&self) -> Sample {
        self.low_pass.value()
    }

    /// Reset both sections to the zero initial state.
    pub fn reset(&mut self) {
        self.high_pass.reset();
        self.low_pass.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dc_rejected_by_cascade() {
        let mut band = BandExtractor::new(100.0, 1.0, 20.0).unwrap();
        let out = band.process(&vec![700.0; 2000]);
        assert!(out[1999].abs() < 1e-9, "got {}", out[1999]);
    }

    #[test]
    fn test_in_band_tone_survives() {
        // A 10 Hz tone sits inside the 1-20 Hz band and should keep most
        // of its amplitude after the startup transient.
        let fs = 100.0;
        let mut band = BandExtractor::new(fs, 1.0, 20.0).unwrap();
        let input: Vec<f64> = (0..1000)
            .map(|i| (2.0 * std::f64::consts::PI * 10.0 * i as f64 / fs).sin())
            .collect();
        let out = band.process(&input);
        let tail_peak = out[500..].iter().cloned().fold(f64::MIN, f64::max);
        assert!(tail_peak > 0.5, "in-band tone attenuated to {tail_peak}");
    }

    #[test]
    fn test_either_bad_corner_rejected() {
        assert!(BandExtractor::new(100.0, 0.0, 20.0).is_err());
        assert!(BandExtractor::new(100.0, 1.0, 55.0).is_err());
        assert!(BandExtractor::new(-5.0, 1.0, 20.0).is_err());
    }

    #[test]
    fn test_alpha_band_construction() {
        // EEG alpha extraction reuses the same cascade at 8-12 Hz
        assert!(BandExtractor::new(100.0, 8.0, 12.0).is_ok());
    }

    #[test]
    fn test_reset_matches_fresh() {
        let mut band = BandExtractor::new(100.0, 1.0, 20.0).unwrap();
        band.process(&[100.0, -40.0, 33.0]);
        band.reset();
        let mut fresh = BandExtractor::new(100.0, 1.0, 20.0).unwrap();
        let input = [5.0, 6.0, 7.0];
        assert_eq!(band.process(&input), fresh.process(&input));
    }
}
