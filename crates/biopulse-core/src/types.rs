//! Core types for the biosignal processing pipeline
//!
//! Defines the numeric domain used by every block, the tick counter type,
//! and the error taxonomy for construction-time precondition violations.
//!
//! The pipeline runs entirely in `f64`. The legacy implementation this
//! crate descends from ran its recursive filters over machine integers and
//! truncated on every division; that behavior is deliberately not kept.
//! See `DESIGN.md` for the rationale.

use thiserror::Error;

/// A floating point sample (for real-valued signals).
pub type Sample = f64;

/// Monotonic sample-tick counter. One tick per delivered raw sample.
///
/// Tick numbering starts at 1: the first sample fed to a pipeline is
/// processed at tick 1, so an interval measured against the tick-0 origin
/// is always at least one tick wide.
pub type Tick = u64;

/// Result type for DSP block construction and acquisition.
pub type DspResult<T> = Result<T, DspError>;

/// Errors raised when a block is constructed with degenerate parameters.
///
/// All of these are fail-fast construction errors. Once a block exists,
/// its per-sample math is defined for every finite input and cannot fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    #[error("Invalid sample rate: {0} Hz. Must be finite and > 0")]
    InvalidSampleRate(f64),

    #[error("Cutoff {cutoff_hz} Hz not inside (0, {nyquist_hz}) Hz Nyquist band")]
    CutoffOutsideNyquist { cutoff_hz: f64, nyquist_hz: f64 },

    #[error("Rolling window capacity must be at least 1")]
    ZeroCapacityWindow,

    #[error("Decimation factor must be at least 1")]
    ZeroDecimation,

    #[error("Refractory period must be at least 1 tick")]
    ZeroRefractory,

    #[error("Invalid channel configuration: {0}")]
    InvalidConfig(String),

    #[error("Acquisition source exhausted after {0} samples")]
    SourceExhausted(u64),
}

/// Validate a sampling rate / cutoff pair shared by every filter design.
///
/// Rejects non-positive or non-finite rates and any cutoff at or above
/// the Nyquist frequency, so coefficient derivation can never produce
/// NaN or a non-causal design.
pub(crate) fn check_band(sample_rate_hz: f64, cutoff_hz: f64) -> DspResult<()> {
    if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
        return Err(DspError::InvalidSampleRate(sample_rate_hz));
    }
    let nyquist_hz = sample_rate_hz / 2.0;
    if !cutoff_hz.is_finite() || cutoff_hz <= 0.0 || cutoff_hz >= nyquist_hz {
        return Err(DspError::CutoffOutsideNyquist {
            cutoff_hz,
            nyquist_hz,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_band_accepts_normal_ecg_band() {
        assert!(check_band(100.0, 1.0).is_ok());
        assert!(check_band(100.0, 20.0).is_ok());
        assert!(check_band(100.0, 49.9).is_ok());
    }

    #[test]
    fn test_check_band_rejects_bad_rate() {
        assert_eq!(
            check_band(0.0, 1.0),
            Err(DspError::InvalidSampleRate(0.0))
        );
        assert_eq!(
            check_band(-100.0, 1.0),
            Err(DspError::InvalidSampleRate(-100.0))
        );
        assert!(check_band(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_check_band_rejects_nyquist_violation() {
        assert_eq!(
            check_band(100.0, 50.0),
            Err(DspError::CutoffOutsideNyquist {
                cutoff_hz: 50.0,
                nyquist_hz: 50.0
            })
        );
        assert!(check_band(100.0, 75.0).is_err());
        assert!(check_band(100.0, 0.0).is_err());
        assert!(check_band(100.0, -5.0).is_err());
    }

    #[test]
    fn test_error_display() {
        let e = DspError::CutoffOutsideNyquist {
            cutoff_hz: 60.0,
            nyquist_hz: 50.0,
        };
        assert!(e.to_string().contains("60"));
        assert!(e.to_string().contains("50"));
    }
}
