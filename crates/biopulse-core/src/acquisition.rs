//! Acquisition boundary — Sample sources
//!
//! The pipeline consumes one raw integer sample per channel per tick from
//! an acquisition collaborator running at a fixed rate. Ticks are assumed
//! to arrive strictly in order with no gaps; nothing here detects or
//! compensates for dropped samples. Real device I/O (serial, Bluetooth)
//! lives outside this crate behind [`SampleSource`].
//!
//! [`SyntheticEcg`] stands in for hardware: a deterministic pulse train
//! with optional pseudo-random jitter, good enough to exercise the whole
//! detection chain in tests and demos.
//!
//! ## Example
//!
//! ```rust
//! use biopulse_core::acquisition::{SampleSource, SyntheticEcg};
//!
//! let mut ecg = SyntheticEcg::new(80, 500, 400);
//! let first: Vec<i32> = (0..4).map(|_| ecg.read_sample().unwrap()).collect();
//! // Pulse at the start of each period, 3 ticks wide
//! assert_eq!(first, vec![900, 900, 900, 500]);
//! ```

use crate::types::{DspError, DspResult};

/// One raw integer sample per call, delivered at a fixed tick rate.
///
/// The blocking "wait for next sample" of a real device belongs inside
/// `read_sample`; the pipeline itself never blocks.
pub trait SampleSource {
    /// Read the next raw sample, in tick order.
    fn read_sample(&mut self) -> DspResult<i32>;
}

/// Deterministic synthetic ECG: a sharp power spike every `period` ticks
/// over a quiescent baseline, with optional small LCG noise.
#[derive(Debug, Clone)]
pub struct SyntheticEcg {
    /// Ticks between pulse onsets.
    period: u64,
    /// Quiescent baseline level.
    baseline: i32,
    /// Pulse amplitude above baseline.
    amplitude: i32,
    /// Width of each pulse in ticks.
    pulse_width: u64,
    /// Peak-to-peak noise amplitude (0 disables).
    noise: i32,
    /// Total ticks to deliver before reporting exhaustion (None = endless).
    limit: Option<u64>,
    tick: u64,
    rng_state: u64,
}

impl SyntheticEcg {
    /// Create a noiseless pulse train (3-tick pulses).
    pub fn new(period: u64, baseline: i32, amplitude: i32) -> Self {
        Self {
            period: period.max(1),
            baseline,
            amplitude,
            pulse_width: 3,
            noise: 0,
            limit: None,
            tick: 0,
            rng_state: 0x2545_f491_4f6c_dd1d,
        }
    }

    /// Add deterministic pseudo-random noise of the given peak amplitude.
    pub fn with_noise(mut self, noise: i32) -> Self {
        self.noise = noise.max(0);
        self
    }

    /// Set the pulse width in ticks.
    pub fn with_pulse_width(mut self, width: u64) -> Self {
        self.pulse_width = width.max(1);
        self
    }

    /// Stop after `ticks` samples; further reads report exhaustion, like
    /// a device that has disconnected.
    pub fn with_limit(mut self, ticks: u64) -> Self {
        self.limit = Some(ticks);
        self
    }

    /// Ticks generated so far.
    pub fn ticks_generated(&self) -> u64 {
        self.tick
    }

    /// xorshift step for the noise generator.
    fn next_noise(&mut self) -> i32 {
        if self.noise == 0 {
            return 0;
        }
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;
        ((x % (2 * self.noise as u64 + 1)) as i32) - self.noise
    }
}

impl SampleSource for SyntheticEcg {
    fn read_sample(&mut self) -> DspResult<i32> {
        if let Some(limit) = self.limit {
            if self.tick >= limit {
                return Err(DspError::SourceExhausted(self.tick));
            }
        }
        let phase = self.tick % self.period;
        self.tick += 1;
        let pulse = if phase < self.pulse_width {
            self.amplitude
        } else {
            0
        };
        Ok(self.baseline + pulse + self.next_noise())
    }
}
