//! Rolling Statistics — Fixed-capacity window with running mean and max
//!
//! Circular buffer over the last `N` pushed values exposing the running
//! mean (O(1) via a maintained sum) and the maximum of the current
//! contents. Used twice per detector: a short smoothing window over the
//! instantaneous signal power and a longer decimated trend window that
//! serves as the adaptive baseline for beat thresholding.
//!
//! Any capacity ≥ 1 is supported; wraparound uses a modulo index rather
//! than a power-of-two mask.
//!
//! A partially filled window is valid: statistics are computed over
//! however many values have been pushed so far, and an empty window
//! reports `0.0` for both mean and max rather than erroring.
//!
//! ## Example
//!
//! ```rust
//! use biopulse_core::rolling_stats::RollingStats;
//!
//! let mut win = RollingStats::new(3).unwrap();
//! win.push(1.0);
//! win.push(2.0);
//! assert_eq!(win.mean(), 1.5);
//! win.push(3.0);
//! win.push(10.0); // evicts 1.0
//! assert_eq!(win.max(), 10.0);
//! assert_eq!(win.mean(), 5.0);
//! ```

use crate::types::{DspError, DspResult, Sample};

/// Fixed-capacity rolling window with mean and max over its contents.
#[derive(Debug, Clone)]
pub struct RollingStats {
    /// Backing storage; only `len` slots hold pushed values.
    buffer: Vec<Sample>,
    /// Next slot to overwrite once full.
    write_idx: usize,
    /// Number of values currently held (≤ capacity).
    len: usize,
    /// Running sum of held values.
    sum: Sample,
}

impl RollingStats {
    /// Create a window holding up to `capacity` values.
    pub fn new(capacity: usize) -> DspResult<Self> {
        if capacity == 0 {
            return Err(DspError::ZeroCapacityWindow);
        }
        Ok(Self {
            buffer: vec![0.0; capacity],
            write_idx: 0,
            len: 0,
            sum: 0.0,
        })
    }

    /// Push a value, evicting the oldest when at capacity. O(1).
    pub fn push(&mut self, value: Sample) {
        self.sum -= self.buffer[self.write_idx];
        self.buffer[self.write_idx] = value;
        self.sum += value;
        self.write_idx = (self.write_idx + 1) % self.buffer.len();
        if self.len < self.buffer.len() {
            self.len += 1;
        }
    }

    /// Arithmetic mean of the held values; `0.0` when empty.
    pub fn mean(&self) -> Sample {
        if self.len == 0 {
            return 0.0;
        }
        self.sum / self.len as Sample
    }

    /// Maximum held value; `0.0` when empty.
    pub fn max(&self) -> Sample {
        if self.len == 0 {
            return 0.0;
        }
        self.buffer[..self.len]
            .iter()
            .cloned()
            .fold(Sample::NEG_INFINITY, Sample::max)
    }

    /// Number of values currently held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no values have been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Logical capacity `N`.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the window has filled once.
    pub fn is_full(&self) -> bool {
        self.len == self.buffer.len()
    }

    /// Contents in arrival order, oldest first.
    pub fn contents(&self) -> Vec<Sample> {
        let cap = self.buffer.len();
        let start = if self.len < cap { 0 } else { self.write_idx };
        (0..self.len)
            .map(|i| self.buffer[(start + i) % cap])
            .collect()
    }

    /// Clear the window.
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_idx = 0;
        self.len = 0;
        self.sum = 0.0;
    }
}
