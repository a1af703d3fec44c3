//! Telemetry boundary — Outbound stream sinks
//!
//! The pipeline emits one heart-rate value per accepted beat and one
//! conditioned or raw sample per tick for channels configured to stream
//! signal. Where those floats go (LSL, a socket, a file) is the
//! collaborator's business; this module defines only the contract and an
//! in-memory sink used by tests and the bridge's CSV path.
//!
//! ## Example
//!
//! ```rust
//! use biopulse_core::telemetry::{StreamInfo, StreamOutlet, VecOutlet};
//!
//! let mut outlet = VecOutlet::new(StreamInfo::new("echopink", "heartrate", 100.0));
//! outlet.push_sample(72.5);
//! assert_eq!(outlet.samples(), &[72.5]);
//! ```

use serde::{Deserialize, Serialize};

/// Identity of one logical outbound stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Stream name visible to consumers.
    pub name: String,
    /// Content kind, e.g. `"heartrate"` or `"rawECG"`.
    pub kind: String,
    /// Nominal rate in Hz (the tick rate for per-tick streams; beats are
    /// irregular but declared at the tick rate, matching the legacy
    /// stream metadata).
    pub rate_hz: f64,
}

impl StreamInfo {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, rate_hz: f64) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            rate_hz,
        }
    }
}

/// Accepts one floating-point value per call for one logical stream.
pub trait StreamOutlet {
    /// Stream identity.
    fn info(&self) -> &StreamInfo;

    /// Push one sample to the stream.
    fn push_sample(&mut self, value: f32);
}

/// In-memory outlet that records every pushed sample.
#[derive(Debug, Clone)]
pub struct VecOutlet {
    info: StreamInfo,
    samples: Vec<f32>,
}

impl VecOutlet {
    pub fn new(info: StreamInfo) -> Self {
        Self {
            info,
            samples: Vec::new(),
        }
    }

    /// Everything pushed so far, in order.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

impl StreamOutlet for VecOutlet {
    fn info(&self) -> &StreamInfo {
        &self.info
    }

    fn push_sample(&mut self, value: f32) {
        self.samples.push(value);
    }
}
