//! # Biopulse Core DSP Library
//!
//! Streaming signal-conditioning and beat-detection blocks for
//! periodically sampled biosignals (ECG first, any band-limited channel
//! generally). The crate turns one raw integer sample per tick into a
//! cleaned bandpass value, a per-tick beat decision, and refractory-gated
//! instantaneous heart rate.
//!
//! ## Signal Flow
//!
//! ```text
//! raw sample
//!   → high-pass (baseline removal)
//!   → 2-pole low-pass (noise removal)        } band-pass cascade
//!   → derivative → squared power
//!   → smoothing window (mean, 8 ticks)
//!   → decimated trend window (32 slots, every 8th tick)
//!   → dual threshold: smoothed > trend.max/2 AND smoothed > trend.mean·2
//!   → refractory gate (0.4 s) → BeatEvent { bpm = 60·fs / interval }
//! ```
//!
//! Every block is independently usable, runs one sample at a time with no
//! allocation after construction, and is owned by value: one pipeline per
//! channel, no shared state, safe to move across threads.
//!
//! ## Example
//!
//! ```rust
//! use biopulse_core::{ChannelConfig, ChannelPipeline};
//!
//! let mut pipeline = ChannelPipeline::new(&ChannelConfig::ecg(100.0)).unwrap();
//!
//! // Synthetic 75 BPM pulse train at 100 Hz
//! let mut rates = Vec::new();
//! for i in 0..2000u64 {
//!     let raw = if i % 80 < 3 { 900.0 } else { 500.0 };
//!     if let Some(beat) = pipeline.process_sample(raw).beat {
//!         rates.push(beat.bpm);
//!     }
//! }
//! // Steady lock after the startup transient (first rates are unreliable)
//! assert!((rates.last().unwrap() - 75.0).abs() < 1e-9);
//! ```

pub mod acquisition;
pub mod band_extractor;
pub mod beat_detector;
pub mod butterworth;
pub mod heart_rate;
pub mod high_pass;
pub mod observe;
pub mod pipeline;
pub mod rolling_stats;
pub mod telemetry;
pub mod types;

pub use acquisition::{SampleSource, SyntheticEcg};
pub use band_extractor::BandExtractor;
pub use beat_detector::{BeatDetector, BeatDetectorConfig, Detection};
pub use butterworth::ButterworthLowPass;
pub use heart_rate::{BeatEvent, BeatPhase, HeartRateMonitor};
pub use high_pass::HighPassFilter;
pub use pipeline::{ChannelConfig, ChannelPipeline, TickOutput};
pub use telemetry::{StreamInfo, StreamOutlet, VecOutlet};
pub use types::{DspError, DspResult, Sample, Tick};
