//! Channel Pipeline — Per-tick orchestration of one physiological channel
//!
//! Wires the band-pass cascade, the beat detector, and the refractory
//! heart-rate state machine into a single per-sample-tick step function,
//! parameterized by a [`ChannelConfig`]. Each channel owns an independent
//! pipeline instance; instances share no state and may live on separate
//! threads.
//!
//! Signal flow per tick:
//!
//! ```text
//! raw → high-pass → low-pass → derivative → power² → smoothing mean
//!     → (decimated) trend window → dual threshold → beating
//!     → refractory gate → BeatEvent { bpm }
//! ```
//!
//! The whole step is synchronous, allocation-free after construction, and
//! never blocks; the pipeline can be dropped at any tick boundary with
//! nothing to flush.
//!
//! ## Example
//!
//! ```rust
//! use biopulse_core::pipeline::{ChannelConfig, ChannelPipeline};
//!
//! let config = ChannelConfig::ecg(100.0);
//! let mut pipeline = ChannelPipeline::new(&config).unwrap();
//! for i in 0..1000u64 {
//!     // Sharp spike every 80 ticks over a quiet baseline
//!     let raw = if i % 80 < 3 { 900.0 } else { 500.0 };
//!     if let Some(beat) = pipeline.process_sample(raw).beat {
//!         // First rate is measured against process start; discard it
//!         let _ = beat.bpm;
//!     }
//! }
//! ```

use crate::band_extractor::BandExtractor;
use crate::beat_detector::{BeatDetector, BeatDetectorConfig};
use crate::heart_rate::{BeatEvent, HeartRateMonitor};
use crate::types::{check_band, DspError, DspResult, Sample, Tick};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full construction-time configuration for one channel.
///
/// All fields must be supplied at construction; there is no runtime
/// reconfiguration. The `Default` is the reference ECG setup: 100 Hz
/// sampling, 1–20 Hz conditioning band, 8/32/8 window geometry, and a
/// 0.4 s refractory period (no more than 150 BPM).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Fixed acquisition tick rate in Hz.
    pub sample_rate_hz: f64,
    /// High-pass corner (lower band edge) in Hz.
    pub high_pass_cutoff_hz: f64,
    /// Low-pass corner (upper band edge) in Hz.
    pub low_pass_cutoff_hz: f64,
    /// Capacity of the power-smoothing window.
    pub smoothing_window: usize,
    /// Capacity of the decimated trend window.
    pub trend_window: usize,
    /// Ticks between trend-window commits.
    pub decimation: u32,
    /// Minimum tick distance between accepted beats.
    pub refractory_ticks: Tick,
    /// Fraction of the trend max the smoothed power must exceed.
    pub max_ratio: f64,
    /// Multiple of the trend mean the smoothed power must exceed.
    pub mean_ratio: f64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::ecg(100.0)
    }
}

impl ChannelConfig {
    /// Reference ECG configuration at the given tick rate.
    ///
    /// The refractory period scales with the rate to stay at 0.4 s.
    pub fn ecg(sample_rate_hz: f64) -> Self {
        Self {
            sample_rate_hz,
            high_pass_cutoff_hz: 1.0,
            low_pass_cutoff_hz: 20.0,
            smoothing_window: 8,
            trend_window: 32,
            decimation: 8,
            refractory_ticks: (0.4 * sample_rate_hz).round().max(1.0) as Tick,
            max_ratio: 0.5,
            mean_ratio: 2.0,
        }
    }

    /// Alpha-band EEG extraction (8–12 Hz), reusing the same cascade.
    ///
    /// Only the conditioning band matters for such a channel; pair this
    /// with [`ChannelConfig::band_extractor`] rather than a full
    /// [`ChannelPipeline`].
    pub fn eeg_alpha(sample_rate_hz: f64) -> Self {
        Self {
            high_pass_cutoff_hz: 8.0,
            low_pass_cutoff_hz: 12.0,
            ..Self::ecg(sample_rate_hz)
        }
    }

    /// Check every construction precondition without building anything.
    pub fn validate(&self) -> DspResult<()> {
        check_band(self.sample_rate_hz, self.high_pass_cutoff_hz)?;
        check_band(self.sample_rate_hz, self.low_pass_cutoff_hz)?;
        if self.smoothing_window == 0 || self.trend_window == 0 {
            return Err(DspError::ZeroCapacityWindow);
        }
        if self.decimation == 0 {
            return Err(DspError::ZeroDecimation);
        }
        if self.refractory_ticks == 0 {
            return Err(DspError::ZeroRefractory);
        }
        Ok(())
    }

    /// Build just the conditioning cascade for a beat-less band channel.
    pub fn band_extractor(&self) -> DspResult<BandExtractor> {
        BandExtractor::new(
            self.sample_rate_hz,
            self.high_pass_cutoff_hz,
            self.low_pass_cutoff_hz,
        )
    }

    /// Parse a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> DspResult<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| DspError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file.
    pub fn load_from(path: &Path) -> DspResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DspError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_yaml(&content)
    }

    /// Load the channel configuration from the first file found.
    ///
    /// Search order:
    /// 1. `BIOPULSE_CONFIG` environment variable
    /// 2. `./biopulse.yaml`
    ///
    /// Returns the reference ECG configuration if no file is found.
    pub fn load() -> DspResult<Self> {
        if let Ok(path) = std::env::var("BIOPULSE_CONFIG") {
            if Path::new(&path).exists() {
                return Self::load_from(Path::new(&path));
            }
        }
        let local = Path::new("biopulse.yaml");
        if local.exists() {
            return Self::load_from(local);
        }
        Ok(Self::default())
    }

    fn detector_config(&self) -> BeatDetectorConfig {
        BeatDetectorConfig {
            smoothing_window: self.smoothing_window,
            trend_window: self.trend_window,
            decimation: self.decimation,
            max_ratio: self.max_ratio,
            mean_ratio: self.mean_ratio,
        }
    }
}

/// Everything the pipeline produces for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// Tick at which this sample was processed (first sample is tick 1).
    pub tick: Tick,
    /// Band-pass conditioned sample.
    pub bandpass: Sample,
    /// Smoothed instantaneous power.
    pub smoothed: Sample,
    /// Ungated detector decision for this tick.
    pub beating: bool,
    /// Refractory-gated beat event, when one was accepted this tick.
    pub beat: Option<BeatEvent>,
}

/// One heartbeat channel: detector plus refractory gate, tick-driven.
#[derive(Debug, Clone)]
pub struct ChannelPipeline {
    detector: BeatDetector,
    monitor: HeartRateMonitor,
    tick: Tick,
}

impl ChannelPipeline {
    /// Build a pipeline from a validated configuration.
    pub fn new(config: &ChannelConfig) -> DspResult<Self> {
        config.validate()?;
        Ok(Self {
            detector: BeatDetector::new(
                config.sample_rate_hz,
                config.high_pass_cutoff_hz,
                config.low_pass_cutoff_hz,
                config.detector_config(),
            )?,
            monitor: HeartRateMonitor::new(config.sample_rate_hz, config.refractory_ticks)?,
            tick: 0,
        })
    }

    /// Process one raw sample; the per-tick pure step.
    pub fn process_sample(&mut self, raw: Sample) -> TickOutput {
        self.tick += 1;
        let detection = self.detector.process_sample(raw);
        let beat = self.monitor.update(detection.beating, self.tick);
        if let Some(ev) = beat {
            tracing::debug!(
                tick = ev.tick,
                interval_ticks = ev.interval_ticks,
                bpm = ev.bpm,
                "beat accepted"
            );
        }
        TickOutput {
            tick: self.tick,
            bandpass: detection.bandpass,
            smoothed: detection.smoothed,
            beating: detection.beating,
            beat,
        }
    }

    /// Ticks processed so far.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Restore the freshly constructed state, including the tick counter.
    pub fn reset(&mut self) {
        self.detector.reset();
        self.monitor.reset();
        self.tick = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sharp 3-tick spike every `period` samples over a quiet baseline.
    fn pulse_train(n: usize, period: u64) -> Vec<f64> {
        (0..n as u64)
            .map(|i| if i % period < 3 { 900.0 } else { 500.0 })
            .collect()
    }

    fn run(pipeline: &mut ChannelPipeline, input: &[f64]) -> Vec<BeatEvent> {
        input
            .iter()
            .filter_map(|&x| pipeline.process_sample(x).beat)
            .collect()
    }

    #[test]
    fn test_validate_catches_every_precondition() {
        let good = ChannelConfig::ecg(100.0);
        assert!(good.validate().is_ok());

        let mut c = good.clone();
        c.sample_rate_hz = 0.0;
        assert!(matches!(c.validate(), Err(DspError::InvalidSampleRate(_))));

        let mut c = good.clone();
        c.low_pass_cutoff_hz = 50.0;
        assert!(matches!(
            c.validate(),
            Err(DspError::CutoffOutsideNyquist { .. })
        ));

        let mut c = good.clone();
        c.trend_window = 0;
        assert_eq!(c.validate(), Err(DspError::ZeroCapacityWindow));

        let mut c = good.clone();
        c.decimation = 0;
        assert_eq!(c.validate(), Err(DspError::ZeroDecimation));

        let mut c = good;
        c.refractory_ticks = 0;
        assert_eq!(c.validate(), Err(DspError::ZeroRefractory));
    }

    #[test]
    fn test_construction_rejects_invalid_config() {
        let mut config = ChannelConfig::ecg(100.0);
        config.high_pass_cutoff_hz = 60.0;
        assert!(ChannelPipeline::new(&config).is_err());
    }

    #[test]
    fn test_pulse_train_locks_to_exact_rate() {
        // 75 BPM pulse train at 100 Hz: spike every 80 ticks
        let mut pipeline = ChannelPipeline::new(&ChannelConfig::ecg(100.0)).unwrap();
        let events = run(&mut pipeline, &pulse_train(2000, 80));

        let settled: Vec<_> = events.iter().filter(|e| e.tick > 400).collect();
        assert!(settled.len() >= 10, "only {} settled beats", settled.len());
        for ev in &settled[1..] {
            assert_eq!(ev.interval_ticks, 80);
            assert!((ev.bpm - 75.0).abs() < 1e-9, "bpm {}", ev.bpm);
        }
    }

    #[test]
    fn test_one_event_per_pulse_after_settling() {
        let period = 80u64;
        let mut pipeline = ChannelPipeline::new(&ChannelConfig::ecg(100.0)).unwrap();
        let events = run(&mut pipeline, &pulse_train(2000, period));
        let settled: Vec<_> = events.iter().filter(|e| e.tick > 400).collect();
        // Events must land one per period, each shortly after a pulse onset
        for pair in settled.windows(2) {
            assert_eq!(pair[1].tick - pair[0].tick, period);
        }
    }

    #[test]
    fn test_gated_events_respect_refractory() {
        // Even a dense pulse train cannot produce events closer than the
        // refractory period once gated.
        let mut pipeline = ChannelPipeline::new(&ChannelConfig::ecg(100.0)).unwrap();
        let events = run(&mut pipeline, &pulse_train(3000, 20));
        for pair in events.windows(2) {
            assert!(
                pair[1].tick - pair[0].tick > 40,
                "events {} and {} violate refractory",
                pair[0].tick,
                pair[1].tick
            );
        }
    }

    #[test]
    fn test_replay_is_bit_identical() {
        let input = pulse_train(1500, 80);
        let mut a = ChannelPipeline::new(&ChannelConfig::ecg(100.0)).unwrap();
        let mut b = ChannelPipeline::new(&ChannelConfig::ecg(100.0)).unwrap();
        let out_a: Vec<TickOutput> = input.iter().map(|&x| a.process_sample(x)).collect();
        let out_b: Vec<TickOutput> = input.iter().map(|&x| b.process_sample(x)).collect();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn test_reset_replays_identically() {
        let input = pulse_train(1000, 80);
        let mut pipeline = ChannelPipeline::new(&ChannelConfig::ecg(100.0)).unwrap();
        let first: Vec<TickOutput> = input.iter().map(|&x| pipeline.process_sample(x)).collect();
        pipeline.reset();
        let second: Vec<TickOutput> = input.iter().map(|&x| pipeline.process_sample(x)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_independent_channels_do_not_interact() {
        let config = ChannelConfig::ecg(100.0);
        let mut a = ChannelPipeline::new(&config).unwrap();
        let mut b = ChannelPipeline::new(&config).unwrap();
        // Feeding b garbage must not disturb a's output
        let input = pulse_train(1000, 80);
        let solo: Vec<TickOutput> = {
            let mut solo_pipeline = ChannelPipeline::new(&config).unwrap();
            input.iter().map(|&x| solo_pipeline.process_sample(x)).collect()
        };
        let mut paired = Vec::new();
        for (i, &x) in input.iter().enumerate() {
            paired.push(a.process_sample(x));
            b.process_sample((i as f64 * 17.3).sin() * 1000.0);
        }
        assert_eq!(solo, paired);
    }

    #[test]
    fn test_eeg_alpha_band_extractor() {
        let config = ChannelConfig::eeg_alpha(100.0);
        assert_eq!(config.high_pass_cutoff_hz, 8.0);
        assert_eq!(config.low_pass_cutoff_hz, 12.0);
        assert!(config.band_extractor().is_ok());
    }

    #[test]
    fn test_yaml_round_trip_and_defaults() {
        let config = ChannelConfig::from_yaml("sample_rate_hz: 250.0\n").unwrap();
        assert_eq!(config.sample_rate_hz, 250.0);
        // Unspecified fields fall back to the reference configuration
        assert_eq!(config.smoothing_window, 8);
        assert_eq!(config.trend_window, 32);

        let yaml = serde_yaml::to_string(&ChannelConfig::ecg(100.0)).unwrap();
        let back = ChannelConfig::from_yaml(&yaml).unwrap();
        assert_eq!(back, ChannelConfig::ecg(100.0));
    }

    #[test]
    fn test_load_from_yaml_file() {
        let path = std::env::temp_dir().join("biopulse_test_channel_config.yaml");
        std::fs::write(
            &path,
            "sample_rate_hz: 250.0\nlow_pass_cutoff_hz: 30.0\n",
        )
        .unwrap();
        let config = ChannelConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.sample_rate_hz, 250.0);
        assert_eq!(config.low_pass_cutoff_hz, 30.0);
        // Unspecified fields keep the reference defaults
        assert_eq!(config.decimation, 8);
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        let path = std::env::temp_dir().join("biopulse_test_no_such_config.yaml");
        assert!(matches!(
            ChannelConfig::load_from(&path),
            Err(DspError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_from_rejects_invalid_file_contents() {
        let path = std::env::temp_dir().join("biopulse_test_bad_channel_config.yaml");
        std::fs::write(&path, "sample_rate_hz: -10.0\n").unwrap();
        let result = ChannelConfig::load_from(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(DspError::InvalidSampleRate(_))));
    }

    #[test]
    fn test_yaml_rejects_invalid_values() {
        assert!(ChannelConfig::from_yaml("sample_rate_hz: -1.0\n").is_err());
        assert!(ChannelConfig::from_yaml("not: [valid").is_err());
    }
}
