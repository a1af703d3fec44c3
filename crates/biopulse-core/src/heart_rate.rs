//! Heart-Rate Monitor — Refractory gating and instantaneous BPM
//!
//! Turns the per-tick `beating` flag of the
//! [`BeatDetector`](crate::beat_detector::BeatDetector) into discrete
//! beat events. A QRS complex crosses the detector threshold on several
//! consecutive ticks; this state machine accepts only the first crossing
//! and ignores everything else until a refractory period has elapsed, so
//! one complex never counts twice.
//!
//! Instantaneous rate is computed from the tick interval between accepted
//! beats: `bpm = rate_constant / interval_ticks`, with
//! `rate_constant = 60 · fs` (6000 at the reference 100 Hz tick rate).
//!
//! # First-beat artifact
//!
//! The very first accepted beat measures its interval against tick 0
//! (process start), so its `bpm` is meaningless. This boundary condition
//! is part of the contract rather than silently patched: callers should
//! discard the first event's rate, or use [`BeatEvent::interval_ticks`]
//! to gate on plausibility themselves.
//!
//! ## Example
//!
//! ```rust
//! use biopulse_core::heart_rate::{BeatPhase, HeartRateMonitor};
//!
//! let mut hr = HeartRateMonitor::new(100.0, 40).unwrap();
//! // Detector fires on ticks 100-105 and 180-185: one event each
//! let mut events = Vec::new();
//! for tick in 1..=200u64 {
//!     let beating = (100..=105).contains(&tick) || (180..=185).contains(&tick);
//!     if let Some(ev) = hr.update(beating, tick) {
//!         events.push(ev);
//!     }
//! }
//! assert_eq!(events.len(), 2);
//! assert_eq!(events[1].interval_ticks, 80);
//! assert!((events[1].bpm - 75.0).abs() < 1e-9);
//! ```

use crate::types::{DspError, DspResult, Tick};

/// Where the monitor currently sits relative to the last accepted beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatPhase {
    /// No beat in progress; the next detector edge is accepted.
    Idle,
    /// Inside the refractory window of a just-accepted beat.
    InBeat,
}

/// One accepted beat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatEvent {
    /// Tick at which the beat was accepted.
    pub tick: Tick,
    /// Ticks since the previously accepted beat (or since tick 0 for the
    /// first event, whose rate is therefore meaningless).
    pub interval_ticks: Tick,
    /// Instantaneous rate in beats per minute.
    pub bpm: f64,
}

/// Refractory-gated heart-rate state machine for one channel.
#[derive(Debug, Clone)]
pub struct HeartRateMonitor {
    /// Tick-interval to BPM conversion, `60 · fs`.
    rate_constant: f64,
    /// Minimum tick distance between accepted beats.
    refractory_ticks: Tick,
    phase: BeatPhase,
    last_beat_tick: Tick,
}

impl HeartRateMonitor {
    /// Create a monitor for the given tick rate and refractory duration.
    pub fn new(sample_rate_hz: f64, refractory_ticks: Tick) -> DspResult<Self> {
        if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
            return Err(DspError::InvalidSampleRate(sample_rate_hz));
        }
        if refractory_ticks == 0 {
            return Err(DspError::ZeroRefractory);
        }
        Ok(Self {
            rate_constant: 60.0 * sample_rate_hz,
            refractory_ticks,
            phase: BeatPhase::Idle,
            last_beat_tick: 0,
        })
    }

    /// Advance the state machine by one tick.
    ///
    /// `beating` is the detector's decision for `tick`; ticks must be
    /// strictly increasing starting from 1. Returns the accepted beat
    /// event, if any. A beating tick during refractory neither emits an
    /// event nor restarts the refractory timer.
    pub fn update(&mut self, beating: bool, tick: Tick) -> Option<BeatEvent> {
        let mut event = None;

        if beating && self.phase == BeatPhase::Idle {
            let interval_ticks = tick - self.last_beat_tick;
            event = Some(BeatEvent {
                tick,
                interval_ticks,
                bpm: self.rate_constant / interval_ticks as f64,
            });
            self.last_beat_tick = tick;
            self.phase = BeatPhase::InBeat;
        }

        if self.phase == BeatPhase::InBeat && tick - self.last_beat_tick > self.refractory_ticks {
            self.phase = BeatPhase::Idle;
        }

        event
    }

    /// Current phase.
    pub fn phase(&self) -> BeatPhase {
        self.phase
    }

    /// Tick of the last accepted beat (0 before the first).
    pub fn last_beat_tick(&self) -> Tick {
        self.last_beat_tick
    }

    /// Tick-interval to BPM conversion constant.
    pub fn rate_constant(&self) -> f64 {
        self.rate_constant
    }

    /// Return to the startup state, including the tick-0 interval origin.
    pub fn reset(&mut self) {
        self.phase = BeatPhase::Idle;
        self.last_beat_tick = 0;
    }
}
