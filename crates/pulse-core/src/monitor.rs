//! Single-threaded polling loop around the detector.
//!
//! The monitor owns the sensor seam, the clock and all detector state;
//! nothing here is shared or synchronized. If an interrupt- or
//! thread-driven sampler is ever introduced, detector state must move
//! behind an explicit hand-off (channel or short-critical-section mutex)
//! instead of being shared ad hoc.

use std::time::Instant;

use crate::config::DetectorConfig;
use crate::detector::{BeatDetector, BeatEvent};
use crate::telemetry::{TelemetryGate, VitalsSnapshot};

/// Polling input contract: one integer intensity sample per call.
pub trait PpgSource {
    fn sample(&mut self, now_ms: u64) -> i32;
}

/// Monotonic millisecond clock.
pub trait MonotonicClock {
    fn now_ms(&self) -> u64;
}

/// Wall clock anchored at construction.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Result of one monitor iteration.
#[derive(Debug, Clone, Copy)]
pub struct MonitorTick {
    pub sample: i32,
    pub beat: Option<BeatEvent>,
    /// Present only when the telemetry gate opened this iteration.
    pub snapshot: Option<VitalsSnapshot>,
}

/// Owns source, clock, detector and telemetry gate; exclusively mutated
/// by whoever calls [`PulseMonitor::poll`].
pub struct PulseMonitor<S, C> {
    source: S,
    clock: C,
    detector: BeatDetector,
    gate: TelemetryGate,
}

impl<S: PpgSource, C: MonotonicClock> PulseMonitor<S, C> {
    pub fn new(source: S, clock: C, config: DetectorConfig, telemetry_interval_ms: u64) -> Self {
        Self {
            source,
            clock,
            detector: BeatDetector::new(config),
            gate: TelemetryGate::new(telemetry_interval_ms),
        }
    }

    /// One loop iteration: read the clock, poll the source, run the full
    /// pipeline, and build a snapshot when the telemetry gate opens.
    pub fn poll(&mut self) -> MonitorTick {
        let now_ms = self.clock.now_ms();
        let sample = self.source.sample(now_ms);
        let beat = self.detector.process(sample, now_ms);

        let snapshot = if self.gate.ready(now_ms) {
            Some(VitalsSnapshot {
                timestamp_ms: now_ms,
                bpm: self.detector.bpm(),
                hrv_rmssd_ms: self.detector.rmssd_ms(),
                beat_active: self.detector.is_beat_active(),
            })
        } else {
            None
        };

        MonitorTick {
            sample,
            beat,
            snapshot,
        }
    }

    pub fn detector(&self) -> &BeatDetector {
        &self.detector
    }
}
