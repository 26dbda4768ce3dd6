//! Beat detection state machine.
//!
//! One `BeatDetector` value owns the whole pipeline state: envelope and
//! threshold, beat phase, priming flags, the IBI history and the RMSSD
//! scalar. It is fed one raw sample per poll together with a monotonic
//! millisecond timestamp, and never blocks, allocates or returns errors.
//! Degraded conditions (implausible intervals, signal loss, thin history)
//! are local recoveries, see the module docs on [`crate::history`] and the
//! watchdog notes below.

use crate::config::DetectorConfig;
use crate::envelope::Envelope;
use crate::history::IbiHistory;

/// Detection phase. `WaitingForBeat` is the initial state and the state a
/// completed cycle returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatPhase {
    WaitingForBeat,
    BeatActive,
}

/// Where the detector is in establishing its IBI baseline after start or
/// after a watchdog re-arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Priming {
    /// No beat seen yet; the next beat produces no IBI.
    AwaitingFirst,
    /// One beat seen; the next beat yields the baseline IBI, which is not
    /// inserted into history.
    AwaitingSecond,
    /// Baseline established; intervals flow through the plausibility
    /// filter into history.
    Established,
}

/// A detected heartbeat. `ibi_ms` is `None` for the first beat after
/// start/re-arm (no previous beat to measure against).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatEvent {
    pub timestamp_ms: u64,
    pub ibi_ms: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct BeatDetector {
    config: DetectorConfig,
    envelope: Envelope,
    phase: BeatPhase,
    priming: Priming,
    last_beat_ms: u64,
    last_ibi_ms: u32,
    history: IbiHistory,
    rmssd_ms: f32,
    /// True between a watchdog re-arm and the next detected beat. Keeps
    /// the re-arm idempotent and the signal-loss log to one line per
    /// episode.
    in_signal_loss: bool,
}

impl BeatDetector {
    pub fn new(config: DetectorConfig) -> Self {
        let envelope = Envelope::armed_at(config.reset_midpoint);
        let last_ibi_ms = config.seed_ibi_ms;
        Self {
            config,
            envelope,
            phase: BeatPhase::WaitingForBeat,
            priming: Priming::AwaitingFirst,
            last_beat_ms: 0,
            last_ibi_ms,
            history: IbiHistory::new(),
            rmssd_ms: 0.0,
            in_signal_loss: false,
        }
    }

    /// One pipeline iteration: watchdog check, envelope tracking, beat
    /// decision, cycle completion. Returns a [`BeatEvent`] on the sample
    /// that fires the beat.
    pub fn process(&mut self, sample: i32, now_ms: u64) -> Option<BeatEvent> {
        let elapsed = now_ms.saturating_sub(self.last_beat_ms);

        // Watchdog runs before the sample is evaluated, so a beat arriving
        // after a long gap is judged against re-armed state. The last-beat
        // timestamp is deliberately not rewritten; the re-arm is
        // idempotent until the next beat lands.
        if elapsed > self.config.signal_loss_timeout_ms {
            self.resync();
        }

        let guard_ms = (self.config.rise_guard * self.last_ibi_ms as f32) as u64;
        let gate_open = elapsed > guard_ms;

        self.envelope.track(sample, gate_open);

        let mut event = None;
        if self.phase == BeatPhase::WaitingForBeat
            && elapsed > self.config.refractory_ms
            && sample > self.envelope.thresh
            && gate_open
        {
            event = Some(self.fire_beat(now_ms));
        }

        if self.phase == BeatPhase::BeatActive && sample < self.envelope.thresh {
            self.phase = BeatPhase::WaitingForBeat;
            let amp = self.envelope.recenter();
            log::debug!(
                "cycle complete: amp={} thresh={}",
                amp,
                self.envelope.thresh
            );
        }

        event
    }

    fn fire_beat(&mut self, now_ms: u64) -> BeatEvent {
        self.phase = BeatPhase::BeatActive;
        let prev_beat_ms = self.last_beat_ms;
        self.last_beat_ms = now_ms;

        if self.in_signal_loss {
            self.in_signal_loss = false;
            log::info!("beat re-acquired at t={}ms", now_ms);
        }

        match self.priming {
            Priming::AwaitingFirst => {
                self.priming = Priming::AwaitingSecond;
                BeatEvent {
                    timestamp_ms: now_ms,
                    ibi_ms: None,
                }
            }
            Priming::AwaitingSecond => {
                // Baseline interval: recorded for the timing gates but
                // never inserted into history.
                let ibi = now_ms.saturating_sub(prev_beat_ms) as u32;
                self.last_ibi_ms = ibi;
                self.priming = Priming::Established;
                BeatEvent {
                    timestamp_ms: now_ms,
                    ibi_ms: Some(ibi),
                }
            }
            Priming::Established => {
                let ibi = now_ms.saturating_sub(prev_beat_ms) as u32;
                self.last_ibi_ms = ibi;
                self.accept_or_discard(ibi);
                BeatEvent {
                    timestamp_ms: now_ms,
                    ibi_ms: Some(ibi),
                }
            }
        }
    }

    /// Plausibility filter in front of the history buffer. Rejected
    /// intervals change nothing beyond the debug line.
    fn accept_or_discard(&mut self, ibi_ms: u32) {
        if ibi_ms < self.config.ibi_min_ms || ibi_ms > self.config.ibi_max_ms {
            log::debug!("ibi {}ms outside plausibility window, discarded", ibi_ms);
            return;
        }
        self.history.push(ibi_ms);
        self.rmssd_ms = self.history.rmssd();
        log::debug!("ibi {}ms accepted, rmssd={:.1}ms", ibi_ms, self.rmssd_ms);
    }

    /// Watchdog re-sync after prolonged signal loss. Collapses the
    /// envelope onto the configured midpoint, drops back to awaiting the
    /// first beat and zeroes the HRV scalar. History contents survive on
    /// purpose; stale slots are overwritten round-robin as new intervals
    /// accumulate.
    fn resync(&mut self) {
        if !self.in_signal_loss {
            log::warn!(
                "no qualifying beat for >{}ms, re-syncing detector",
                self.config.signal_loss_timeout_ms
            );
            self.in_signal_loss = true;
        }
        self.envelope.rearm(self.config.reset_midpoint);
        self.phase = BeatPhase::WaitingForBeat;
        self.priming = Priming::AwaitingFirst;
        self.rmssd_ms = 0.0;
    }

    /// Latest RMSSD in milliseconds; `0.0` is the "no data" sentinel.
    pub fn rmssd_ms(&self) -> f32 {
        self.rmssd_ms
    }

    /// Instantaneous rate from the last measured interval, or `0.0` while
    /// the baseline is not established.
    pub fn bpm(&self) -> f32 {
        if self.priming == Priming::Established && self.last_ibi_ms > 0 {
            60_000.0 / self.last_ibi_ms as f32
        } else {
            0.0
        }
    }

    /// Beat indicator edge: true between threshold crossing up and the
    /// fall back below it.
    pub fn is_beat_active(&self) -> bool {
        self.phase == BeatPhase::BeatActive
    }

    pub fn phase(&self) -> BeatPhase {
        self.phase
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn history(&self) -> &IbiHistory {
        &self.history
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }
}
