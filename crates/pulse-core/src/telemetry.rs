//! Read-only scalars exported to the telemetry side, and the wall-clock
//! gate that rate-limits how often they are emitted. The transport itself
//! (radio, serial, whatever carries the bytes) lives outside this crate;
//! the core never initiates I/O.

use serde::Serialize;

/// Snapshot of the scalars a telemetry encoder is allowed to read.
/// `hrv_rmssd_ms` is `0.0` when invalid or freshly reset.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VitalsSnapshot {
    pub timestamp_ms: u64,
    pub bpm: f32,
    pub hrv_rmssd_ms: f32,
    pub beat_active: bool,
}

/// Fixed-interval emitter gate, independent of beat cadence.
#[derive(Debug, Clone)]
pub struct TelemetryGate {
    interval_ms: u64,
    last_emit_ms: Option<u64>,
}

impl TelemetryGate {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_emit_ms: None,
        }
    }

    /// True when enough wall-clock time has passed since the last emit;
    /// marks the emit when it is.
    pub fn ready(&mut self, now_ms: u64) -> bool {
        let due = match self.last_emit_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        };
        if due {
            self.last_emit_ms = Some(now_ms);
        }
        due
    }
}
