//! Running peak/trough envelope with an adaptive decision threshold.
//!
//! The tracker drifts with the waveform instead of storing raw history:
//! the peak rises while the signal sits above the threshold, the trough
//! falls while it sits below (subject to the caller's rise guard), and the
//! threshold is re-centered to the midpoint of the observed swing once per
//! completed beat cycle. This tolerates slow baseline drift and varying
//! pulse amplitude.

/// Envelope state. Invariant: `trough <= thresh <= peak`, except right
/// after [`Envelope::rearm`], when all three collapse to the midpoint.
#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    pub peak: i32,
    pub trough: i32,
    pub thresh: i32,
}

impl Envelope {
    /// Start (or restart) detection with the whole envelope collapsed to
    /// the sensor midpoint.
    pub fn armed_at(midpoint: i32) -> Self {
        Self {
            peak: midpoint,
            trough: midpoint,
            thresh: midpoint,
        }
    }

    /// Per-sample tracking. `trough_gate_open` is the rise guard: trough
    /// updates are only allowed once enough of the previous IBI has
    /// elapsed, so the falling edge of the current pulse is not mistaken
    /// for the inter-pulse trough.
    pub fn track(&mut self, sample: i32, trough_gate_open: bool) {
        if sample > self.thresh && sample > self.peak {
            self.peak = sample;
        }
        if sample < self.thresh && trough_gate_open && sample < self.trough {
            self.trough = sample;
        }
    }

    /// Called when the waveform falls back below the threshold after a
    /// beat: re-center the threshold on the swing seen this cycle, then
    /// collapse peak and trough onto it for the next cycle. Returns the
    /// amplitude of the completed cycle.
    pub fn recenter(&mut self) -> i32 {
        let amp = self.peak - self.trough;
        self.thresh = self.trough + amp / 2;
        self.peak = self.thresh;
        self.trough = self.thresh;
        amp
    }

    /// Watchdog reset: collapse everything back onto the midpoint.
    pub fn rearm(&mut self, midpoint: i32) {
        *self = Self::armed_at(midpoint);
    }
}
