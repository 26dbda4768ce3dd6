use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),
}

/// Tunables for the beat detector and its watchdog.
///
/// Defaults target a 12-bit PPG front-end (ESP32-class ADC, 0..4095 counts).
/// Sensors with a different numeric range only need `reset_midpoint`
/// adjusted to their midscale value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Value the envelope collapses to when detection re-arms (ADC counts).
    /// Tied to the sensor's output range: midscale of the ADC.
    pub reset_midpoint: i32,
    /// Minimum time between registered beats (ms). Suppresses double
    /// counting on the dicrotic notch.
    pub refractory_ms: u64,
    /// Beat-free interval after which the watchdog forces a full re-sync
    /// of envelope, threshold and HRV state (ms).
    pub signal_loss_timeout_ms: u64,
    /// Plausible physiological IBI window (ms, inclusive on both ends).
    /// Intervals outside it never reach the history buffer.
    pub ibi_min_ms: u32,
    pub ibi_max_ms: u32,
    /// Fraction of the previous IBI that must elapse before trough tracking
    /// and the next beat are allowed. Guards against reading the trough on
    /// the rising edge of the current pulse.
    pub rise_guard: f32,
    /// Stand-in IBI used by the rise guard before the first real interval
    /// has been measured (ms).
    pub seed_ibi_ms: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            reset_midpoint: 2048,
            refractory_ms: 250,
            signal_loss_timeout_ms: 2500,
            ibi_min_ms: 300,
            ibi_max_ms: 2000,
            rise_guard: 0.6,
            seed_ibi_ms: 600,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ibi_min_ms >= self.ibi_max_ms {
            return Err(ConfigError::Validation(format!(
                "ibi_min_ms ({}) must be below ibi_max_ms ({})",
                self.ibi_min_ms, self.ibi_max_ms
            )));
        }
        if self.refractory_ms as u32 >= self.ibi_max_ms {
            return Err(ConfigError::Validation(format!(
                "refractory_ms ({}) must be below ibi_max_ms ({})",
                self.refractory_ms, self.ibi_max_ms
            )));
        }
        if self.refractory_ms >= self.signal_loss_timeout_ms {
            return Err(ConfigError::Validation(format!(
                "refractory_ms ({}) must be below signal_loss_timeout_ms ({})",
                self.refractory_ms, self.signal_loss_timeout_ms
            )));
        }
        if !(self.rise_guard > 0.0 && self.rise_guard < 1.0) {
            return Err(ConfigError::Validation(format!(
                "rise_guard ({}) must be in (0, 1)",
                self.rise_guard
            )));
        }
        Ok(())
    }
}
