//! Synthetic PPG source for the simulator and for tests.
//!
//! Produces a quasi-periodic pulse waveform: a flat diastolic baseline
//! with one half-sine systolic upstroke per cardiac cycle, plus optional
//! uniform noise. Shape is crude but crosses an adaptive threshold the
//! same way a fingertip PPG does, which is all the detector needs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::monitor::PpgSource;

/// Fraction of the cycle occupied by the systolic upstroke.
const SYSTOLE_FRACTION: f64 = 0.3;

#[derive(Debug, Clone)]
pub struct SyntheticPpgConfig {
    /// Simulated heart rate (beats per minute).
    pub bpm: f64,
    /// Diastolic baseline level (ADC counts).
    pub baseline: i32,
    /// Systolic peak height above baseline (ADC counts).
    pub amplitude: i32,
    /// Half-width of uniform additive noise (ADC counts, 0 = clean).
    pub noise: i32,
}

impl Default for SyntheticPpgConfig {
    fn default() -> Self {
        Self {
            bpm: 70.0,
            baseline: 1600,
            amplitude: 900,
            noise: 0,
        }
    }
}

pub struct SyntheticPpg {
    config: SyntheticPpgConfig,
    rng: StdRng,
}

impl SyntheticPpg {
    pub fn new(config: SyntheticPpgConfig) -> Self {
        Self::with_seed(config, 0x5eed)
    }

    /// Deterministic noise stream for reproducible runs.
    pub fn with_seed(config: SyntheticPpgConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn period_ms(&self) -> f64 {
        60_000.0 / self.config.bpm
    }
}

impl PpgSource for SyntheticPpg {
    fn sample(&mut self, now_ms: u64) -> i32 {
        let period = self.period_ms();
        let phase = (now_ms as f64 % period) / period;

        let mut value = self.config.baseline;
        if phase < SYSTOLE_FRACTION {
            let lobe = (std::f64::consts::PI * phase / SYSTOLE_FRACTION).sin();
            value += (self.config.amplitude as f64 * lobe).round() as i32;
        }
        if self.config.noise > 0 {
            value += self.rng.gen_range(-self.config.noise..=self.config.noise);
        }
        value
    }
}
