//! # pulse-core
//!
//! Real-time photoplethysmogram (PPG) beat detection and time-domain HRV.
//!
//! This crate provides:
//! - **Beat detection**: adaptive envelope/threshold tracking with a
//!   two-state beat machine, refractory floor and rise guard
//! - **HRV**: fixed-capacity IBI history with RMSSD recomputed on every
//!   accepted interval
//! - **Self-healing**: an idle watchdog that re-syncs detection after
//!   prolonged signal loss
//!
//! ## Example
//!
//! ```ignore
//! use pulse_core::{DetectorConfig, PulseMonitor, SystemClock};
//! use pulse_core::sim::{SyntheticPpg, SyntheticPpgConfig};
//!
//! let source = SyntheticPpg::new(SyntheticPpgConfig::default());
//! let mut monitor = PulseMonitor::new(source, SystemClock::new(), DetectorConfig::default(), 1000);
//!
//! loop {
//!     let tick = monitor.poll();
//!     if let Some(beat) = tick.beat {
//!         println!("beat at {}ms, ibi={:?}", beat.timestamp_ms, beat.ibi_ms);
//!     }
//!     if let Some(snap) = tick.snapshot {
//!         println!("bpm={:.1} rmssd={:.1}ms", snap.bpm, snap.hrv_rmssd_ms);
//!     }
//!     std::thread::sleep(std::time::Duration::from_millis(5));
//! }
//! ```

pub mod config;
pub mod detector;
pub mod envelope;
pub mod history;
pub mod monitor;
pub mod sim;
pub mod telemetry;

pub use config::{ConfigError, DetectorConfig};
pub use detector::{BeatDetector, BeatEvent, BeatPhase};
pub use envelope::Envelope;
pub use history::{IbiHistory, IBI_SLOTS};
pub use monitor::{MonitorTick, MonotonicClock, PpgSource, PulseMonitor, SystemClock};
pub use telemetry::{TelemetryGate, VitalsSnapshot};
