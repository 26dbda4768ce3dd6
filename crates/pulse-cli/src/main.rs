use std::fs;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use pulse_core::sim::{SyntheticPpg, SyntheticPpgConfig};
use pulse_core::{BeatDetector, DetectorConfig, PulseMonitor, SystemClock};

#[derive(Parser)]
#[command(name = "pulse", about = "PPG beat detection and HRV harness")]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the detector against a synthetic PPG source in real time,
    /// printing one JSON telemetry line per second.
    Simulate {
        /// Simulated heart rate in beats per minute
        #[arg(long, default_value_t = 70.0)]
        bpm: f64,
        /// How long to run, in seconds
        #[arg(long, default_value_t = 30)]
        seconds: u64,
        /// Half-width of additive sample noise (ADC counts)
        #[arg(long, default_value_t = 0)]
        noise: i32,
    },
    /// Feed a recorded trace (CSV lines of `timestamp_ms,sample`) through
    /// the detector and report the resulting beats and HRV.
    Replay { path: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Simulate {
            bpm,
            seconds,
            noise,
        } => simulate(bpm, seconds, noise),
        Commands::Replay { path } => replay(&path),
    }
}

fn simulate(bpm: f64, seconds: u64, noise: i32) -> Result<(), Box<dyn std::error::Error>> {
    let source = SyntheticPpg::new(SyntheticPpgConfig {
        bpm,
        noise,
        ..Default::default()
    });
    let mut monitor = PulseMonitor::new(
        source,
        SystemClock::new(),
        DetectorConfig::default(),
        1000,
    );

    log::info!("simulating {:.0} bpm for {}s", bpm, seconds);
    let deadline = Duration::from_secs(seconds);
    let started = std::time::Instant::now();
    while started.elapsed() < deadline {
        let tick = monitor.poll();
        if let Some(beat) = tick.beat {
            log::debug!("beat at {}ms ibi={:?}", beat.timestamp_ms, beat.ibi_ms);
        }
        if let Some(snap) = tick.snapshot {
            println!("{}", serde_json::to_string(&snap)?);
        }
        thread::sleep(Duration::from_millis(5));
    }
    Ok(())
}

fn replay(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut detector = BeatDetector::new(DetectorConfig::default());
    let mut beats = 0usize;

    for (lineno, line) in fs::read_to_string(path)?.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (ts, sample) = line
            .split_once(',')
            .ok_or_else(|| format!("line {}: expected `timestamp_ms,sample`", lineno + 1))?;
        let now_ms: u64 = ts.trim().parse()?;
        let sample: i32 = sample.trim().parse()?;
        if let Some(beat) = detector.process(sample, now_ms) {
            beats += 1;
            println!("beat at {}ms ibi={:?}", beat.timestamp_ms, beat.ibi_ms);
        }
    }

    println!(
        "{} beats, bpm={:.1}, rmssd={:.1}ms",
        beats,
        detector.bpm(),
        detector.rmssd_ms()
    );
    Ok(())
}
