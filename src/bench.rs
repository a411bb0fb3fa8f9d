//! Timing harness and benchmark drivers
//!
//! Wraps every adapter call in a wall-clock timer and derives the
//! real-time factor (signal duration / measurement time). Two benchmark
//! drivers sit on top: the frequency sweep, which measures every meter
//! against a grid of sine tones, and the speed benchmark, which times the
//! meters on white-noise files of increasing length.
//!
//! Everything runs sequentially; subprocess calls block one at a time.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use log::info;
use serde::Serialize;

use crate::error::{LoudbenchError, Result};
use crate::meters::{LoudnessMeter, MeterRegistry};
use crate::signal::{Signal, TestFile};

/// One meter's result for one file.
#[derive(Debug, Clone, Serialize)]
pub struct Measurement {
    pub meter: String,
    /// Integrated loudness in LUFS
    pub lufs: f64,
    /// Wall-clock measurement time in seconds
    pub elapsed_secs: f64,
    /// Real-time factor: signal duration / measurement time
    pub rtf: f64,
}

/// Ordered results for one input file, one entry per meter in registry order.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub duration_secs: f64,
    pub measurements: Vec<Measurement>,
}

/// Run one meter against one file under the wall clock.
pub fn run_meter(meter: &dyn LoudnessMeter, file: &TestFile) -> Result<Measurement> {
    let start = Instant::now();
    let lufs = meter.measure(file)?;
    let elapsed_secs = start.elapsed().as_secs_f64();

    Ok(Measurement {
        meter: meter.name().to_string(),
        lufs,
        elapsed_secs,
        rtf: real_time_factor(file.duration_secs, elapsed_secs),
    })
}

/// Measure one file with every meter in the registry, in registry order.
pub fn measure_file(registry: &MeterRegistry, file: &TestFile) -> Result<FileReport> {
    let mut measurements = Vec::with_capacity(registry.len());

    for meter in registry.meters() {
        measurements.push(run_meter(meter.as_ref(), file)?);
    }

    Ok(FileReport {
        file: file.path.clone(),
        duration_secs: file.duration_secs,
        measurements,
    })
}

/// Signal duration divided by processing time; >1 means faster than real time.
pub fn real_time_factor(signal_duration_secs: f64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        f64::INFINITY
    } else {
        signal_duration_secs / elapsed_secs
    }
}

// ============================================================================
// Frequency sweep
// ============================================================================

/// Parameters for the frequency-response sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub start_hz: f64,
    pub stop_hz: f64,
    pub points: usize,
    pub gain_db: f64,
    pub duration_secs: f64,
    pub sample_rate: u32,
    /// Directory the per-frequency WAV files are written into
    pub data_dir: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            start_hz: 1.0,
            stop_hz: 24_000.0,
            points: 100,
            gain_db: -6.0,
            duration_secs: 1.0,
            sample_rate: 48_000,
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Frequency-response sweep results: per-meter loudness series over a
/// shared frequency grid, in registry order.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResults {
    pub frequencies: Vec<f64>,
    pub gain_db: f64,
    /// (meter name, LUFS per frequency)
    pub series: Vec<(String, Vec<f64>)>,
}

/// Generate one sine file per grid frequency and measure it with every meter.
pub fn freq_sweep(registry: &MeterRegistry, cfg: &SweepConfig) -> Result<SweepResults> {
    let freq_dir = cfg.data_dir.join("freqs");
    std::fs::create_dir_all(&freq_dir)?;

    let frequencies = linspace(cfg.start_hz, cfg.stop_hz, cfg.points);
    let mut series: Vec<(String, Vec<f64>)> = registry
        .names()
        .into_iter()
        .map(|name| (name, Vec::with_capacity(frequencies.len())))
        .collect();

    info!(
        "Sweeping {} points from {} Hz to {} Hz at {} dB",
        cfg.points, cfg.start_hz, cfg.stop_hz, cfg.gain_db
    );

    for (idx, &freq) in frequencies.iter().enumerate() {
        print!(
            "\r* Evaluating {:.1} Hz - {}/{}",
            freq,
            idx + 1,
            frequencies.len()
        );
        std::io::stdout().flush()?;

        let path = freq_dir.join(format!("{:.1}Hz{:+.1}dB.wav", freq, cfg.gain_db));
        let file = Signal::sine(freq, cfg.gain_db, cfg.duration_secs, cfg.sample_rate)?
            .write_test_file(&path)?;

        for (meter, (_, values)) in registry.meters().iter().zip(series.iter_mut()) {
            let measurement = run_meter(meter.as_ref(), &file)?;
            values.push(measurement.lufs);
        }
    }
    println!();

    Ok(SweepResults {
        frequencies,
        gain_db: cfg.gain_db,
        series,
    })
}

// ============================================================================
// Speed benchmark
// ============================================================================

/// Parameters for the speed benchmark.
#[derive(Debug, Clone)]
pub struct SpeedConfig {
    /// White-noise file lengths in seconds
    pub durations_secs: Vec<f64>,
    /// Timed runs per meter per file
    pub iterations: usize,
    pub gain_db: f64,
    pub sample_rate: u32,
    pub data_dir: PathBuf,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        SpeedConfig {
            durations_secs: vec![10.0, 30.0, 60.0, 120.0],
            iterations: 3,
            gain_db: -12.0,
            sample_rate: 48_000,
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Speed benchmark results: mean elapsed time and mean RTF per meter per
/// duration, meters in registry order.
#[derive(Debug, Clone, Serialize)]
pub struct SpeedResults {
    pub durations_secs: Vec<f64>,
    pub meters: Vec<String>,
    /// `mean_elapsed[meter][duration]` in seconds
    pub mean_elapsed: Vec<Vec<f64>>,
    /// `mean_rtf[meter][duration]`
    pub mean_rtf: Vec<Vec<f64>>,
}

/// Generate white-noise files and time every meter over them.
///
/// # Errors
/// * `InvalidConfig` - If the iteration count is zero
pub fn speed_bench(registry: &MeterRegistry, cfg: &SpeedConfig) -> Result<SpeedResults> {
    if cfg.iterations == 0 {
        return Err(LoudbenchError::InvalidConfig {
            reason: "iteration count must be at least 1".to_string(),
        });
    }

    let noise_dir = cfg.data_dir.join("noise");
    std::fs::create_dir_all(&noise_dir)?;

    let meters = registry.names();
    let mut mean_elapsed = vec![Vec::with_capacity(cfg.durations_secs.len()); registry.len()];
    let mut mean_rtf = vec![Vec::with_capacity(cfg.durations_secs.len()); registry.len()];

    for &duration in &cfg.durations_secs {
        info!("Generating {:.0}s white-noise file", duration);
        let path = noise_dir.join(format!("noise-{:.0}s.wav", duration));
        let file = Signal::white_noise(duration, cfg.gain_db, cfg.sample_rate)?
            .write_test_file(&path)?;

        for (m_idx, meter) in registry.meters().iter().enumerate() {
            let mut elapsed_sum = 0.0;
            for run in 0..cfg.iterations {
                print!(
                    "\r* {} on {:.0}s noise - run {}/{}   ",
                    meter.name(),
                    duration,
                    run + 1,
                    cfg.iterations
                );
                std::io::stdout().flush()?;

                let measurement = run_meter(meter.as_ref(), &file)?;
                elapsed_sum += measurement.elapsed_secs;
            }
            let mean = elapsed_sum / cfg.iterations as f64;
            mean_elapsed[m_idx].push(mean);
            mean_rtf[m_idx].push(real_time_factor(duration, mean));
        }
    }
    println!();

    Ok(SpeedResults {
        durations_secs: cfg.durations_secs.clone(),
        meters,
        mean_elapsed,
        mean_rtf,
    })
}

/// `n` evenly spaced values over `[start, stop]`, endpoints included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    fn in_process_registry() -> MeterRegistry {
        MeterRegistry::all()
            .filter(&["ebur128".to_string(), "ebur128 (histogram)".to_string()])
            .unwrap()
    }

    #[test]
    fn test_linspace_endpoints() {
        let grid = linspace(1.0, 24000.0, 100);
        assert_eq!(grid.len(), 100);
        assert_relative_eq!(grid[0], 1.0);
        assert_relative_eq!(grid[99], 24000.0);
    }

    #[test]
    fn test_linspace_degenerate() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(5.0, 9.0, 1), vec![5.0]);
    }

    #[test]
    fn test_real_time_factor() {
        assert_relative_eq!(real_time_factor(10.0, 2.0), 5.0);
        assert_relative_eq!(real_time_factor(1.0, 4.0), 0.25);
        assert!(real_time_factor(1.0, 0.0).is_infinite());
    }

    #[test]
    fn test_measure_file_preserves_registry_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let file = Signal::sine(997.0, -6.0, 1.0, 48000)
            .unwrap()
            .write_test_file(&path)
            .unwrap();

        let registry = in_process_registry();
        let report = measure_file(&registry, &file).unwrap();

        assert_eq!(report.measurements.len(), 2);
        assert_eq!(report.measurements[0].meter, "ebur128");
        assert_eq!(report.measurements[1].meter, "ebur128 (histogram)");

        for m in &report.measurements {
            assert!(m.elapsed_secs > 0.0);
            assert!(m.rtf > 0.0);
            // 997 Hz sine at -6 dBFS peak calibrates to -9.01 LUFS
            assert!((m.lufs - (-9.01)).abs() < 0.5, "{}: {:.2}", m.meter, m.lufs);
        }
    }

    #[test]
    fn test_freq_sweep_shapes() {
        let dir = tempdir().unwrap();
        let cfg = SweepConfig {
            start_hz: 100.0,
            stop_hz: 1000.0,
            points: 4,
            duration_secs: 0.5,
            data_dir: dir.path().to_path_buf(),
            ..SweepConfig::default()
        };

        let registry = in_process_registry();
        let results = freq_sweep(&registry, &cfg).unwrap();

        assert_eq!(results.frequencies.len(), 4);
        assert_eq!(results.series.len(), 2);
        for (_, values) in &results.series {
            assert_eq!(values.len(), 4);
        }

        // Generated files land under <data_dir>/freqs
        assert!(dir.path().join("freqs").join("100.0Hz-6.0dB.wav").exists());
    }

    #[test]
    fn test_speed_bench_rejects_zero_iterations() {
        let dir = tempdir().unwrap();
        let cfg = SpeedConfig {
            durations_secs: vec![1.0],
            iterations: 0,
            data_dir: dir.path().to_path_buf(),
            ..SpeedConfig::default()
        };

        let registry = in_process_registry();
        let result = speed_bench(&registry, &cfg);
        assert!(matches!(
            result.err().unwrap(),
            LoudbenchError::InvalidConfig { .. }
        ));
    }

    #[test]
    fn test_speed_bench_shapes() {
        let dir = tempdir().unwrap();
        let cfg = SpeedConfig {
            durations_secs: vec![1.0, 2.0],
            iterations: 2,
            data_dir: dir.path().to_path_buf(),
            ..SpeedConfig::default()
        };

        let registry = in_process_registry();
        let results = speed_bench(&registry, &cfg).unwrap();

        assert_eq!(results.meters.len(), 2);
        assert_eq!(results.mean_elapsed[0].len(), 2);
        assert_eq!(results.mean_rtf[1].len(), 2);

        // In-process measurement of a 1s file is far faster than real time
        assert!(results.mean_rtf[0][0] > 1.0);
    }
}
