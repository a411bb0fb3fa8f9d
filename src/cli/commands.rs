//! CLI Command Implementations
//!
//! Implements the actual logic for each subcommand: build the meter
//! registry, drive the benchmark, print tables or JSON, render plots.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use walkdir::WalkDir;

use crate::bench::{self, SpeedConfig, SweepConfig};
use crate::error::{LoudbenchError, Result};
use crate::meters::MeterRegistry;
use crate::plot;
use crate::report;
use crate::signal::{Signal, TestFile};

/// Build the registry for a run: available meters, optionally restricted
/// to an explicit name list.
fn build_registry(filter: &[String]) -> Result<MeterRegistry> {
    let registry = if filter.is_empty() {
        MeterRegistry::available()
    } else {
        // An explicitly requested meter must exist even if unavailable,
        // so validate the names against the full set first.
        MeterRegistry::all().filter(filter)?
    };

    if registry.is_empty() {
        return Err(LoudbenchError::MeterUnavailable {
            meter: "registry".to_string(),
            reason: "no loudness implementation is available on this machine".to_string(),
        });
    }

    Ok(registry)
}

/// Measure one file or every WAV file under a directory.
pub fn measure(input: &Path, meter_filter: &[String], json: bool) -> Result<()> {
    let registry = build_registry(meter_filter)?;

    let test_files = collect_input_files(input)?;
    println!("Found {} files.", test_files.len());

    if !json {
        report::print_run_header(&registry.names());
    }

    let mut reports = Vec::with_capacity(test_files.len());

    for (idx, file) in test_files.iter().enumerate() {
        print!("\r* Measuring {}/{}", idx + 1, test_files.len());
        std::io::stdout().flush()?;

        reports.push(bench::measure_file(&registry, file)?);
    }
    println!();

    if json {
        report::print_json(&reports)?;
    } else {
        for file_report in &reports {
            report::print_file_report(file_report);
        }
    }

    Ok(())
}

/// Run the frequency-response sweep and render its plots.
pub fn sweep(
    cfg: SweepConfig,
    plot_dir: &Path,
    no_plot: bool,
    meter_filter: &[String],
    json: bool,
) -> Result<()> {
    let registry = build_registry(meter_filter)?;

    if !json {
        report::print_run_header(&registry.names());
    }

    let results = bench::freq_sweep(&registry, &cfg)?;

    if json {
        report::print_json(&results)?;
    } else {
        report::print_sweep_summary(&results);
    }

    if no_plot {
        return Ok(());
    }

    std::fs::create_dir_all(plot_dir)?;

    // Full range plus the three zoom windows the comparison has always
    // shipped with: sub-audio gating floor, midband agreement, aliased top.
    let windows: [(f64, f64, Option<(f64, f64)>, &str); 4] = [
        (cfg.start_hz, cfg.stop_hz, None, "full-sweep.png"),
        (1.0, 10.0, None, "1Hz-10Hz.png"),
        (1000.0, 4000.0, Some((-8.0, -5.5)), "1kHz-4kHz.png"),
        (20000.0, 24000.0, Some((-10.0, -2.0)), "20kHz-24kHz.png"),
    ];

    for (x0, x1, y_range, name) in windows {
        if x1 < cfg.start_hz || x0 > cfg.stop_hz {
            continue; // window outside the swept band
        }
        let path = plot_dir.join(name);
        let title = format!("Frequency response, {:.0} Hz - {:.0} Hz", x0, x1);
        plot::plot_freq_response(&results, (x0, x1), y_range, &title, &path)?;
        info!("Wrote {}", path.display());
    }

    Ok(())
}

/// Run the speed benchmark and render its plot.
pub fn speed(
    cfg: SpeedConfig,
    plot_dir: &Path,
    no_plot: bool,
    meter_filter: &[String],
    json: bool,
) -> Result<()> {
    let registry = build_registry(meter_filter)?;

    if !json {
        report::print_run_header(&registry.names());
    }

    let results = bench::speed_bench(&registry, &cfg)?;

    if json {
        report::print_json(&results)?;
    } else {
        report::print_speed_table(&results);
    }

    if !no_plot {
        std::fs::create_dir_all(plot_dir)?;
        let path = plot_dir.join("speed.png");
        plot::plot_speed(&results, &path)?;
        info!("Wrote {}", path.display());
    }

    Ok(())
}

/// Write the synthetic corpus to disk without measuring it.
pub fn generate(data_dir: &Path) -> Result<()> {
    let tone_dir = data_dir.join("tones");
    let noise_dir = data_dir.join("noise");
    std::fs::create_dir_all(&tone_dir)?;
    std::fs::create_dir_all(&noise_dir)?;

    let frequencies = [100.0, 440.0, 997.0, 5000.0, 10000.0];
    let gains = [-3.0, -6.0, -12.0, -24.0];
    let noise_durations = [10.0, 30.0, 60.0];

    let mut count = 0usize;

    for &freq in &frequencies {
        for &gain in &gains {
            let path = tone_dir.join(format!("{:.1}Hz{:+.1}dB.wav", freq, gain));
            Signal::sine(freq, gain, 5.0, 48_000)?.write_wav(&path)?;
            count += 1;
        }
    }

    for &duration in &noise_durations {
        let path = noise_dir.join(format!("noise-{:.0}s.wav", duration));
        Signal::white_noise(duration, -12.0, 48_000)?.write_wav(&path)?;
        count += 1;
    }

    println!("Generated {} files under {}", count, data_dir.display());

    Ok(())
}

/// Resolve the measure input to an ordered list of test files.
///
/// A file is used as-is; a directory is scanned recursively for `.wav`
/// files, sorted by path. Anything else is an error.
fn collect_input_files(input: &Path) -> Result<Vec<TestFile>> {
    if input.is_file() {
        return Ok(vec![TestFile::from_path(input)?]);
    }

    if input.is_dir() {
        let mut paths: Vec<PathBuf> = WalkDir::new(input)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext.eq_ignore_ascii_case("wav"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        return paths.iter().map(|p| TestFile::from_path(p)).collect();
    }

    Err(LoudbenchError::InvalidInput {
        input: input.display().to_string(),
    })
}
