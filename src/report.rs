//! Result aggregation and table printing
//!
//! All output is plain text on stdout, one table per input file, plus
//! summary tables for the sweep and speed benchmarks. Column order always
//! follows meter registry order.

use chrono::Local;

use crate::bench::{FileReport, SpeedResults, SweepResults};
use crate::error::Result;

/// Print the run header with a timestamp and the meter lineup.
pub fn print_run_header(meters: &[String]) {
    println!("loudbench v{}", env!("CARGO_PKG_VERSION"));
    println!("Run started: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("Meters: {}", meters.join(", "));
    println!();
}

/// Print one per-file comparison table.
pub fn print_file_report(report: &FileReport) {
    println!("{}", report.file.display());
    println!("{:-<58}", "");
    println!(
        "{:<24} {:>9} {:>11} {:>9}",
        "meter", "LUFS", "elapsed", "RTF"
    );

    for m in &report.measurements {
        println!(
            "{:<24} {:>9.2} {:>10.3}s {:>8.1}x",
            m.meter, m.lufs, m.elapsed_secs, m.rtf
        );
    }
    println!();
}

/// Print the per-meter min/max/spread summary of a frequency sweep.
pub fn print_sweep_summary(results: &SweepResults) {
    println!(
        "Frequency sweep: {} points, {:.1} Hz - {:.1} Hz, tone gain {:.1} dB",
        results.frequencies.len(),
        results.frequencies.first().copied().unwrap_or(0.0),
        results.frequencies.last().copied().unwrap_or(0.0),
        results.gain_db
    );
    println!("{:-<58}", "");
    println!(
        "{:<24} {:>9} {:>9} {:>9}",
        "meter", "min", "max", "spread"
    );

    for (name, values) in &results.series {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!(
            "{:<24} {:>9.2} {:>9.2} {:>9.2}",
            name,
            min,
            max,
            max - min
        );
    }
    println!();
}

/// Print the speed benchmark table: rows = meters, columns = durations,
/// cells = mean RTF.
pub fn print_speed_table(results: &SpeedResults) {
    println!("Speed benchmark (mean RTF, higher is faster)");
    println!("{:-<70}", "");

    print!("{:<24}", "meter");
    for d in &results.durations_secs {
        print!(" {:>9}", format!("{:.0}s", d));
    }
    println!();

    for (m_idx, name) in results.meters.iter().enumerate() {
        print!("{:<24}", name);
        for rtf in &results.mean_rtf[m_idx] {
            print!(" {:>8.1}x", rtf);
        }
        println!();
    }
    println!();
}

/// Serialize any report structure to pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::Measurement;
    use std::path::PathBuf;

    fn sample_report() -> FileReport {
        FileReport {
            file: PathBuf::from("data/tone.wav"),
            duration_secs: 1.0,
            measurements: vec![
                Measurement {
                    meter: "ebur128".to_string(),
                    lufs: -9.68,
                    elapsed_secs: 0.004,
                    rtf: 250.0,
                },
                Measurement {
                    meter: "ffmpeg".to_string(),
                    lufs: -9.7,
                    elapsed_secs: 0.21,
                    rtf: 4.8,
                },
            ],
        }
    }

    #[test]
    fn test_json_report_keeps_meter_order() {
        let report = sample_report();
        let json = serde_json::to_value(&report).unwrap();

        let meters: Vec<&str> = json["measurements"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["meter"].as_str().unwrap())
            .collect();
        assert_eq!(meters, vec!["ebur128", "ffmpeg"]);
    }

    #[test]
    fn test_json_measurement_fields() {
        let report = sample_report();
        let json = serde_json::to_value(&report).unwrap();

        let first = &json["measurements"][0];
        assert_eq!(first["lufs"], -9.68);
        assert_eq!(first["rtf"], 250.0);
        assert_eq!(first["elapsed_secs"], 0.004);
    }

    #[test]
    fn test_print_functions_do_not_panic() {
        // Table printing is pure formatting; just exercise it
        let report = sample_report();
        print_file_report(&report);
        print_run_header(&["ebur128".to_string(), "ffmpeg".to_string()]);

        let sweep = SweepResults {
            frequencies: vec![100.0, 1000.0],
            gain_db: -6.0,
            series: vec![("ebur128".to_string(), vec![-9.7, -9.6])],
        };
        print_sweep_summary(&sweep);

        let speed = SpeedResults {
            durations_secs: vec![10.0],
            meters: vec!["ebur128".to_string()],
            mean_elapsed: vec![vec![0.05]],
            mean_rtf: vec![vec![200.0]],
        };
        print_speed_table(&speed);
    }
}
