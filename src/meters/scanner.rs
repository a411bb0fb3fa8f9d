//! Subprocess adapter for the loudness-scanner tool
//!
//! Runs `loudness scan --force-plugin=PLUGIN FILE`. The tool prints one
//! line per file with the LUFS value as the first token, e.g.
//! `-9.7 LUFS, tone.wav`.

use std::path::PathBuf;
use std::process::Command;

use log::debug;

use crate::error::{LoudbenchError, Result};
use crate::meters::ffmpeg::spawn_err;
use crate::meters::LoudnessMeter;
use crate::signal::TestFile;

/// Environment variable overriding the loudness-scanner binary path
pub const SCANNER_ENV: &str = "LOUDBENCH_SCANNER";

/// Default decode plugin forced on the scanner, matching the benchmark's
/// ffmpeg-based decode path
pub const DEFAULT_PLUGIN: &str = "ffmpeg";

pub struct LoudnessScannerMeter {
    binary: PathBuf,
    plugin: String,
}

impl LoudnessScannerMeter {
    pub fn new() -> Self {
        Self::with_plugin(DEFAULT_PLUGIN)
    }

    pub fn with_plugin(plugin: &str) -> Self {
        let binary = std::env::var(SCANNER_ENV).unwrap_or_else(|_| "loudness".to_string());
        LoudnessScannerMeter {
            binary: PathBuf::from(binary),
            plugin: plugin.to_string(),
        }
    }
}

impl Default for LoudnessScannerMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoudnessMeter for LoudnessScannerMeter {
    fn name(&self) -> &str {
        "loudness-scanner"
    }

    fn is_available(&self) -> bool {
        // The scanner has no --version; a successful spawn is the probe
        Command::new(&self.binary).arg("--help").output().is_ok()
    }

    fn measure(&self, file: &TestFile) -> Result<f64> {
        let output = Command::new(&self.binary)
            .arg("scan")
            .arg(format!("--force-plugin={}", self.plugin))
            .arg(&file.path)
            .output()
            .map_err(|e| spawn_err(self.name(), &self.binary, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("loudness-scanner stdout: {}", stdout.trim_end());

        match parse_scan_output(&stdout) {
            Some(lufs) => Ok(lufs),
            None if !output.status.success() => Err(LoudbenchError::SubprocessFailed {
                command: format!("{} scan {}", self.binary.display(), file.path.display()),
                status: output.status.to_string(),
            }),
            None => Err(LoudbenchError::ParseFailure {
                meter: self.name().to_string(),
                reason: format!("no numeric token in: '{}'", stdout.trim_end()),
            }),
        }
    }
}

/// First whitespace token of the scan output is the LUFS value.
fn parse_scan_output(stdout: &str) -> Option<f64> {
    stdout.split_whitespace().next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_scan_output() {
        assert_eq!(parse_scan_output("-9.7 LUFS, tone.wav\n"), Some(-9.7));
        assert_eq!(parse_scan_output("  -23.0 LUFS, x.wav"), Some(-23.0));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(parse_scan_output("error: no such file\n"), None);
        assert_eq!(parse_scan_output(""), None);
    }

    #[test]
    fn test_plugin_flag_default() {
        let meter = LoudnessScannerMeter::new();
        assert_eq!(meter.plugin, "ffmpeg");
    }

    #[test]
    fn test_missing_binary_reports_meter_unavailable() {
        let meter = LoudnessScannerMeter {
            binary: PathBuf::from("/no/such/loudness-binary"),
            plugin: DEFAULT_PLUGIN.to_string(),
        };
        let file = TestFile {
            path: PathBuf::from("tone.wav"),
            sample_rate: 48000,
            channels: 1,
            duration_secs: 1.0,
        };

        match meter.measure(&file) {
            Err(LoudbenchError::MeterUnavailable { meter, .. }) => {
                assert_eq!(meter, "loudness-scanner");
            }
            other => panic!("expected MeterUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_without_binary() {
        std::env::set_var(SCANNER_ENV, "/no/such/binary");
        let meter = LoudnessScannerMeter::new();
        assert!(!meter.is_available());
        std::env::remove_var(SCANNER_ENV);
    }
}
