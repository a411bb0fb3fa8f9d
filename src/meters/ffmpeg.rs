//! Subprocess adapter for ffmpeg's loudnorm filter
//!
//! Runs `ffmpeg -i FILE -af loudnorm=print_format=summary -f null -` and
//! extracts the `Input Integrated` value from stderr, where ffmpeg prints
//! the loudnorm summary.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use log::debug;

use crate::error::{LoudbenchError, Result};
use crate::meters::LoudnessMeter;
use crate::signal::TestFile;

/// Environment variable overriding the ffmpeg binary path
pub const FFMPEG_ENV: &str = "LOUDBENCH_FFMPEG";

pub struct FfmpegMeter {
    binary: PathBuf,
}

impl FfmpegMeter {
    pub fn new() -> Self {
        let binary = std::env::var(FFMPEG_ENV).unwrap_or_else(|_| "ffmpeg".to_string());
        FfmpegMeter {
            binary: PathBuf::from(binary),
        }
    }
}

impl Default for FfmpegMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoudnessMeter for FfmpegMeter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn measure(&self, file: &TestFile) -> Result<f64> {
        let output = Command::new(&self.binary)
            .arg("-i")
            .arg(&file.path)
            .args(["-af", "loudnorm=print_format=summary", "-f", "null", "-"])
            .output()
            .map_err(|e| spawn_err(self.name(), &self.binary, e))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("ffmpeg produced {} bytes of stderr", stderr.len());

        match parse_loudnorm_summary(&stderr) {
            Some(lufs) => Ok(lufs),
            None if !output.status.success() => Err(LoudbenchError::SubprocessFailed {
                command: format!("{} -i {}", self.binary.display(), file.path.display()),
                status: output.status.to_string(),
            }),
            None => Err(LoudbenchError::ParseFailure {
                meter: self.name().to_string(),
                reason: "no 'Input Integrated' line in stderr".to_string(),
            }),
        }
    }
}

/// Classify a spawn failure: a missing binary means the meter is
/// unavailable, anything else is a plain I/O error.
pub(crate) fn spawn_err(
    meter: &str,
    binary: &std::path::Path,
    e: std::io::Error,
) -> LoudbenchError {
    if e.kind() == std::io::ErrorKind::NotFound {
        LoudbenchError::MeterUnavailable {
            meter: meter.to_string(),
            reason: format!("binary '{}' not found", binary.display()),
        }
    } else {
        LoudbenchError::Io(e)
    }
}

/// Extract the integrated loudness from a loudnorm summary block.
///
/// The relevant line reads `Input Integrated:   -9.7 LUFS`; the value is
/// the second-to-last whitespace token.
fn parse_loudnorm_summary(stderr: &str) -> Option<f64> {
    let line = stderr.lines().find(|l| l.contains("Input Integrated"))?;
    let mut tokens = line.split_whitespace().rev();
    tokens.next()?; // trailing "LUFS"
    tokens.next()?.parse().ok()
}
