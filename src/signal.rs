//! Synthetic test-signal generation
//!
//! Produces the WAV files the benchmarks run against: pure tones for the
//! frequency sweep and white noise for the speed benchmark. Tones are
//! generated as `10^(gain/20) * cos(2*pi*f*t)`, so `gain_db` is the peak
//! level in dBFS.
//!
//! Frequencies above Nyquist are allowed on purpose: the sweep runs to
//! 24 kHz at fs=48 kHz, and how each meter handles the aliased top end is
//! part of what the comparison shows.

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use rand::Rng;
use rand_distr::Uniform;

use crate::error::{LoudbenchError, Result};

/// A generated or discovered test input: a path plus the metadata the
/// timing harness needs (sample rate, duration).
#[derive(Debug, Clone)]
pub struct TestFile {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_secs: f64,
}

impl TestFile {
    /// Build a `TestFile` from an existing WAV file by reading its header.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LoudbenchError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let reader = WavReader::open(path).map_err(|e| LoudbenchError::InvalidAudio {
            reason: format!("Failed to open WAV file: {}", e),
            source: Some(Box::new(e)),
        })?;

        let spec = reader.spec();
        let frames = reader.duration() as f64;

        Ok(TestFile {
            path: path.to_path_buf(),
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            duration_secs: frames / spec.sample_rate as f64,
        })
    }
}

/// A mono signal buffer awaiting a WAV write.
#[derive(Debug, Clone)]
pub struct Signal {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Signal {
    /// Generate a cosine tone at `frequency` Hz with peak level `gain_db` dBFS.
    ///
    /// # Errors
    /// * `InvalidSignal` - If duration is not positive or frequency is negative
    pub fn sine(frequency: f64, gain_db: f64, duration_secs: f64, sample_rate: u32) -> Result<Self> {
        validate_duration(duration_secs, sample_rate)?;
        if frequency < 0.0 {
            return Err(LoudbenchError::InvalidSignal {
                reason: format!("negative frequency: {}", frequency),
            });
        }

        let num_samples = (duration_secs * sample_rate as f64) as usize;
        let amplitude = db_to_linear(gain_db);
        let angular_freq = 2.0 * std::f64::consts::PI * frequency / sample_rate as f64;

        let samples = (0..num_samples)
            .map(|i| (amplitude * (angular_freq * i as f64).cos()) as f32)
            .collect();

        Ok(Signal {
            samples,
            sample_rate,
        })
    }

    /// Generate uniform white noise with peak level `gain_db` dBFS.
    pub fn white_noise(duration_secs: f64, gain_db: f64, sample_rate: u32) -> Result<Self> {
        validate_duration(duration_secs, sample_rate)?;

        let num_samples = (duration_secs * sample_rate as f64) as usize;
        let amplitude = db_to_linear(gain_db) as f32;
        let dist = Uniform::new_inclusive(-amplitude, amplitude);

        let mut rng = rand::thread_rng();
        let samples = (0..num_samples).map(|_| rng.sample(dist)).collect();

        Ok(Signal {
            samples,
            sample_rate,
        })
    }

    /// Signal duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    /// Write the signal as a 32-bit float WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let mut writer = WavWriter::create(path, spec).map_err(wav_io_err)?;
        for &sample in &self.samples {
            writer.write_sample(sample).map_err(wav_io_err)?;
        }
        writer.finalize().map_err(wav_io_err)?;

        Ok(())
    }

    /// Write the signal as an integer WAV file (16 or 24 bit).
    ///
    /// Some wrapped binaries choke on float WAV; this is the fallback format.
    pub fn write_wav_int(&self, path: &Path, bit_depth: u16) -> Result<()> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: bit_depth,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(path, spec).map_err(wav_io_err)?;
        match bit_depth {
            16 => {
                for &sample in &self.samples {
                    let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
                    writer.write_sample(scaled).map_err(wav_io_err)?;
                }
            }
            24 => {
                // 24-bit stored as i32 in hound
                for &sample in &self.samples {
                    let scaled = (sample * 8388607.0).clamp(-8388608.0, 8388607.0) as i32;
                    writer.write_sample(scaled).map_err(wav_io_err)?;
                }
            }
            _ => {
                return Err(LoudbenchError::UnsupportedFormat {
                    format: format!("{}-bit integer output (only 16, 24 supported)", bit_depth),
                });
            }
        }
        writer.finalize().map_err(wav_io_err)?;

        Ok(())
    }

    /// Write the signal to `path` and return the matching `TestFile`.
    pub fn write_test_file(&self, path: &Path) -> Result<TestFile> {
        self.write_wav(path)?;

        Ok(TestFile {
            path: path.to_path_buf(),
            sample_rate: self.sample_rate,
            channels: 1,
            duration_secs: self.duration_secs(),
        })
    }
}

/// Convert a dB value to linear amplitude
pub fn db_to_linear(db: f64) -> f64 {
    10.0f64.powf(db / 20.0)
}

fn validate_duration(duration_secs: f64, sample_rate: u32) -> Result<()> {
    if duration_secs <= 0.0 || !duration_secs.is_finite() {
        return Err(LoudbenchError::InvalidSignal {
            reason: format!("non-positive duration: {}", duration_secs),
        });
    }
    if sample_rate == 0 {
        return Err(LoudbenchError::InvalidSignal {
            reason: "zero sample rate".to_string(),
        });
    }
    Ok(())
}

fn wav_io_err(e: hound::Error) -> LoudbenchError {
    LoudbenchError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
}
