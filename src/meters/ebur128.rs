//! In-process adapter for the `ebur128` crate
//!
//! Decodes the WAV file, feeds interleaved f32 frames to `EbuR128` and
//! reads back the gated integrated loudness. Two variants are registered:
//! the default block-list gating store and the histogram store, which is
//! the crate's alternate code path for the same BS.1770 gating.

use ebur128::{EbuR128, Mode};

use crate::audio::read_wav;
use crate::error::{LoudbenchError, Result};
use crate::meters::LoudnessMeter;
use crate::signal::TestFile;

pub struct Ebur128Meter {
    histogram: bool,
}

impl Ebur128Meter {
    pub fn new() -> Self {
        Ebur128Meter { histogram: false }
    }

    pub fn histogram() -> Self {
        Ebur128Meter { histogram: true }
    }

    fn mode(&self) -> Mode {
        if self.histogram {
            Mode::I | Mode::HISTOGRAM
        } else {
            Mode::I
        }
    }
}

impl Default for Ebur128Meter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoudnessMeter for Ebur128Meter {
    fn name(&self) -> &str {
        if self.histogram {
            "ebur128 (histogram)"
        } else {
            "ebur128"
        }
    }

    fn measure(&self, file: &TestFile) -> Result<f64> {
        let audio = read_wav(&file.path)?;

        let mut state = EbuR128::new(audio.channels as u32, audio.sample_rate, self.mode())
            .map_err(|e| meter_err(self.name(), e))?;

        state
            .add_frames_f32(&audio.samples)
            .map_err(|e| meter_err(self.name(), e))?;

        state.loudness_global().map_err(|e| meter_err(self.name(), e))
    }
}

fn meter_err(meter: &str, e: ebur128::Error) -> LoudbenchError {
    LoudbenchError::MeterFailed {
        meter: meter.to_string(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Signal;
    use tempfile::tempdir;

    /// Helper: generate a tone, write it, and measure it in-process
    fn measure_tone(meter: &Ebur128Meter, freq: f64, gain_db: f64) -> f64 {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let test_file = Signal::sine(freq, gain_db, 3.0, 48000)
            .unwrap()
            .write_test_file(&path)
            .unwrap();
        meter.measure(&test_file).unwrap()
    }

    #[test]
    fn test_sine_loudness_matches_theory() {
        // BS.1770 calibration: a 997 Hz sine at peak g dBFS reads g - 3.01
        // LKFS (the -0.691 offset cancels the pre-filter gain at 1 kHz)
        let meter = Ebur128Meter::new();
        let lufs = measure_tone(&meter, 997.0, -6.0);
        assert!(
            (lufs - (-9.01)).abs() < 0.5,
            "expected ~-9.01 LUFS, got {:.2}",
            lufs
        );
    }

    #[test]
    fn test_gain_tracks_linearly() {
        let meter = Ebur128Meter::new();
        let at_minus6 = measure_tone(&meter, 997.0, -6.0);
        let at_minus12 = measure_tone(&meter, 997.0, -12.0);
        let delta = at_minus6 - at_minus12;
        assert!(
            (delta - 6.0).abs() < 0.2,
            "6 dB gain step measured as {:.2} dB",
            delta
        );
    }

    #[test]
    fn test_histogram_mode_agrees_on_steady_tone() {
        // On a stationary signal the two gating stores must agree closely
        let block = measure_tone(&Ebur128Meter::new(), 997.0, -6.0);
        let hist = measure_tone(&Ebur128Meter::histogram(), 997.0, -6.0);
        assert!(
            (block - hist).abs() < 0.1,
            "block {:.3} vs histogram {:.3}",
            block,
            hist
        );
    }

    #[test]
    fn test_always_available() {
        assert!(Ebur128Meter::new().is_available());
    }

    #[test]
    fn test_missing_file_propagates() {
        let meter = Ebur128Meter::new();
        let file = TestFile {
            path: "/no/such/file.wav".into(),
            sample_rate: 48000,
            channels: 1,
            duration_secs: 1.0,
        };
        assert!(matches!(
            meter.measure(&file).unwrap_err(),
            LoudbenchError::FileNotFound { .. }
        ));
    }
}
