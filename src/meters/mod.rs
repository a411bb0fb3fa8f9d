//! Measurement adapters
//!
//! One adapter per wrapped loudness implementation. Each adapter is a thin
//! call-through: it takes a test file and returns the integrated loudness
//! that implementation reports, either via an in-process library call
//! (`ebur128`) or by spawning the external binary and parsing its text
//! output (`ffmpeg`, `loudness-scanner`).
//!
//! The registry holds adapters in a fixed order; that order defines table
//! rows and plot series everywhere downstream.

pub mod ebur128;
pub mod ffmpeg;
pub mod scanner;

use log::warn;

use crate::error::{LoudbenchError, Result};
use crate::signal::TestFile;

pub use self::ebur128::Ebur128Meter;
pub use self::ffmpeg::FfmpegMeter;
pub use self::scanner::LoudnessScannerMeter;

/// A wrapped loudness implementation.
pub trait LoudnessMeter {
    /// Stable display name, used as the ordered-mapping key in reports
    fn name(&self) -> &str;

    /// Whether the wrapped implementation can run on this machine.
    /// In-process meters are always available; subprocess meters probe
    /// for their binary.
    fn is_available(&self) -> bool {
        true
    }

    /// Measure integrated loudness of `file` in LUFS.
    fn measure(&self, file: &TestFile) -> Result<f64>;
}

/// Ordered collection of meters for one benchmark run.
pub struct MeterRegistry {
    meters: Vec<Box<dyn LoudnessMeter>>,
}

impl MeterRegistry {
    /// All known meters in canonical order, including unavailable ones.
    pub fn all() -> Self {
        MeterRegistry {
            meters: vec![
                Box::new(Ebur128Meter::new()),
                Box::new(Ebur128Meter::histogram()),
                Box::new(FfmpegMeter::new()),
                Box::new(LoudnessScannerMeter::new()),
            ],
        }
    }

    /// All meters whose implementation is present on this machine.
    ///
    /// A missing external binary drops that meter from the run with a
    /// warning instead of failing the whole comparison.
    pub fn available() -> Self {
        let mut registry = Self::all();
        registry.meters.retain(|m| {
            let ok = m.is_available();
            if !ok {
                warn!("Skipping '{}': implementation not available", m.name());
            }
            ok
        });
        registry
    }

    /// Restrict the registry to the named meters, preserving canonical order.
    ///
    /// # Errors
    /// * `UnknownMeter` - If a requested name matches no known meter
    pub fn filter(mut self, names: &[String]) -> Result<Self> {
        for name in names {
            if !self.meters.iter().any(|m| m.name() == name) {
                return Err(LoudbenchError::UnknownMeter { name: name.clone() });
            }
        }
        self.meters.retain(|m| names.iter().any(|n| n == m.name()));
        Ok(self)
    }

    pub fn meters(&self) -> &[Box<dyn LoudnessMeter>] {
        &self.meters
    }

    pub fn names(&self) -> Vec<String> {
        self.meters.iter().map(|m| m.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.meters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meters.is_empty()
    }
}
