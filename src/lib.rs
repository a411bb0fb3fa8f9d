//! Loudbench - EBU R128 Loudness Meter Benchmark
//!
//! Loudbench compares independent implementations of the EBU R128 /
//! ITU-R BS.1770 integrated-loudness measurement against each other:
//! an in-process Rust implementation (the `ebur128` crate) and external
//! binaries (`ffmpeg`, `loudness-scanner`) invoked as subprocesses.
//!
//! # Architecture
//!
//! The pipeline is a straight line:
//! 1. `signal` generates synthetic WAV test files (sine tones, white noise)
//! 2. `meters` measures each file with every registered implementation
//! 3. `bench` times each call and derives the real-time factor
//! 4. `report` prints comparison tables, `plot` renders comparison charts
//!
//! None of the loudness DSP lives here; every measurement is delegated to
//! the wrapped library or binary.

pub mod audio;
pub mod bench;
pub mod cli;
pub mod error;
pub mod meters;
pub mod plot;
pub mod report;
pub mod signal;

pub use error::{LoudbenchError, Result};
