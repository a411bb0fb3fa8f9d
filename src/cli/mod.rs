//! CLI Module
//!
//! Command-line interface for the loudbench harness.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Loudbench - EBU R128 loudness meter benchmark
#[derive(Parser, Debug)]
#[command(name = "loudbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Restrict the run to these meters (comma-separated names)
    #[arg(long, global = true, value_delimiter = ',')]
    pub meters: Vec<String>,

    /// Dump results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Measure a WAV file, or every WAV file in a directory
    #[command(name = "measure")]
    Measure {
        /// Path to a WAV file or a directory of WAV files
        input: PathBuf,
    },

    /// Frequency-response benchmark over a sine sweep
    #[command(name = "sweep")]
    Sweep {
        /// Lowest sweep frequency in Hz
        #[arg(long, default_value_t = 1.0)]
        start: f64,

        /// Highest sweep frequency in Hz
        #[arg(long, default_value_t = 24000.0)]
        stop: f64,

        /// Number of sweep points
        #[arg(short, long, default_value_t = 100)]
        points: usize,

        /// Tone peak level in dBFS
        #[arg(short, long, default_value_t = -6.0, allow_hyphen_values = true)]
        gain: f64,

        /// Tone duration in seconds
        #[arg(long, default_value_t = 1.0)]
        duration: f64,

        /// Sample rate of the generated tones
        #[arg(long, default_value_t = 48000)]
        sample_rate: u32,

        /// Working directory for generated WAV files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Output directory for rendered plots
        #[arg(long, default_value = ".")]
        plot_dir: PathBuf,

        /// Skip plot rendering
        #[arg(long)]
        no_plot: bool,
    },

    /// Speed benchmark over white-noise files
    #[command(name = "speed")]
    Speed {
        /// Timed runs per meter per file
        #[arg(short, long, default_value_t = 3)]
        iterations: usize,

        /// White-noise file lengths in seconds (comma-separated)
        #[arg(long, value_delimiter = ',', default_values_t = [10.0, 30.0, 60.0, 120.0])]
        durations: Vec<f64>,

        /// Working directory for generated WAV files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Output directory for rendered plots
        #[arg(long, default_value = ".")]
        plot_dir: PathBuf,

        /// Skip plot rendering
        #[arg(long)]
        no_plot: bool,
    },

    /// Generate the synthetic test corpus without measuring it
    #[command(name = "generate")]
    Generate {
        /// Directory the corpus is written into
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_defaults() {
        let cli = Cli::parse_from(["loudbench", "sweep"]);
        match cli.command {
            Commands::Sweep {
                start,
                stop,
                points,
                gain,
                duration,
                sample_rate,
                ..
            } => {
                assert_eq!(start, 1.0);
                assert_eq!(stop, 24000.0);
                assert_eq!(points, 100);
                assert_eq!(gain, -6.0);
                assert_eq!(duration, 1.0);
                assert_eq!(sample_rate, 48000);
            }
            other => panic!("expected sweep, got {:?}", other),
        }
    }

    #[test]
    fn test_meter_filter_is_comma_separated() {
        let cli = Cli::parse_from(["loudbench", "--meters", "ebur128,ffmpeg", "measure", "x.wav"]);
        assert_eq!(cli.meters, vec!["ebur128", "ffmpeg"]);
    }

    #[test]
    fn test_speed_duration_list() {
        let cli = Cli::parse_from(["loudbench", "speed", "--durations", "5,15"]);
        match cli.command {
            Commands::Speed { durations, .. } => assert_eq!(durations, vec![5.0, 15.0]),
            other => panic!("expected speed, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_gain_parses() {
        let cli = Cli::parse_from(["loudbench", "sweep", "--gain", "-23.0"]);
        match cli.command {
            Commands::Sweep { gain, .. } => assert_eq!(gain, -23.0),
            other => panic!("expected sweep, got {:?}", other),
        }
    }
}
