//! Loudbench CLI - EBU R128 Loudness Meter Benchmark
//!
//! Command-line entry point for the loudbench harness.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;

use loudbench::bench::{SpeedConfig, SweepConfig};
use loudbench::cli::{commands, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger; --verbose raises the default level to debug
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("loudbench v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Measure { input } => commands::measure(&input, &cli.meters, cli.json),
        Commands::Sweep {
            start,
            stop,
            points,
            gain,
            duration,
            sample_rate,
            data_dir,
            plot_dir,
            no_plot,
        } => {
            let cfg = SweepConfig {
                start_hz: start,
                stop_hz: stop,
                points,
                gain_db: gain,
                duration_secs: duration,
                sample_rate,
                data_dir,
            };
            commands::sweep(cfg, &plot_dir, no_plot, &cli.meters, cli.json)
        }
        Commands::Speed {
            iterations,
            durations,
            data_dir,
            plot_dir,
            no_plot,
        } => {
            let cfg = SpeedConfig {
                durations_secs: durations,
                iterations,
                data_dir,
                ..SpeedConfig::default()
            };
            commands::speed(cfg, &plot_dir, no_plot, &cli.meters, cli.json)
        }
        Commands::Generate { data_dir } => commands::generate(&data_dir),
    };

    result?;
    Ok(())
}
