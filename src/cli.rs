use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tlaloc correlated multi-site rain-attenuation synthesizer.
#[derive(Parser)]
#[command(
    name = "tlaloc",
    version,
    about = "Correlated multi-site rain-attenuation time-series synthesis"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Synthesize attenuation series and stream them to Parquet.
    Generate(GenerateArgs),
    /// Compute per-site empirical CCDFs of a stored series.
    Ccdf(CcdfArgs),
}

/// Arguments for the `generate` subcommand.
#[derive(clap::Args)]
pub struct GenerateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "tlaloc.toml")]
    pub config: PathBuf,

    /// Override output Parquet path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for the `ccdf` subcommand.
#[derive(clap::Args)]
pub struct CcdfArgs {
    /// Path to a Parquet file written by `generate`.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Number of equal-width histogram bins.
    #[arg(short, long, default_value_t = 300)]
    pub bins: usize,

    /// Path for the CCDF JSON output. Defaults to `<input>.ccdf.json`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
