//! Decoy spectrum generation stage: wraps the native precursor-swap tool.

use clap::Parser;
use novorescore::DecoySpectraJob;
use novorescore::errors::SubprocessError;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{
    error,
    info,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate decoy spectra from a directory of .mgf files", long_about = None)]
struct Cli {
    /// Directory with the input .mgf files
    #[arg(short, long)]
    input_dir: PathBuf,

    /// Output directory, created when missing
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Precursor tolerance in ppm (0.1 - 1000), truncated to an integer
    #[arg(short, long)]
    precursor_tolerance: f64,

    /// Java heap size in GB (1 - 64)
    #[arg(short, long)]
    memory: u32,

    /// Random seed (1 - 999999)
    #[arg(short, long)]
    random_seed: u32,

    /// Path to the precursor-swap jar
    #[arg(short, long, default_value = "PrecursorSwap.jar")]
    jar: PathBuf,

    /// Java launcher
    #[arg(long, default_value = "java")]
    java: String,
}

fn main() -> std::result::Result<(), SubprocessError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Cli::parse();
    let job = DecoySpectraJob {
        input_dir: args.input_dir,
        output_dir: args.output_dir,
        precursor_tolerance_ppm: args.precursor_tolerance,
        memory_gb: args.memory,
        random_seed: args.random_seed,
        jar_path: args.jar,
        java_program: args.java,
    };
    info!("Decoy job: {:#?}", job);

    match job.run() {
        Ok(out) => {
            info!("Decoy spectra generation completed successfully");
            if !out.stdout.trim().is_empty() {
                info!("{}", out.stdout.trim());
            }
            Ok(())
        }
        Err(e) => {
            if matches!(e, SubprocessError::VersionMismatch { .. }) {
                error!("The jar needs a newer Java runtime (Java 21 recommended)");
            }
            Err(e)
        }
    }
}
