use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the target spectrum (.mgf) files
    #[arg(long, alias = "target_mgf_dir")]
    pub target_mgf_dir: PathBuf,

    /// Target identification table (mzTab, optionally .gz/.zst)
    #[arg(long, alias = "target_result_path")]
    pub target_result_path: PathBuf,

    /// Directory holding the decoy spectrum (.mgf) files
    #[arg(long, alias = "decoy_mgf_dir")]
    pub decoy_mgf_dir: PathBuf,

    /// Decoy identification table (mzTab, optionally .gz/.zst)
    #[arg(long, alias = "decoy_result_path")]
    pub decoy_result_path: PathBuf,

    /// Path to the output directory, created when missing
    #[arg(short, long, alias = "output_dir")]
    pub output_dir: PathBuf,

    /// Path to a JSON configuration file (defaults are used when absent)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
