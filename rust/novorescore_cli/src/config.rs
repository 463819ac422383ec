use novorescore::{
    DatasetInputs,
    PipelineConfig,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};

use crate::cli::Cli;
use crate::errors;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub target: DatasetConfig,
    pub decoy: DatasetConfig,
    pub output: OutputConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DatasetConfig {
    pub mgf_dir: PathBuf,
    pub result_path: PathBuf,
}

impl DatasetConfig {
    pub fn inputs(&self) -> DatasetInputs {
        DatasetInputs {
            spectrum_dir: self.mgf_dir.clone(),
            identification_path: self.result_path.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

pub fn load_pipeline_config(path: &Path) -> Result<PipelineConfig, errors::CliError> {
    let conf = match std::fs::File::open(path) {
        Ok(x) => x,
        Err(e) => {
            return Err(errors::CliError::Io {
                source: e.to_string(),
                path: Some(path.to_string_lossy().to_string()),
            });
        }
    };
    match serde_json::from_reader(std::io::BufReader::new(conf)) {
        Ok(x) => Ok(x),
        Err(e) => Err(errors::CliError::ParseError { msg: e.to_string() }),
    }
}

impl Config {
    pub fn with_cli_args(args: Cli) -> Result<Self, errors::CliError> {
        let pipeline = match args.config {
            Some(ref path) => load_pipeline_config(path)?,
            None => PipelineConfig::default(),
        };
        if pipeline.spectrum_extensions.is_empty() {
            return Err(errors::CliError::Config {
                source: "At least one spectrum file extension is required".to_string(),
            });
        }
        Ok(Self {
            target: DatasetConfig {
                mgf_dir: args.target_mgf_dir,
                result_path: args.target_result_path,
            },
            decoy: DatasetConfig {
                mgf_dir: args.decoy_mgf_dir,
                result_path: args.decoy_result_path,
            },
            output: OutputConfig {
                directory: args.output_dir,
            },
            pipeline,
        })
    }
}
