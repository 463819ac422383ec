pub mod config;
pub mod data_sources;
pub mod decoy;
pub mod errors;
pub mod features;
pub mod models;
pub mod modifications;
pub mod output;
pub mod pipeline;
pub mod transform;
pub mod utils;

pub use config::PipelineConfig;
pub use decoy::DecoySpectraJob;
pub use errors::{
    NovoRescoreError,
    Result,
};
pub use features::{
    FeatureGenerator,
    FeatureTable,
};
pub use models::{
    DatasetLabel,
    Psm,
};
pub use pipeline::{
    DatasetInputs,
    RunSummary,
    process_dataset,
    run_configured_pipeline,
    run_pipeline,
};
