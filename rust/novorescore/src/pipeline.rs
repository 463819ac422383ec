//! One dataset, start to finish: identification table -> feature table.
//!
//! Target and decoy datasets run through [`process_dataset`] independently,
//! they only meet when the scoring-tool input is written.

use crate::config::PipelineConfig;
use crate::data_sources::{
    SpectrumLocator,
    attach_spectrum_metadata,
    extract_spectrum_metadata,
    read_identification_table,
    requested_spectra,
};
use crate::errors::NovoRescoreError;
use crate::features::{
    FeatureGenerator,
    FeatureJoiner,
    FeatureTable,
    build_generators,
    psm_from_identification,
    run_generators,
};
use crate::models::{
    DatasetLabel,
    Psm,
};
use crate::modifications::ModificationNormalizer;
use crate::output::{
    OutputAssembler,
    PIN_FILE_NAME,
    write_feature_table_file,
    write_pin_file,
};
use crate::transform::IdentificationTransformer;
use std::path::{
    Path,
    PathBuf,
};
use std::time::Instant;
use tracing::info;

/// The two inputs of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetInputs {
    pub spectrum_dir: PathBuf,
    pub identification_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub target_rows: usize,
    pub decoy_rows: usize,
    pub pin_rows: usize,
    pub pin_path: PathBuf,
}

pub fn process_dataset(
    config: &PipelineConfig,
    inputs: &DatasetInputs,
    label: DatasetLabel,
    generators: &[Box<dyn FeatureGenerator>],
) -> Result<FeatureTable, NovoRescoreError> {
    let start = Instant::now();
    info!(
        "Processing {} dataset {}",
        label.as_str(),
        inputs.identification_path.display()
    );

    let table = read_identification_table(&inputs.identification_path)?;
    let records = table.records(&config.columns)?;

    let locator = SpectrumLocator::from_dir(&inputs.spectrum_dir, &config.spectrum_extensions)?;
    let resolved = locator.resolve_all(&table.run_locations);
    let requests = requested_spectra(&records, &resolved);
    let picked = extract_spectrum_metadata(&requests)?;
    let located = attach_spectrum_metadata(records, &resolved, &picked);

    let transformer = IdentificationTransformer::new(
        config.filters.clone(),
        config.modifications.bracket_mappings.clone(),
    );
    let transformed = transformer.transform(&located);
    let rank_one = transformed.rank_one();

    let mut psms: Vec<Psm> = rank_one.iter().map(psm_from_identification).collect();
    ModificationNormalizer::new(&config.modifications).normalize(&mut psms)?;
    run_generators(generators, &mut psms)?;

    let joined = FeatureJoiner::new(config.features.cosine_feature.clone()).join(&rank_one, &psms);
    info!(
        "Finished {} dataset in {:?}",
        label.as_str(),
        start.elapsed()
    );
    Ok(joined)
}

/// Processes target then decoy and writes both feature tables plus the
/// scoring-tool input into `output_dir`, which is created when missing.
///
/// `make_generators` receives the spectrum directory of the dataset being
/// processed.
pub fn run_pipeline<F>(
    config: &PipelineConfig,
    target: &DatasetInputs,
    decoy: &DatasetInputs,
    output_dir: &Path,
    make_generators: F,
) -> Result<RunSummary, NovoRescoreError>
where
    F: Fn(&Path) -> Vec<Box<dyn FeatureGenerator>>,
{
    std::fs::create_dir_all(output_dir).map_err(|e| NovoRescoreError::Io {
        source: e,
        path: Some(output_dir.to_path_buf()),
    })?;

    let mut tables = Vec::with_capacity(2);
    for (label, inputs) in [(DatasetLabel::Target, target), (DatasetLabel::Decoy, decoy)] {
        let generators = make_generators(&inputs.spectrum_dir);
        let table = process_dataset(config, inputs, label, &generators)?;
        write_feature_table_file(&table, &output_dir.join(label.features_file_name()))?;
        tables.push((label, table));
    }

    info!("Generating scoring-tool input");
    let assembler = OutputAssembler::new(config.filters.min_score, &config.features);
    let target_rows = assembler.assemble(&tables[0].1, tables[0].0);
    let decoy_rows = assembler.assemble(&tables[1].1, tables[1].0);
    let pin_path = output_dir.join(PIN_FILE_NAME);
    write_pin_file(&target_rows, &decoy_rows, &pin_path)?;

    Ok(RunSummary {
        target_rows: tables[0].1.len(),
        decoy_rows: tables[1].1.len(),
        pin_rows: target_rows.len() + decoy_rows.len(),
        pin_path,
    })
}

/// [`run_pipeline`] with the generators described by the configuration.
pub fn run_configured_pipeline(
    config: &PipelineConfig,
    target: &DatasetInputs,
    decoy: &DatasetInputs,
    output_dir: &Path,
) -> Result<RunSummary, NovoRescoreError> {
    run_pipeline(config, target, decoy, output_dir, |dir| {
        build_generators(&config.features, dir)
    })
}
