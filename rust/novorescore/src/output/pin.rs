//! Scoring-tool input assembly.

use crate::config::FeatureConfig;
use crate::errors::NovoRescoreError;
use crate::features::FeatureTable;
use crate::models::DatasetLabel;
use crate::transform::keys;
use crate::utils::format_float;
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const PIN_FILE_NAME: &str = "t_d.pin";
pub const PIN_HEADER: [&str; 8] = [
    "SpecId", "Label", "ScanNr", "SA", "absdRT", "absdMppm", "Peptide", "Proteins",
];

#[derive(Debug, Clone, PartialEq)]
pub struct PinRow {
    pub ss: String,
    pub label: i8,
    pub scan_nr: String,
    pub spectral_angle: f64,
    pub abs_delta_rt: f64,
    pub abs_delta_ppm: f64,
    pub peptide: String,
    pub proteins: u32,
    pub charge: i32,
}

impl PinRow {
    pub fn spec_id(&self) -> String {
        keys::spec_id(&self.ss, self.charge)
    }

    fn record(&self) -> [String; 8] {
        [
            self.spec_id(),
            self.label.to_string(),
            self.scan_nr.clone(),
            format_float(self.spectral_angle),
            format_float(self.abs_delta_rt),
            format_float(self.abs_delta_ppm),
            self.peptide.clone(),
            self.proteins.to_string(),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct OutputAssembler {
    min_score: f64,
    rt_delta_feature: String,
    ppm_error_feature: String,
}

impl OutputAssembler {
    pub fn new(min_score: f64, features: &FeatureConfig) -> Self {
        Self {
            min_score,
            rt_delta_feature: features.rt_delta_feature.clone(),
            ppm_error_feature: features.ppm_error_feature.clone(),
        }
    }

    /// Drops rows scoring below the threshold and projects the rest onto the
    /// scoring-tool columns. Missing features come out as NaN.
    pub fn assemble(&self, table: &FeatureTable, dataset: DatasetLabel) -> Vec<PinRow> {
        let rt_idx = table.feature_index(&self.rt_delta_feature);
        let ppm_idx = table.feature_index(&self.ppm_error_feature);
        let pick = |features: &[f64], idx: Option<usize>| idx.map_or(f64::NAN, |i| features[i]);

        let rows: Vec<PinRow> = table
            .rows
            .iter()
            .filter(|x| x.score >= self.min_score)
            .map(|x| PinRow {
                ss: x.ss.clone(),
                label: dataset.label(),
                scan_nr: x.spectrum_id.clone(),
                spectral_angle: x.spectral_angle,
                abs_delta_rt: pick(&x.features, rt_idx),
                abs_delta_ppm: pick(&x.features, ppm_idx),
                peptide: x.peptide.clone(),
                proteins: 1,
                charge: x.charge,
            })
            .collect();
        info!("{} score >= {} rows: {}", dataset.as_str(), self.min_score, rows.len());
        rows
    }
}

/// Target rows first, then decoy rows.
pub fn write_pin<W: Write>(
    target: &[PinRow],
    decoy: &[PinRow],
    writer: W,
) -> Result<(), NovoRescoreError> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(PIN_HEADER)?;
    for row in target.iter().chain(decoy.iter()) {
        wtr.write_record(row.record())?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_pin_file(
    target: &[PinRow],
    decoy: &[PinRow],
    path: &Path,
) -> Result<(), NovoRescoreError> {
    let file = std::fs::File::create(path).map_err(|e| NovoRescoreError::Io {
        source: e,
        path: Some(path.to_path_buf()),
    })?;
    write_pin(target, decoy, std::io::BufWriter::new(file))?;
    info!(
        "Wrote {} rows ({} target, {} decoy) to {}",
        target.len() + decoy.len(),
        target.len(),
        decoy.len(),
        path.display()
    );
    Ok(())
}
