use crate::errors::NovoRescoreError;
use crate::features::FeatureTable;
use crate::utils::{
    format_float,
    format_optional_float,
};
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::info;

const IDENTIFICATION_COLUMNS: [&str; 6] = ["SS", "Peptide", "score", "z", "pep_len", "m/z"];
const PSM_COLUMNS: [&str; 3] = ["spectrum_id", "run", "peptidoform"];

/// Header of a feature table.
///
/// A name present on both sides of the join (other than `SS`) is written
/// twice, suffixed `_x` on the identification side and `_y` on the
/// generator side.
pub fn feature_table_header(table: &FeatureTable) -> Vec<String> {
    let right: Vec<&str> = PSM_COLUMNS
        .iter()
        .copied()
        .chain(table.feature_names.iter().map(|x| x.as_str()))
        .collect();

    let mut header = Vec::with_capacity(IDENTIFICATION_COLUMNS.len() + right.len() + 1);
    for name in IDENTIFICATION_COLUMNS {
        if name != "SS" && right.contains(&name) {
            header.push(format!("{}_x", name));
        } else {
            header.push(name.to_string());
        }
    }
    for name in right.iter() {
        if *name != "SS" && IDENTIFICATION_COLUMNS.contains(name) {
            header.push(format!("{}_y", name));
        } else {
            header.push(name.to_string());
        }
    }
    header.push("SA".to_string());
    header
}

pub fn write_feature_table<W: Write>(
    table: &FeatureTable,
    writer: W,
) -> Result<(), NovoRescoreError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(feature_table_header(table))?;

    for row in table.rows.iter() {
        let mut record: Vec<String> = vec![
            row.ss.clone(),
            row.peptide.clone(),
            format_float(row.score),
            row.charge.to_string(),
            row.peptide_length.to_string(),
            format_optional_float(Some(row.precursor_mz)),
            row.spectrum_id.clone(),
            row.run.clone(),
            row.peptidoform.clone(),
        ];
        record.extend(row.features.iter().map(|x| format_optional_float(Some(*x))));
        record.push(format_optional_float(Some(row.spectral_angle)));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_feature_table_file(table: &FeatureTable, path: &Path) -> Result<(), NovoRescoreError> {
    let start = Instant::now();
    let file = std::fs::File::create(path).map_err(|e| NovoRescoreError::Io {
        source: e,
        path: Some(path.to_path_buf()),
    })?;
    write_feature_table(table, std::io::BufWriter::new(file))?;
    info!(
        "Wrote {} feature rows to {} in {:?}",
        table.len(),
        path.display(),
        start.elapsed()
    );
    Ok(())
}
