//! Reader for tagged, tab-delimited identification tables (mzTab PSM section).
//!
//! Every line is split on raw tabs, no escaping of tabs or delimiters is
//! assumed. The first field is a record-type tag:
//! * `MTD` metadata, only `run[<n>]-location` keys are retained
//! * `PSH` header, the remaining fields become the column names
//! * `PSM` data, the remaining fields are zipped against the last header
//!
//! Any other tag is ignored, as are blank lines and lines starting with `#`.

use crate::config::ColumnConfig;
use crate::errors::{
    NovoRescoreError,
    TableParsingError,
};
use crate::models::{
    IdentificationRecord,
    RunLocations,
};
use crate::utils::open_text;
use regex::Regex;
use std::io::BufRead;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{
    debug,
    info,
    warn,
};

pub const METADATA_TAG: &str = "MTD";
pub const HEADER_TAG: &str = "PSH";
pub const DATA_TAG: &str = "PSM";

static RUN_LOCATION_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"run\[(\d+)\]-location").expect("Valid regex"));
static SPECTRA_REF_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ms_run\[(\d+)\]").expect("Valid regex"));
static SPECTRA_REF_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"index=(\d+)").expect("Valid regex"));

/// Raw string table of the identification section plus the run locations
/// declared in the metadata section.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentificationTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub run_locations: RunLocations,
}

/// Extracts the run id out of a metadata key such as `ms_run[2]-location`.
pub fn parse_run_location_key(key: &str) -> Option<u32> {
    RUN_LOCATION_KEY
        .captures(key)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Run id of a spectrum reference such as `ms_run[1]:index=5`.
pub fn parse_spectra_ref_run(spectra_ref: &str) -> Option<u32> {
    SPECTRA_REF_RUN
        .captures(spectra_ref)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Zero-based spectrum index of a spectrum reference such as `ms_run[1]:index=5`.
pub fn parse_spectra_ref_index(spectra_ref: &str) -> Option<usize> {
    SPECTRA_REF_INDEX
        .captures(spectra_ref)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn read_identification_table(path: &Path) -> Result<IdentificationTable, TableParsingError> {
    info!("Reading identification table from {}", path.display());
    let reader = open_text(path).map_err(|e| TableParsingError::Io {
        source: e,
        path: Some(path.to_path_buf()),
    })?;
    parse_identification_table(reader).map_err(|e| match e {
        TableParsingError::NoDataRows { .. } => TableParsingError::NoDataRows {
            path: Some(path.to_path_buf()),
        },
        TableParsingError::Io { source, .. } => TableParsingError::Io {
            source,
            path: Some(path.to_path_buf()),
        },
        other => other,
    })
}

pub fn parse_identification_table<R: BufRead>(
    mut reader: R,
) -> Result<IdentificationTable, TableParsingError> {
    // Columns of every header seen so far, in first-seen order. Each data row
    // is laid out against this union so a late header never shifts earlier rows.
    let mut columns: Vec<String> = Vec::new();
    let mut header_positions: Option<Vec<usize>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut run_locations = RunLocations::new();
    let mut buf = Vec::new();
    let mut line_num = 0;

    loop {
        buf.clear();
        let nread = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| TableParsingError::Io {
                source: e,
                path: None,
            })?;
        if nread == 0 {
            break;
        }
        line_num += 1;

        // Undecodable bytes are replaced instead of aborting the whole read.
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split('\t');
        let tag = parts.next().unwrap_or_default();
        match tag {
            METADATA_TAG => {
                let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
                    continue;
                };
                if let Some(run_id) = parse_run_location_key(key) {
                    debug!("Run {} located at {}", run_id, value);
                    run_locations.insert(run_id, value.to_string());
                }
            }
            HEADER_TAG => {
                let positions = parts
                    .map(|name| match columns.iter().position(|x| x == name) {
                        Some(pos) => pos,
                        None => {
                            columns.push(name.to_string());
                            columns.len() - 1
                        }
                    })
                    .collect();
                header_positions = Some(positions);
            }
            DATA_TAG => {
                let Some(ref positions) = header_positions else {
                    return Err(TableParsingError::DataBeforeHeader { line: line_num });
                };
                // Short rows are padded with empty strings, long rows truncated.
                let mut values = vec![String::new(); columns.len()];
                for (pos, value) in positions.iter().zip(parts) {
                    values[*pos] = value.to_string();
                }
                rows.push(values);
            }
            _ => {}
        }
    }

    if rows.is_empty() {
        return Err(TableParsingError::NoDataRows { path: None });
    }
    for row in rows.iter_mut() {
        row.resize(columns.len(), String::new());
    }

    Ok(IdentificationTable {
        columns,
        rows,
        run_locations,
    })
}

impl IdentificationTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|x| x == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|x| x[idx].as_str())
    }

    /// Converts the string rows into typed records.
    ///
    /// Score and charge must coerce to numbers, any failure is fatal. An
    /// unparsable precursor m/z becomes NaN and only the mass-error features
    /// of that row go missing. The spectrum-reference column is optional;
    /// without it every record is unresolvable.
    pub fn records(
        &self,
        columns: &ColumnConfig,
    ) -> Result<Vec<IdentificationRecord>, NovoRescoreError> {
        let required = |name: &str| {
            self.column_index(name)
                .ok_or_else(|| TableParsingError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let seq_idx = required(&columns.sequence)?;
        let score_idx = required(&columns.score)?;
        let charge_idx = required(&columns.charge)?;
        let mz_idx = required(&columns.precursor_mz)?;
        let ref_idx = self.column_index(&columns.spectra_ref);

        let records = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| -> Result<IdentificationRecord, NovoRescoreError> {
                Ok(IdentificationRecord {
                    sequence: row[seq_idx].clone(),
                    spectra_ref: ref_idx.map(|idx| row[idx].clone()),
                    score: coerce_float("score", &row[score_idx], i)?,
                    charge: coerce_charge(&row[charge_idx], i)?,
                    precursor_mz: row[mz_idx].trim().parse::<f64>().unwrap_or(f64::NAN),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let nmissing_mz = records.iter().filter(|x| x.precursor_mz.is_nan()).count();
        if nmissing_mz > 0 {
            warn!(
                "{} of {} rows have no usable '{}' value",
                nmissing_mz,
                records.len(),
                columns.precursor_mz
            );
        }
        Ok(records)
    }
}

fn coerce_float(field: &'static str, value: &str, row: usize) -> Result<f64, NovoRescoreError> {
    match value.trim().parse::<f64>() {
        Ok(x) if !x.is_nan() => Ok(x),
        _ => Err(NovoRescoreError::Coercion {
            field,
            value: value.to_string(),
            row,
        }),
    }
}

/// Charges are accepted either as integers (`2`) or integral floats (`2.0`).
fn coerce_charge(value: &str, row: usize) -> Result<i32, NovoRescoreError> {
    let trimmed = value.trim();
    if let Ok(x) = trimmed.parse::<i32>() {
        return Ok(x);
    }
    match trimmed.parse::<f64>() {
        Ok(x) if x.is_finite() && x.fract() == 0.0 && x.abs() <= i32::MAX as f64 => Ok(x as i32),
        _ => Err(NovoRescoreError::Coercion {
            field: "charge",
            value: value.to_string(),
            row,
        }),
    }
}
