//! Selective reading of MGF spectrum files.
//!
//! Spectra are addressed by their zero-based position in the file. Files are
//! streamed once in file order and only the parameters of the requested
//! spectra are kept; peak lists are never materialized.

use crate::errors::NovoRescoreError;
use crate::models::{
    SpectrumKey,
    SpectrumMetadata,
};
use indicatif::{
    ParallelProgressIterator,
    ProgressStyle,
};
use rayon::prelude::*;
use regex::Regex;
use std::collections::{
    BTreeMap,
    BTreeSet,
    HashMap,
};
use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
};
use std::path::{
    Path,
    PathBuf,
};
use std::sync::LazyLock;
use tracing::{
    debug,
    info,
    warn,
};

const BEGIN_IONS: &str = "BEGIN IONS";
const END_IONS: &str = "END IONS";

static TITLE_SCAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\bscan=(\d+))|(?:\bSCAN=(\d+))|(?:\bscans?=(\d+))").expect("Valid regex")
});
static TITLE_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bindex=(\d+)").expect("Valid regex"));

const SCAN_KEYS: [&str; 2] = ["SCANS", "SCAN"];
const RT_KEYS: [&str; 2] = ["RTINSECONDS", "RTINSEC"];

/// Parameter lines (`KEY=VALUE`) of one spectrum, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrumParams {
    params: Vec<(String, String)>,
}

impl SpectrumParams {
    pub fn new(params: Vec<(String, String)>) -> Self {
        Self { params }
    }

    /// Case-insensitive lookup, an exact match is preferred.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .or_else(|| self.params.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)))
            .map(|(_, v)| v.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.get("TITLE")
    }

    /// Scan number from the `SCANS`/`SCAN` parameters, falling back to the
    /// title when those are absent or not an integer.
    pub fn scan_number(&self) -> Option<u64> {
        for key in SCAN_KEYS {
            if let Some(value) = self.get(key) {
                if let Ok(scan) = value.trim().parse::<u64>() {
                    return Some(scan);
                }
                // Only the first present key is considered.
                break;
            }
        }
        self.title().and_then(scan_from_title)
    }

    /// Retention time in seconds, `None` when absent or unparsable.
    pub fn rt_seconds(&self) -> Option<f64> {
        RT_KEYS
            .iter()
            .filter_map(|key| self.get(key))
            .find_map(|value| value.trim().parse::<f64>().ok())
    }

    pub fn metadata(&self) -> SpectrumMetadata {
        SpectrumMetadata {
            scan: self.scan_number(),
            rt_seconds: self.rt_seconds(),
        }
    }
}

/// Scan number embedded in a spectrum title (`scan=`, `SCAN=`, `scans=`),
/// falling back to an `index=` field.
pub fn scan_from_title(title: &str) -> Option<u64> {
    if let Some(caps) = TITLE_SCAN.captures(title) {
        return caps
            .iter()
            .skip(1)
            .flatten()
            .next()
            .and_then(|m| m.as_str().parse().ok());
    }
    TITLE_INDEX
        .captures(title)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Streams an MGF file and captures the parameters of the spectra whose
/// position is in `wanted`.
///
/// Reading stops as soon as every wanted spectrum has been captured. Indices
/// past the end of the file are simply absent from the result.
pub fn read_selected_params<R: BufRead>(
    reader: R,
    wanted: &BTreeSet<usize>,
) -> std::io::Result<BTreeMap<usize, SpectrumParams>> {
    let mut out = BTreeMap::new();
    if wanted.is_empty() {
        return Ok(out);
    }

    let mut index: usize = 0;
    let mut in_block = false;
    let mut capturing = false;
    let mut current = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case(BEGIN_IONS) {
            in_block = true;
            capturing = wanted.contains(&index);
            current.clear();
            continue;
        }
        if line.eq_ignore_ascii_case(END_IONS) {
            if in_block {
                if capturing {
                    out.insert(index, SpectrumParams::new(std::mem::take(&mut current)));
                    if out.len() == wanted.len() {
                        break;
                    }
                }
                index += 1;
            }
            in_block = false;
            capturing = false;
            continue;
        }
        if !capturing {
            continue;
        }

        let first = line.as_bytes()[0];
        if first.is_ascii_digit() || first == b'-' || first == b'.' {
            // Peak line
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            current.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    Ok(out)
}

/// Spectrum-file path -> requested zero-based indices.
pub type SpectrumRequests = BTreeMap<PathBuf, BTreeSet<usize>>;

pub fn extract_file_metadata(
    path: &Path,
    wanted: &BTreeSet<usize>,
) -> Result<BTreeMap<usize, SpectrumMetadata>, NovoRescoreError> {
    let file = File::open(path).map_err(|e| NovoRescoreError::SpectrumReading {
        source: e,
        path: path.to_path_buf(),
    })?;
    let params = read_selected_params(BufReader::new(file), wanted).map_err(|e| {
        NovoRescoreError::SpectrumReading {
            source: e,
            path: path.to_path_buf(),
        }
    })?;
    if params.len() < wanted.len() {
        warn!(
            "{} of {} requested spectra were not found in {}",
            wanted.len() - params.len(),
            wanted.len(),
            path.display()
        );
    }
    debug!("Captured {} spectra from {}", params.len(), path.display());
    Ok(params
        .into_iter()
        .map(|(idx, p)| (idx, p.metadata()))
        .collect())
}

/// Reads the requested spectra of every file, one sequential pass per file,
/// files in parallel.
pub fn extract_spectrum_metadata(
    requests: &SpectrumRequests,
) -> Result<HashMap<SpectrumKey, SpectrumMetadata>, NovoRescoreError> {
    let nrequested: usize = requests.values().map(|x| x.len()).sum();
    info!(
        "Extracting {} spectra from {} files",
        nrequested,
        requests.len()
    );
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} files",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());

    let work: Vec<(&PathBuf, &BTreeSet<usize>)> = requests.iter().collect();
    let per_file: Vec<_> = work
        .into_par_iter()
        .progress_with_style(style)
        .map(|(path, wanted)| {
            extract_file_metadata(path, wanted).map(|meta| (path.clone(), meta))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let out: HashMap<SpectrumKey, SpectrumMetadata> = per_file
        .into_iter()
        .flat_map(|(path, meta)| {
            meta.into_iter().map(move |(index, m)| {
                (
                    SpectrumKey {
                        path: path.clone(),
                        index,
                    },
                    m,
                )
            })
        })
        .collect();
    info!("Captured {} of {} requested spectra", out.len(), nrequested);
    Ok(out)
}
