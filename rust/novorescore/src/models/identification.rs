use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Run id -> raw location string (usually a `file://` uri) as declared in the
/// metadata section of an identification table.
pub type RunLocations = BTreeMap<u32, String>;

/// One peptide-spectrum match as parsed from the identification table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentificationRecord {
    /// Sequence with inline mass-shift annotations, eg. `+42.011PEPM+15.995K`.
    pub sequence: String,
    /// Run/index reference, eg. `ms_run[1]:index=12`.
    pub spectra_ref: Option<String>,
    pub score: f64,
    pub charge: i32,
    pub precursor_mz: f64,
}

/// Address of a single spectrum: the absolute spectrum-file path and the
/// zero-based position of the spectrum within that file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpectrumKey {
    pub path: PathBuf,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SpectrumMetadata {
    pub scan: Option<u64>,
    pub rt_seconds: Option<f64>,
}

impl SpectrumMetadata {
    pub fn rt_minutes(&self) -> Option<f64> {
        self.rt_seconds.map(|x| x / 60.0)
    }
}

/// An identification after its spectrum reference has been resolved against
/// the spectrum files on disk.
///
/// Every optional field is `None` when the reference could not be resolved,
/// this is not an error. Those rows never survive the feature join.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedIdentification {
    pub record: IdentificationRecord,
    pub run_id: Option<u32>,
    pub spectrum_index: Option<usize>,
    /// Basename of the spectrum file.
    pub spectrum_file: Option<String>,
    pub spectrum_path: Option<PathBuf>,
    pub metadata: SpectrumMetadata,
}
