use serde::Serialize;

/// Identification plus every derived field needed downstream.
///
/// The composite keys are plain string concatenations with no escaping:
/// * `ss`  = source file + `_` + scan
/// * `id_key` = `ss` + `_` + bare peptide
/// * `idd_key` = `ss` + `_` + normalized peptide (diagnostics only)
///
/// Keys are `None` when the spectrum file or scan number could not be resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedIdentification {
    pub source_file: Option<String>,
    pub scan: Option<u64>,
    /// Spectrum file basename, the `run` handed to feature generators.
    pub run: Option<String>,
    pub rt_seconds: Option<f64>,
    pub rt_minutes: Option<f64>,
    /// Character count of the raw sequence, mass-shift annotations included.
    pub peptide_length: usize,
    pub raw_peptide: String,
    /// I -> L and parentheses stripped.
    pub peptide: String,
    pub bracket_peptide: String,
    pub bare_peptide: String,
    pub peptidoform: String,
    pub ss: Option<String>,
    pub id_key: Option<String>,
    pub idd_key: Option<String>,
    pub rank: u32,
    pub score: f64,
    pub charge: i32,
    pub precursor_mz: f64,
}

impl EnrichedIdentification {
    pub fn is_rank_one(&self) -> bool {
        self.rank == 1
    }
}
