//! Composite string keys.
//!
//! Two different builders produce the same conceptual "source + scan" key and
//! they are NOT interchangeable: [`spectrum_scan_key`] takes the source file
//! first, [`spectrum_run_key`] takes the spectrum id first and derives the
//! source from the run name. The feature join relies on both agreeing for
//! resolved identifications.

/// `SS`: source file + `_` + scan.
pub fn spectrum_scan_key(source_file: &str, scan: u64) -> String {
    format!("{}_{}", source_file, scan)
}

/// Join key of a generator-side identification: run stem + `_` + spectrum id.
pub fn spectrum_run_key(spectrum_id: &str, run: &str) -> String {
    format!("{}_{}", run_stem(run), spectrum_id)
}

/// `ID`: `SS` + `_` + bare peptide.
pub fn identification_key(ss: &str, bare_peptide: &str) -> String {
    format!("{}_{}", ss, bare_peptide)
}

/// `IDD`: `SS` + `_` + normalized peptide. Diagnostics only.
pub fn diagnostic_key(ss: &str, peptide: &str) -> String {
    format!("{}_{}", ss, peptide)
}

/// `SpecId` of the scoring-tool input: `SS` + `_` + charge.
pub fn spec_id(ss: &str, charge: i32) -> String {
    format!("{}_{}", ss, charge)
}

/// Run name up to its first `.`, eg. `sample.v2.mgf` -> `sample`.
pub fn run_stem(run: &str) -> &str {
    run.split('.').next().unwrap_or(run)
}
