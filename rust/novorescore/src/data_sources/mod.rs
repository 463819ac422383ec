pub mod locator;
pub mod mgf;
pub mod mztab;

pub use locator::{
    ResolvedRuns,
    SpectrumLocator,
};
pub use mgf::{
    SpectrumParams,
    SpectrumRequests,
    extract_spectrum_metadata,
};
pub use mztab::{
    IdentificationTable,
    read_identification_table,
};

use crate::models::{
    IdentificationRecord,
    LocatedIdentification,
    SpectrumKey,
    SpectrumMetadata,
};
use std::collections::HashMap;

/// The (file, index) pairs actually referenced by `records`.
///
/// Records whose run is unknown, unresolved or whose reference carries no
/// index do not request anything.
pub fn requested_spectra(
    records: &[IdentificationRecord],
    resolved: &ResolvedRuns,
) -> SpectrumRequests {
    let mut requests = SpectrumRequests::new();
    for record in records.iter() {
        let Some(spectra_ref) = record.spectra_ref.as_deref() else {
            continue;
        };
        let (Some(run_id), Some(index)) = (
            mztab::parse_spectra_ref_run(spectra_ref),
            mztab::parse_spectra_ref_index(spectra_ref),
        ) else {
            continue;
        };
        if let Some(Some(path)) = resolved.get(&run_id) {
            requests.entry(path.clone()).or_default().insert(index);
        }
    }
    requests
}

/// Attaches spectrum-file and spectrum metadata to every record.
///
/// Missing pieces stay `None`: no run/index -> nothing, run without a file ->
/// nothing, index never captured -> file name and path only.
pub fn attach_spectrum_metadata(
    records: Vec<IdentificationRecord>,
    resolved: &ResolvedRuns,
    picked: &HashMap<SpectrumKey, SpectrumMetadata>,
) -> Vec<LocatedIdentification> {
    records
        .into_iter()
        .map(|record| {
            let (run_id, spectrum_index) = match record.spectra_ref.as_deref() {
                Some(x) => (
                    mztab::parse_spectra_ref_run(x),
                    mztab::parse_spectra_ref_index(x),
                ),
                None => (None, None),
            };
            let mut out = LocatedIdentification {
                record,
                run_id,
                spectrum_index,
                spectrum_file: None,
                spectrum_path: None,
                metadata: SpectrumMetadata::default(),
            };
            let (Some(run_id), Some(index)) = (run_id, spectrum_index) else {
                return out;
            };
            let Some(Some(path)) = resolved.get(&run_id) else {
                return out;
            };
            out.spectrum_file = path
                .file_name()
                .map(|x| x.to_string_lossy().to_string());
            let key = SpectrumKey {
                path: path.clone(),
                index,
            };
            if let Some(meta) = picked.get(&key) {
                out.metadata = *meta;
            }
            out.spectrum_path = Some(key.path);
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn record(spectra_ref: Option<&str>) -> IdentificationRecord {
        IdentificationRecord {
            sequence: "PEPTIDEK".to_string(),
            spectra_ref: spectra_ref.map(|x| x.to_string()),
            score: 0.5,
            charge: 2,
            precursor_mz: 450.0,
        }
    }

    #[test]
    fn test_requests_and_attach() {
        let mut resolved = ResolvedRuns::new();
        resolved.insert(1, Some(PathBuf::from("/data/a.mgf")));
        resolved.insert(2, None);

        let records = vec![
            record(Some("ms_run[1]:index=0")),
            record(Some("ms_run[1]:index=4")),
            record(Some("ms_run[2]:index=0")),
            record(Some("ms_run[3]:index=0")),
            record(None),
        ];
        let requests = requested_spectra(&records, &resolved);
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[&PathBuf::from("/data/a.mgf")],
            BTreeSet::from([0, 4])
        );

        let mut picked = HashMap::new();
        picked.insert(
            SpectrumKey {
                path: PathBuf::from("/data/a.mgf"),
                index: 0,
            },
            SpectrumMetadata {
                scan: Some(11),
                rt_seconds: Some(60.0),
            },
        );
        let located = attach_spectrum_metadata(records, &resolved, &picked);
        assert_eq!(located[0].metadata.scan, Some(11));
        assert_eq!(located[0].spectrum_file.as_deref(), Some("a.mgf"));
        // Index never captured: file is known, metadata is not.
        assert_eq!(located[1].spectrum_file.as_deref(), Some("a.mgf"));
        assert_eq!(located[1].metadata, SpectrumMetadata::default());
        assert_eq!(located[2].spectrum_file, None);
        assert_eq!(located[3].spectrum_file, None);
        assert_eq!(located[4].run_id, None);
    }
}
