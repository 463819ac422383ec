use novorescore::config::PipelineConfig;
use novorescore::errors::{
    NovoRescoreError,
    TableParsingError,
};
use novorescore::features::BasicFeatureGenerator;
use novorescore::models::DatasetLabel;
use novorescore::{
    DatasetInputs,
    FeatureGenerator,
    Psm,
    process_dataset,
    run_pipeline,
};
use std::path::Path;

/// Stands in for the spectral-similarity and retention-time passes.
struct FixedFeatures;

impl FeatureGenerator for FixedFeatures {
    fn name(&self) -> &str {
        "fixed"
    }

    fn add_features(&self, psms: &mut [Psm]) -> Result<(), NovoRescoreError> {
        for psm in psms.iter_mut() {
            psm.add_feature("cos", 1.0);
            psm.add_feature("rt_diff", 2.5);
        }
        Ok(())
    }
}

fn generators(_spectrum_dir: &Path) -> Vec<Box<dyn FeatureGenerator>> {
    vec![
        Box::new(BasicFeatureGenerator::default()),
        Box::new(FixedFeatures),
    ]
}

fn mgf(scans: &[u64]) -> String {
    scans
        .iter()
        .map(|scan| {
            format!(
                "BEGIN IONS\nTITLE=controllerType=0 controllerNumber=1 scan={}\nPEPMASS=500.0\nCHARGE=2+\nRTINSECONDS={}.5\n100.0 10.0\n200.0 20.0\nEND IONS\n\n",
                scan, scan
            )
        })
        .collect()
}

/// Rows are (sequence, score, charge, m/z, spectrum index).
fn mztab(run_file: &str, rows: &[(&str, f64, i32, f64, usize)]) -> String {
    let mut out = String::new();
    out.push_str("MTD\tmzTab-version\t1.0.0\n");
    out.push_str(&format!("MTD\tms_run[1]-location\tfile:///acquired/{}\n", run_file));
    out.push_str("# comment line\n\n");
    out.push_str("PSH\tsequence\tPSM_ID\tsearch_engine_score[1]\tcharge\texp_mass_to_charge\tspectra_ref\n");
    for (i, (seq, score, charge, mz, index)) in rows.iter().enumerate() {
        out.push_str(&format!(
            "PSM\t{}\t{}\t{}\t{}\t{}\tms_run[1]:index={}\n",
            seq, i, score, charge, mz, index
        ));
    }
    out
}

fn dataset(root: &Path, name: &str, scans: &[u64], table: &str) -> DatasetInputs {
    let spectrum_dir = root.join(format!("{}_mgf", name));
    std::fs::create_dir_all(&spectrum_dir).unwrap();
    let run_file = format!("{}.mgf", name);
    std::fs::write(spectrum_dir.join(&run_file), mgf(scans)).unwrap();
    let identification_path = root.join(format!("{}.mztab", name));
    std::fs::write(&identification_path, table).unwrap();
    DatasetInputs {
        spectrum_dir,
        identification_path,
    }
}

const PEPTIDE_MZ: f64 = 465.7456;

#[test]
fn test_length_filter_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let long = "A".repeat(65);
    let target = dataset(
        dir.path(),
        "target",
        &[101, 102],
        &mztab(
            "target.mgf",
            &[
                ("PEPTIDEK", 0.9, 2, PEPTIDE_MZ, 0),
                (long.as_str(), 0.8, 2, 1000.0, 1),
            ],
        ),
    );
    let decoy = dataset(
        dir.path(),
        "decoy",
        &[7],
        &mztab("decoy.mgf", &[("KEDITPEP", 0.4, 2, PEPTIDE_MZ, 0)]),
    );

    let out_dir = dir.path().join("results").join("nested");
    let summary = run_pipeline(
        &PipelineConfig::default(),
        &target,
        &decoy,
        &out_dir,
        generators,
    )
    .unwrap();
    assert_eq!(summary.target_rows, 1);
    assert_eq!(summary.decoy_rows, 1);
    assert_eq!(summary.pin_rows, 2);

    let features = std::fs::read_to_string(out_dir.join("all_target_features_df.csv")).unwrap();
    let lines: Vec<&str> = features.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("SS,Peptide,score,z,pep_len_x,m/z,spectrum_id,run,peptidoform,"));
    assert!(lines[0].ends_with(",cos,rt_diff,SA"));
    assert!(lines[1].starts_with("target_101,PEPTLDEK,0.9,2,8,"));
    assert!(out_dir.join("all_decoy_features_df.csv").is_file());

    let pin = std::fs::read_to_string(summary.pin_path).unwrap();
    let pin_lines: Vec<Vec<&str>> = pin.lines().map(|x| x.split('\t').collect()).collect();
    assert_eq!(pin_lines.len(), 3);
    assert_eq!(
        pin_lines[0],
        vec!["SpecId", "Label", "ScanNr", "SA", "absdRT", "absdMppm", "Peptide", "Proteins"]
    );
    assert_eq!(&pin_lines[1][..3], &["target_101_2", "1", "101"]);
    assert_eq!(pin_lines[1][3], "1.0");
    assert_eq!(pin_lines[1][4], "2.5");
    assert_eq!(&pin_lines[2][..3], &["decoy_7_2", "-1", "7"]);
    assert_eq!(pin_lines[2][6], "KEDLTPEP");
}

#[test]
fn test_modified_peptides_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let target = dataset(
        dir.path(),
        "target",
        &[201, 202, 203, 204, 205, 206],
        &mztab(
            "target.mgf",
            &[
                ("+42.011PEPTIDEK", 0.9, 2, 486.7509, 0),
                ("PEPTN+0.984K", 0.8, 2, 351.1541, 1),
                ("+43.006PEPTIDEK", 0.7, 2, 487.2485, 2),
                ("-17.027PEPTIDEK", 0.6, 2, 457.2323, 3),
                ("M+15.995PEPTIDEK", 0.5, 2, 539.2536, 4),
                ("PEPC+57.021TIDEK", 0.4, 2, 545.2414, 5),
            ],
        ),
    );
    let decoy = dataset(
        dir.path(),
        "decoy",
        &[7],
        &mztab("decoy.mgf", &[("Q+0.984KEDITPEP", 0.4, 2, 530.2613, 0)]),
    );

    let out_dir = dir.path().join("results");
    let summary = run_pipeline(
        &PipelineConfig::default(),
        &target,
        &decoy,
        &out_dir,
        generators,
    )
    .unwrap();
    assert_eq!(summary.target_rows, 6);
    assert_eq!(summary.decoy_rows, 1);
    assert_eq!(summary.pin_rows, 7);

    let features = std::fs::read_to_string(out_dir.join("all_target_features_df.csv")).unwrap();
    let peptidoforms: Vec<&str> = features
        .lines()
        .skip(1)
        .map(|x| x.split(',').nth(8).unwrap())
        .collect();
    for expected in [
        "[Acetylation]-PEPTLDEK/2",
        "PEPTN[Deamidation]K/2",
        "[Carbamylation]-PEPTLDEK/2",
        "[Ammonia-loss]-PEPTLDEK/2",
        "M[Oxidation]PEPTLDEK/2",
        "PEPC[U:Carbamidomethyl]TLDEK/2",
    ] {
        assert!(
            peptidoforms.contains(&expected),
            "{} not in {:?}",
            expected,
            peptidoforms
        );
    }

    let decoy_features =
        std::fs::read_to_string(out_dir.join("all_decoy_features_df.csv")).unwrap();
    assert!(decoy_features.contains(",Q[Deamidation]KEDLTPEP/2,"));
}

#[test]
fn test_missing_spectrum_is_dropped_at_join() {
    let dir = tempfile::tempdir().unwrap();
    let target = dataset(
        dir.path(),
        "run1",
        &[11, 12],
        &mztab(
            "run1.mgf",
            &[
                ("PEPTIDEK", 0.9, 2, PEPTIDE_MZ, 0),
                ("PEPTIDEKR", 0.7, 2, 500.0, 1),
                ("PEPTIDEKK", 0.6, 2, 500.0, 9),
            ],
        ),
    );
    let gens = generators(&target.spectrum_dir);
    let table = process_dataset(
        &PipelineConfig::default(),
        &target,
        DatasetLabel::Target,
        &gens,
    )
    .unwrap();
    // Three rank-1 rows go in, the unresolved index comes out missing.
    assert_eq!(table.len(), 2);
    let keys: Vec<&str> = table.rows.iter().map(|x| x.ss.as_str()).collect();
    assert_eq!(keys, vec!["run1_11", "run1_12"]);
    assert!(table.feature_index("abs_ms1_error_ppm").is_some());
}

#[test]
fn test_same_scan_keeps_first_of_equal_scores() {
    let dir = tempfile::tempdir().unwrap();
    let target = dataset(
        dir.path(),
        "run1",
        &[5],
        &mztab(
            "run1.mgf",
            &[
                ("PEPTIDEK", 0.5, 2, PEPTIDE_MZ, 0),
                ("PEPTIDEKR", 0.5, 2, 500.0, 0),
            ],
        ),
    );
    let gens = generators(&target.spectrum_dir);
    let table = process_dataset(
        &PipelineConfig::default(),
        &target,
        DatasetLabel::Target,
        &gens,
    )
    .unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0].peptide, "PEPTLDEK");
}

#[test]
fn test_table_without_rows_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let target = dataset(dir.path(), "run1", &[1], "MTD\tms_run[1]-location\trun1.mgf\nPSH\tsequence\n");
    let err = process_dataset(
        &PipelineConfig::default(),
        &target,
        DatasetLabel::Target,
        &[],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        NovoRescoreError::TableParsing(TableParsingError::NoDataRows { .. })
    ));
}

#[test]
fn test_gzipped_identification_table() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let dir = tempfile::tempdir().unwrap();
    let table = mztab("run1.mgf", &[("PEPTIDEK", 0.9, 2, PEPTIDE_MZ, 0)]);
    let mut inputs = dataset(dir.path(), "run1", &[3], &table);
    let gz_path = dir.path().join("run1.mztab.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&gz_path).unwrap(), Compression::default());
    encoder.write_all(table.as_bytes()).unwrap();
    encoder.finish().unwrap();
    inputs.identification_path = gz_path;

    let gens = generators(&inputs.spectrum_dir);
    let out = process_dataset(&PipelineConfig::default(), &inputs, DatasetLabel::Target, &gens)
        .unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out.rows[0].ss, "run1_3");
}
