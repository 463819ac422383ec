//! Derivation of composite keys, peptide normalization, ranking and
//! filtering over located identifications.

pub mod keys;
pub mod peptide;
pub mod ranking;

use crate::config::FilterConfig;
use crate::models::{
    EnrichedIdentification,
    LocatedIdentification,
};
use std::collections::HashSet;
use tracing::info;

/// Output of [`IdentificationTransformer::transform`].
#[derive(Debug, Clone, Default)]
pub struct TransformedIdentifications {
    /// Every row surviving the length/charge filter, in input order.
    pub kept: Vec<EnrichedIdentification>,
}

impl TransformedIdentifications {
    pub fn len(&self) -> usize {
        self.kept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    /// The rows handed to the feature generators.
    pub fn rank_one(&self) -> Vec<EnrichedIdentification> {
        self.kept
            .iter()
            .filter(|x| x.is_rank_one())
            .cloned()
            .collect()
    }

    /// Rank-1 rows deduplicated on the bare peptide, first occurrence kept.
    ///
    /// Only used for row-count diagnostics, nothing downstream consumes it.
    pub fn unique_peptides(&self) -> Vec<&EnrichedIdentification> {
        let mut seen = HashSet::new();
        self.kept
            .iter()
            .filter(|x| x.is_rank_one())
            .filter(|x| seen.insert(x.bare_peptide.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct IdentificationTransformer {
    filters: FilterConfig,
    bracket_mappings: Vec<(String, String)>,
}

impl IdentificationTransformer {
    pub fn new(filters: FilterConfig, bracket_mappings: Vec<(String, String)>) -> Self {
        Self {
            filters,
            bracket_mappings,
        }
    }

    pub fn enrich(&self, located: &LocatedIdentification, rank: u32) -> EnrichedIdentification {
        let record = &located.record;
        let source_file = located
            .spectrum_file
            .as_deref()
            .map(|x| keys::run_stem(x).to_string());
        let scan = located.metadata.scan;

        let peptide = peptide::normalize_peptide(&record.sequence);
        let bracket_peptide = peptide::to_bracket_notation(&peptide, &self.bracket_mappings);
        let bare_peptide = peptide::bare_peptide(&peptide);
        let peptidoform = peptide::peptidoform_string(&bracket_peptide, record.charge);

        let ss = match (source_file.as_deref(), scan) {
            (Some(source), Some(scan)) => Some(keys::spectrum_scan_key(source, scan)),
            _ => None,
        };
        let id_key = ss
            .as_deref()
            .map(|ss| keys::identification_key(ss, &bare_peptide));
        let idd_key = ss.as_deref().map(|ss| keys::diagnostic_key(ss, &peptide));

        EnrichedIdentification {
            source_file,
            scan,
            run: located.spectrum_file.clone(),
            rt_seconds: located.metadata.rt_seconds,
            rt_minutes: located.metadata.rt_minutes(),
            peptide_length: record.sequence.chars().count(),
            raw_peptide: record.sequence.clone(),
            peptide,
            bracket_peptide,
            bare_peptide,
            peptidoform,
            ss,
            id_key,
            idd_key,
            rank,
            score: record.score,
            charge: record.charge,
            precursor_mz: record.precursor_mz,
        }
    }

    pub fn passes_filters(&self, row: &EnrichedIdentification) -> bool {
        row.peptide_length >= self.filters.min_peptide_length
            && row.peptide_length <= self.filters.max_peptide_length
            && row.charge <= self.filters.max_charge
    }

    /// Ranks every row within its (source file, scan) group, then drops rows
    /// outside the length/charge bounds.
    ///
    /// Ranking happens before filtering, so a filtered-out best hit leaves
    /// its group without a rank-1 row.
    pub fn transform(&self, located: &[LocatedIdentification]) -> TransformedIdentifications {
        info!("PSM rows: {}", located.len());
        let groups: Vec<(Option<String>, Option<u64>)> = located
            .iter()
            .map(|x| {
                (
                    x.spectrum_file
                        .as_deref()
                        .map(|f| keys::run_stem(f).to_string()),
                    x.metadata.scan,
                )
            })
            .collect();
        let scores: Vec<f64> = located.iter().map(|x| x.record.score).collect();
        let ranks = ranking::rank_within_groups(&groups, &scores);

        let kept: Vec<EnrichedIdentification> = located
            .iter()
            .zip(ranks)
            .map(|(x, rank)| self.enrich(x, rank))
            .filter(|x| self.passes_filters(x))
            .collect();
        info!("Filtered PSM rows: {}", kept.len());

        let out = TransformedIdentifications { kept };
        info!("Rank1 PSM rows: {}", out.kept.iter().filter(|x| x.is_rank_one()).count());
        info!("Rank1 peptide rows: {}", out.unique_peptides().len());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModificationConfig;
    use crate::models::{
        IdentificationRecord,
        SpectrumMetadata,
    };
    use std::path::PathBuf;

    fn located(sequence: &str, score: f64, charge: i32, scan: Option<u64>) -> LocatedIdentification {
        LocatedIdentification {
            record: IdentificationRecord {
                sequence: sequence.to_string(),
                spectra_ref: Some("ms_run[1]:index=0".to_string()),
                score,
                charge,
                precursor_mz: 500.0,
            },
            run_id: Some(1),
            spectrum_index: Some(0),
            spectrum_file: Some("run1.mgf".to_string()),
            spectrum_path: Some(PathBuf::from("/data/run1.mgf")),
            metadata: SpectrumMetadata {
                scan,
                rt_seconds: Some(120.0),
            },
        }
    }

    fn transformer() -> IdentificationTransformer {
        IdentificationTransformer::new(
            FilterConfig::default(),
            ModificationConfig::default().bracket_mappings,
        )
    }

    #[test]
    fn test_enrich_keys() {
        let row = transformer().enrich(&located("PEPTIDEM+15.995K", 0.9, 2, Some(101)), 1);
        assert_eq!(row.source_file.as_deref(), Some("run1"));
        assert_eq!(row.ss.as_deref(), Some("run1_101"));
        assert_eq!(row.peptide, "PEPTLDEM+15.995K");
        assert_eq!(row.bracket_peptide, "PEPTLDEM[ox]K");
        assert_eq!(row.bare_peptide, "PEPTLDEMK");
        assert_eq!(row.peptidoform, "PEPTLDEM[ox]K/2");
        assert_eq!(row.id_key.as_deref(), Some("run1_101_PEPTLDEMK"));
        assert_eq!(row.idd_key.as_deref(), Some("run1_101_PEPTLDEM+15.995K"));
        assert_eq!(row.peptide_length, 16);
        assert_eq!(row.rt_minutes, Some(2.0));
    }

    #[test]
    fn test_source_file_with_underscores_joins_back() {
        let mut input = located("PEPTIDEK", 0.9, 2, Some(7));
        input.spectrum_file = Some("my_run.v2.mgf".to_string());
        let row = transformer().enrich(&input, 1);
        assert_eq!(row.source_file.as_deref(), Some("my_run"));
        assert_eq!(row.ss.as_deref(), Some("my_run_7"));
        assert_eq!(
            row.ss.as_deref(),
            Some(keys::spectrum_run_key("7", "my_run.v2.mgf").as_str())
        );
    }

    #[test]
    fn test_missing_scan_has_no_keys() {
        let row = transformer().enrich(&located("PEPTIDEK", 0.9, 2, None), 1);
        assert_eq!(row.source_file.as_deref(), Some("run1"));
        assert!(row.ss.is_none());
        assert!(row.id_key.is_none());
    }

    #[test]
    fn test_equal_scores_first_occurrence_is_rank_one() {
        let rows = vec![
            located("PEPTIDEK", 0.5, 2, Some(1)),
            located("PEPTIDEKK", 0.5, 2, Some(1)),
        ];
        let out = transformer().transform(&rows);
        assert_eq!(out.kept[0].rank, 1);
        assert_eq!(out.kept[1].rank, 2);
        let rank_one = out.rank_one();
        assert_eq!(rank_one.len(), 1);
        assert_eq!(rank_one[0].raw_peptide, "PEPTIDEK");
    }

    #[test]
    fn test_length_and_charge_bounds() {
        let rows = vec![
            located("PEPTI", 0.9, 2, Some(1)),
            located(&"A".repeat(61), 0.9, 2, Some(2)),
            located("PEPTIDEK", 0.9, 7, Some(3)),
            located("PEPTID", 0.9, 6, Some(4)),
            located(&"A".repeat(60), 0.9, 2, Some(5)),
        ];
        let out = transformer().transform(&rows);
        let scans: Vec<_> = out.kept.iter().map(|x| x.scan).collect();
        assert_eq!(scans, vec![Some(4), Some(5)]);
    }

    #[test]
    fn test_rank_before_filter() {
        // The best hit is too short, the survivor keeps rank 2.
        let rows = vec![
            located("PEPT", 0.9, 2, Some(1)),
            located("PEPTIDEK", 0.1, 2, Some(1)),
        ];
        let out = transformer().transform(&rows);
        assert_eq!(out.len(), 1);
        assert_eq!(out.kept[0].rank, 2);
        assert!(out.rank_one().is_empty());
    }

    #[test]
    fn test_unique_peptides_is_diagnostic() {
        let rows = vec![
            located("PEPTIDEK", 0.9, 2, Some(1)),
            located("PEPTLDEK", 0.9, 2, Some(2)),
            located("AAAAAAK", 0.9, 2, Some(3)),
        ];
        let out = transformer().transform(&rows);
        assert_eq!(out.rank_one().len(), 3);
        assert_eq!(out.unique_peptides().len(), 2);
    }
}
