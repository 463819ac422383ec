use crate::models::{
    EnrichedIdentification,
    Psm,
};
use crate::transform::keys;
use indexmap::{
    IndexMap,
    IndexSet,
};
use std::f64::consts::PI;
use tracing::info;

/// `1 - (2/pi) * arccos(cos)`, the cosine being clipped to [-1, 1] first.
pub fn spectral_angle(cosine: f64) -> f64 {
    1.0 - (2.0 / PI) * cosine.clamp(-1.0, 1.0).acos()
}

/// One identification with every feature attached by the generators.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub ss: String,
    /// Normalized peptide (I -> L, no parentheses).
    pub peptide: String,
    pub score: f64,
    pub charge: i32,
    pub peptide_length: usize,
    pub precursor_mz: f64,
    pub spectrum_id: String,
    pub run: String,
    pub peptidoform: String,
    /// Aligned with [`FeatureTable::feature_names`], NaN where a PSM lacked
    /// the feature.
    pub features: Vec<f64>,
    pub spectral_angle: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    /// Union of the feature keys of every PSM, in first-seen order.
    pub feature_names: Vec<String>,
    pub rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.feature_names.iter().position(|x| x == name)
    }

    /// Value of a named feature for one row, `None` when the column does not
    /// exist at all.
    pub fn feature(&self, row: usize, name: &str) -> Option<f64> {
        let idx = self.feature_index(name)?;
        self.rows.get(row).map(|x| x.features[idx])
    }
}

/// Inner-joins generator-side PSMs back onto the rank-1 identifications.
#[derive(Debug, Clone)]
pub struct FeatureJoiner {
    cosine_feature: String,
}

impl FeatureJoiner {
    pub fn new(cosine_feature: impl Into<String>) -> Self {
        Self {
            cosine_feature: cosine_feature.into(),
        }
    }

    /// Output follows the order of `rank_one`. Identifications without a
    /// composite key, or whose key no PSM reproduces, are dropped. When
    /// several PSMs share a key the last one wins.
    pub fn join(&self, rank_one: &[EnrichedIdentification], psms: &[Psm]) -> FeatureTable {
        let mut feature_names: IndexSet<&str> = IndexSet::new();
        let mut by_key: IndexMap<String, &Psm> = IndexMap::new();
        for psm in psms.iter() {
            feature_names.extend(psm.rescoring_features.keys().map(|x| x.as_str()));
            by_key.insert(keys::spectrum_run_key(&psm.spectrum_id, &psm.run), psm);
        }
        let feature_names: Vec<String> = feature_names.into_iter().map(String::from).collect();

        let rows: Vec<FeatureRow> = rank_one
            .iter()
            .filter_map(|ident| {
                let ss = ident.ss.as_deref()?;
                let psm = by_key.get(ss)?;
                let features: Vec<f64> = feature_names
                    .iter()
                    .map(|name| psm.feature(name).unwrap_or(f64::NAN))
                    .collect();
                let spectral_angle = psm
                    .feature(&self.cosine_feature)
                    .map(spectral_angle)
                    .unwrap_or(f64::NAN);
                Some(FeatureRow {
                    ss: ss.to_string(),
                    peptide: ident.peptide.clone(),
                    score: ident.score,
                    charge: ident.charge,
                    peptide_length: ident.peptide_length,
                    precursor_mz: ident.precursor_mz,
                    spectrum_id: psm.spectrum_id.clone(),
                    run: psm.run.clone(),
                    peptidoform: psm.peptidoform.clone(),
                    features,
                    spectral_angle,
                })
            })
            .collect();

        info!("Finally PSM rows: {}", rows.len());
        FeatureTable {
            feature_names,
            rows,
        }
    }
}
