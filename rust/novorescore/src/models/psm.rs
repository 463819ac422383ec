use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};

/// Feature name -> value, in insertion order.
///
/// Generators attach whatever keys they compute, the core never assumes a
/// fixed set of names.
pub type FeatureBag = IndexMap<String, f64>;

/// The identification object handed to feature generators.
///
/// Only rank-1 identifications become a [`Psm`], so `rank` is always 1 and
/// `is_decoy` is always false; decoy status lives on the dataset, not the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Psm {
    pub spectrum_id: String,
    pub run: String,
    pub peptidoform: String,
    pub score: f64,
    pub retention_time: Option<f64>,
    pub is_decoy: bool,
    pub precursor_mz: f64,
    pub charge: i32,
    pub rank: u32,
    pub protein_list: Option<Vec<String>>,
    #[serde(default)]
    pub rescoring_features: FeatureBag,
}

impl Psm {
    pub fn add_feature(&mut self, name: impl Into<String>, value: f64) {
        self.rescoring_features.insert(name.into(), value);
    }

    pub fn feature(&self, name: &str) -> Option<f64> {
        self.rescoring_features.get(name).copied()
    }
}
