use serde::{
    Deserialize,
    Serialize,
};

/// Everything a dataset run needs besides its input paths.
///
/// Every section is optional when deserializing, missing sections fall back to
/// the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub columns: ColumnConfig,
    pub filters: FilterConfig,
    pub modifications: ModificationConfig,
    pub features: FeatureConfig,
    /// Case-insensitive extensions of candidate spectrum files.
    pub spectrum_extensions: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            columns: ColumnConfig::default(),
            filters: FilterConfig::default(),
            modifications: ModificationConfig::default(),
            features: FeatureConfig::default(),
            spectrum_extensions: vec!["mgf".to_string()],
        }
    }
}

/// Names of the identification-table columns that are consumed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColumnConfig {
    pub sequence: String,
    pub spectra_ref: String,
    pub score: String,
    pub charge: String,
    pub precursor_mz: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            sequence: "sequence".to_string(),
            spectra_ref: "spectra_ref".to_string(),
            score: "search_engine_score[1]".to_string(),
            charge: "charge".to_string(),
            precursor_mz: "exp_mass_to_charge".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Inclusive bounds on the raw sequence length (annotations included).
    pub min_peptide_length: usize,
    pub max_peptide_length: usize,
    pub max_charge: i32,
    /// Rows scoring below this are dropped before the scoring-tool output.
    pub min_score: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_peptide_length: 6,
            max_peptide_length: 60,
            max_charge: 6,
            min_score: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixedModification {
    pub name: String,
    pub residues: Vec<char>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModificationConfig {
    /// Ordered literal replacements from inline mass shifts to bracket tags.
    /// Order matters, earlier entries are applied first.
    pub bracket_mappings: Vec<(String, String)>,
    /// Bracket tag -> modification name understood by the feature generators.
    pub renames: Vec<(String, String)>,
    pub fixed: Vec<FixedModification>,
}

impl Default for ModificationConfig {
    fn default() -> Self {
        let pairs = |x: &[(&str, &str)]| {
            x.iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect::<Vec<_>>()
        };
        Self {
            bracket_mappings: pairs(&[
                ("M+15.995", "M[ox]"),
                ("C+57.021", "C"),
                ("+42.011", "[ac]-"),
                ("+43.006", "[ca]-"),
                ("N+0.984", "N[de]"),
                ("Q+0.984", "Q[de]"),
                ("-17.027", "[al]-"),
            ]),
            renames: pairs(&[
                ("gl", "Gln->pyro-Glu"),
                ("ox", "Oxidation"),
                ("ac", "Acetylation"),
                ("de", "Deamidation"),
                ("ca", "Carbamylation"),
                ("al", "Ammonia-loss"),
            ]),
            fixed: vec![FixedModification {
                name: "U:Carbamidomethyl".to_string(),
                residues: vec!['C'],
            }],
        }
    }
}

/// An external program used as a feature generator.
///
/// Arguments may contain the `{spectrum_dir}` placeholder, which is replaced
/// with the spectrum directory of the dataset being processed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeatureConfig {
    pub cosine_feature: String,
    pub rt_delta_feature: String,
    pub ppm_error_feature: String,
    pub spectral_similarity: Option<ExternalCommand>,
    pub retention_time: Option<ExternalCommand>,
    /// Modification name -> ProForma name used only for mass calculation.
    /// Names missing here are handed to the mass calculation as they are.
    pub mass_modifications: Vec<(String, String)>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            cosine_feature: "cos".to_string(),
            rt_delta_feature: "rt_diff".to_string(),
            ppm_error_feature: "abs_ms1_error_ppm".to_string(),
            spectral_similarity: None,
            retention_time: None,
            mass_modifications: [
                ("Acetylation", "U:Acetyl"),
                ("Deamidation", "U:Deamidated"),
                ("Carbamylation", "U:Carbamyl"),
            ]
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let json = r#"{
            "filters": {"max_charge": 4},
            "features": {
                "retention_time": {"program": "deeplc-features", "args": ["--spectra", "{spectrum_dir}"]}
            }
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.filters.max_charge, 4);
        assert_eq!(config.filters.min_peptide_length, 6);
        assert_eq!(config.columns, ColumnConfig::default());
        assert_eq!(config.modifications.bracket_mappings.len(), 7);
        assert_eq!(
            config.features.retention_time.unwrap().args,
            vec!["--spectra".to_string(), "{spectrum_dir}".to_string()]
        );
        assert!(config.features.spectral_similarity.is_none());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: PipelineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }
}
