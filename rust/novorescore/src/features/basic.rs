use super::FeatureGenerator;
use crate::config::FeatureConfig;
use crate::errors::NovoRescoreError;
use crate::models::{
    Peptidoform,
    Psm,
};
use rustyms::prelude::Peptidoform as ProFormaPeptidoform;
use std::collections::HashMap;

pub const PROTON_MASS: f64 = 1.007276466812;

/// Charges at or above this share the last one-hot column.
const MAX_ONE_HOT_CHARGE: i32 = 4;

/// Monoisotopic neutral mass of a ProForma peptidoform (no charge suffix).
pub fn theoretical_mass(proforma: &str) -> Result<f64, String> {
    let peptide = match ProFormaPeptidoform::pro_forma(proforma, None) {
        Ok(pep) => pep,
        Err(e) => {
            return Err(format!(
                "Error parsing peptidoform {}: {:?}",
                proforma, e
            ));
        }
    };
    let peptide = match peptide.as_linear() {
        Some(pep) => pep,
        None => return Err("Peptidoform is not linear.".to_string()),
    }
    .clone();

    let formulas = peptide.formulas();
    if formulas.len() != 1 {
        return Err(format!(
            "Peptidoform {} resolves to {} formulas, expected one.",
            proforma,
            formulas.len()
        ));
    }
    Ok(formulas[0].monoisotopic_mass().value)
}

/// Physicochemical features that only need the peptidoform and the
/// identification itself.
///
/// Modification names are translated through `mass_names` before the mass
/// calculation, the peptidoform carried by the PSM is left untouched.
#[derive(Debug, Clone)]
pub struct BasicFeatureGenerator {
    mass_names: HashMap<String, String>,
}

impl Default for BasicFeatureGenerator {
    fn default() -> Self {
        Self::from_config(&FeatureConfig::default())
    }
}

impl BasicFeatureGenerator {
    pub fn new<I: IntoIterator<Item = (String, String)>>(mass_names: I) -> Self {
        Self {
            mass_names: mass_names.into_iter().collect(),
        }
    }

    pub fn from_config(config: &FeatureConfig) -> Self {
        Self::new(config.mass_modifications.iter().cloned())
    }

    /// ProForma string handed to the mass calculation, without charge.
    pub fn mass_proforma(&self, parsed: &Peptidoform) -> String {
        let mut parsed = parsed.clone();
        parsed.map_modifications(|tag| {
            if let Some(name) = self.mass_names.get(tag.as_str()) {
                *tag = name.clone();
            }
        });
        parsed.to_unsigned_string()
    }

    fn add_psm_features(&self, psm: &mut Psm) -> Result<(), String> {
        let parsed = Peptidoform::parse(&psm.peptidoform).map_err(|e| e.to_string())?;
        let charge = psm.charge;
        let z = charge as f64;

        let theo_mass = theoretical_mass(&self.mass_proforma(&parsed))?;
        let theo_mz = (theo_mass + z * PROTON_MASS) / z;
        let exp_mass = psm.precursor_mz * z - z * PROTON_MASS;

        psm.add_feature("charge_n", z);
        for k in 1..=MAX_ONE_HOT_CHARGE {
            let hit = if k == MAX_ONE_HOT_CHARGE {
                charge >= k
            } else {
                charge == k
            };
            psm.add_feature(format!("charge_{}", k), if hit { 1.0 } else { 0.0 });
        }
        psm.add_feature(
            "abs_ms1_error_ppm",
            ((psm.precursor_mz - theo_mz) / theo_mz * 1e6).abs(),
        );
        psm.add_feature("search_engine_score", psm.score);
        psm.add_feature("theoretical_mass", theo_mass);
        psm.add_feature("experimental_mass", exp_mass);
        psm.add_feature("mass_error", exp_mass - theo_mass);
        psm.add_feature("pep_len", parsed.residues.len() as f64);
        Ok(())
    }
}

impl FeatureGenerator for BasicFeatureGenerator {
    fn name(&self) -> &str {
        "basic"
    }

    fn add_features(&self, psms: &mut [Psm]) -> Result<(), NovoRescoreError> {
        for psm in psms.iter_mut() {
            self.add_psm_features(psm)
                .map_err(|msg| NovoRescoreError::Generator {
                    generator: self.name().to_string(),
                    msg,
                })?;
        }
        Ok(())
    }
}
