use crate::config::{
    FixedModification,
    ModificationConfig,
};
use crate::errors::NovoRescoreError;
use crate::models::{
    Peptidoform,
    Psm,
};
use std::collections::HashMap;
use tracing::debug;

/// Rewrites the modification tags of every PSM peptidoform in place before
/// the feature generators see them.
///
/// Bracket tags are renamed through the rename table and every fixed
/// modification is appended to each matching residue. The rewrite is
/// applied once and never reverted.
#[derive(Debug, Clone)]
pub struct ModificationNormalizer {
    renames: HashMap<String, String>,
    fixed: Vec<FixedModification>,
}

impl ModificationNormalizer {
    pub fn new(config: &ModificationConfig) -> Self {
        Self {
            renames: config.renames.iter().cloned().collect(),
            fixed: config.fixed.clone(),
        }
    }

    pub fn normalize_peptidoform(&self, peptidoform: &str) -> Result<String, NovoRescoreError> {
        let mut parsed =
            Peptidoform::parse(peptidoform).map_err(|e| NovoRescoreError::Modification {
                peptidoform: peptidoform.to_string(),
                msg: e.to_string(),
            })?;

        parsed.map_modifications(|tag| {
            if let Some(new_name) = self.renames.get(tag.as_str()) {
                *tag = new_name.clone();
            }
        });

        for fixed in self.fixed.iter() {
            for residue in parsed
                .residues
                .iter_mut()
                .filter(|x| fixed.residues.contains(&x.amino_acid))
            {
                if !residue.modifications.contains(&fixed.name) {
                    residue.modifications.push(fixed.name.clone());
                }
            }
        }

        Ok(parsed.to_string())
    }

    pub fn normalize(&self, psms: &mut [Psm]) -> Result<(), NovoRescoreError> {
        for psm in psms.iter_mut() {
            psm.peptidoform = self.normalize_peptidoform(&psm.peptidoform)?;
        }
        debug!("Normalized modifications of {} PSMs", psms.len());
        Ok(())
    }
}
