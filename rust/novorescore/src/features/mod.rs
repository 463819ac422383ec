//! Feature generation seam.
//!
//! Rank-1 identifications are converted to [`Psm`]s, enriched by three
//! ordered generator passes and joined back onto the identifications.
//!
//! # Generator passes
//!
//! 1. **basic**: physicochemical features computed in-process.
//! 2. **spectral_similarity**: external command, expected to attach the
//!    cosine feature used for the spectral angle.
//! 3. **retention_time**: external command, expected to attach the
//!    retention-time delta.
//!
//! A pass with no configured command is skipped, the columns it would have
//! provided come out as NaN.

pub mod basic;
pub mod external;
pub mod join;

pub use basic::BasicFeatureGenerator;
pub use external::CommandFeatureGenerator;
pub use join::{
    FeatureJoiner,
    FeatureRow,
    FeatureTable,
    spectral_angle,
};

use crate::config::FeatureConfig;
use crate::errors::NovoRescoreError;
use crate::models::{
    EnrichedIdentification,
    Psm,
};
use std::path::Path;
use tracing::{
    info,
    warn,
};

/// Attaches named numeric features to every PSM.
///
/// Any error is fatal for the whole dataset, implementations must not leave
/// partially enriched PSMs behind as a success.
pub trait FeatureGenerator {
    fn name(&self) -> &str;
    fn add_features(&self, psms: &mut [Psm]) -> Result<(), NovoRescoreError>;
}

/// The generator-side view of a rank-1 identification.
///
/// Unresolved scans and runs become empty strings, such PSMs never
/// reproduce a composite key and are dropped at the join.
pub fn psm_from_identification(ident: &EnrichedIdentification) -> Psm {
    Psm {
        spectrum_id: ident.scan.map(|x| x.to_string()).unwrap_or_default(),
        run: ident.run.clone().unwrap_or_default(),
        peptidoform: ident.peptidoform.clone(),
        score: ident.score,
        retention_time: ident.rt_seconds,
        is_decoy: false,
        precursor_mz: ident.precursor_mz,
        charge: ident.charge,
        rank: 1,
        protein_list: None,
        rescoring_features: Default::default(),
    }
}

/// The three generator passes, in invocation order.
pub fn build_generators(
    config: &FeatureConfig,
    spectrum_dir: &Path,
) -> Vec<Box<dyn FeatureGenerator>> {
    let mut out: Vec<Box<dyn FeatureGenerator>> =
        vec![Box::new(BasicFeatureGenerator::from_config(config))];
    let passes = [
        ("spectral_similarity", &config.spectral_similarity),
        ("retention_time", &config.retention_time),
    ];
    for (name, command) in passes {
        match command {
            Some(command) => out.push(Box::new(CommandFeatureGenerator::from_config(
                name,
                command,
                spectrum_dir,
            ))),
            None => warn!(
                "No command configured for the '{}' feature pass, skipping it",
                name
            ),
        }
    }
    out
}

pub fn run_generators(
    generators: &[Box<dyn FeatureGenerator>],
    psms: &mut [Psm],
) -> Result<(), NovoRescoreError> {
    for generator in generators.iter() {
        let start = std::time::Instant::now();
        generator.add_features(psms)?;
        info!(
            "Feature generator '{}' finished in {:?}",
            generator.name(),
            start.elapsed()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExternalCommand;

    struct Constant(&'static str, f64);

    impl FeatureGenerator for Constant {
        fn name(&self) -> &str {
            self.0
        }

        fn add_features(&self, psms: &mut [Psm]) -> Result<(), NovoRescoreError> {
            psms.iter_mut().for_each(|x| x.add_feature(self.0, self.1));
            Ok(())
        }
    }

    struct Failing;

    impl FeatureGenerator for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn add_features(&self, _psms: &mut [Psm]) -> Result<(), NovoRescoreError> {
            Err(NovoRescoreError::Generator {
                generator: "failing".to_string(),
                msg: "nope".to_string(),
            })
        }
    }

    fn psm() -> Psm {
        Psm {
            spectrum_id: "1".to_string(),
            run: "run1.mgf".to_string(),
            peptidoform: "PEPTLDEK/2".to_string(),
            score: 0.5,
            retention_time: None,
            is_decoy: false,
            precursor_mz: 400.0,
            charge: 2,
            rank: 1,
            protein_list: None,
            rescoring_features: Default::default(),
        }
    }

    #[test]
    fn test_passes_run_in_order() {
        let gens: Vec<Box<dyn FeatureGenerator>> =
            vec![Box::new(Constant("a", 1.0)), Box::new(Constant("b", 2.0))];
        let mut psms = vec![psm()];
        run_generators(&gens, &mut psms).unwrap();
        let names: Vec<_> = psms[0].rescoring_features.keys().cloned().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_failure_aborts() {
        let gens: Vec<Box<dyn FeatureGenerator>> =
            vec![Box::new(Failing), Box::new(Constant("b", 2.0))];
        let mut psms = vec![psm()];
        assert!(run_generators(&gens, &mut psms).is_err());
        assert!(psms[0].feature("b").is_none());
    }

    #[test]
    fn test_build_generators() {
        let mut config = FeatureConfig::default();
        assert_eq!(build_generators(&config, Path::new(".")).len(), 1);
        config.retention_time = Some(ExternalCommand {
            program: "rt".to_string(),
            args: vec![],
        });
        let gens = build_generators(&config, Path::new("."));
        let names: Vec<_> = gens.iter().map(|x| x.name().to_string()).collect();
        assert_eq!(names, vec!["basic", "retention_time"]);
    }
}
