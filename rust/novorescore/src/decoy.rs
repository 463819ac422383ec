//! Invocation contract of the native decoy-spectrum generator.
//!
//! The generator itself is a Java program shipped as a jar, only its command
//! line and failure modes are handled here.

use crate::errors::SubprocessError;
use serde::{
    Deserialize,
    Serialize,
};
use std::ops::RangeInclusive;
use std::path::{
    Path,
    PathBuf,
};
use std::process::Command;
use tracing::{
    debug,
    error,
    info,
};

pub const TOLERANCE_PPM_RANGE: RangeInclusive<f64> = 0.1..=1000.0;
pub const MEMORY_GB_RANGE: RangeInclusive<u32> = 1..=64;
pub const RANDOM_SEED_RANGE: RangeInclusive<u32> = 1..=999_999;

const VERSION_MISMATCH_MARKERS: [&str; 2] = ["UnsupportedClassVersionError", "class file version"];

fn default_java() -> String {
    "java".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecoySpectraJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub precursor_tolerance_ppm: f64,
    pub memory_gb: u32,
    pub random_seed: u32,
    pub jar_path: PathBuf,
    #[serde(default = "default_java")]
    pub java_program: String,
}

/// Captured output of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoyRunOutput {
    pub stdout: String,
    pub stderr: String,
}

fn invalid(msg: String) -> SubprocessError {
    SubprocessError::Validation { msg }
}

impl DecoySpectraJob {
    pub fn validate(&self) -> Result<(), SubprocessError> {
        if !self.input_dir.exists() {
            return Err(invalid(format!(
                "Input directory does not exist: {}",
                self.input_dir.display()
            )));
        }
        if !self.input_dir.is_dir() {
            return Err(invalid(format!(
                "Input path is not a directory: {}",
                self.input_dir.display()
            )));
        }
        if let Some(parent) = self.output_dir.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(invalid(format!(
                    "Parent of the output directory does not exist: {}",
                    parent.display()
                )));
            }
        }
        if !self.jar_path.is_file() {
            return Err(invalid(format!(
                "Jar file does not exist: {}",
                self.jar_path.display()
            )));
        }
        if !TOLERANCE_PPM_RANGE.contains(&self.precursor_tolerance_ppm) {
            return Err(invalid(format!(
                "Precursor tolerance must be within 0.1 - 1000 ppm, got {}",
                self.precursor_tolerance_ppm
            )));
        }
        if !MEMORY_GB_RANGE.contains(&self.memory_gb) {
            return Err(invalid(format!(
                "Memory must be within 1 - 64 GB, got {}",
                self.memory_gb
            )));
        }
        if !RANDOM_SEED_RANGE.contains(&self.random_seed) {
            return Err(invalid(format!(
                "Random seed must be within 1 - 999999, got {}",
                self.random_seed
            )));
        }
        Ok(())
    }

    /// Arguments passed to the java launcher. The tolerance is truncated to
    /// an integer.
    pub fn command_args(&self) -> Vec<String> {
        vec![
            format!("-Xmx{}G", self.memory_gb),
            "-jar".to_string(),
            self.jar_file_name(),
            "-i".to_string(),
            self.input_dir.to_string_lossy().to_string(),
            "-o".to_string(),
            self.output_dir.to_string_lossy().to_string(),
            "-d".to_string(),
            (self.precursor_tolerance_ppm.trunc() as i64).to_string(),
            "-r".to_string(),
            self.random_seed.to_string(),
        ]
    }

    fn jar_file_name(&self) -> String {
        self.jar_path
            .file_name()
            .map(|x| x.to_string_lossy().to_string())
            .unwrap_or_else(|| self.jar_path.to_string_lossy().to_string())
    }

    fn working_dir(&self) -> &Path {
        match self.jar_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    /// Validates, creates the output directory and runs the generator to
    /// completion. The output directory is left in place on failure.
    pub fn run(&self) -> Result<DecoyRunOutput, SubprocessError> {
        self.validate()?;
        std::fs::create_dir_all(&self.output_dir).map_err(|e| SubprocessError::Io {
            source: e,
            path: Some(self.output_dir.clone()),
        })?;

        // Paths are resolved before changing the working directory.
        let mut job = self.clone();
        job.input_dir = std::path::absolute(&self.input_dir).map_err(|e| SubprocessError::Io {
            source: e,
            path: Some(self.input_dir.clone()),
        })?;
        job.output_dir = std::path::absolute(&self.output_dir).map_err(|e| SubprocessError::Io {
            source: e,
            path: Some(self.output_dir.clone()),
        })?;

        let args = job.command_args();
        info!("Executing: {} {}", self.java_program, args.join(" "));
        let output = Command::new(&self.java_program)
            .args(&args)
            .current_dir(self.working_dir())
            .output()
            .map_err(|e| SubprocessError::NotFound {
                program: self.java_program.clone(),
                source: e,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        debug!("Decoy generator stdout: {}", stdout);
        if !output.status.success() {
            error!("Decoy generator failed: {}", stderr.trim());
            return Err(classify_failure(output.status.code(), stderr));
        }
        info!("Decoy spectra written to {}", self.output_dir.display());
        Ok(DecoyRunOutput { stdout, stderr })
    }
}

pub fn classify_failure(status: Option<i32>, stderr: String) -> SubprocessError {
    if VERSION_MISMATCH_MARKERS.iter().any(|m| stderr.contains(m)) {
        SubprocessError::VersionMismatch { stderr }
    } else {
        SubprocessError::Failed { status, stderr }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(dir: &Path) -> DecoySpectraJob {
        let input = dir.join("in");
        std::fs::create_dir_all(&input).unwrap();
        let jar = dir.join("PrecursorSwap.jar");
        std::fs::write(&jar, "").unwrap();
        DecoySpectraJob {
            input_dir: input,
            output_dir: dir.join("out"),
            precursor_tolerance_ppm: 10.7,
            memory_gb: 8,
            random_seed: 42,
            jar_path: jar,
            java_program: default_java(),
        }
    }

    #[test]
    fn test_command_args() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path());
        let args = job.command_args();
        assert_eq!(args[0], "-Xmx8G");
        assert_eq!(&args[1..3], &["-jar".to_string(), "PrecursorSwap.jar".to_string()]);
        assert_eq!(args[8], "10");
        assert_eq!(args[10], "42");
    }

    #[test]
    fn test_validation_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let base = job(dir.path());
        assert!(base.validate().is_ok());

        let cases = [
            DecoySpectraJob {
                precursor_tolerance_ppm: 0.05,
                ..base.clone()
            },
            DecoySpectraJob {
                precursor_tolerance_ppm: 1000.5,
                ..base.clone()
            },
            DecoySpectraJob {
                memory_gb: 0,
                ..base.clone()
            },
            DecoySpectraJob {
                memory_gb: 65,
                ..base.clone()
            },
            DecoySpectraJob {
                random_seed: 1_000_000,
                ..base.clone()
            },
            DecoySpectraJob {
                input_dir: dir.path().join("nope"),
                ..base.clone()
            },
            DecoySpectraJob {
                output_dir: dir.path().join("a/b/c"),
                ..base.clone()
            },
            DecoySpectraJob {
                jar_path: dir.path().join("missing.jar"),
                ..base.clone()
            },
        ];
        for case in cases.iter() {
            assert!(
                matches!(case.validate(), Err(SubprocessError::Validation { .. })),
                "{:?}",
                case
            );
        }
        let edges = DecoySpectraJob {
            precursor_tolerance_ppm: 0.1,
            memory_gb: 64,
            random_seed: 999_999,
            ..base
        };
        assert!(edges.validate().is_ok());
    }

    #[test]
    fn test_classify_failure() {
        assert!(matches!(
            classify_failure(
                Some(1),
                "java.lang.UnsupportedClassVersionError: has been compiled".to_string()
            ),
            SubprocessError::VersionMismatch { .. }
        ));
        assert!(matches!(
            classify_failure(Some(1), "class file version 65.0".to_string()),
            SubprocessError::VersionMismatch { .. }
        ));
        assert!(matches!(
            classify_failure(Some(2), "OutOfMemoryError".to_string()),
            SubprocessError::Failed {
                status: Some(2),
                ..
            }
        ));
    }

    #[test]
    fn test_missing_launcher_keeps_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let job = DecoySpectraJob {
            java_program: "definitely-not-a-java-launcher".to_string(),
            ..job(dir.path())
        };
        assert!(matches!(job.run(), Err(SubprocessError::NotFound { .. })));
        assert!(dir.path().join("out").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_run_is_classified() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let launcher = dir.path().join("fake-java");
        std::fs::write(
            &launcher,
            "#!/bin/sh\necho 'Exception: UnsupportedClassVersionError' >&2\nexit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&launcher, std::fs::Permissions::from_mode(0o755)).unwrap();
        let job = DecoySpectraJob {
            java_program: launcher.to_string_lossy().to_string(),
            ..job(dir.path())
        };
        assert!(matches!(
            job.run(),
            Err(SubprocessError::VersionMismatch { .. })
        ));
    }
}
