//! Feature generation delegated to an external program.
//!
//! Protocol: every PSM is written to the program's stdin as one JSON object
//! per line. The program answers with exactly one JSON object per PSM on
//! stdout, in the same order, mapping feature names to numbers (`null` is
//! read as NaN).

use super::FeatureGenerator;
use crate::config::ExternalCommand;
use crate::errors::NovoRescoreError;
use crate::models::Psm;
use indexmap::IndexMap;
use std::io::{
    BufRead,
    BufReader,
    BufWriter,
    Read,
    Write,
};
use std::path::Path;
use std::process::{
    Command,
    Stdio,
};
use tracing::{
    debug,
    info,
};

const SPECTRUM_DIR_PLACEHOLDER: &str = "{spectrum_dir}";

#[derive(Debug, Clone)]
pub struct CommandFeatureGenerator {
    name: String,
    program: String,
    args: Vec<String>,
}

impl CommandFeatureGenerator {
    pub fn new(name: impl Into<String>, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
        }
    }

    /// Builds the generator, replacing the spectrum-directory placeholder in
    /// the configured arguments.
    pub fn from_config(name: &str, command: &ExternalCommand, spectrum_dir: &Path) -> Self {
        let dir = spectrum_dir.to_string_lossy();
        let args = command
            .args
            .iter()
            .map(|x| x.replace(SPECTRUM_DIR_PLACEHOLDER, &dir))
            .collect();
        Self::new(name, command.program.clone(), args)
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn error(&self, msg: impl Into<String>) -> NovoRescoreError {
        NovoRescoreError::Generator {
            generator: self.name.clone(),
            msg: msg.into(),
        }
    }

    fn run(&self, psms: &[Psm]) -> Result<Vec<IndexMap<String, Option<f64>>>, NovoRescoreError> {
        let mut payload = Vec::new();
        for psm in psms.iter() {
            serde_json::to_writer(&mut payload, psm)?;
            payload.push(b'\n');
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.error(format!("Could not execute '{}': {}", self.program, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.error("stdin was not captured"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| self.error("stdout was not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| self.error("stderr was not captured"))?;

        // Feed stdin from its own thread so a program that answers while still
        // reading cannot deadlock against us.
        let writer = std::thread::spawn(move || -> std::io::Result<()> {
            let mut w = BufWriter::new(&mut stdin);
            w.write_all(&payload)?;
            w.flush()
        });
        let stderr_reader = std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf);
            buf
        });

        let mut out = Vec::with_capacity(psms.len());
        for line in BufReader::new(stdout).lines() {
            let line = line.map_err(|e| self.error(format!("Error reading output: {}", e)))?;
            if line.trim().is_empty() {
                continue;
            }
            let features: IndexMap<String, Option<f64>> = serde_json::from_str(&line)
                .map_err(|e| self.error(format!("Invalid feature line {}: {}", out.len() + 1, e)))?;
            out.push(features);
        }

        let status = child
            .wait()
            .map_err(|e| self.error(format!("Error waiting for '{}': {}", self.program, e)))?;
        let write_result = writer.join();
        let stderr = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            let detail = if stderr.trim().is_empty() {
                format!("exit status {}", status)
            } else {
                stderr.trim().to_string()
            };
            return Err(self.error(detail));
        }
        match write_result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(self.error(format!("Error writing PSMs: {}", e))),
            Err(_) => return Err(self.error("stdin writer panicked")),
        }
        if out.len() != psms.len() {
            return Err(self.error(format!(
                "Expected {} feature lines, got {}",
                psms.len(),
                out.len()
            )));
        }
        Ok(out)
    }
}

impl FeatureGenerator for CommandFeatureGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_features(&self, psms: &mut [Psm]) -> Result<(), NovoRescoreError> {
        info!(
            "Running '{}' feature generator ({}) on {} PSMs",
            self.name,
            self.program,
            psms.len()
        );
        let features = self.run(psms)?;
        for (psm, bag) in psms.iter_mut().zip(features) {
            for (k, v) in bag {
                psm.add_feature(k, v.unwrap_or(f64::NAN));
            }
        }
        debug!("'{}' feature generator done", self.name);
        Ok(())
    }
}
