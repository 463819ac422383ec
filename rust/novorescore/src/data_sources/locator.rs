use crate::errors::NovoRescoreError;
use crate::models::RunLocations;
use regex::Regex;
use std::collections::{
    BTreeMap,
    HashMap,
};
use std::path::{
    Path,
    PathBuf,
};
use std::sync::LazyLock;
use tracing::{
    info,
    warn,
};

static URI_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("Valid regex"));

/// Run id -> absolute spectrum-file path, `None` when nothing on disk matched.
pub type ResolvedRuns = BTreeMap<u32, Option<PathBuf>>;

/// Basename of a run location, with any uri scheme (`file://`) removed first.
pub fn location_basename(location: &str) -> &str {
    let stripped = match URI_SCHEME.find(location) {
        Some(m) => &location[m.end()..],
        None => location,
    };
    stripped.rsplit(['/', '\\']).next().unwrap_or(stripped)
}

/// Matches run locations against the spectrum files present in one directory.
#[derive(Debug, Clone, Default)]
pub struct SpectrumLocator {
    basename_to_path: HashMap<String, PathBuf>,
}

impl SpectrumLocator {
    /// Indexes every regular file in `dir` whose extension matches one of
    /// `extensions` (case-insensitive).
    pub fn from_dir(dir: &Path, extensions: &[String]) -> Result<Self, NovoRescoreError> {
        let io_err = |e: std::io::Error| NovoRescoreError::Io {
            source: e,
            path: Some(dir.to_path_buf()),
        };
        let mut basename_to_path = HashMap::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.is_file() {
                continue;
            }
            let ext_matches = path
                .extension()
                .and_then(|x| x.to_str())
                .is_some_and(|ext| extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)));
            if !ext_matches {
                continue;
            }
            let Some(name) = path.file_name().and_then(|x| x.to_str()) else {
                continue;
            };
            let name = name.to_string();
            let full = std::path::absolute(&path).map_err(io_err)?;
            basename_to_path.insert(name, full);
        }
        info!(
            "Found {} spectrum files in {}",
            basename_to_path.len(),
            dir.display()
        );
        Ok(Self { basename_to_path })
    }

    pub fn from_paths<I: IntoIterator<Item = PathBuf>>(paths: I) -> Self {
        let basename_to_path = paths
            .into_iter()
            .filter_map(|p| {
                let name = p.file_name()?.to_str()?.to_string();
                Some((name, p))
            })
            .collect();
        Self { basename_to_path }
    }

    pub fn len(&self) -> usize {
        self.basename_to_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.basename_to_path.is_empty()
    }

    pub fn resolve(&self, location: &str) -> Option<&Path> {
        self.basename_to_path
            .get(location_basename(location))
            .map(|x| x.as_path())
    }

    /// Unmatched runs are kept with a `None` path, lookups through them simply
    /// yield missing metadata later on.
    pub fn resolve_all(&self, runs: &RunLocations) -> ResolvedRuns {
        runs.iter()
            .map(|(run_id, location)| {
                let resolved = self.resolve(location).map(|x| x.to_path_buf());
                if resolved.is_none() {
                    warn!(
                        "No spectrum file matches run {} (location: {})",
                        run_id, location
                    );
                }
                (*run_id, resolved)
            })
            .collect()
    }
}
