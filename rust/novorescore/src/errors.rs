use std::path::PathBuf;

#[derive(Debug)]
pub enum TableParsingError {
    DataBeforeHeader {
        line: usize,
    },
    NoDataRows {
        path: Option<PathBuf>,
    },
    MissingColumn {
        column: String,
    },
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },
}

impl std::fmt::Display for TableParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableParsingError::DataBeforeHeader { line } => write!(
                f,
                "Data line {} appears before any header line in the identification table",
                line
            ),
            TableParsingError::NoDataRows { path } => match path {
                Some(path) => write!(
                    f,
                    "No identification rows found in {}, is this a valid table?",
                    path.display()
                ),
                None => write!(f, "No identification rows found in the input stream"),
            },
            TableParsingError::MissingColumn { column } => {
                write!(f, "Required column '{}' is missing from the header", column)
            }
            TableParsingError::Io { source, path } => match path {
                Some(path) => write!(f, "Error reading {}: {}", path.display(), source),
                None => write!(f, "Error reading identification table: {}", source),
            },
        }
    }
}

/// Failures of a blocking child-process invocation.
#[derive(Debug)]
pub enum SubprocessError {
    Validation {
        msg: String,
    },
    NotFound {
        program: String,
        source: std::io::Error,
    },
    /// The native tool was built for a newer runtime than the one installed.
    VersionMismatch {
        stderr: String,
    },
    Failed {
        status: Option<i32>,
        stderr: String,
    },
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },
}

impl std::fmt::Display for SubprocessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubprocessError::Validation { msg } => write!(f, "Invalid decoy job: {}", msg),
            SubprocessError::NotFound { program, source } => {
                write!(f, "Unable to launch '{}' (is it on PATH?): {}", program, source)
            }
            SubprocessError::VersionMismatch { stderr } => write!(
                f,
                "Runtime version mismatch, the tool requires a newer Java runtime: {}",
                stderr.trim()
            ),
            SubprocessError::Failed { status, stderr } => match status {
                Some(code) => write!(f, "Process exited with status {}: {}", code, stderr.trim()),
                None => write!(f, "Process terminated by signal: {}", stderr.trim()),
            },
            SubprocessError::Io { source, path } => match path {
                Some(path) => write!(f, "I/O error at {}: {}", path.display(), source),
                None => write!(f, "I/O error: {}", source),
            },
        }
    }
}

#[derive(Debug)]
pub enum NovoRescoreError {
    TableParsing(TableParsingError),
    Coercion {
        field: &'static str,
        value: String,
        row: usize,
    },
    SpectrumReading {
        source: std::io::Error,
        path: PathBuf,
    },
    Modification {
        peptidoform: String,
        msg: String,
    },
    Generator {
        generator: String,
        msg: String,
    },
    Subprocess(SubprocessError),
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for NovoRescoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NovoRescoreError::TableParsing(e) => write!(f, "{}", e),
            NovoRescoreError::Coercion { field, value, row } => write!(
                f,
                "Unable to coerce '{}' in field '{}' (data row {}) to a number",
                value, field, row
            ),
            NovoRescoreError::SpectrumReading { source, path } => {
                write!(f, "Error reading spectra from {}: {}", path.display(), source)
            }
            NovoRescoreError::Modification { peptidoform, msg } => {
                write!(f, "Unable to normalize peptidoform '{}': {}", peptidoform, msg)
            }
            NovoRescoreError::Generator { generator, msg } => {
                write!(f, "Feature generator '{}' failed: {}", generator, msg)
            }
            NovoRescoreError::Subprocess(e) => write!(f, "{}", e),
            NovoRescoreError::Io { source, path } => match path {
                Some(path) => write!(f, "I/O error at {}: {}", path.display(), source),
                None => write!(f, "I/O error: {}", source),
            },
            NovoRescoreError::Csv(e) => write!(f, "Error writing delimited output: {}", e),
            NovoRescoreError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for NovoRescoreError {}

pub type Result<T> = std::result::Result<T, NovoRescoreError>;

impl From<TableParsingError> for NovoRescoreError {
    fn from(x: TableParsingError) -> Self {
        Self::TableParsing(x)
    }
}

impl From<SubprocessError> for NovoRescoreError {
    fn from(x: SubprocessError) -> Self {
        Self::Subprocess(x)
    }
}

impl From<csv::Error> for NovoRescoreError {
    fn from(x: csv::Error) -> Self {
        Self::Csv(x)
    }
}

impl From<serde_json::Error> for NovoRescoreError {
    fn from(x: serde_json::Error) -> Self {
        Self::Json(x)
    }
}

impl From<std::io::Error> for NovoRescoreError {
    fn from(x: std::io::Error) -> Self {
        Self::Io {
            source: x,
            path: None,
        }
    }
}
