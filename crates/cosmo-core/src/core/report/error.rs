use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error reading report '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing required field '{label}' in report '{path}'", path = source_path.display())]
    MissingRequiredField {
        label: String,
        source_path: PathBuf,
    },

    #[error("Malformed value for '{label}' on line {line}: '{value}'")]
    MalformedValue {
        line: usize,
        label: String,
        value: String,
    },
}
