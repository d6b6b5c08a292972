//! Reading COSMOtherm reports.
//!
//! A report is the complete text output of one COSMOtherm run. It holds a general
//! block with the compound's total COSMO energy followed by one block per solvent
//! job. [`parser::ReportParser`] turns it into an ordered list of properties; it
//! never touches a conformer, so attaching the result is up to the caller.

pub mod error;
pub mod labels;
pub mod parser;

use error::ReportError;
use std::fs;
use std::path::{Path, PathBuf};

/// The buffered lines of one report plus the path they were read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    source: PathBuf,
    lines: Vec<String>,
}

impl Report {
    /// Builds a report from in-memory text. `source` is only used in error messages.
    pub fn from_text(source: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            source: source.into(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Reads a report file completely into memory.
    pub fn read_from_path(path: &Path) -> Result<Self, ReportError> {
        let text = fs::read_to_string(path).map_err(|e| ReportError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::from_text(path, &text))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}
