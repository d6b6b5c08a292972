use super::Report;
use super::error::ReportError;
use super::labels::{E_COSMO_KEY, ReportLabels, SolventBlockKind};
use crate::core::models::properties::{PropertyError, PropertyValue};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

static NUMERIC_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eEdD][+-]?\d+)?$").expect("valid numeric regex")
});

/// A property extracted from a report, with its value exactly as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedProperty {
    pub key: String,
    pub value: String,
}

/// Everything a single parse produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// `E_cosmo` first, then solvent properties in block order. Keys are unique.
    pub properties: Vec<ParsedProperty>,
    /// General and recognised solvent blocks that contributed properties.
    pub parsed_blocks: usize,
    /// Solvent blocks whose header matched no known kind.
    pub skipped_blocks: usize,
}

impl ParseOutcome {
    /// Adds a property; an existing key keeps its position and takes the new value.
    fn insert(&mut self, key: String, value: String) {
        match self.properties.iter_mut().find(|p| p.key == key) {
            Some(existing) => {
                debug!(key = %key, old = %existing.value, new = %value, "Duplicate property in report, keeping the later value.");
                existing.value = value;
            }
            None => self.properties.push(ParsedProperty { key, value }),
        }
    }

    /// Looks up a parsed value by key.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::KeyNotFound`] if the report did not produce `key`.
    pub fn get(&self, key: &str) -> Result<&str, PropertyError> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
            .ok_or_else(|| PropertyError::KeyNotFound {
                key: key.to_string(),
            })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.key.as_str())
    }

    /// Converts the parsed pairs into property store entries, all numeric.
    pub fn into_entries(self) -> impl Iterator<Item = (String, PropertyValue)> {
        self.properties
            .into_iter()
            .map(|p| (p.key, PropertyValue::Numeric(p.value)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    General,
    Solvent,
}

/// A header line and the non-blank lines after it, with 1-based line numbers.
#[derive(Debug)]
struct Block<'a> {
    kind: BlockKind,
    header: &'a str,
    body: Vec<(usize, &'a str)>,
}

/// Turns COSMOtherm reports into [`ParseOutcome`]s.
///
/// The parser is stateless apart from its label table; a parse is a pure function
/// of the report lines and can be repeated or run concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportParser {
    labels: ReportLabels,
}

impl ReportParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a full report.
    ///
    /// # Errors
    ///
    /// - [`ReportError::MissingRequiredField`] if no general block carries the total
    ///   COSMO energy, or a recognised solvent block lacks its solvent name or value line.
    /// - [`ReportError::MalformedValue`] if a value token is not a number.
    pub fn parse(&self, report: &Report) -> Result<ParseOutcome, ReportError> {
        let blocks = self.split_blocks(report.lines());
        trace!(blocks = blocks.len(), source = %report.source().display(), "Split report into blocks.");

        let mut outcome = ParseOutcome::default();

        let mut e_cosmo = None;
        for block in blocks.iter().filter(|b| b.kind == BlockKind::General) {
            if let Some(value) = self.parse_general_block(block)? {
                e_cosmo = Some(value);
            }
            outcome.parsed_blocks += 1;
        }
        let e_cosmo = e_cosmo.ok_or_else(|| ReportError::MissingRequiredField {
            label: self.labels.e_cosmo.to_string(),
            source_path: report.source().to_path_buf(),
        })?;
        outcome.insert(E_COSMO_KEY.to_string(), e_cosmo);

        for block in blocks.iter().filter(|b| b.kind == BlockKind::Solvent) {
            let Some(kind) = self.labels.solvent_kind(block.header) else {
                debug!(header = block.header.trim(), "Skipping unrecognised report block.");
                outcome.skipped_blocks += 1;
                continue;
            };
            let (key, value) = self.parse_solvent_block(block, kind, report)?;
            outcome.insert(key, value);
            outcome.parsed_blocks += 1;
        }

        debug!(
            properties = outcome.properties.len(),
            parsed_blocks = outcome.parsed_blocks,
            skipped_blocks = outcome.skipped_blocks,
            "Report parsed."
        );
        Ok(outcome)
    }

    fn split_blocks<'a>(&self, lines: &'a [String]) -> Vec<Block<'a>> {
        let mut blocks = Vec::new();
        let mut current: Option<Block<'a>> = None;

        for (idx, line) in lines.iter().enumerate() {
            let kind = if self.labels.is_solvent_header(line) {
                Some(BlockKind::Solvent)
            } else if self.labels.is_general_header(line) {
                Some(BlockKind::General)
            } else {
                None
            };

            if let Some(kind) = kind {
                blocks.extend(current.take());
                current = Some(Block {
                    kind,
                    header: line,
                    body: Vec::new(),
                });
            } else if line.trim().is_empty() {
                blocks.extend(current.take());
            } else if let Some(block) = current.as_mut() {
                block.body.push((idx + 1, line.as_str()));
            }
        }
        blocks.extend(current);
        blocks
    }

    fn parse_general_block(&self, block: &Block) -> Result<Option<String>, ReportError> {
        let mut value = None;
        for &(line_no, line) in &block.body {
            if line.contains(self.labels.e_cosmo) {
                value = Some(trailing_value(line_no, self.labels.e_cosmo, line)?);
            }
        }
        Ok(value)
    }

    fn parse_solvent_block(
        &self,
        block: &Block,
        kind: &SolventBlockKind,
        report: &Report,
    ) -> Result<(String, String), ReportError> {
        let missing = |label: &str| ReportError::MissingRequiredField {
            label: label.to_string(),
            source_path: report.source().to_path_buf(),
        };

        let solvent = self
            .labels
            .solvent_token(block.header)
            .ok_or_else(|| missing(self.labels.solvent_marker))?;
        let &(line_no, line) = block
            .body
            .iter()
            .find(|(_, line)| line.contains(kind.value_label))
            .ok_or_else(|| missing(kind.value_label))?;
        let value = trailing_value(line_no, kind.value_label, line)?;

        Ok((format!("{}_{}", kind.key_prefix, solvent), value))
    }
}

/// Returns the last whitespace-separated token of `line` if it is a number.
fn trailing_value(line_no: usize, label: &str, line: &str) -> Result<String, ReportError> {
    let token = line.split_whitespace().last().unwrap_or("");
    if NUMERIC_TOKEN.is_match(token) {
        Ok(token.to_string())
    } else {
        Err(ReportError::MalformedValue {
            line: line_no,
            label: label.to_string(),
            value: token.to_string(),
        })
    }
}
