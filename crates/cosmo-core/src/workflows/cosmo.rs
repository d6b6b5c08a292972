use crate::core::models::compound::Compound;
use crate::core::models::conformer::Conformer;
use crate::core::models::ids::ConformerId;
use crate::core::models::properties::COSMO_FILE_KEY;
use crate::core::report::Report;
use crate::core::report::parser::{ParseOutcome, ReportParser};
use crate::engine::config::{INPUT_DECK_PARAMETER, StepConfig};
use crate::engine::error::StepError;
use crate::engine::executor::{ExecOutput, ExecRequest, Executor};
use crate::engine::geometry;
use crate::engine::progress::{Progress, ProgressReporter};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// File name of the surface-charge input inside the working directory.
pub const COSMO_INPUT_FILE: &str = "mol.cosmo";
/// File name of the report COSMOtherm writes next to its input deck.
pub const REPORT_FILE: &str = "cosmotherm.out";

/// Result of running the step over a batch.
#[derive(Debug, Default)]
pub struct StepSummary {
    /// Conformers the step was attempted on.
    pub processed: usize,
    /// Conformers whose properties were committed.
    pub succeeded: usize,
    /// One error per failed conformer, in batch order.
    pub failures: Vec<StepError>,
}

impl StepSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn merge(mut self, other: StepSummary) -> Self {
        self.processed += other.processed;
        self.succeeded += other.succeeded;
        self.failures.extend(other.failures);
        self
    }
}

/// The COSMOtherm calculation step.
///
/// For every conformer, the step writes the conformer's COSMO surface file and
/// the configured input deck to a fresh working directory, runs the tool, parses
/// its report and commits the properties to that conformer. Coordinates are
/// checked bit-for-bit before and after.
pub struct CosmoStep<E> {
    config: StepConfig,
    executor: E,
    parser: ReportParser,
}

impl<E> CosmoStep<E>
where
    E: Executor + Sync,
{
    pub fn new(config: StepConfig, executor: E) -> Self {
        Self {
            config,
            executor,
            parser: ReportParser::new(),
        }
    }

    /// Runs the step on every conformer of every compound.
    ///
    /// Compounds are processed in parallel. A failing conformer is recorded in the
    /// summary and does not stop the rest of the batch.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Config`] before touching any conformer if the
    /// configuration has no input deck.
    #[instrument(skip_all, name = "cosmo_step")]
    pub fn execute(
        &self,
        compounds: &mut [Compound],
        reporter: &ProgressReporter,
    ) -> Result<StepSummary, StepError> {
        self.config.input_deck()?;

        let total: usize = compounds.iter().map(Compound::conformer_count).sum();
        info!(
            compounds = compounds.len(),
            conformers = total,
            "Starting COSMO step."
        );
        reporter.report(Progress::StepStart {
            total_conformers: total as u64,
        });

        let summary = compounds
            .par_iter_mut()
            .enumerate()
            .map(|(idx, compound)| self.process_compound(idx, compound, reporter))
            .collect::<Vec<_>>()
            .into_iter()
            .fold(StepSummary::default(), StepSummary::merge);

        reporter.report(Progress::StepFinish);
        info!(
            succeeded = summary.succeeded,
            failed = summary.failures.len(),
            "COSMO step finished."
        );
        Ok(summary)
    }

    fn process_compound(
        &self,
        index: usize,
        compound: &mut Compound,
        reporter: &ProgressReporter,
    ) -> StepSummary {
        let mut summary = StepSummary::default();
        for (id, conformer) in compound.conformers_with_ids_mut(index) {
            summary.processed += 1;
            let result = self.process_conformer(&id, conformer);
            reporter.report(Progress::ConformerFinished {
                id: id.clone(),
                success: result.is_ok(),
            });
            match result {
                Ok(_) => summary.succeeded += 1,
                Err(e) => {
                    warn!(conformer = %id, error = %e, "Conformer failed, continuing with the batch.");
                    summary.failures.push(e);
                }
            }
        }
        summary
    }

    /// Runs the tool for one conformer and commits the parsed properties.
    ///
    /// Either every parsed property (and the re-read surface file) is committed,
    /// or the conformer's store is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Config`] without running the tool if no input deck
    /// is configured.
    #[instrument(skip_all, fields(conformer = %id))]
    pub fn process_conformer(
        &self,
        id: &ConformerId,
        conformer: &mut Conformer,
    ) -> Result<ParseOutcome, StepError> {
        let deck = self.config.input_deck()?;
        geometry::guard(id, conformer, |conformer| {
            let cosmo_lines = conformer
                .properties()
                .get_lines(COSMO_FILE_KEY)
                .map_err(|e| StepError::Property {
                    id: id.clone(),
                    source: e,
                })?
                .to_vec();

            let io_err = |e| StepError::Io {
                id: id.clone(),
                source: e,
            };
            let workdir = tempfile::Builder::new()
                .prefix("cosmoprop_")
                .tempdir()
                .map_err(io_err)?;
            prepare_inputs(workdir.path(), &cosmo_lines, deck).map_err(io_err)?;

            let request = self.build_request(workdir.path());
            let output =
                self.executor
                    .execute(&request)
                    .map_err(|e| StepError::ExecutionFailed {
                        id: id.clone(),
                        source: e,
                    })?;

            let report = load_report(workdir.path(), &output).map_err(|e| StepError::Report {
                id: id.clone(),
                source: e,
            })?;
            let outcome = self.parser.parse(&report).map_err(|e| StepError::Report {
                id: id.clone(),
                source: e,
            })?;
            let captured_cosmo = read_lines(&workdir.path().join(COSMO_INPUT_FILE))
                .map_err(io_err)?;

            let store = conformer.properties_mut();
            store.commit(outcome.clone().into_entries());
            store.set_lines(COSMO_FILE_KEY, captured_cosmo);

            debug!(properties = outcome.properties.len(), "Committed COSMO properties.");
            Ok(outcome)
        })
    }

    /// Parses an existing report and commits its properties to `conformer`.
    #[instrument(skip_all, fields(conformer = %id, report = %path.display()))]
    pub fn parse_output(
        &self,
        path: &Path,
        id: &ConformerId,
        conformer: &mut Conformer,
    ) -> Result<ParseOutcome, StepError> {
        geometry::guard(id, conformer, |conformer| {
            let outcome = Report::read_from_path(path)
                .and_then(|report| self.parser.parse(&report))
                .map_err(|e| StepError::Report {
                    id: id.clone(),
                    source: e,
                })?;
            conformer
                .properties_mut()
                .commit(outcome.clone().into_entries());
            Ok(outcome)
        })
    }

    fn build_request(&self, workdir: &Path) -> ExecRequest {
        let mut args = self.config.arguments.flags.clone();
        args.push(INPUT_DECK_PARAMETER.to_string());
        ExecRequest {
            workdir: workdir.to_path_buf(),
            prefix: self.config.prefix().map(str::to_string),
            program: self.config.execution.binary.clone(),
            args,
        }
    }
}

/// Reads the report file, falling back to captured stdout when the tool
/// printed its report instead of writing it.
fn load_report(
    workdir: &Path,
    output: &ExecOutput,
) -> Result<Report, crate::core::report::error::ReportError> {
    let path = workdir.join(REPORT_FILE);
    if !path.exists() && !output.stdout.trim().is_empty() {
        debug!("No report file written, parsing captured stdout.");
        return Ok(Report::from_text(path, &output.stdout));
    }
    Report::read_from_path(&path)
}

fn prepare_inputs(workdir: &Path, cosmo_lines: &[String], deck: &[String]) -> std::io::Result<()> {
    fs::write(workdir.join(COSMO_INPUT_FILE), join_lines(cosmo_lines))?;
    fs::write(workdir.join(INPUT_DECK_PARAMETER), join_lines(deck))
}

fn join_lines(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::to_string)
        .collect())
}
