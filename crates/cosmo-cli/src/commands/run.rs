use crate::cli::RunArgs;
use crate::config::PartialStepConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use cosmoprop::core::io::sdf::SdfFile;
use cosmoprop::core::io::traits::MolecularFile;
use cosmoprop::core::models::compound::Compound;
use cosmoprop::core::models::conformer::Conformer;
use cosmoprop::core::models::properties::COSMO_FILE_KEY;
use cosmoprop::engine::executor::CommandExecutor;
use cosmoprop::engine::progress::ProgressReporter;
use cosmoprop::workflows::cosmo::{CosmoStep, StepSummary};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub fn run(args: RunArgs) -> Result<()> {
    let partial_config = PartialStepConfig::from_file(&args.config)?;
    let base_dir = args.config.parent().unwrap_or(Path::new("."));
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args, base_dir)?;

    info!("Loading input structures from {:?}", &args.input);
    let mut conformers = SdfFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;
    attach_cosmo_files(&mut conformers, &args.cosmo_files)?;
    let mut compounds = group_into_compounds(conformers);
    info!(
        "Loaded {} compound(s) with {} conformer(s).",
        compounds.len(),
        compounds.iter().map(Compound::conformer_count).sum::<usize>()
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Running COSMOtherm...");
    let step = CosmoStep::new(config, CommandExecutor);
    let summary = step.execute(&mut compounds, &reporter)?;

    write_output(&args.output, &compounds)?;
    report_summary(&summary, &args.output)
}

/// Stores each COSMO file as the payload of the conformer at the same position.
fn attach_cosmo_files(conformers: &mut [Conformer], paths: &[PathBuf]) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }
    if paths.len() != conformers.len() {
        return Err(CliError::Argument(format!(
            "{} --cosmo file(s) given for {} SDF record(s); provide exactly one per record",
            paths.len(),
            conformers.len()
        )));
    }
    for (conformer, path) in conformers.iter_mut().zip(paths) {
        let lines = std::fs::read_to_string(path)?
            .lines()
            .map(str::to_string)
            .collect();
        conformer.properties_mut().set_lines(COSMO_FILE_KEY, lines);
    }
    Ok(())
}

/// Groups SDF records into compounds by title, in order of first appearance.
/// Each compound gets a single enumeration holding its conformers.
fn group_into_compounds(conformers: Vec<Conformer>) -> Vec<Compound> {
    let mut compounds: Vec<Compound> = Vec::new();
    let mut index_by_title: HashMap<String, usize> = HashMap::new();

    for conformer in conformers {
        let idx = *index_by_title
            .entry(conformer.title().to_string())
            .or_insert_with(|| {
                let mut compound = Compound::new(conformer.title());
                compound.add_enumeration();
                compounds.push(compound);
                compounds.len() - 1
            });
        if let Some(enumeration) = compounds[idx].enumeration_mut(0) {
            enumeration.add_conformer(conformer);
        }
    }
    compounds
}

fn write_output(path: &Path, compounds: &[Compound]) -> Result<()> {
    let conformers = compounds
        .iter()
        .flat_map(|c| c.enumerations())
        .flat_map(|e| e.conformers());
    SdfFile::write_to_path(conformers, path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Counts failed conformers per compound, in order of first failure.
fn failures_by_compound(summary: &StepSummary) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for id in summary.failures.iter().filter_map(|f| f.conformer_id()) {
        match counts.iter_mut().find(|(name, _)| *name == id.compound_name) {
            Some((_, count)) => *count += 1,
            None => counts.push((id.compound_name.clone(), 1)),
        }
    }
    counts
}

fn report_summary(summary: &StepSummary, output: &Path) -> Result<()> {
    for failure in &summary.failures {
        error!("{}", failure);
    }
    for (compound, failed) in failures_by_compound(summary) {
        println!("✗ {compound}: {failed} conformer(s) failed");
    }
    println!(
        "✓ {} of {} conformer(s) processed successfully. Results written to: {}",
        summary.succeeded,
        summary.processed,
        output.display()
    );
    if summary.is_success() {
        Ok(())
    } else {
        Err(CliError::Incomplete {
            failed: summary.failures.len(),
            processed: summary.processed,
        })
    }
}
