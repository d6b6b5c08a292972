use crate::cli::ParseArgs;
use crate::error::{CliError, Result};
use cosmoprop::core::report::Report;
use cosmoprop::core::report::parser::{ParseOutcome, ReportParser};
use std::io::Write;
use tracing::info;

pub fn run(args: ParseArgs) -> Result<()> {
    let outcome = parse_report(&args)?;
    let stdout = std::io::stdout();
    print_outcome(&outcome, args.key.as_deref(), &mut stdout.lock())
}

fn parse_report(args: &ParseArgs) -> Result<ParseOutcome> {
    info!("Parsing COSMOtherm report {:?}", &args.report);
    let file_error = |e: cosmoprop::core::report::error::ReportError| CliError::FileParsing {
        path: args.report.clone(),
        source: e.into(),
    };
    let report = Report::read_from_path(&args.report).map_err(file_error)?;
    let outcome = ReportParser::new().parse(&report).map_err(file_error)?;
    info!(
        "Parsed {} block(s), skipped {}.",
        outcome.parsed_blocks, outcome.skipped_blocks
    );
    Ok(outcome)
}

/// Prints either the single requested value or every property as `key = value`.
fn print_outcome(outcome: &ParseOutcome, key: Option<&str>, out: &mut impl Write) -> Result<()> {
    match key {
        Some(key) => {
            let value = outcome
                .get(key)
                .map_err(|e| CliError::Argument(e.to_string()))?;
            writeln!(out, "{value}")?;
        }
        None => {
            for property in &outcome.properties {
                writeln!(out, "{} = {}", property.key, property.value)?;
            }
        }
    }
    Ok(())
}
