use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "cosmoprop - Run COSMOtherm on every conformer of an SDF file and attach the solvation properties it reports.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Number of compounds processed in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run COSMOtherm on every conformer and write the annotated structures.
    Run(RunArgs),
    /// Parse an existing COSMOtherm report and print the extracted properties.
    Parse(ParseArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input SDF file. Records sharing a title are treated as conformers of one compound.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Output SDF file, written with every committed property as a data item.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Step configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// COSMO surface file for a conformer, matched to SDF records in order.
    /// Repeat once per record.
    #[arg(long = "cosmo", value_name = "PATH")]
    pub cosmo_files: Vec<PathBuf>,

    /// Override `execution.prefix` from the config file.
    #[arg(long, value_name = "COMMAND")]
    pub prefix: Option<String>,

    /// Override `execution.binary` from the config file.
    #[arg(long, value_name = "PROGRAM")]
    pub binary: Option<String>,

    /// Read the COSMOtherm input deck from a file instead of the config file.
    #[arg(long, value_name = "PATH")]
    pub input_deck: Option<PathBuf>,
}

/// Arguments for the `parse` subcommand.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// COSMOtherm report (`cosmotherm.out`) to parse.
    #[arg(value_name = "REPORT")]
    pub report: PathBuf,

    /// Print only the value of this property.
    #[arg(short, long, value_name = "KEY")]
    pub key: Option<String>,
}
