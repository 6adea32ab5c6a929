use clap::{ArgAction, Parser, Subcommand};

use self::{
    deltas::DeltasArg, describe::DescribeArg, matrix::MatrixArg, population::PopulationArg,
    quantiles::QuantilesArg, report::ReportArg, sdt::SdtArg,
};

mod deltas;
mod describe;
mod matrix;
mod population;
mod quantiles;
mod report;
mod sdt;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v: debug, -vv: trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compute per-participant RT quantiles and write the quantile table
    Quantiles(#[clap(flatten)] QuantilesArg),
    /// Compute delta traces from a quantile table
    Deltas(#[clap(flatten)] DeltasArg),
    /// Show mean quantiles across participants
    Population(#[clap(flatten)] PopulationArg),
    /// Build the pairwise delta matrix of a participant or the population
    Matrix(#[clap(flatten)] MatrixArg),
    /// Run the full pipeline and write every artifact to a directory
    Report(#[clap(flatten)] ReportArg),
    /// Show descriptive RT and accuracy statistics per design cell
    Describe(#[clap(flatten)] DescribeArg),
    /// Show signal-detection counts and an external posterior summary
    Sdt(#[clap(flatten)] SdtArg),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    )
    .target(env_logger::Target::Stderr)
    .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::Quantiles(arg) => quantiles::run(&arg)?,
        Mode::Deltas(arg) => deltas::run(&arg)?,
        Mode::Population(arg) => population::run(&arg)?,
        Mode::Matrix(arg) => matrix::run(&arg)?,
        Mode::Report(arg) => report::run(&arg)?,
        Mode::Describe(arg) => describe::run(&arg)?,
        Mode::Sdt(arg) => sdt::run(&arg)?,
    }
    Ok(())
}
