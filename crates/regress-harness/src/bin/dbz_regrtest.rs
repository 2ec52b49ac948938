//! Regression tests for the division-by-zero analysis.

use std::process::ExitCode;

use clap::Parser;
use regress_harness::{
    ProcessAnalyzer, Result, RunConfig, SuiteReport, SuiteRunner, fatal_exit_code, log, suites,
};

#[derive(Parser, Debug)]
#[command(
    name = "dbz-regrtest",
    version,
    about = "Regression tests for the division by zero analysis"
)]
struct Cli {
    /// Print the comments of every test
    #[arg(short, long)]
    verbose: bool,

    /// Disable colors
    #[arg(long)]
    no_colors: bool,

    /// Disable the in-place progress bar
    #[arg(long)]
    no_interactive: bool,
}

fn run(config: RunConfig) -> Result<SuiteReport> {
    let analyzer = ProcessAnalyzer::locate()?;
    let mut suite = SuiteRunner::new("dbz", config, analyzer);
    for case in suites::dbz(&suites::regression_root().join("dbz")) {
        suite.add(case)?;
    }
    let mut stdout = std::io::stdout().lock();
    suite.run(&mut stdout)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = RunConfig::from_flags(cli.verbose, cli.no_colors, cli.no_interactive);
    log::init_tracing(config.verbose);

    match run(config) {
        Ok(report) => ExitCode::from(report.exit_code()),
        Err(error) => {
            eprintln!("ERROR dbz-regrtest failed: {error}");
            ExitCode::from(fatal_exit_code(&error))
        }
    }
}
