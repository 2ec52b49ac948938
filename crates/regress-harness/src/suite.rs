//! Sequential suite runner and its tally.

use std::io::{IsTerminal, Write};

use regress_error::{HarnessError, Result};
use tempfile::NamedTempFile;
use tracing::info;

use crate::analyzer::Analyzer;
use crate::case::TestCase;
use crate::classify::Classification;
use crate::render::Renderer;

/// Presentation switches, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunConfig {
    /// Print every comment under its test.
    pub verbose: bool,
    pub colors: bool,
    /// Redraw a progress bar in place.
    pub interactive: bool,
}

impl RunConfig {
    /// Colours and interactivity follow whether stdout is a terminal unless
    /// explicitly disabled.
    pub fn from_flags(verbose: bool, no_colors: bool, no_interactive: bool) -> Self {
        let tty = std::io::stdout().is_terminal();
        Self {
            verbose,
            colors: tty && !no_colors,
            interactive: tty && !no_interactive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuiteTally {
    pub pass: usize,
    pub pass_improve: usize,
    pub fail: usize,
}

impl SuiteTally {
    pub fn record(&mut self, classification: Classification) {
        match classification {
            Classification::Pass => self.pass += 1,
            Classification::PassImprove => self.pass_improve += 1,
            Classification::Fail => self.fail += 1,
        }
    }

    pub const fn done(&self) -> usize {
        self.pass + self.pass_improve + self.fail
    }
}

/// Failure counts above this saturate, keeping the fatal codes distinct.
pub const MAX_FAILURE_EXIT: u8 = 125;
/// Fatal error from the environment: analyzer, fixtures or result store.
pub const EXIT_ENVIRONMENT: u8 = 126;
/// Fatal error in how the suite was put together.
pub const EXIT_REGISTRATION: u8 = 127;

/// Exit status for a run aborted by `err`.
pub const fn fatal_exit_code(err: &HarnessError) -> u8 {
    if err.is_fatal_environment() {
        EXIT_ENVIRONMENT
    } else {
        EXIT_REGISTRATION
    }
}

/// What a finished run hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    pub tally: SuiteTally,
    pub total: usize,
}

impl SuiteReport {
    /// Number of failed tests, saturated at [`MAX_FAILURE_EXIT`].
    pub fn exit_code(&self) -> u8 {
        u8::try_from(self.tally.fail).map_or(MAX_FAILURE_EXIT, |fail| fail.min(MAX_FAILURE_EXIT))
    }

    pub const fn all_passed(&self) -> bool {
        self.tally.fail == 0
    }
}

pub struct SuiteRunner<A: Analyzer> {
    name: String,
    config: RunConfig,
    analyzer: A,
    cases: Vec<TestCase>,
}

impl<A: Analyzer> SuiteRunner<A> {
    pub fn new(name: impl Into<String>, config: RunConfig, analyzer: A) -> Self {
        Self {
            name: name.into(),
            config,
            analyzer,
            cases: Vec::new(),
        }
    }

    /// Register a test; registration order is execution order.
    pub fn add(&mut self, case: TestCase) -> Result<()> {
        case.validate()?;
        self.cases.push(case);
        Ok(())
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub const fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Run every test against one fresh result store, removed again when this
    /// returns, including on a fatal error.
    pub fn run(&self, out: &mut dyn Write) -> Result<SuiteReport> {
        let store = tempfile::Builder::new()
            .prefix("analyzer-output-")
            .suffix(".db")
            .tempfile()?;
        self.run_with_store(&store, out)
    }

    fn run_with_store(&self, store: &NamedTempFile, out: &mut dyn Write) -> Result<SuiteReport> {
        let renderer = Renderer::new(&self.config);
        let total = self.cases.len();
        let mut tally = SuiteTally::default();
        info!(
            suite = %self.name,
            tests = total,
            store = %store.path().display(),
            "suite run started"
        );

        renderer.header(out)?;
        for case in &self.cases {
            renderer.start_test(out, case.description(), &tally, total)?;
            let outcome = case.run(&self.analyzer, store.path())?;
            tally.record(outcome.classification);
            renderer.finish_test(out, outcome.classification, &outcome.comments)?;
        }
        renderer.summary(out, &tally, total)?;

        info!(
            suite = %self.name,
            pass = tally.pass,
            pass_improve = tally.pass_improve,
            fail = tally.fail,
            "suite run finished"
        );
        Ok(SuiteReport { tally, total })
    }
}
