//! One regression test: what to run and what it should produce.

use std::path::{Path, PathBuf};

use regress_error::{HarnessError, Result};
use tracing::{debug, info_span};

use crate::analyzer::{Analyzer, Invocation};
use crate::classify::{GlobalObservation, LineObservation, TestOutcome, classify};
use crate::store::ResultStore;
use crate::verdict::{AnalysisKind, FindingStatus, GlobalVerdict, LineStatus, reduce_line};

/// Expectation on one source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineExpectation {
    pub line: u32,
    pub declared: LineStatus,
    /// Tolerated baseline; `None` means it equals `declared`.
    pub expected: Option<LineStatus>,
}

impl LineExpectation {
    pub const fn new(line: u32, declared: LineStatus) -> Self {
        Self {
            line,
            declared,
            expected: None,
        }
    }

    /// Record a known regression: the analyzer currently yields `expected`.
    pub const fn expecting(mut self, expected: LineStatus) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn expected(&self) -> LineStatus {
        self.expected.unwrap_or(self.declared)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    source: PathBuf,
    description: String,
    kind: AnalysisKind,
    declared: GlobalVerdict,
    expected: Option<GlobalVerdict>,
    options: Vec<String>,
    lines: Vec<LineExpectation>,
}

impl TestCase {
    pub fn new(
        source: impl Into<PathBuf>,
        description: impl Into<String>,
        kind: AnalysisKind,
        declared: GlobalVerdict,
    ) -> Self {
        Self {
            source: source.into(),
            description: description.into(),
            kind,
            declared,
            expected: None,
            options: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Record a known regression on the global result.
    pub fn expecting(mut self, expected: GlobalVerdict) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    pub fn check_line(mut self, expectation: LineExpectation) -> Self {
        self.lines.push(expectation);
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn kind(&self) -> AnalysisKind {
        self.kind
    }

    pub const fn declared(&self) -> GlobalVerdict {
        self.declared
    }

    pub fn expected(&self) -> GlobalVerdict {
        self.expected.unwrap_or(self.declared)
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn lines(&self) -> &[LineExpectation] {
        &self.lines
    }

    /// Reject shapes that cannot be checked. Called once when the case is
    /// registered with a suite.
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(HarnessError::invalid_registration(
                &self.source.display().to_string(),
                "description must be non-empty",
            ));
        }
        if let Some(bad) = self.lines.iter().find(|expectation| expectation.line == 0) {
            return Err(HarnessError::invalid_registration(
                &self.description,
                format!(
                    "line numbers start at 1 (got {} for status {})",
                    bad.line, bad.declared
                ),
            ));
        }
        Ok(())
    }

    pub fn invocation(&self, program: &Path, output_db: &Path) -> Invocation {
        Invocation {
            program: program.to_path_buf(),
            source: self.source.clone(),
            kind: self.kind,
            output_db: output_db.to_path_buf(),
            options: self.options.clone(),
        }
    }

    /// Run the analyzer on this test and classify what it recorded.
    pub fn run(&self, analyzer: &dyn Analyzer, output_db: &Path) -> Result<TestOutcome> {
        let span = info_span!(
            "test_case",
            description = %self.description,
            analysis = %self.kind
        );
        let _guard = span.enter();

        if !self.source.exists() {
            return Err(HarnessError::MissingSource {
                path: self.source.clone(),
            });
        }

        let invocation = self.invocation(analyzer.program(), output_db);
        analyzer.invoke(&invocation)?;

        let store = ResultStore::open(output_db)?;
        let global = GlobalObservation {
            errors: store.count_findings(self.kind, &FindingStatus::Error)?,
            warnings: store.count_findings(self.kind, &FindingStatus::Warning)?,
        };

        let mut lines = Vec::with_capacity(self.lines.len());
        for expectation in &self.lines {
            let statuses = store.line_statuses(self.kind, expectation.line)?;
            let observed = reduce_line(&statuses);
            debug!(
                line = expectation.line,
                statuses = ?statuses,
                observed = %observed,
                "line reduced"
            );
            lines.push(LineObservation {
                line: expectation.line,
                declared: expectation.declared,
                expected: expectation.expected(),
                observed,
            });
        }

        let mut outcome = classify(global, self.declared, self.expected(), &lines);
        if outcome.is_fail() {
            debug!(
                errors = global.errors,
                warnings = global.warnings,
                comments = outcome.comments.len(),
                "test failed"
            );
            outcome.comments.insert(0, format!("Running: {invocation}"));
        }
        Ok(outcome)
    }
}
