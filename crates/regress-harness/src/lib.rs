//! Regression harness for an external static analyzer.
//!
//! Each [`TestCase`] runs the analyzer on one source file, reads the findings
//! back from the analyzer's SQLite result store and classifies the test as
//! `PASS`, `PASS_IMPROVE` or `FAIL` against a declared-correct result and an
//! optional, possibly stale, expected baseline. A [`SuiteRunner`] runs cases
//! in registration order and turns the failure count into an exit status.

pub mod analyzer;
pub mod case;
pub mod classify;
pub mod log;
pub mod render;
pub mod store;
pub mod suite;
pub mod suites;
pub mod verdict;

pub use analyzer::{Analyzer, Invocation, ProcessAnalyzer, ToolLocator};
pub use case::{LineExpectation, TestCase};
pub use classify::{Classification, TestOutcome};
pub use regress_error::{HarnessError, Result};
pub use suite::{RunConfig, SuiteReport, SuiteRunner, SuiteTally, fatal_exit_code};
pub use verdict::{AnalysisKind, FindingStatus, GlobalVerdict, LineStatus, LineVerdict};
