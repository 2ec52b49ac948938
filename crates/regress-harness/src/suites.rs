//! Registered regression suites.
//!
//! Source paths are resolved against a suite directory so the same
//! registrations work from any working directory.

use std::path::{Path, PathBuf};

use crate::case::{LineExpectation, TestCase};
use crate::verdict::{AnalysisKind, GlobalVerdict, LineStatus};

/// Root holding one sub-directory of fixtures per suite.
pub fn regression_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("regression")
}

/// Division-by-zero suite.
pub fn dbz(dir: &Path) -> Vec<TestCase> {
    let kind = AnalysisKind::Dbz;
    vec![
        TestCase::new(
            dir.join("test-1-unsafe.c"),
            "test-1-unsafe.c",
            kind,
            GlobalVerdict::Unsafe,
        )
        .check_line(LineExpectation::new(13, LineStatus::Warning)),
        TestCase::new(
            dir.join("test-2-safe.c"),
            "test-2-safe.c",
            kind,
            GlobalVerdict::Safe,
        )
        .check_line(LineExpectation::new(14, LineStatus::Ok)),
        TestCase::new(
            dir.join("test-3-unsafe.c"),
            "test-3-unsafe.c",
            kind,
            GlobalVerdict::Error,
        )
        .check_line(LineExpectation::new(16, LineStatus::Error)),
    ]
}
