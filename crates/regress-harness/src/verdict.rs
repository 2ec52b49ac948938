//! Severity vocabularies and the per-line verdict reducer.
//!
//! Three vocabularies are in play:
//! - [`FindingStatus`]: one raw status string as the analyzer recorded it,
//! - [`LineStatus`] / [`LineVerdict`]: what a line is declared to be, and what
//!   the reducer concluded it is (which may be `unknown`),
//! - [`GlobalVerdict`]: the test-level `safe` / `unsafe` / `error` summary.

use std::fmt;
use std::str::FromStr;

use regress_error::HarnessError;

/// Class of analysis the analyzer runs; also selects the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnalysisKind {
    /// Buffer overflow.
    Boa,
    /// Division by zero.
    Dbz,
    /// Uninitialized variable.
    Uva,
    Prover,
    /// Null dereference.
    Nullity,
}

impl AnalysisKind {
    pub const ALL: [Self; 5] = [Self::Boa, Self::Dbz, Self::Uva, Self::Prover, Self::Nullity];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boa => "boa",
            Self::Dbz => "dbz",
            Self::Uva => "uva",
            Self::Prover => "prover",
            Self::Nullity => "nullity",
        }
    }

    /// Name of the table holding this analysis' findings (`<kind>_results`).
    pub const fn results_table(self) -> &'static str {
        match self {
            Self::Boa => "boa_results",
            Self::Dbz => "dbz_results",
            Self::Uva => "uva_results",
            Self::Prover => "prover_results",
            Self::Nullity => "nullity_results",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = HarnessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| HarnessError::parse("analysis kind", value))
    }
}

/// Test-level result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GlobalVerdict {
    /// No warnings and no errors.
    Safe,
    /// Warnings only.
    Unsafe,
    /// At least one error.
    Error,
}

impl GlobalVerdict {
    pub const ALL: [Self; 3] = [Self::Safe, Self::Unsafe, Self::Error];

    /// Errors dominate warnings; no findings at all is `safe`.
    pub const fn from_counts(errors: u64, warnings: u64) -> Self {
        if errors != 0 {
            Self::Error
        } else if warnings != 0 {
            Self::Unsafe
        } else {
            Self::Safe
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Unsafe => "unsafe",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for GlobalVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlobalVerdict {
    type Err = HarnessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|verdict| verdict.as_str() == value)
            .ok_or_else(|| HarnessError::parse("test result", value))
    }
}

/// Status a test may declare for a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LineStatus {
    Ok,
    Warning,
    Error,
    Unreachable,
}

impl LineStatus {
    pub const ALL: [Self; 4] = [Self::Ok, Self::Warning, Self::Error, Self::Unreachable];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Unreachable => "unreachable",
        }
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineStatus {
    type Err = HarnessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| HarnessError::parse("line status", value))
    }
}

/// Canonical status of one line after reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LineVerdict {
    Error,
    Warning,
    Ok,
    Unreachable,
    /// Nothing recorded, or a combination no rule accepts.
    Unknown,
}

impl LineVerdict {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Ok => "ok",
            Self::Unreachable => "unreachable",
            Self::Unknown => "unknown",
        }
    }
}

impl From<LineStatus> for LineVerdict {
    fn from(status: LineStatus) -> Self {
        match status {
            LineStatus::Ok => Self::Ok,
            LineStatus::Warning => Self::Warning,
            LineStatus::Error => Self::Error,
            LineStatus::Unreachable => Self::Unreachable,
        }
    }
}

impl PartialEq<LineStatus> for LineVerdict {
    fn eq(&self, other: &LineStatus) -> bool {
        *self == Self::from(*other)
    }
}

impl fmt::Display for LineVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One status string read back from the result store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FindingStatus {
    Ok,
    Warning,
    Error,
    Unreachable,
    /// Anything the harness does not know; kept so the reducer can reject it.
    Other(String),
}

impl FindingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Unreachable => "unreachable",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for FindingStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "ok" => Self::Ok,
            "warning" => Self::Warning,
            "error" => Self::Error,
            "unreachable" => Self::Unreachable,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for FindingStatus {
    fn from(raw: String) -> Self {
        match Self::from(raw.as_str()) {
            Self::Other(_) => Self::Other(raw),
            known => known,
        }
    }
}

impl fmt::Display for FindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduce every status recorded for a line to one verdict.
///
/// First matching rule wins:
/// 1. any `error` → `error`
/// 2. any `warning` → `warning`
/// 3. some `ok`, the rest `ok`/`unreachable` → `ok`
/// 4. non-empty and all `unreachable` → `unreachable`
/// 5. anything else → `unknown`
pub fn reduce_line(statuses: &[FindingStatus]) -> LineVerdict {
    if statuses.contains(&FindingStatus::Error) {
        return LineVerdict::Error;
    }
    if statuses.contains(&FindingStatus::Warning) {
        return LineVerdict::Warning;
    }
    if statuses.contains(&FindingStatus::Ok)
        && statuses
            .iter()
            .all(|status| matches!(status, FindingStatus::Ok | FindingStatus::Unreachable))
    {
        return LineVerdict::Ok;
    }
    if !statuses.is_empty()
        && statuses
            .iter()
            .all(|status| *status == FindingStatus::Unreachable)
    {
        return LineVerdict::Unreachable;
    }
    LineVerdict::Unknown
}
