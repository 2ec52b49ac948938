//! Fatal error type for the analyzer regression harness.
//!
//! Everything in here aborts a suite run. Disagreements between the analyzer
//! and a test's expectations are never errors; they are classified outcomes
//! and live in `regress-harness`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// Neither `$<install_env>/bin/<program>` nor `<program>` on `PATH` is executable.
    #[error("cannot find {program}: set {install_env} or add it to PATH")]
    AnalyzerNotFound {
        program: String,
        install_env: String,
    },

    #[error("test source file does not exist: {}", path.display())]
    MissingSource { path: PathBuf },

    /// The analyzer ran but exited non-zero.
    #[error("analyzer exited with {status}: {command}\n{stderr}")]
    AnalyzerFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("failed to spawn analyzer `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("result store query failed: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid registration for `{description}`: {reason}")]
    InvalidRegistration { description: String, reason: String },

    #[error("unknown {kind}: `{value}`")]
    Parse { kind: &'static str, value: String },
}

impl HarnessError {
    pub fn invalid_registration(description: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRegistration {
            description: description.to_owned(),
            reason: reason.into(),
        }
    }

    pub fn parse(kind: &'static str, value: &str) -> Self {
        Self::Parse {
            kind,
            value: value.to_owned(),
        }
    }

    /// True when the failure comes from the environment (tool, files, store)
    /// rather than from how the suite was put together.
    pub const fn is_fatal_environment(&self) -> bool {
        matches!(
            self,
            Self::AnalyzerNotFound { .. }
                | Self::MissingSource { .. }
                | Self::AnalyzerFailed { .. }
                | Self::Spawn { .. }
                | Self::Store(_)
                | Self::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_not_found_names_install_env() {
        let err = HarnessError::AnalyzerNotFound {
            program: "ikos".to_owned(),
            install_env: "IKOS_INSTALL".to_owned(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("IKOS_INSTALL"), "case=install_env err={rendered}");
        assert!(err.is_fatal_environment());
    }

    #[test]
    fn test_registration_errors_are_not_environmental() {
        let err = HarnessError::invalid_registration("test-1.c", "line numbers start at 1");
        assert!(!err.is_fatal_environment());
        assert_eq!(
            err.to_string(),
            "invalid registration for `test-1.c`: line numbers start at 1"
        );
    }

    #[test]
    fn test_parse_error_rendering() {
        let err = HarnessError::parse("analysis kind", "xyz");
        assert_eq!(err.to_string(), "unknown analysis kind: `xyz`");
    }
}
