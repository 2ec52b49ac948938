//! Outcome classification: observed results against declared and expected ones.
//!
//! A test declares the result the analyzer *should* produce and, optionally,
//! the result it is currently *expected* to produce (a baseline that may lag
//! behind). An observation matching either one passes; matching the declared
//! result while the baseline still says otherwise is an improvement.

use std::fmt;

use crate::verdict::{GlobalVerdict, LineStatus, LineVerdict};

/// Final tag of one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Classification {
    Pass,
    PassImprove,
    Fail,
}

impl Classification {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::PassImprove => "PASS_IMPROVE",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one three-way comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Matches the expected baseline.
    Match,
    /// Matches the declared result, which the baseline does not yet record.
    Improvement,
    /// Matches neither.
    Mismatch,
}

/// `observed` against `declared` and `expected`.
pub fn compare<O, T>(observed: O, declared: T, expected: T) -> Comparison
where
    O: PartialEq<T>,
    T: PartialEq,
{
    if observed != declared && observed != expected {
        Comparison::Mismatch
    } else if observed == declared && declared != expected {
        Comparison::Improvement
    } else {
        Comparison::Match
    }
}

/// Classification plus the notes that explain it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub classification: Classification,
    pub comments: Vec<String>,
}

impl TestOutcome {
    pub const fn pass() -> Self {
        Self {
            classification: Classification::Pass,
            comments: Vec::new(),
        }
    }

    /// A failure overrides whatever was decided before.
    pub fn fail(&mut self, comment: String) {
        self.classification = Classification::Fail;
        self.comments.push(comment);
    }

    /// An improvement only upgrades a plain pass.
    pub fn improve(&mut self, comment: String) {
        if self.classification == Classification::Pass {
            self.classification = Classification::PassImprove;
        }
        self.comments.push(comment);
    }

    pub fn is_fail(&self) -> bool {
        self.classification == Classification::Fail
    }
}

/// Observed global counts for one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalObservation {
    pub errors: u64,
    pub warnings: u64,
}

impl GlobalObservation {
    pub const fn verdict(self) -> GlobalVerdict {
        GlobalVerdict::from_counts(self.errors, self.warnings)
    }
}

/// Observed verdict for one declared line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineObservation {
    pub line: u32,
    pub declared: LineStatus,
    pub expected: LineStatus,
    pub observed: LineVerdict,
}

/// Apply the global check, then each line check in declaration order.
pub fn classify(
    global: GlobalObservation,
    declared: GlobalVerdict,
    expected: GlobalVerdict,
    lines: &[LineObservation],
) -> TestOutcome {
    let mut outcome = TestOutcome::pass();

    match compare(global.verdict(), declared, expected) {
        Comparison::Mismatch => outcome.fail(format!(
            "Got {} errors and {} warnings, was expecting \"{}\".",
            global.errors, global.warnings, expected
        )),
        Comparison::Improvement => outcome.improve(format!(
            "improvement: analyzer returned the right result ({declared}) \
             and not the expected one ({expected})."
        )),
        Comparison::Match => {}
    }

    for line in lines {
        match compare(line.observed, line.declared, line.expected) {
            Comparison::Mismatch => outcome.fail(format!(
                "Got status \"{}\" for line {}, was expecting \"{}\".",
                line.observed, line.line, line.expected
            )),
            Comparison::Improvement => outcome.improve(format!(
                "improvement: analyzer returned the right result ({}) for line {} \
                 and not the expected one ({}).",
                line.declared, line.line, line.expected
            )),
            Comparison::Match => {}
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NO_FINDINGS: GlobalObservation = GlobalObservation {
        errors: 0,
        warnings: 0,
    };

    fn line(
        line: u32,
        declared: LineStatus,
        expected: LineStatus,
        observed: LineVerdict,
    ) -> LineObservation {
        LineObservation {
            line,
            declared,
            expected,
            observed,
        }
    }

    #[test]
    fn test_global_mismatch_reports_counts_and_expected() {
        let outcome = classify(
            GlobalObservation {
                errors: 2,
                warnings: 1,
            },
            GlobalVerdict::Safe,
            GlobalVerdict::Safe,
            &[],
        );
        assert_eq!(outcome.classification, Classification::Fail);
        assert_eq!(
            outcome.comments,
            vec!["Got 2 errors and 1 warnings, was expecting \"safe\".".to_owned()]
        );
    }

    #[test]
    fn test_global_improvement() {
        let outcome = classify(
            GlobalObservation {
                errors: 1,
                warnings: 0,
            },
            GlobalVerdict::Error,
            GlobalVerdict::Unsafe,
            &[],
        );
        assert_eq!(outcome.classification, Classification::PassImprove);
        assert_eq!(outcome.comments.len(), 1);
        assert!(
            outcome.comments[0].starts_with("improvement:"),
            "case=improvement_comment comments={:?}",
            outcome.comments
        );
        assert!(outcome.comments[0].contains("(error)"));
        assert!(outcome.comments[0].contains("(unsafe)"));
    }

    #[test]
    fn test_matching_stale_baseline_passes() {
        let outcome = classify(
            GlobalObservation {
                errors: 0,
                warnings: 4,
            },
            GlobalVerdict::Error,
            GlobalVerdict::Unsafe,
            &[],
        );
        assert_eq!(outcome, TestOutcome::pass());
    }

    #[test]
    fn test_line_failure_overrides_global_pass() {
        let outcome = classify(
            NO_FINDINGS,
            GlobalVerdict::Safe,
            GlobalVerdict::Safe,
            &[line(14, LineStatus::Ok, LineStatus::Ok, LineVerdict::Unreachable)],
        );
        assert_eq!(outcome.classification, Classification::Fail);
        assert_eq!(
            outcome.comments,
            vec!["Got status \"unreachable\" for line 14, was expecting \"ok\".".to_owned()]
        );
    }

    #[test]
    fn test_line_improvement_never_masks_failure() {
        let outcome = classify(
            NO_FINDINGS,
            GlobalVerdict::Unsafe,
            GlobalVerdict::Unsafe,
            &[line(
                7,
                LineStatus::Ok,
                LineStatus::Warning,
                LineVerdict::Ok,
            )],
        );
        assert_eq!(outcome.classification, Classification::Fail);
        assert_eq!(outcome.comments.len(), 2, "case=comments_in_order");
        assert!(outcome.comments[0].starts_with("Got 0 errors"));
        assert!(outcome.comments[1].starts_with("improvement:"));
        assert!(outcome.comments[1].contains("for line 7"));
    }

    #[test]
    fn test_line_failure_after_improvement() {
        let outcome = classify(
            NO_FINDINGS,
            GlobalVerdict::Safe,
            GlobalVerdict::Safe,
            &[
                line(3, LineStatus::Ok, LineStatus::Warning, LineVerdict::Ok),
                line(9, LineStatus::Ok, LineStatus::Ok, LineVerdict::Unknown),
            ],
        );
        assert_eq!(outcome.classification, Classification::Fail);
        assert_eq!(outcome.comments.len(), 2);
        assert!(outcome.comments[1].contains("\"unknown\" for line 9"));
    }

    #[test]
    fn test_unknown_line_never_matches() {
        for status in LineStatus::ALL {
            assert_eq!(
                compare(LineVerdict::Unknown, status, status),
                Comparison::Mismatch,
                "case=unknown_vs_{status}"
            );
        }
    }

    fn verdict_strategy() -> impl Strategy<Value = GlobalVerdict> {
        prop::sample::select(GlobalVerdict::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_three_way_rule(
            observed in verdict_strategy(),
            declared in verdict_strategy(),
            expected in verdict_strategy(),
        ) {
            let comparison = compare(observed, declared, expected);
            prop_assert_eq!(
                comparison == Comparison::Mismatch,
                observed != declared && observed != expected
            );
            prop_assert_eq!(
                comparison == Comparison::Improvement,
                observed == declared && declared != expected
            );
            prop_assert_eq!(comparison == Comparison::Match, observed == expected);
        }

        #[test]
        fn prop_default_expected_is_two_way(
            observed in verdict_strategy(),
            declared in verdict_strategy(),
        ) {
            let comparison = compare(observed, declared, declared);
            prop_assert_ne!(comparison, Comparison::Improvement);
            prop_assert_eq!(comparison == Comparison::Match, observed == declared);
        }
    }
}
