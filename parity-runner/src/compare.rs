// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of actual test results against expectations.
//!
//! Each test's expected status is resolved in this order:
//!
//! 1. `output_regex` rules, in any category, matching the test's output.
//! 2. `regex` and `not_regex` rules, in any category, matching the test's name.
//! 3. The test's name, then each of its [prefixes](crate::prefix), as an exact name.
//! 4. The default status.
//!
//! The first step that matches decides. If the rules matching in step 1 or step 2 are declared in
//! more than one category, the expected status is ambiguous and classification fails.
//!
//! Tests expected to be ignored are dropped. Every other test lands in exactly one [`Bucket`].

use crate::{
    config::{ExpectationSet, NameRule},
    errors::{ClassifyError, MatchedRule},
    prefix::prefixes,
    stats::{PassRate, Stats, aggregate},
    status::{ActualStatus, ExpectedStatus},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// The outcome of a single test, as reported by a runner.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TestResult {
    /// The reported status.
    #[serde(default)]
    pub status: ActualStatus,

    /// Output captured while the test ran.
    #[serde(default)]
    pub output: String,

    /// Named measurements, for benchmark-style runners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurements: Option<BTreeMap<String, f64>>,
}

impl TestResult {
    /// Creates a new result without measurements.
    pub fn new(status: ActualStatus, output: impl Into<String>) -> Self {
        Self {
            status,
            output: output.into(),
            measurements: None,
        }
    }

    /// Returns the output with every line after the first indented by a tab.
    pub fn indented_output(&self) -> String {
        self.output.replace('\n', "\n\t")
    }
}

/// Actual results for a run, keyed by test name.
///
/// Sorted by name, which is also the order tests are classified and reported in.
pub type TestResults = BTreeMap<String, TestResult>;

/// One of the categories a test outcome is sorted into.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Bucket {
    /// Expected to pass, and passed.
    ExpectedPass,
    /// Expected to be skipped, and was skipped.
    ExpectedSkip,
    /// Expected to fail, and failed.
    ExpectedFail,
    /// Passed, but expected to be skipped or to fail.
    UnexpectedPass,
    /// Skipped, but expected to pass or to fail.
    UnexpectedSkip,
    /// Failed, but expected to pass or to be skipped.
    UnexpectedFail,
    /// The runner couldn't tell how the test went.
    Unknown,
}

impl Bucket {
    /// All buckets, in the order they're counted in [`Stats`].
    pub const ALL: [Self; 7] = [
        Self::ExpectedPass,
        Self::ExpectedSkip,
        Self::ExpectedFail,
        Self::UnexpectedPass,
        Self::UnexpectedSkip,
        Self::UnexpectedFail,
        Self::Unknown,
    ];

    /// Decides the bucket for a test.
    ///
    /// Returns `None` for tests expected to be ignored.
    pub fn decide(expected: ExpectedStatus, actual: ActualStatus) -> Option<Self> {
        let bucket = match (expected, actual) {
            (ExpectedStatus::Ignore, _) => return None,
            (_, ActualStatus::Unknown) => Self::Unknown,
            (ExpectedStatus::Pass, ActualStatus::Pass) => Self::ExpectedPass,
            (ExpectedStatus::Skip, ActualStatus::Skip) => Self::ExpectedSkip,
            (ExpectedStatus::Fail, ActualStatus::Fail) => Self::ExpectedFail,
            (_, ActualStatus::Pass) => Self::UnexpectedPass,
            (_, ActualStatus::Skip) => Self::UnexpectedSkip,
            (_, ActualStatus::Fail) => Self::UnexpectedFail,
        };
        Some(bucket)
    }

    /// Returns the key for this bucket in `stats:` tables.
    pub fn stats_key(self) -> &'static str {
        match self {
            Self::ExpectedPass => "expected_pass",
            Self::ExpectedSkip => "expected_skip",
            Self::ExpectedFail => "expected_fail",
            Self::UnexpectedPass => "unexpected_pass",
            Self::UnexpectedSkip => "unexpected_skip",
            Self::UnexpectedFail => "unexpected_fail",
            Self::Unknown => "unexpected_rest",
        }
    }

    /// Returns a human-readable label, used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::ExpectedPass => "Expectedly passed",
            Self::ExpectedSkip => "Expectedly skipped",
            Self::ExpectedFail => "Expectedly failed",
            Self::UnexpectedPass => "Unexpectedly passed",
            Self::UnexpectedSkip => "Unexpectedly skipped",
            Self::UnexpectedFail => "Unexpectedly failed",
            Self::Unknown => "Unknown",
        }
    }

    /// Returns true for buckets that should fail a run: every unexpected bucket, and unknown.
    pub fn is_unexpected(self) -> bool {
        !matches!(
            self,
            Self::ExpectedPass | Self::ExpectedSkip | Self::ExpectedFail
        )
    }
}

/// Test results sorted into buckets, along with counts.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CompareResult {
    /// Tests that passed as expected.
    pub expected_pass: TestResults,
    /// Tests that were skipped as expected.
    pub expected_skip: TestResults,
    /// Tests that failed as expected.
    pub expected_fail: TestResults,
    /// Tests that passed unexpectedly.
    pub unexpected_pass: TestResults,
    /// Tests that were skipped unexpectedly.
    pub unexpected_skip: TestResults,
    /// Tests that failed unexpectedly.
    pub unexpected_fail: TestResults,
    /// Tests with an unknown actual status.
    pub unknown: TestResults,

    /// The size of each bucket.
    pub stats: Stats,
}

impl CompareResult {
    /// Returns the tests in a bucket.
    pub fn bucket(&self, bucket: Bucket) -> &TestResults {
        match bucket {
            Bucket::ExpectedPass => &self.expected_pass,
            Bucket::ExpectedSkip => &self.expected_skip,
            Bucket::ExpectedFail => &self.expected_fail,
            Bucket::UnexpectedPass => &self.unexpected_pass,
            Bucket::UnexpectedSkip => &self.unexpected_skip,
            Bucket::UnexpectedFail => &self.unexpected_fail,
            Bucket::Unknown => &self.unknown,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut TestResults {
        match bucket {
            Bucket::ExpectedPass => &mut self.expected_pass,
            Bucket::ExpectedSkip => &mut self.expected_skip,
            Bucket::ExpectedFail => &mut self.expected_fail,
            Bucket::UnexpectedPass => &mut self.unexpected_pass,
            Bucket::UnexpectedSkip => &mut self.unexpected_skip,
            Bucket::UnexpectedFail => &mut self.unexpected_fail,
            Bucket::Unknown => &mut self.unknown,
        }
    }

    /// Returns true if any test was unexpected or had an unknown status.
    pub fn has_unexpected(&self) -> bool {
        Bucket::ALL
            .into_iter()
            .any(|bucket| bucket.is_unexpected() && !self.bucket(bucket).is_empty())
    }

    /// Returns the pass rate for this run.
    pub fn pass_rate(&self) -> PassRate {
        self.stats.pass_rate()
    }
}

/// Sorts actual results into buckets according to expectations.
///
/// Fails only if the expectations are ambiguous for one of the tests.
pub fn classify(
    expectations: &ExpectationSet,
    results: &TestResults,
) -> Result<CompareResult, ClassifyError> {
    let mut compare = CompareResult::default();
    let mut ignored = 0;

    for (name, result) in results {
        let expected = expected_status(expectations, name, &result.output)?;
        match Bucket::decide(expected, result.status) {
            Some(bucket) => {
                trace!("{name}: expected {expected}, actual {}", result.status);
                compare.bucket_mut(bucket).insert(name.clone(), result.clone());
            }
            None => {
                trace!("{name}: ignored");
                ignored += 1;
            }
        }
    }

    compare.stats = aggregate(&compare);
    debug!(
        "classified {} test results ({ignored} ignored)",
        results.len()
    );

    Ok(compare)
}

/// Resolves the expected status of a single test.
pub fn expected_status(
    expectations: &ExpectationSet,
    test_name: &str,
    output: &str,
) -> Result<ExpectedStatus, ClassifyError> {
    let categories = expectations.categories();

    let output_matches = categories
        .rules()
        .filter(|(_, rule)| rule.matches_output(output));
    if let Some(status) = single_category(output_matches).map_err(|(first, second)| {
        ClassifyError::AmbiguousOutputRegex {
            test_name: test_name.to_owned(),
            first,
            second,
        }
    })? {
        return Ok(status);
    }

    let name_matches = categories
        .rules()
        .filter(|(_, rule)| rule.matches_name_regex(test_name));
    if let Some(status) = single_category(name_matches).map_err(|(first, second)| {
        ClassifyError::AmbiguousNameRegex {
            test_name: test_name.to_owned(),
            first,
            second,
        }
    })? {
        return Ok(status);
    }

    Ok(prefixes(test_name)
        .find_map(|prefix| expectations.name_status(prefix))
        .unwrap_or(expectations.default_status()))
}

/// Returns the category of the matching rules, if they're all in the same one.
///
/// Several matches in one category are fine. On a match in a second category, returns the first
/// matching rule and the conflicting one.
fn single_category<'a>(
    matches: impl Iterator<Item = (ExpectedStatus, &'a NameRule)>,
) -> Result<Option<ExpectedStatus>, (MatchedRule, MatchedRule)> {
    let mut first: Option<(ExpectedStatus, &NameRule)> = None;
    for (status, rule) in matches {
        match first {
            None => first = Some((status, rule)),
            Some((first_status, first_rule)) if first_status != status => {
                return Err((
                    matched_rule(first_status, first_rule),
                    matched_rule(status, rule),
                ));
            }
            Some(_) => {}
        }
    }
    Ok(first.map(|(status, _)| status))
}

fn matched_rule(status: ExpectedStatus, rule: &NameRule) -> MatchedRule {
    MatchedRule {
        status,
        pattern: rule.pattern().to_owned(),
    }
}
