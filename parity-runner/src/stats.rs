// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate statistics over classified results, and checks against declared expectations.

use crate::compare::{Bucket, CompareResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts of tests in each bucket.
///
/// Used both for counts declared in config files (`stats:`) and for counts computed from a
/// [`CompareResult`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Stats {
    /// Tests that passed and were expected to pass.
    pub expected_pass: usize,
    /// Tests that were skipped and were expected to be skipped.
    pub expected_skip: usize,
    /// Tests that failed and were expected to fail.
    pub expected_fail: usize,
    /// Tests that passed but were expected to skip or fail.
    pub unexpected_pass: usize,
    /// Tests that were skipped but were expected to pass or fail.
    pub unexpected_skip: usize,
    /// Tests that failed but were expected to pass or skip.
    pub unexpected_fail: usize,
    /// Tests whose actual status was unknown.
    #[serde(rename = "unexpected_rest", alias = "unknown")]
    pub unknown: usize,
}

impl Stats {
    /// Returns the count for a single bucket.
    pub fn get(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::ExpectedPass => self.expected_pass,
            Bucket::ExpectedSkip => self.expected_skip,
            Bucket::ExpectedFail => self.expected_fail,
            Bucket::UnexpectedPass => self.unexpected_pass,
            Bucket::UnexpectedSkip => self.unexpected_skip,
            Bucket::UnexpectedFail => self.unexpected_fail,
            Bucket::Unknown => self.unknown,
        }
    }

    /// Returns the number of tests that ran to a pass, skip or fail outcome as expected.
    pub fn expected_total(&self) -> usize {
        self.expected_pass + self.expected_skip + self.expected_fail
    }

    /// Returns the share of tests expected to pass, out of all tests that behaved as expected.
    pub fn pass_rate(&self) -> PassRate {
        PassRate {
            passed: self.expected_pass,
            total: self.expected_total(),
        }
    }
}

/// Counts bucket sizes in a comparison result.
pub fn aggregate(result: &CompareResult) -> Stats {
    Stats {
        expected_pass: result.expected_pass.len(),
        expected_skip: result.expected_skip.len(),
        expected_fail: result.expected_fail.len(),
        unexpected_pass: result.unexpected_pass.len(),
        unexpected_skip: result.unexpected_skip.len(),
        unexpected_fail: result.unexpected_fail.len(),
        unknown: result.unknown.len(),
    }
}

/// The summary line for a run: "N% (x/y) tests passed."
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PassRate {
    /// Tests that passed as expected.
    pub passed: usize,
    /// Tests that passed, skipped or failed as expected.
    pub total: usize,
}

impl PassRate {
    /// Returns the pass rate as a percentage, or 0 if no tests ran.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for PassRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}% ({}/{}) tests passed.",
            self.percentage(),
            self.passed,
            self.total
        )
    }
}

/// A single field whose declared count differs from the computed one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatsMismatch {
    /// The bucket that differs.
    pub bucket: Bucket,
    /// The declared count.
    pub expected: usize,
    /// The computed count.
    pub actual: usize,
}

impl fmt::Display for StatsMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, actual {}",
            self.bucket.stats_key(),
            self.expected,
            self.actual
        )
    }
}

/// The result of checking computed stats against declared stats.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatsCheck {
    expected: Stats,
    actual: Stats,
    mismatches: Vec<StatsMismatch>,
}

impl StatsCheck {
    /// Compares computed stats against declared stats.
    ///
    /// A declared `expected_pass` of zero means "don't check": the computed value is adopted
    /// instead. This applies to `expected_pass` only; a zero in any other field must match
    /// exactly.
    pub fn new(declared: &Stats, actual: &Stats) -> Self {
        let mut expected = *declared;
        if expected.expected_pass == 0 {
            expected.expected_pass = actual.expected_pass;
        }

        let mismatches = Bucket::ALL
            .into_iter()
            .filter_map(|bucket| {
                let (e, a) = (expected.get(bucket), actual.get(bucket));
                (e != a).then_some(StatsMismatch {
                    bucket,
                    expected: e,
                    actual: a,
                })
            })
            .collect();

        Self {
            expected,
            actual: *actual,
            mismatches,
        }
    }

    /// Returns the declared stats, with the `expected_pass` sentinel resolved.
    pub fn expected(&self) -> &Stats {
        &self.expected
    }

    /// Returns the computed stats.
    pub fn actual(&self) -> &Stats {
        &self.actual
    }

    /// Returns the fields that differ, in bucket order.
    pub fn mismatches(&self) -> &[StatsMismatch] {
        &self.mismatches
    }

    /// Returns true if every checked field matched.
    pub fn is_match(&self) -> bool {
        self.mismatches.is_empty()
    }
}
