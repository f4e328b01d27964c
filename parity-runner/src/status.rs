// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test statuses, as declared in expectations and as reported by runners.
//!
//! Expected and actual statuses are separate types: `ignore` is only meaningful as an expectation,
//! and `unknown` is only meaningful as an outcome. Keeping them apart means an expectation can
//! never be `unknown`, which is rejected while the config is deserialized.

use crate::errors::StatusParseError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// The status a test is expected to finish with.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ExpectedStatus {
    /// The test is expected to pass.
    Pass,

    /// The test is expected to be skipped.
    Skip,

    /// The test is expected to fail.
    Fail,

    /// The outcome of the test is not checked at all.
    Ignore,
}

impl ExpectedStatus {
    /// All expected statuses, in the order categories are visited.
    pub const ALL: [Self; 4] = [Self::Pass, Self::Skip, Self::Fail, Self::Ignore];

    /// Returns the string values accepted by [`FromStr`].
    pub fn variants() -> [&'static str; 4] {
        Self::ALL.map(Self::as_str)
    }

    /// Returns the status as it's written in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Skip => "skip",
            Self::Fail => "fail",
            Self::Ignore => "ignore",
        }
    }
}

impl FromStr for ExpectedStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Config files in the wild use both `fail` and `Fail`.
        match s.to_ascii_lowercase().as_str() {
            "pass" => Ok(Self::Pass),
            "skip" => Ok(Self::Skip),
            "fail" => Ok(Self::Fail),
            "ignore" => Ok(Self::Ignore),
            _ => Err(StatusParseError::new(s)),
        }
    }
}

impl fmt::Display for ExpectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExpectedStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for ExpectedStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// The status a runner reported for a single test.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ActualStatus {
    /// The test passed.
    Pass,

    /// The test was skipped.
    Skip,

    /// The test failed.
    Fail,

    /// The runner could not determine the outcome of the test.
    #[default]
    Unknown,
}

impl ActualStatus {
    /// Interprets a status string produced by a runner.
    ///
    /// Anything that isn't `pass`, `skip` or `fail` (case-insensitively) is [`Self::Unknown`], so
    /// that a single mis-instrumented test doesn't abort the whole comparison.
    pub fn from_runner_str(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "pass" => Self::Pass,
            "skip" => Self::Skip,
            "fail" => Self::Fail,
            _ => Self::Unknown,
        }
    }

    /// Returns the status as it's written in results files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Skip => "skip",
            Self::Fail => "fail",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ActualStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActualStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_runner_str(&s))
    }
}

impl Serialize for ActualStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("pass", Ok(ExpectedStatus::Pass) ; "pass")]
    #[test_case("Fail", Ok(ExpectedStatus::Fail) ; "mixed case")]
    #[test_case("IGNORE", Ok(ExpectedStatus::Ignore) ; "upper case")]
    #[test_case("unknown", Err(StatusParseError::new("unknown")) ; "unknown is not an expectation")]
    #[test_case("", Err(StatusParseError::new("")) ; "empty")]
    fn parse_expected_status(input: &str, expected: Result<ExpectedStatus, StatusParseError>) {
        assert_eq!(input.parse::<ExpectedStatus>(), expected);
    }

    #[test_case("pass", ActualStatus::Pass ; "pass")]
    #[test_case("SKIP", ActualStatus::Skip ; "upper case skip")]
    #[test_case("fail", ActualStatus::Fail ; "fail")]
    #[test_case("ignore", ActualStatus::Unknown ; "ignore is not an outcome")]
    #[test_case("timeout", ActualStatus::Unknown ; "unrecognized")]
    fn parse_actual_status(input: &str, expected: ActualStatus) {
        assert_eq!(ActualStatus::from_runner_str(input), expected);
    }

    #[test]
    fn deserialize_expected_status_rejects_unknown() {
        let err = serde_json::from_str::<ExpectedStatus>(r#""unknown""#)
            .expect_err("unknown is not a valid expected status");
        assert!(
            err.to_string().contains("known values: pass, skip, fail, ignore"),
            "error lists known values: {err}"
        );
    }
}
