// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by parity.

use crate::status::ExpectedStatus;
use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use std::fmt;
use thiserror::Error;

/// An error that occurred while parsing a project config file.
#[derive(Debug, Error)]
#[error("failed to parse parity config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8Path {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a project config file.
///
/// Returned by [`ConfigParseError::kind`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// The config file could not be read.
    #[error("error reading config file")]
    ReadError(#[source] std::io::Error),

    /// An error occurred while deserializing the config.
    #[error("error deserializing config")]
    DeserializeError(#[source] Box<serde_path_to_error::Error<serde_yaml::Error>>),

    /// A test name or rule was declared more than once within a single section.
    #[error("in section `results.{section}`")]
    DuplicateTestRule {
        /// The section of the `results` table the duplicate was found in.
        section: String,

        /// The underlying error.
        #[source]
        err: DuplicateTestRule,
    },

    /// Merging the `common` section into a backend section failed.
    #[error("error merging expectations")]
    MergeError(#[source] MergeError),
}

/// A test name or rule appears more than once within a single expectation set.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("duplicate test or prefix: {rule}")]
pub struct DuplicateTestRule {
    rule: String,
}

impl DuplicateTestRule {
    pub(crate) fn new(rule: impl Into<String>) -> Self {
        Self { rule: rule.into() }
    }

    /// Returns the rule that was declared more than once, as displayed in the config.
    pub fn rule(&self) -> &str {
        &self.rule
    }
}

/// An error that occurred while merging `common` expectations into backend expectations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MergeError {
    /// `common` is not set, and neither is the expectation set for a backend.
    #[error(
        "expectations for backend `{backend}` must be set (if common expectations are not set)"
    )]
    MissingTargetExpectation {
        /// The backend with no expectations.
        backend: String,
    },

    /// A rule from `common` is already declared by the backend, in any category.
    #[error("duplicate test or prefix in common and `{backend}`: {rule}")]
    DuplicateTestRule {
        /// The backend that declares the rule.
        backend: String,

        /// The rule, as displayed in the config.
        rule: String,
    },

    /// A default status is set both in `common` and for a backend.
    #[error("default status cannot be set in common when it's set for `{backend}`")]
    ConflictingDefault {
        /// The backend that sets its own default.
        backend: String,
    },

    /// Expected stats are set both in `common` and for a backend.
    #[error("stats cannot be set in common when they're set for `{backend}`")]
    ConflictingStats {
        /// The backend that sets its own stats.
        backend: String,
    },
}

/// Error returned while parsing an [`ExpectedStatus`] value from a string.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error(
    "unrecognized value for expected status: {input}\n(known values: {})",
    ExpectedStatus::variants().join(", "),
)]
pub struct StatusParseError {
    input: String,
}

impl StatusParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the input that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// An expectations lookup was performed for a backend that isn't configured.
#[derive(Clone, Debug, Error)]
#[error(
    "no expected results for backend `{backend}` (known backends: {})",
    .known_backends.iter().join(", ")
)]
pub struct BackendNotFound {
    backend: String,
    known_backends: Vec<String>,
}

impl BackendNotFound {
    pub(crate) fn new(
        backend: impl Into<String>,
        known_backends: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut known_backends: Vec<_> = known_backends.into_iter().map(|s| s.into()).collect();
        known_backends.sort_unstable();
        Self {
            backend: backend.into(),
            known_backends,
        }
    }

    /// Returns the backend that was looked up.
    pub fn backend(&self) -> &str {
        &self.backend
    }
}

/// [`next_prefix`](crate::prefix::next_prefix) was called with an empty path.
///
/// This is an invariant violation on the caller's side, not a configuration problem: callers stop
/// walking prefixes once they reach the empty string.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("next_prefix called with an empty path")]
pub struct EmptyPrefixError;

/// A single rule that matched a test, as reported by [`ClassifyError`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchedRule {
    /// The category the rule was declared in.
    pub status: ExpectedStatus,

    /// The rule's pattern.
    pub pattern: String,
}

impl fmt::Display for MatchedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` (in {})", self.pattern, self.status)
    }
}

/// An error that occurred while classifying test results against expectations.
///
/// These errors indicate an ambiguous configuration: a test matched regex rules in more than one
/// category, so its expected status cannot be determined.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClassifyError {
    /// The output of a test matched `output_regex` rules in more than one category.
    #[error("output of test `{test_name}` matches more than one output regex: {first}, {second}")]
    AmbiguousOutputRegex {
        /// The name of the test.
        test_name: String,

        /// The first rule that matched.
        first: MatchedRule,

        /// A rule in a different category that also matched.
        second: MatchedRule,
    },

    /// The name of a test matched `regex` or `not_regex` rules in more than one category.
    #[error("test `{test_name}` matches more than one name regex: {first}, {second}")]
    AmbiguousNameRegex {
        /// The name of the test.
        test_name: String,

        /// The first rule that matched.
        first: MatchedRule,

        /// A rule in a different category that also matched.
        second: MatchedRule,
    },
}

/// An error that occurred while reading actual test results.
#[derive(Debug, Error)]
#[error("failed to read test results from `{path}`")]
pub struct ResultsReadError {
    path: Utf8PathBuf,
    #[source]
    kind: ResultsReadErrorKind,
}

impl ResultsReadError {
    pub(crate) fn new(path: impl Into<Utf8PathBuf>, kind: ResultsReadErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Returns the path to the results file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ResultsReadErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while reading test results.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultsReadErrorKind {
    /// The results file could not be read.
    #[error("error reading results file")]
    Read(#[source] std::io::Error),

    /// The results file is not valid JSON of the expected shape.
    #[error("error deserializing results")]
    Deserialize(#[source] serde_path_to_error::Error<serde_json::Error>),
}
