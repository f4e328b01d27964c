// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING, StderrStyles};
use owo_colors::OwoColorize;
use parity_metadata::ParityExitCode;
use parity_runner::{errors::*, stats::StatsMismatch};
use std::error::Error;
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An expected failure: a problem with the inputs, or tests that didn't match expectations.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("backend not found")]
    BackendNotFound {
        #[from]
        err: BackendNotFound,
    },
    #[error("ambiguous expectations")]
    ClassifyError {
        #[from]
        err: ClassifyError,
    },
    #[error("error reading test results")]
    ResultsReadError {
        #[from]
        err: ResultsReadError,
    },
    #[error("error serializing output")]
    SerializeError {
        #[source]
        err: SerializeError,
    },
    #[error("error writing output")]
    WriteOutputError {
        #[source]
        err: std::io::Error,
    },
    #[error("stats mismatch")]
    StatsMismatch {
        backend: String,
        mismatches: Vec<StatsMismatch>,
    },
    #[error("unexpected results")]
    UnexpectedResults { backend: String, count: usize },
}

/// An error serializing output in a structured format.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum SerializeError {
    #[error("error serializing JSON")]
    Json(#[source] serde_json::Error),
    #[error("error serializing YAML")]
    Yaml(#[source] serde_yaml::Error),
}

impl ExpectedError {
    pub(crate) fn json_serialize_error(err: serde_json::Error) -> Self {
        Self::SerializeError {
            err: SerializeError::Json(err),
        }
    }

    pub(crate) fn yaml_serialize_error(err: serde_yaml::Error) -> Self {
        Self::SerializeError {
            err: SerializeError::Yaml(err),
        }
    }

    pub(crate) fn write_output_error(err: std::io::Error) -> Self {
        Self::WriteOutputError { err }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::ConfigParseError { .. }
            | Self::BackendNotFound { .. }
            | Self::ClassifyError { .. } => ParityExitCode::SETUP_ERROR,
            Self::ResultsReadError { .. } => ParityExitCode::RESULTS_READ_FAILED,
            Self::SerializeError { .. } | Self::WriteOutputError { .. } => {
                ParityExitCode::WRITE_OUTPUT_ERROR
            }
            Self::StatsMismatch { .. } => ParityExitCode::STATS_MISMATCH,
            Self::UnexpectedResults { .. } => ParityExitCode::UNEXPECTED_RESULTS,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::ConfigParseError { err } => {
                error!(
                    "failed to parse parity config at `{}`",
                    err.config_file().style(styles.bold)
                );
                match err.kind() {
                    ConfigParseErrorKind::DeserializeError(error) => {
                        error!(
                            target: NO_HEADING,
                            "\nCaused by:\n  at `{}`: {}",
                            error.path().style(styles.bold),
                            error.inner(),
                        );
                        None
                    }
                    _ => Some(err.kind() as &dyn Error),
                }
            }
            Self::BackendNotFound { err } => {
                error!("{err}");
                None
            }
            Self::ClassifyError { err } => {
                error!("{err}");
                error!(
                    target: NO_HEADING,
                    "(hint: move one of the rules, or make the patterns more specific)"
                );
                None
            }
            Self::ResultsReadError { err } => {
                error!(
                    "failed to read test results from `{}`",
                    err.path().style(styles.bold)
                );
                Some(err.kind() as &dyn Error)
            }
            Self::SerializeError { err } => {
                error!("{err}");
                err.source()
            }
            Self::WriteOutputError { err } => {
                error!("error writing output");
                Some(err as &dyn Error)
            }
            Self::StatsMismatch {
                backend,
                mismatches,
            } => {
                error!(
                    "stats for `{}` differ from the declared stats:",
                    backend.style(styles.bold)
                );
                for mismatch in mismatches {
                    error!(target: NO_HEADING, "  {mismatch}");
                }
                None
            }
            Self::UnexpectedResults { backend, count } => {
                error!(
                    "{} {} for `{}` did not match expectations",
                    count.style(styles.fail),
                    if *count == 1 { "test" } else { "tests" },
                    backend.style(styles.bold),
                );
                None
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
