// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sources of actual test results.
//!
//! Tests are run by external tools. A [`Runner`] hands their results over, all at once, before
//! classification starts.

use crate::{
    compare::TestResults,
    errors::{ResultsReadError, ResultsReadErrorKind},
};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

/// Produces the complete set of results for a run.
pub trait Runner {
    /// The error returned if results couldn't be produced.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns results for every test that was run.
    fn run(&mut self) -> Result<TestResults, Self::Error>;
}

/// A JSON file of results, written by an external runner.
///
/// The file contains a single object keyed by test name:
///
/// ```json
/// {
///   "TestCursor/Next": { "status": "pass", "output": "--- PASS: TestCursor/Next" },
///   "ycsb/workloada": { "status": "pass", "measurements": { "ops/sec": 1523.4 } }
/// }
/// ```
///
/// Statuses other than `pass`, `skip` and `fail` are read as unknown.
#[derive(Clone, Debug)]
pub struct ResultsFile {
    path: Utf8PathBuf,
}

impl ResultsFile {
    /// Creates a new runner reading from `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the results file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Runner for ResultsFile {
    type Error = ResultsReadError;

    fn run(&mut self) -> Result<TestResults, Self::Error> {
        let contents = std::fs::read_to_string(&self.path).map_err(|error| {
            ResultsReadError::new(&self.path, ResultsReadErrorKind::Read(error))
        })?;

        let mut deserializer = serde_json::Deserializer::from_str(&contents);
        let results: TestResults = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|error| {
                ResultsReadError::new(&self.path, ResultsReadErrorKind::Deserialize(error))
            })?;

        debug!("read {} test results from {}", results.len(), self.path);
        Ok(results)
    }
}
