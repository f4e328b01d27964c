// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `parity` failures.
///
/// `parity` runs may fail for a variety of reasons. This structure documents the exit codes that
/// may occur in case of expected failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum ParityExitCode {}

impl ParityExitCode {
    /// No errors occurred, and every test matched its expectation.
    pub const OK: i32 = 0;

    /// One or more tests passed, skipped or failed unexpectedly, or had an unknown status.
    pub const UNEXPECTED_RESULTS: i32 = 100;

    /// The number of tests in a bucket differed from the declared stats.
    ///
    /// This takes precedence over [`Self::UNEXPECTED_RESULTS`].
    pub const STATS_MISMATCH: i32 = 101;

    /// Reading the actual test results produced an error.
    pub const RESULTS_READ_FAILED: i32 = 104;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;

    /// The project configuration could not be loaded, merged or applied.
    ///
    /// This includes ambiguous rule configurations detected while classifying results.
    pub const SETUP_ERROR: i32 = 96;
}
