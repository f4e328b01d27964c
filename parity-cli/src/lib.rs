// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compare database compatibility test results against expectations.
//!
//! `parity` reads per-backend expectations from a YAML config file and the actual results of a
//! test run from a JSON file, sorts each test into expected, unexpected or unknown buckets, and
//! exits with a non-zero code if anything didn't go as expected.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::{OutputContext, OutputWriter, StderrStyles};
