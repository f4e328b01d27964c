// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for parity, a compatibility-test harness for databases.
//!
//! The same test suites are run against several database backends. For each backend, a config
//! file declares which tests are expected to pass, be skipped, fail, or be ignored. parity merges
//! those expectations, classifies actual results against them, and counts the outcomes.
//!
//! The basic flow is:
//!
//! 1. Load a [`ProjectConfig`](config::ProjectConfig), which merges the `common` section into
//!    each backend's section.
//! 2. Get actual results from a [`Runner`](runner::Runner).
//! 3. Sort them into buckets with [`classify`](compare::classify).
//! 4. Check the counts against declared stats with [`StatsCheck`](stats::StatsCheck).

pub mod compare;
pub mod config;
pub mod errors;
pub mod prefix;
pub mod runner;
pub mod stats;
pub mod status;
