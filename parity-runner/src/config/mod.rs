// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration support for parity.
//!
//! ## Loading in passes
//!
//! A config file is turned into per-backend expectations in several passes.
//!
//! * The first pass decodes the YAML into [`ResultsConfig`]. Rules are compiled here, so an
//!   invalid regex is reported along with its path in the file. Each section is then checked for
//!   test names and rules that are declared more than once.
//! * The second pass folds the `common` section into every backend section, via
//!   [`merge_expectations`].
//! * The final pass resolves each section into an immutable [`ExpectationSet`], which is what
//!   classification works with.
//!
//! [`ProjectConfig`] runs all three passes.

mod expectation;
mod merge;
mod project;
mod rules;

pub use expectation::*;
pub use merge::*;
pub use project::*;
pub use rules::*;
