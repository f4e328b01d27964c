// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Machine-readable contracts for `parity`.
//!
//! Tools that wrap `parity` (CI scripts, dashboards) should depend on this crate rather than on
//! the exact exit codes, so that the meaning of each code stays documented in one place.

mod exit_codes;

pub use exit_codes::*;
