// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: load a config, read results, classify and check stats.

mod fixtures;
mod flow;
