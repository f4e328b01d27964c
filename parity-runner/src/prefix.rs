// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hierarchical test names.
//!
//! Test names are made up of components separated by `/` or `.`, for example
//! `topology/TestCMAPSpec/pool-checkin-destroy-closed.json`. An expectation declared for a name
//! also applies to every test the name is a prefix of, so a test is looked up under its own name
//! first, then under each shorter prefix in turn.

use crate::errors::EmptyPrefixError;

/// Returns the next, shorter prefix of a test name.
///
/// In order:
///
/// 1. A trailing run of `.` is removed.
/// 2. Otherwise, a trailing run of `/` is removed.
/// 3. Otherwise, everything after the last `/` or `.` is removed, keeping the separator itself.
///    Names without separators have the empty string as their next prefix.
///
/// ```
/// use parity_runner::prefix::next_prefix;
///
/// assert_eq!(next_prefix("topology/TestCMAPSpec.json"), Ok("topology/TestCMAPSpec."));
/// assert_eq!(next_prefix("topology/TestCMAPSpec."), Ok("topology/TestCMAPSpec"));
/// assert_eq!(next_prefix("topology/TestCMAPSpec"), Ok("topology/"));
/// assert_eq!(next_prefix("topology/"), Ok("topology"));
/// assert_eq!(next_prefix("topology"), Ok(""));
/// ```
///
/// The result is always strictly shorter than `path`, so repeatedly calling this function reaches
/// the empty string. The empty string itself has no prefix, and is an error.
pub fn next_prefix(path: &str) -> Result<&str, EmptyPrefixError> {
    if path.is_empty() {
        return Err(EmptyPrefixError);
    }

    let trimmed = path.trim_end_matches('.');
    if trimmed.len() != path.len() {
        return Ok(trimmed);
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.len() != path.len() {
        return Ok(trimmed);
    }

    Ok(path
        .rfind(['/', '.'])
        .map_or("", |separator| &path[..=separator]))
}

/// An iterator over a test name and all of its non-empty prefixes, longest first.
///
/// Created by [`prefixes`].
#[derive(Clone, Debug)]
pub struct Prefixes<'a> {
    next: &'a str,
}

/// Returns an iterator over `name` and its non-empty prefixes, longest first.
///
/// The iterator is empty if `name` is empty.
pub fn prefixes(name: &str) -> Prefixes<'_> {
    Prefixes { next: name }
}

impl<'a> Iterator for Prefixes<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next;
        // next_prefix only fails for "", which is where iteration stops.
        self.next = next_prefix(current).ok()?;
        Some(current)
    }
}

impl std::iter::FusedIterator for Prefixes<'_> {}
