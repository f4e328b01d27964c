// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::rules::{NameRule, Rules};
use crate::{errors::DuplicateTestRule, stats::Stats, status::ExpectedStatus};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};

/// The rules for each of the four expectation categories.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Categories {
    /// Tests expected to pass.
    pub pass: Rules,
    /// Tests expected to be skipped.
    pub skip: Rules,
    /// Tests expected to fail.
    pub fail: Rules,
    /// Tests whose outcome isn't checked.
    pub ignore: Rules,
}

impl Categories {
    /// Returns the rules for a category.
    pub fn get(&self, status: ExpectedStatus) -> &Rules {
        match status {
            ExpectedStatus::Pass => &self.pass,
            ExpectedStatus::Skip => &self.skip,
            ExpectedStatus::Fail => &self.fail,
            ExpectedStatus::Ignore => &self.ignore,
        }
    }

    /// Returns the rules for a category, mutably.
    pub fn get_mut(&mut self, status: ExpectedStatus) -> &mut Rules {
        match status {
            ExpectedStatus::Pass => &mut self.pass,
            ExpectedStatus::Skip => &mut self.skip,
            ExpectedStatus::Fail => &mut self.fail,
            ExpectedStatus::Ignore => &mut self.ignore,
        }
    }

    /// Iterates over categories in a fixed order: pass, skip, fail, ignore.
    pub fn iter(&self) -> impl Iterator<Item = (ExpectedStatus, &Rules)> + '_ {
        ExpectedStatus::ALL
            .into_iter()
            .map(move |status| (status, self.get(status)))
    }

    /// Iterates over every rule along with the category it's declared in.
    pub fn rules(&self) -> impl Iterator<Item = (ExpectedStatus, &NameRule)> + '_ {
        self.iter()
            .flat_map(|(status, rules)| rules.iter().map(move |rule| (status, rule)))
    }

    /// Returns the category an identical rule is declared in, if any.
    pub fn find(&self, rule: &NameRule) -> Option<ExpectedStatus> {
        self.iter()
            .find_map(|(status, rules)| rules.contains(rule).then_some(status))
    }

    /// Checks that no rule appears twice, across all categories.
    pub(crate) fn check_duplicates(&self) -> Result<(), DuplicateTestRule> {
        let mut seen = HashSet::new();
        for (_, rule) in self.rules() {
            if !seen.insert((rule.kind(), rule.pattern())) {
                return Err(DuplicateTestRule::new(rule.to_string()));
            }
        }
        Ok(())
    }
}

/// Expectations for one section of the `results` table, as declared in a config file.
///
/// Every field is optional here. Sections are merged with
/// [`merge_expectations`](super::merge_expectations) and then resolved into an
/// [`ExpectationSet`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpectationConfig {
    /// The status for tests that no rule matches.
    pub default: Option<ExpectedStatus>,

    /// Declared counts, checked against the computed ones.
    pub stats: Option<Stats>,

    /// Rules by category.
    pub categories: Categories,
}

impl ExpectationConfig {
    /// Checks that no test name or rule is declared more than once in this section.
    pub fn validate(&self) -> Result<(), DuplicateTestRule> {
        self.categories.check_duplicates()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ExpectationConfigDeserialize {
    #[serde(default)]
    default: Option<ExpectedStatus>,
    #[serde(default)]
    stats: Option<Stats>,
    #[serde(default)]
    pass: Rules,
    #[serde(default)]
    skip: Rules,
    #[serde(default)]
    fail: Rules,
    #[serde(default)]
    ignore: Rules,
}

impl<'de> Deserialize<'de> for ExpectationConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ExpectationConfigDeserialize {
            default,
            stats,
            pass,
            skip,
            fail,
            ignore,
        } = ExpectationConfigDeserialize::deserialize(deserializer)?;

        Ok(Self {
            default,
            stats,
            categories: Categories {
                pass,
                skip,
                fail,
                ignore,
            },
        })
    }
}

/// The fully-resolved expectations for one backend.
///
/// Created once from configuration, then read-only for the rest of the run.
#[derive(Clone, Debug)]
pub struct ExpectationSet {
    default: ExpectedStatus,
    stats: Option<Stats>,
    categories: Categories,
    // Exact names and prefixes, for the prefix walk.
    names: HashMap<String, ExpectedStatus>,
}

impl ExpectationSet {
    /// Resolves a (merged) config section.
    ///
    /// If no default status is set, tests are expected to pass.
    pub fn new(config: ExpectationConfig) -> Result<Self, DuplicateTestRule> {
        config.validate()?;

        let names = config
            .categories
            .iter()
            .flat_map(|(status, rules)| rules.names().map(move |name| (name.to_owned(), status)))
            .collect();

        Ok(Self {
            default: config.default.unwrap_or(ExpectedStatus::Pass),
            stats: config.stats,
            categories: config.categories,
            names,
        })
    }

    /// Returns the status for tests that no rule matches.
    pub fn default_status(&self) -> ExpectedStatus {
        self.default
    }

    /// Returns the declared stats, if any.
    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    /// Returns the rules by category.
    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    /// Looks up an exact name or prefix.
    pub fn name_status(&self, name: &str) -> Option<ExpectedStatus> {
        self.names.get(name).copied()
    }
}

impl Serialize for ExpectationSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        struct ExpectationSetSerialize<'a> {
            default: ExpectedStatus,
            #[serde(skip_serializing_if = "Option::is_none")]
            stats: Option<&'a Stats>,
            #[serde(skip_serializing_if = "is_empty")]
            pass: &'a Rules,
            #[serde(skip_serializing_if = "is_empty")]
            skip: &'a Rules,
            #[serde(skip_serializing_if = "is_empty")]
            fail: &'a Rules,
            #[serde(skip_serializing_if = "is_empty")]
            ignore: &'a Rules,
        }

        fn is_empty(rules: &&Rules) -> bool {
            rules.is_empty()
        }

        ExpectationSetSerialize {
            default: self.default,
            stats: self.stats.as_ref(),
            pass: &self.categories.pass,
            skip: &self.categories.skip,
            fail: &self.categories.fail,
            ignore: &self.categories.ignore,
        }
        .serialize(serializer)
    }
}
