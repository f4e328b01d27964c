// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    expectation::{ExpectationConfig, ExpectationSet},
    merge::merge_expectations,
};
use crate::errors::{BackendNotFound, ConfigParseError, ConfigParseErrorKind};
use camino::Utf8Path;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;
use swrite::{SWrite, swrite};
use tracing::{debug, warn};

/// The name of the section whose expectations apply to every backend.
pub const COMMON_SECTION: &str = "common";

/// Trait for handling configuration warnings.
///
/// This trait allows for different warning handling strategies, such as logging warnings
/// (the default behavior) or collecting them for testing purposes.
pub trait ConfigWarnings {
    /// Handle unknown configuration keys found in a config file.
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>);
}

/// Default implementation of [`ConfigWarnings`] that logs warnings using the tracing crate.
pub struct DefaultConfigWarnings;

impl ConfigWarnings for DefaultConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>) {
        let mut unknown_str = String::new();
        match unknown.iter().exactly_one() {
            Ok(key) => {
                // Print this on the same line.
                swrite!(unknown_str, "key: {key}");
            }
            Err(_) => {
                unknown_str.push_str("keys:\n");
                for key in unknown {
                    swrite!(unknown_str, "\n  - {key}");
                }
            }
        }

        warn!("in config file {config_file}, ignoring unknown configuration {unknown_str}");
    }
}

/// The `results` table of a config file, before merging.
///
/// Backend sections keep the order they're declared in. A section that's declared but empty
/// (`ferretdb: ~`) is present with a `None` value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultsConfig {
    /// Expectations shared by every backend.
    pub common: Option<ExpectationConfig>,

    /// Expectations for each backend.
    pub backends: IndexMap<String, Option<ExpectationConfig>>,
}

impl<'de> Deserialize<'de> for ResultsConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut backends =
            IndexMap::<String, Option<ExpectationConfig>>::deserialize(deserializer)?;
        let common = backends.shift_remove(COMMON_SECTION).flatten();
        Ok(Self { common, backends })
    }
}

#[derive(Deserialize)]
struct ProjectConfigDeserialize {
    #[serde(default)]
    results: ResultsConfig,
}

/// A loaded config file: resolved expectations for every declared backend.
#[derive(Clone, Debug)]
pub struct ProjectConfig {
    common: Option<ExpectationSet>,
    backends: IndexMap<String, ExpectationSet>,
}

impl ProjectConfig {
    /// Reads and resolves the config file at `config_file`.
    ///
    /// Unknown top-level keys are passed to `warnings`.
    pub fn from_path(
        config_file: impl AsRef<Utf8Path>,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigParseError> {
        let config_file = config_file.as_ref();
        debug!("reading config from {config_file}");

        let contents = std::fs::read_to_string(config_file).map_err(|error| {
            ConfigParseError::new(config_file, ConfigParseErrorKind::ReadError(error))
        })?;
        Self::from_yaml(config_file, &contents, warnings)
    }

    /// Resolves a config from its YAML contents.
    ///
    /// `config_file` is only used for error messages and warnings.
    pub fn from_yaml(
        config_file: &Utf8Path,
        contents: &str,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigParseError> {
        Self::from_yaml_impl(contents, config_file, warnings)
            .map_err(|kind| ConfigParseError::new(config_file, kind))
    }

    fn from_yaml_impl(
        contents: &str,
        config_file: &Utf8Path,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigParseErrorKind> {
        let (deserialized, unknown) = Self::deserialize_yaml(contents)?;
        if !unknown.is_empty() {
            warnings.unknown_config_keys(config_file, &unknown);
        }

        let ResultsConfig {
            common,
            mut backends,
        } = deserialized.results;

        let sections = common
            .iter()
            .map(|config| (COMMON_SECTION, config))
            .chain(
                backends
                    .iter()
                    .filter_map(|(name, config)| Some((name.as_str(), config.as_ref()?))),
            );
        for (section, config) in sections {
            config
                .validate()
                .map_err(|err| ConfigParseErrorKind::DuplicateTestRule {
                    section: section.to_owned(),
                    err,
                })?;
        }

        merge_expectations(
            common.as_ref(),
            backends
                .iter_mut()
                .map(|(name, config)| (name.as_str(), config)),
        )
        .map_err(ConfigParseErrorKind::MergeError)?;

        let resolve = |section: &str, config: ExpectationConfig| {
            ExpectationSet::new(config).map_err(|err| ConfigParseErrorKind::DuplicateTestRule {
                section: section.to_owned(),
                err,
            })
        };

        let common = common
            .map(|config| resolve(COMMON_SECTION, config))
            .transpose()?;
        // Every backend is set after a successful merge.
        let backends = backends
            .into_iter()
            .map(|(name, config)| {
                resolve(&name, config.unwrap_or_default()).map(|set| (name, set))
            })
            .collect::<Result<IndexMap<_, _>, _>>()?;

        debug!(
            "resolved expectations for {} backend(s), common section {}",
            backends.len(),
            if common.is_some() { "present" } else { "absent" },
        );

        Ok(Self { common, backends })
    }

    fn deserialize_yaml(
        contents: &str,
    ) -> Result<(ProjectConfigDeserialize, BTreeSet<String>), ConfigParseErrorKind> {
        let mut ignored = BTreeSet::new();
        let mut cb = |path: serde_ignored::Path| {
            ignored.insert(path.to_string());
        };
        let yaml_de = serde_yaml::Deserializer::from_str(contents);
        let ignored_de = serde_ignored::Deserializer::new(yaml_de, &mut cb);
        let config: ProjectConfigDeserialize = serde_path_to_error::deserialize(ignored_de)
            .map_err(|error| ConfigParseErrorKind::DeserializeError(Box::new(error)))?;

        Ok((config, ignored))
    }

    /// Returns the resolved expectations for `backend`.
    ///
    /// Backends without a section of their own get the `common` expectations, if there are any.
    pub fn expectations_for(&self, backend: &str) -> Result<&ExpectationSet, BackendNotFound> {
        if let Some(set) = self.backends.get(backend) {
            return Ok(set);
        }
        self.common
            .as_ref()
            .ok_or_else(|| BackendNotFound::new(backend, self.backends.keys().map(String::as_str)))
    }

    /// Returns the resolved `common` expectations, if the section is declared.
    pub fn common(&self) -> Option<&ExpectationSet> {
        self.common.as_ref()
    }

    /// Iterates over the declared backends, in declaration order.
    pub fn backends(&self) -> impl Iterator<Item = (&str, &ExpectationSet)> + '_ {
        self.backends.iter().map(|(name, set)| (name.as_str(), set))
    }
}
