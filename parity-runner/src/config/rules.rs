// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use regex::Regex;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, Visitor},
    ser::SerializeMap,
};
use std::fmt;

/// The kind of a [`NameRule`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum RuleKind {
    /// An exact test name or name prefix.
    Name,

    /// A regex the test name must match (`regex`).
    NameRegex,

    /// A regex the test name must not match (`not_regex`).
    NameNotRegex,

    /// A regex the test output must match (`output_regex`).
    OutputRegex,
}

impl RuleKind {
    const MAP_KEYS: &'static [&'static str] = &["regex", "not_regex", "output_regex"];

    /// Returns the map key this kind is written with, or `None` for plain names.
    pub fn map_key(self) -> Option<&'static str> {
        match self {
            Self::Name => None,
            Self::NameRegex => Some("regex"),
            Self::NameNotRegex => Some("not_regex"),
            Self::OutputRegex => Some("output_regex"),
        }
    }

    fn from_map_key(key: &str) -> Option<Self> {
        match key {
            "regex" => Some(Self::NameRegex),
            "not_regex" => Some(Self::NameNotRegex),
            "output_regex" => Some(Self::OutputRegex),
            _ => None,
        }
    }
}

/// A single test-selection rule within an expectation category.
///
/// In config files, a bare string is a [`NameRule::Name`], and a map with exactly one of the keys
/// `regex`, `not_regex` or `output_regex` is one of the regex variants. Regexes are compiled
/// when the config is loaded.
#[derive(Clone, Debug)]
pub enum NameRule {
    /// An exact test name, also matching every test under it as a prefix.
    Name(String),

    /// Matches tests whose name matches the regex.
    NameRegex(Regex),

    /// Matches tests whose name does not match the regex.
    NameNotRegex(Regex),

    /// Matches tests whose output matches the regex.
    OutputRegex(Regex),
}

impl NameRule {
    /// Creates a new exact name rule.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Compiles a new rule of the given kind.
    pub fn new(kind: RuleKind, pattern: &str) -> Result<Self, regex::Error> {
        match kind {
            RuleKind::Name => Ok(Self::Name(pattern.to_owned())),
            RuleKind::NameRegex => Regex::new(pattern).map(Self::NameRegex),
            RuleKind::NameNotRegex => Regex::new(pattern).map(Self::NameNotRegex),
            RuleKind::OutputRegex => Regex::new(pattern).map(Self::OutputRegex),
        }
    }

    /// Returns the kind of this rule.
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Name(_) => RuleKind::Name,
            Self::NameRegex(_) => RuleKind::NameRegex,
            Self::NameNotRegex(_) => RuleKind::NameNotRegex,
            Self::OutputRegex(_) => RuleKind::OutputRegex,
        }
    }

    /// Returns the name or the regex source.
    pub fn pattern(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::NameRegex(regex) | Self::NameNotRegex(regex) | Self::OutputRegex(regex) => {
                regex.as_str()
            }
        }
    }

    /// Returns true if this rule selects the test by a regex over its name.
    ///
    /// Returns false for other kinds of rules.
    pub(crate) fn matches_name_regex(&self, test_name: &str) -> bool {
        match self {
            Self::NameRegex(regex) => regex.is_match(test_name),
            Self::NameNotRegex(regex) => !regex.is_match(test_name),
            Self::Name(_) | Self::OutputRegex(_) => false,
        }
    }

    /// Returns true if this is an `output_regex` rule matching the output.
    pub(crate) fn matches_output(&self, output: &str) -> bool {
        match self {
            Self::OutputRegex(regex) => regex.is_match(output),
            Self::Name(_) | Self::NameRegex(_) | Self::NameNotRegex(_) => false,
        }
    }
}

// Two rules are the same if they have the same kind and source, which is what duplicate detection
// cares about.
impl PartialEq for NameRule {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.pattern() == other.pattern()
    }
}

impl Eq for NameRule {}

impl fmt::Display for NameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind().map_key() {
            None => write!(f, "{:?}", self.pattern()),
            Some(key) => write!(f, "{{ {key}: {:?} }}", self.pattern()),
        }
    }
}

impl<'de> Deserialize<'de> for NameRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;

        impl<'de2> Visitor<'de2> for V {
            type Value = NameRule;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(
                    formatter,
                    "a test name, or a map with one of `regex`, `not_regex` or `output_regex`"
                )
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(NameRule::name(v))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de2>,
            {
                let Some(key) = map.next_key::<String>()? else {
                    return Err(de::Error::invalid_length(0, &"a map with exactly 1 key"));
                };
                let Some(kind) = RuleKind::from_map_key(&key) else {
                    return Err(de::Error::unknown_field(&key, RuleKind::MAP_KEYS));
                };
                let pattern = map.next_value::<Pattern>()?.0;

                if let Some(extra) = map.next_key::<String>()? {
                    return Err(de::Error::custom(format!(
                        "invalid syntax: expected a map with exactly 1 key, \
                         found `{key}` and `{extra}`"
                    )));
                }

                NameRule::new(kind, &pattern).map_err(|err| {
                    de::Error::custom(format!("invalid {key} `{pattern}`: {err}"))
                })
            }
        }

        deserializer.deserialize_any(V)
    }
}

/// The value of a regex rule: a single string.
struct Pattern(String);

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;

        impl<'de2> Visitor<'de2> for V {
            type Value = Pattern;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a regex string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Pattern(v.to_owned()))
            }

            fn visit_seq<A>(self, _seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de2>,
            {
                // One rule per pattern: `- regex: [a, b]` is rejected rather than expanded.
                Err(de::Error::custom(
                    "invalid syntax: regex value shouldn't be an array",
                ))
            }
        }

        deserializer.deserialize_any(V)
    }
}

impl Serialize for NameRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.kind().map_key() {
            None => serializer.serialize_str(self.pattern()),
            Some(key) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(key, self.pattern())?;
                map.end()
            }
        }
    }
}

/// The list of rules in one category (`pass`, `skip`, `fail` or `ignore`).
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Rules(Vec<NameRule>);

impl Rules {
    /// Creates a new list of rules.
    pub fn new(rules: impl IntoIterator<Item = NameRule>) -> Self {
        Self(rules.into_iter().collect())
    }

    /// Creates a list of exact name rules.
    pub fn from_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self::new(names.into_iter().map(NameRule::name))
    }

    /// Iterates over all rules, in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, NameRule> {
        self.0.iter()
    }

    /// Iterates over the exact names among these rules.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().filter_map(|rule| match rule {
            NameRule::Name(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Returns true if an identical rule is present.
    pub fn contains(&self, rule: &NameRule) -> bool {
        self.0.contains(rule)
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn extend_from(&mut self, other: &Rules) {
        self.0.extend(other.0.iter().cloned());
    }
}

impl<'a> IntoIterator for &'a Rules {
    type Item = &'a NameRule;
    type IntoIter = std::slice::Iter<'a, NameRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
