// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::expectation::ExpectationConfig;
use crate::errors::MergeError;
use tracing::debug;

/// Merges `common` expectations into each backend's expectations, in place.
///
/// * If `common` is `None`, every target must already be set.
/// * Every rule in `common` is appended to the same category of each target. A rule that the
///   target already declares, in any category, is a [`MergeError::DuplicateTestRule`].
/// * `default` and `stats` from `common` are copied to each target, but it's an error for a target
///   to set them as well.
/// * A target that is `None` starts out empty, so it ends up with exactly the `common`
///   expectations.
///
/// All targets are checked before any of them is modified: on error, no target has changed.
///
/// This is meant to be called once per config. Calling it again on merged targets reports the
/// rules, default and stats that the first call copied over as conflicts.
pub fn merge_expectations<'a>(
    common: Option<&ExpectationConfig>,
    targets: impl IntoIterator<Item = (&'a str, &'a mut Option<ExpectationConfig>)>,
) -> Result<(), MergeError> {
    let mut targets: Vec<_> = targets.into_iter().collect();

    let Some(common) = common else {
        if let Some((backend, _)) = targets.iter().find(|(_, target)| target.is_none()) {
            return Err(MergeError::MissingTargetExpectation {
                backend: (*backend).to_owned(),
            });
        }
        return Ok(());
    };

    for (backend, target) in &targets {
        let Some(target) = target.as_ref() else {
            continue;
        };
        check_target(common, backend, target)?;
    }

    for (backend, target) in &mut targets {
        debug!("merging common expectations into `{backend}`");

        let target = target.get_or_insert_with(ExpectationConfig::default);
        for (status, rules) in common.categories.iter() {
            target.categories.get_mut(status).extend_from(rules);
        }
        if common.default.is_some() {
            target.default = common.default;
        }
        if common.stats.is_some() {
            target.stats = common.stats;
        }
    }

    Ok(())
}

fn check_target(
    common: &ExpectationConfig,
    backend: &str,
    target: &ExpectationConfig,
) -> Result<(), MergeError> {
    // A name can't be "pass" in common and "fail" in the target, so look across all categories.
    if let Some((_, rule)) = common
        .categories
        .rules()
        .find(|(_, rule)| target.categories.find(rule).is_some())
    {
        return Err(MergeError::DuplicateTestRule {
            backend: backend.to_owned(),
            rule: rule.to_string(),
        });
    }

    if common.default.is_some() && target.default.is_some() {
        return Err(MergeError::ConflictingDefault {
            backend: backend.to_owned(),
        });
    }

    if common.stats.is_some() && target.stats.is_some() {
        return Err(MergeError::ConflictingStats {
            backend: backend.to_owned(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Categories, NameRule, RuleKind, Rules},
        stats::Stats,
        status::ExpectedStatus,
    };
    use itertools::Itertools;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn names(pass: &[&str], skip: &[&str], fail: &[&str], ignore: &[&str]) -> ExpectationConfig {
        ExpectationConfig {
            categories: Categories {
                pass: Rules::from_names(pass.iter().copied()),
                skip: Rules::from_names(skip.iter().copied()),
                fail: Rules::from_names(fail.iter().copied()),
                ignore: Rules::from_names(ignore.iter().copied()),
            },
            ..Default::default()
        }
    }

    fn sorted_names(rules: &Rules) -> Vec<&str> {
        rules.names().sorted().collect()
    }

    #[test]
    fn merge_fills_categories() {
        let common = names(&["a", "b"], &["c", "d"], &["e", "f"], &["g", "h"]);
        let mut ferretdb = Some(names(&["1", "2"], &["3", "4"], &["5"], &[]));
        let mut mongodb = Some(names(&["A", "B"], &["C"], &["D", "E"], &["x", "z"]));

        merge_expectations(
            Some(&common),
            [("ferretdb", &mut ferretdb), ("mongodb", &mut mongodb)],
        )
        .expect("merge succeeds");

        let ferretdb = ferretdb.unwrap();
        assert_eq!(
            sorted_names(&ferretdb.categories.pass),
            ["1", "2", "a", "b"]
        );
        assert_eq!(
            sorted_names(&ferretdb.categories.skip),
            ["3", "4", "c", "d"]
        );
        assert_eq!(sorted_names(&ferretdb.categories.fail), ["5", "e", "f"]);
        assert_eq!(sorted_names(&ferretdb.categories.ignore), ["g", "h"]);

        let mongodb = mongodb.unwrap();
        assert_eq!(sorted_names(&mongodb.categories.pass), ["A", "B", "a", "b"]);
        assert_eq!(sorted_names(&mongodb.categories.skip), ["C", "c", "d"]);
        assert_eq!(sorted_names(&mongodb.categories.fail), ["D", "E", "e", "f"]);
        assert_eq!(
            sorted_names(&mongodb.categories.ignore),
            ["g", "h", "x", "z"]
        );

        // Common itself is unchanged.
        assert_eq!(common, names(&["a", "b"], &["c", "d"], &["e", "f"], &["g", "h"]));
    }

    #[test]
    fn merge_without_common_requires_targets() {
        let mut ferretdb = Some(ExpectationConfig::default());
        let mut mongodb = None;

        assert_eq!(
            merge_expectations(None, [("ferretdb", &mut ferretdb), ("mongodb", &mut mongodb)]),
            Err(MergeError::MissingTargetExpectation {
                backend: "mongodb".to_owned()
            })
        );
    }

    #[test]
    fn merge_without_common_leaves_targets_alone() {
        let original = names(&["a"], &[], &[], &[]);
        let mut ferretdb = Some(original.clone());

        merge_expectations(None, [("ferretdb", &mut ferretdb)]).unwrap();
        assert_eq!(ferretdb, Some(original));
    }

    #[test]
    fn merge_into_missing_target_copies_common() {
        let common = ExpectationConfig {
            default: Some(ExpectedStatus::Fail),
            ..names(&["a"], &[], &[], &[])
        };
        let mut sqlite = None;

        merge_expectations(Some(&common), [("sqlite", &mut sqlite)]).unwrap();
        assert_eq!(sqlite, Some(common));
    }

    #[test_case(
        names(&["a"], &[], &[], &[]),
        names(&["a", "b"], &[], &[], &[])
        ; "pass"
    )]
    #[test_case(
        names(&[], &["a"], &[], &[]),
        names(&[], &["a", "b"], &[], &[])
        ; "skip"
    )]
    #[test_case(
        names(&[], &[], &["a"], &[]),
        names(&[], &[], &["a", "b"], &[])
        ; "fail"
    )]
    #[test_case(
        names(&["a"], &[], &[], &[]),
        names(&[], &[], &["a"], &[])
        ; "pass in common, fail in target"
    )]
    #[test_case(
        names(&[], &[], &[], &["a"]),
        names(&[], &["a"], &[], &[])
        ; "ignore in common, skip in target"
    )]
    fn merge_detects_duplicates(common: ExpectationConfig, target: ExpectationConfig) {
        let mut ferretdb = Some(target.clone());
        let mut mongodb = Some(ExpectationConfig::default());

        assert_eq!(
            merge_expectations(
                Some(&common),
                [("mongodb", &mut mongodb), ("ferretdb", &mut ferretdb)]
            ),
            Err(MergeError::DuplicateTestRule {
                backend: "ferretdb".to_owned(),
                rule: r#""a""#.to_owned(),
            })
        );

        // Nothing was merged, including into the target checked first.
        assert_eq!(ferretdb, Some(target));
        assert_eq!(mongodb, Some(ExpectationConfig::default()));
    }

    #[test]
    fn merge_detects_duplicate_regex_rules() {
        let regex = || NameRule::new(RuleKind::OutputRegex, "^server version").unwrap();
        let common = ExpectationConfig {
            categories: Categories {
                skip: Rules::new([regex()]),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut postgresql = Some(ExpectationConfig {
            categories: Categories {
                fail: Rules::new([regex()]),
                ..Default::default()
            },
            ..Default::default()
        });

        assert_eq!(
            merge_expectations(Some(&common), [("postgresql", &mut postgresql)]),
            Err(MergeError::DuplicateTestRule {
                backend: "postgresql".to_owned(),
                rule: r#"{ output_regex: "^server version" }"#.to_owned(),
            })
        );
    }

    #[test]
    fn merge_default() {
        let common = ExpectationConfig {
            default: Some(ExpectedStatus::Pass),
            ..Default::default()
        };
        let mut ferretdb = Some(ExpectationConfig::default());
        let mut mongodb = Some(ExpectationConfig {
            default: Some(ExpectedStatus::Fail),
            ..Default::default()
        });

        assert_eq!(
            merge_expectations(Some(&common), [("mongodb", &mut mongodb)]),
            Err(MergeError::ConflictingDefault {
                backend: "mongodb".to_owned()
            })
        );

        merge_expectations(Some(&common), [("ferretdb", &mut ferretdb)]).unwrap();
        assert_eq!(ferretdb.unwrap().default, Some(ExpectedStatus::Pass));
    }

    #[test]
    fn merge_stats() {
        let stats = Stats {
            expected_pass: 1,
            expected_skip: 2,
            expected_fail: 3,
            unexpected_pass: 4,
            unexpected_skip: 5,
            unexpected_fail: 6,
            unknown: 7,
        };
        let common = ExpectationConfig {
            stats: Some(stats),
            ..Default::default()
        };

        let mut ferretdb = Some(ExpectationConfig::default());
        merge_expectations(Some(&common), [("ferretdb", &mut ferretdb)]).unwrap();
        assert_eq!(ferretdb.unwrap().stats, Some(stats));

        let mut mongodb = Some(ExpectationConfig {
            stats: Some(Stats::default()),
            ..Default::default()
        });
        assert_eq!(
            merge_expectations(Some(&common), [("mongodb", &mut mongodb)]),
            Err(MergeError::ConflictingStats {
                backend: "mongodb".to_owned()
            })
        );
    }

    #[test]
    fn merge_twice_reports_conflicts() {
        let common = ExpectationConfig {
            default: Some(ExpectedStatus::Skip),
            ..names(&["a"], &[], &[], &[])
        };
        let mut ferretdb = Some(ExpectationConfig::default());

        merge_expectations(Some(&common), [("ferretdb", &mut ferretdb)]).unwrap();
        assert_eq!(
            merge_expectations(Some(&common), [("ferretdb", &mut ferretdb)]),
            Err(MergeError::DuplicateTestRule {
                backend: "ferretdb".to_owned(),
                rule: r#""a""#.to_owned(),
            })
        );

        let common = ExpectationConfig {
            default: Some(ExpectedStatus::Skip),
            ..Default::default()
        };
        let mut mongodb = Some(ExpectationConfig::default());
        merge_expectations(Some(&common), [("mongodb", &mut mongodb)]).unwrap();
        assert_eq!(
            merge_expectations(Some(&common), [("mongodb", &mut mongodb)]),
            Err(MergeError::ConflictingDefault {
                backend: "mongodb".to_owned()
            })
        );
    }
}
