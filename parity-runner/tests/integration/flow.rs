// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use color_eyre::eyre::Result;
use parity_runner::{
    compare::{Bucket, CompareResult, classify},
    config::ProjectConfig,
    errors::ConfigParseErrorKind,
    runner::{ResultsFile, Runner},
    stats::{Stats, StatsCheck},
};
use pretty_assertions::assert_eq;

fn bucket_names(result: &CompareResult, bucket: Bucket) -> Vec<&str> {
    result
        .bucket(bucket)
        .keys()
        .map(|name| {
            name.strip_prefix("go.mongodb.org/mongo-driver/")
                .unwrap_or(name.as_str())
        })
        .collect()
}

#[test]
fn compare_ferretdb() -> Result<()> {
    let workspace = Workspace::new(DRIVER_CONFIG, FERRETDB_RESULTS)?;

    let mut warnings = CollectWarnings::default();
    let config = ProjectConfig::from_path(&workspace.config_path, &mut warnings)?;
    assert_eq!(
        warnings.unknown_keys.iter().collect::<Vec<_>>(),
        ["args", "dir", "runner"]
    );

    let expectations = config.expectations_for("ferretdb")?;
    let results = ResultsFile::new(&workspace.results_path).run()?;
    let compare = classify(expectations, &results)?;

    assert_eq!(
        bucket_names(&compare, Bucket::ExpectedPass),
        [
            "mongo/integration/TestCursor/Close",
            "mongo/integration/TestCursor/Next",
        ]
    );
    assert_eq!(
        bucket_names(&compare, Bucket::ExpectedSkip),
        ["x/mongo/driver/topology/TestCMAPSpec/pool-checkin-destroy-closed.json"]
    );
    assert_eq!(
        bucket_names(&compare, Bucket::ExpectedFail),
        [
            "mongo/integration/TestAggregate",
            "mongo/integration/TestChangeStream",
        ]
    );
    // The output regex overrides the default, and the test was skipped rather than failed.
    assert_eq!(
        bucket_names(&compare, Bucket::UnexpectedSkip),
        ["mongo/integration/TestIndexView"]
    );
    assert_eq!(
        bucket_names(&compare, Bucket::UnexpectedFail),
        ["mongo/integration/TestCursor/TryNext"]
    );
    assert_eq!(
        bucket_names(&compare, Bucket::Unknown),
        ["mongo/integration/TestSessions"]
    );
    assert!(bucket_names(&compare, Bucket::UnexpectedPass).is_empty());
    assert!(compare.has_unexpected());

    assert_eq!(
        compare.stats,
        Stats {
            expected_pass: 2,
            expected_skip: 1,
            expected_fail: 2,
            unexpected_pass: 0,
            unexpected_skip: 1,
            unexpected_fail: 1,
            unknown: 1,
        }
    );

    // The common stats are inherited; expected_pass is declared as 0, which isn't checked.
    let declared = expectations.stats().expect("stats are inherited from common");
    let check = StatsCheck::new(declared, &compare.stats);
    assert_eq!(
        check
            .mismatches()
            .iter()
            .map(|mismatch| mismatch.to_string())
            .collect::<Vec<_>>(),
        ["unexpected_skip: expected 0, actual 1"]
    );

    assert_eq!(
        compare.pass_rate().to_string(),
        "40.00% (2/5) tests passed."
    );

    Ok(())
}

#[test]
fn compare_backend_with_only_common() -> Result<()> {
    let workspace = Workspace::new(DRIVER_CONFIG, FERRETDB_RESULTS)?;
    let config =
        ProjectConfig::from_path(&workspace.config_path, &mut CollectWarnings::default())?;

    let expectations = config.expectations_for("mongodb")?;
    let results = ResultsFile::new(&workspace.results_path).run()?;
    let compare = classify(expectations, &results)?;

    // The default is pass, and only common rules apply.
    assert_eq!(
        bucket_names(&compare, Bucket::UnexpectedFail),
        [
            "mongo/integration/TestAggregate",
            "mongo/integration/TestChangeStream",
            "mongo/integration/TestCursor/TryNext",
        ]
    );
    assert_eq!(
        bucket_names(&compare, Bucket::UnexpectedSkip),
        ["mongo/integration/TestIndexView"]
    );
    assert_eq!(compare.stats.expected_pass, 2);
    assert_eq!(compare.stats.expected_skip, 1);

    Ok(())
}

#[test]
fn conflicting_default_in_config() -> Result<()> {
    let config = DRIVER_CONFIG.replace(
        "skip:\n      - go.mongodb.org",
        "default: pass\n    skip:\n      - go.mongodb.org",
    );
    let workspace = Workspace::new(&config, "{}")?;

    let err = ProjectConfig::from_path(&workspace.config_path, &mut CollectWarnings::default())
        .expect_err("ferretdb sets its own default");
    assert_eq!(err.config_file(), workspace.config_path.as_path());
    let ConfigParseErrorKind::MergeError(merge_error) = err.kind() else {
        panic!("unexpected error kind: {:?}", err.kind());
    };
    assert_eq!(
        merge_error.to_string(),
        "default status cannot be set in common when it's set for `ferretdb`"
    );

    Ok(())
}
