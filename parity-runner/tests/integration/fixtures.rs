// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use color_eyre::eyre::Result;
use indoc::indoc;
use parity_runner::config::ConfigWarnings;
use std::collections::BTreeSet;

/// A config modeled on the Go driver suite, with every kind of rule.
pub(crate) const DRIVER_CONFIG: &str = indoc! {r#"
    runner: gotest
    dir: mongo-go-driver
    args: [-race, ./...]

    results:
      common:
        skip:
          - go.mongodb.org/mongo-driver/x/mongo/driver/topology/TestCMAPSpec
        ignore:
          - regex: "Flaky"
        stats:
          expected_pass: 0
          expected_skip: 1
          expected_fail: 2
          unexpected_fail: 1
          unexpected_rest: 1

      ferretdb:
        default: fail
        pass:
          - go.mongodb.org/mongo-driver/mongo/integration/TestCursor
        fail:
          - output_regex: "server version \"\\d\\.\\d\\.\\d+\" is lower"

      mongodb: ~
"#};

/// Results for one FerretDB run.
pub(crate) const FERRETDB_RESULTS: &str = indoc! {r#"
    {
      "go.mongodb.org/mongo-driver/mongo/integration/TestCursor/Next": {
        "status": "pass",
        "output": "=== RUN   TestCursor/Next\n--- PASS: TestCursor/Next (0.01s)"
      },
      "go.mongodb.org/mongo-driver/mongo/integration/TestCursor/Close": {
        "status": "pass"
      },
      "go.mongodb.org/mongo-driver/mongo/integration/TestCursor/TryNext": {
        "status": "fail",
        "output": "cursor_test.go:42: unexpected error"
      },
      "go.mongodb.org/mongo-driver/mongo/integration/TestIndexView": {
        "status": "skip",
        "output": "server version \"4.0.0\" is lower than min required version \"4.2.0\""
      },
      "go.mongodb.org/mongo-driver/mongo/integration/TestAggregate": {
        "status": "fail"
      },
      "go.mongodb.org/mongo-driver/mongo/integration/TestChangeStream": {
        "status": "fail"
      },
      "go.mongodb.org/mongo-driver/x/mongo/driver/topology/TestCMAPSpec/pool-checkin-destroy-closed.json": {
        "status": "skip"
      },
      "go.mongodb.org/mongo-driver/mongo/integration/TestFlakyRetry": {
        "status": "fail"
      },
      "go.mongodb.org/mongo-driver/mongo/integration/TestSessions": {
        "status": "panic"
      }
    }
"#};

/// A scratch directory with a config file and a results file.
pub(crate) struct Workspace {
    // Held to keep the directory alive.
    _dir: Utf8TempDir,
    pub(crate) config_path: Utf8PathBuf,
    pub(crate) results_path: Utf8PathBuf,
}

impl Workspace {
    pub(crate) fn new(config: &str, results: &str) -> Result<Self> {
        let dir = camino_tempfile::tempdir()?;
        let config_path = dir.path().join("driver.yml");
        let results_path = dir.path().join("results.json");
        std::fs::write(&config_path, config)?;
        std::fs::write(&results_path, results)?;

        Ok(Self {
            _dir: dir,
            config_path,
            results_path,
        })
    }
}

#[derive(Default)]
pub(crate) struct CollectWarnings {
    pub(crate) unknown_keys: BTreeSet<String>,
}

impl ConfigWarnings for CollectWarnings {
    fn unknown_config_keys(&mut self, _config_file: &Utf8Path, unknown: &BTreeSet<String>) {
        self.unknown_keys.extend(unknown.iter().cloned());
    }
}
