// Copyright (c) The parity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{ExpectedError, Result},
    output::{NO_HEADING, OutputContext, OutputOpts, OutputWriter, StderrStyles},
};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use owo_colors::{OwoColorize, Style};
use parity_metadata::ParityExitCode;
use parity_runner::{
    compare::{Bucket, CompareResult, TestResults, classify},
    config::{DefaultConfigWarnings, ExpectationSet, ProjectConfig},
    runner::{ResultsFile, Runner},
    stats::StatsCheck,
};
use std::io::Write;
use swrite::{SWrite, swrite};
use tracing::{debug, info};

/// Compares database compatibility test results against expectations.
///
/// Expectations are declared per backend in a YAML config file. Results are read from a JSON file
/// written by the tool that ran the tests.
#[derive(Debug, Parser)]
#[command(
    version,
    name = "parity",
    styles = crate::output::clap_styles::style(),
    max_term_width = 100,
)]
pub struct ParityApp {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(subcommand)]
    command: Command,
}

impl ParityApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app.
    ///
    /// Returns the exit code.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        match self.command {
            Command::Compare(opts) => opts.exec(output, output_writer),
            Command::ShowConfig(opts) => opts.exec(output_writer),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify test results against a backend's expectations
    ///
    /// Exits with a non-zero code if any test passed, skipped or failed unexpectedly, if any test
    /// had an unknown status, or if the counts differ from the declared stats.
    Compare(CompareOpts),

    /// Print the merged expectations for a backend as YAML
    ShowConfig(ShowConfigOpts),
}

#[derive(Debug, Args)]
struct ConfigOpts {
    /// Path to the project config file
    #[arg(long, value_name = "PATH")]
    config: Utf8PathBuf,

    /// Backend to load expectations for
    #[arg(long, short, env = "PARITY_BACKEND")]
    backend: String,
}

impl ConfigOpts {
    fn load(&self) -> Result<ProjectConfig> {
        Ok(ProjectConfig::from_path(
            &self.config,
            &mut DefaultConfigWarnings,
        )?)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum MessageFormat {
    /// Human-readable output
    #[default]
    Human,
    /// The full comparison as JSON
    Json,
}

#[derive(Debug, Args)]
struct CompareOpts {
    #[clap(flatten)]
    config: ConfigOpts,

    /// Path to a JSON file of actual test results
    #[arg(long, value_name = "PATH")]
    results: Utf8PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t, value_name = "FORMAT")]
    message_format: MessageFormat,
}

impl CompareOpts {
    fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        let config = self.config.load()?;
        let backend = &self.config.backend;
        let expectations = config.expectations_for(backend)?;

        let results = ResultsFile::new(&self.results).run()?;
        let compare = classify(expectations, &results)?;

        let mut writer = output_writer.stdout_writer();
        match self.message_format {
            MessageFormat::Human => {
                log_buckets(&compare, output.verbose, &output.stderr_styles());
                write_counts(&compare, &mut writer)?;
            }
            MessageFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, &compare)
                    .map_err(ExpectedError::json_serialize_error)?;
                writeln!(writer).map_err(ExpectedError::write_output_error)?;
            }
        }
        writer.flush().map_err(ExpectedError::write_output_error)?;

        check_stats(backend, expectations, &compare)?;

        let pass_rate = compare.pass_rate();
        info!("{pass_rate}");
        // Make the pass rate more visible on GitHub Actions. JSON output stays parseable.
        if output.github_actions && self.message_format == MessageFormat::Human {
            writeln!(writer, "::notice::{pass_rate}")
                .and_then(|()| writer.flush())
                .map_err(ExpectedError::write_output_error)?;
        }

        check_unexpected(backend, &compare)?;

        Ok(ParityExitCode::OK)
    }
}

/// The order buckets are listed in: the ones needing attention first.
const REPORT_ORDER: [Bucket; 7] = [
    Bucket::UnexpectedFail,
    Bucket::UnexpectedSkip,
    Bucket::UnexpectedPass,
    Bucket::ExpectedFail,
    Bucket::ExpectedSkip,
    Bucket::ExpectedPass,
    Bucket::Unknown,
];

fn bucket_style(bucket: Bucket, styles: &StderrStyles) -> Style {
    match bucket {
        Bucket::ExpectedPass | Bucket::ExpectedSkip | Bucket::ExpectedFail => styles.pass,
        Bucket::UnexpectedSkip => styles.skip,
        Bucket::UnexpectedPass | Bucket::UnexpectedFail | Bucket::Unknown => styles.fail,
    }
}

fn log_buckets(compare: &CompareResult, verbose: bool, styles: &StderrStyles) {
    for bucket in REPORT_ORDER {
        if !bucket.is_unexpected() && !verbose {
            continue;
        }
        log_bucket(bucket, compare.bucket(bucket), styles);
    }
}

fn log_bucket(bucket: Bucket, results: &TestResults, styles: &StderrStyles) {
    if results.is_empty() {
        return;
    }

    info!("{} tests:", bucket.label().style(bucket_style(bucket, styles)));
    for (name, result) in results {
        info!(
            target: NO_HEADING,
            "{}:\n\t{}",
            name.style(styles.bold),
            result.indented_output()
        );
    }
}

fn write_counts(compare: &CompareResult, writer: &mut impl Write) -> Result<()> {
    let mut counts = String::new();
    for bucket in REPORT_ORDER {
        swrite!(counts, "{}: {}.\n", bucket.label(), compare.stats.get(bucket));
    }
    writer
        .write_all(counts.as_bytes())
        .map_err(ExpectedError::write_output_error)
}

/// Fails if the computed stats differ from the declared ones.
///
/// Checked before unexpected results, so a stats mismatch takes precedence.
fn check_stats(
    backend: &str,
    expectations: &ExpectationSet,
    compare: &CompareResult,
) -> Result<()> {
    let Some(declared) = expectations.stats() else {
        return Ok(());
    };

    let check = StatsCheck::new(declared, &compare.stats);
    debug!(
        "checked stats for `{backend}`: {} mismatch(es)",
        check.mismatches().len()
    );
    if check.is_match() {
        Ok(())
    } else {
        Err(ExpectedError::StatsMismatch {
            backend: backend.to_owned(),
            mismatches: check.mismatches().to_vec(),
        })
    }
}

fn check_unexpected(backend: &str, compare: &CompareResult) -> Result<()> {
    if !compare.has_unexpected() {
        return Ok(());
    }

    let count = Bucket::ALL
        .into_iter()
        .filter(|bucket| bucket.is_unexpected())
        .map(|bucket| compare.stats.get(bucket))
        .sum::<usize>();
    Err(ExpectedError::UnexpectedResults {
        backend: backend.to_owned(),
        count,
    })
}

#[derive(Debug, Args)]
struct ShowConfigOpts {
    #[clap(flatten)]
    config: ConfigOpts,
}

impl ShowConfigOpts {
    fn exec(self, output_writer: &mut OutputWriter) -> Result<i32> {
        let config = self.config.load()?;
        let expectations = config.expectations_for(&self.config.backend)?;

        let yaml =
            serde_yaml::to_string(expectations).map_err(ExpectedError::yaml_serialize_error)?;
        let mut writer = output_writer.stdout_writer();
        writer
            .write_all(yaml.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(ExpectedError::write_output_error)?;

        Ok(ParityExitCode::OK)
    }
}
