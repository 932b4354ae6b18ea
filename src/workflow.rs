//! The upload → detect → poll → fetch → report pipeline.
//!
//! [`Workflow::run`] executes each stage once, in order, and stops at the
//! first error. Console output (the progress and result lines) goes to the
//! writer passed in; diagnostics go through `tracing`.

use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::archive::{self, RESULT_ENTRY_NAME};
use crate::config::ROLE_ARN_ENV;
use crate::error::Stage;
use crate::poller::{self, PollConfig};
use crate::providers::{EntityJobService, ObjectStore};
use crate::results::{self, DEFAULT_LINE_LIMIT};
use crate::telemetry;
use crate::types::{EntitiesJobRequest, InputFormat, S3Location};
use crate::{HuginnError, Result};

/// Default job name.
pub const DEFAULT_JOB_NAME: &str = "sample-entities-detection-job";

/// Default language code of the input text.
pub const DEFAULT_LANGUAGE: &str = "ja";

/// Default key prefix for input and output objects.
pub const DEFAULT_PREFIX: &str = "comprehend/";

/// Default number of entities printed per document.
pub const DEFAULT_LIMIT: usize = 20;

/// Everything a run needs besides the service clients.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowConfig {
    /// Bucket for the input object and the result archive.
    pub bucket: String,
    /// Key prefix; input goes under `<prefix>input/`, output under `<prefix>output/`.
    pub prefix: String,
    /// Entities printed per document.
    pub limit: usize,
    pub job_name: String,
    pub language_code: String,
    pub input_format: InputFormat,
    /// IAM role the detection service assumes. Required.
    pub data_access_role_arn: String,
    pub poll: PollConfig,
    /// Archive member holding the results.
    pub result_entry: String,
    /// Longest accepted result line, in bytes.
    pub line_limit: usize,
}

impl WorkflowConfig {
    /// Create a config with defaults for everything but the bucket and role.
    pub fn new(bucket: impl Into<String>, data_access_role_arn: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            limit: DEFAULT_LIMIT,
            job_name: DEFAULT_JOB_NAME.to_string(),
            language_code: DEFAULT_LANGUAGE.to_string(),
            input_format: InputFormat::default(),
            data_access_role_arn: data_access_role_arn.into(),
            poll: PollConfig::default(),
            result_entry: RESULT_ENTRY_NAME.to_string(),
            line_limit: DEFAULT_LINE_LIMIT,
        }
    }

    /// Check the fields that have no usable default.
    pub fn validate(&self) -> Result<()> {
        if self.bucket.is_empty() {
            return Err(HuginnError::Configuration("bucket must not be empty".into()));
        }
        if self.data_access_role_arn.trim().is_empty() {
            return Err(HuginnError::Configuration(format!(
                "data access role ARN is required (set --role-arn, {ROLE_ARN_ENV}, or job.role_arn)"
            )));
        }
        if self.result_entry.is_empty() {
            return Err(HuginnError::Configuration(
                "result entry name must not be empty".into(),
            ));
        }
        if self.line_limit == 0 {
            return Err(HuginnError::Configuration(
                "line limit must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Object location the input file is uploaded to: `<prefix>input/<file>`.
    pub fn input_location(&self, file_name: &str) -> S3Location {
        S3Location::new(&self.bucket, format!("{}input/{file_name}", self.prefix))
    }

    /// Prefix URI the job writes its archive under: `s3://<bucket>/<prefix>output/`.
    pub fn output_uri(&self) -> String {
        format!("s3://{}/{}output/", self.bucket, self.prefix)
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub job_id: String,
    pub output_uri: String,
    pub documents: usize,
    pub entities_printed: usize,
}

/// Drives one run against an object store and a job service.
pub struct Workflow {
    store: Arc<dyn ObjectStore>,
    jobs: Arc<dyn EntityJobService>,
    config: WorkflowConfig,
}

impl Workflow {
    /// Create a workflow, rejecting incomplete configuration.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        jobs: Arc<dyn EntityJobService>,
        config: WorkflowConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            jobs,
            config,
        })
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Run every stage for the file at `input`, writing console output to `out`.
    pub async fn run<W: Write>(&self, input: &Path, out: &mut W) -> Result<RunSummary> {
        let config = &self.config;

        // Upload
        let body = timed(Stage::Input, async {
            tokio::fs::read(input)
                .await
                .map_err(|source| HuginnError::ReadInput {
                    path: input.to_path_buf(),
                    source,
                })
        })
        .await?;

        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| HuginnError::ReadInput {
                path: input.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file path"),
            })?;
        let input_location = config.input_location(&file_name);
        say(out, format_args!("Object Name: {}", input_location.key))?;

        info!(store = self.store.name(), location = %input_location, bytes = body.len(), "uploading input");
        timed(Stage::Upload, self.store.put_object(&input_location, body)).await?;

        // Submit
        let request = EntitiesJobRequest {
            job_name: config.job_name.clone(),
            input_uri: input_location.to_string(),
            input_format: config.input_format,
            output_uri: config.output_uri(),
            language_code: config.language_code.clone(),
            data_access_role_arn: config.data_access_role_arn.clone(),
        };
        say(out, format_args!("InputS3URI: {}", request.input_uri))?;
        say(out, format_args!("OutputS3URI: {}", request.output_uri))?;

        let job = timed(Stage::Submit, self.jobs.start_job(&request)).await?;
        say(out, format_args!("Job ID: {job}"))?;
        info!(service = self.jobs.name(), job_id = %job, "job started");

        // Poll
        let props = timed(
            Stage::Poll,
            poller::wait_for_completion(self.jobs.as_ref(), &job, &config.poll, out),
        )
        .await?;

        // Fetch
        let output_uri = props
            .output_uri
            .ok_or_else(|| HuginnError::InvalidOutputUri {
                uri: String::new(),
                reason: "completed job reported no output location".into(),
            })?;
        say(out, format_args!("Output S3 URI: {output_uri}"))?;

        let declared = S3Location::parse(&output_uri)?;
        if declared.bucket != config.bucket {
            warn!(
                declared = %declared.bucket,
                configured = %config.bucket,
                "job output bucket differs from configured bucket; downloading from configured bucket"
            );
        }
        let result_location = S3Location::new(&config.bucket, declared.key);
        say(out, format_args!("Download Object Name: {}", result_location.key))?;

        let archive_bytes = timed(Stage::Fetch, self.store.get_object(&result_location)).await?;
        info!(location = %result_location, bytes = archive_bytes.len(), "result archive downloaded");

        // Extract + report
        let stats = timed(Stage::Extract, async {
            archive::with_entry(archive_bytes.as_slice(), &config.result_entry, |entry| {
                results::write_report(entry, config.limit, config.line_limit, out)
            })?
            .ok_or_else(|| HuginnError::MissingResultEntry {
                name: config.result_entry.clone(),
            })
        })
        .await?;

        info!(
            documents = stats.documents,
            entities = stats.entities_printed,
            "report written"
        );

        Ok(RunSummary {
            job_id: job.job_id,
            output_uri,
            documents: stats.documents,
            entities_printed: stats.entities_printed,
        })
    }
}

fn say<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) -> Result<()> {
    writeln!(out, "{line}").map_err(HuginnError::Report)
}

/// Await a stage and record its duration.
///
/// A failure is labelled with the stage the error belongs to, which can be
/// narrower than `stage` (a decode error surfaces through extraction).
async fn timed<T, F>(stage: Stage, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let start = Instant::now();
    let result = fut.await;
    let (stage, status) = match &result {
        Ok(_) => (stage, "ok"),
        Err(e) => (e.stage(), "error"),
    };
    metrics::histogram!(telemetry::STAGE_DURATION_SECONDS,
        "stage" => stage.as_str(),
        "status" => status,
    )
    .record(start.elapsed().as_secs_f64());
    result
}
