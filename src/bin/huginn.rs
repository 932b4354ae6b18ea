//! huginn — named-entity extraction CLI
//!
//! Uploads a file, runs an entities detection job on it, and prints the
//! top entities of each result document.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use huginn::config::{Config, Overrides, ROLE_ARN_ENV};
use huginn::providers::{ComprehendJobs, S3Store};
use huginn::{HuginnError, Workflow};

/// Detect named entities in a file with Amazon Comprehend.
#[derive(Parser)]
#[command(name = "huginn")]
#[command(version = huginn::PKG_VERSION, long_version = huginn::long_version())]
#[command(about = "Detect named entities in a file with Amazon Comprehend")]
struct Args {
    /// Bucket to put the content on [default: testcomprehend-tn]
    #[arg(long)]
    bucket: Option<String>,

    /// Prefix to store the content under [default: comprehend/]
    #[arg(long)]
    prefix: Option<String>,

    /// The content file
    #[arg(long, default_value = "content.txt")]
    file: PathBuf,

    /// Number of entities to display per document [default: 20]
    #[arg(long)]
    limit: Option<usize>,

    /// IAM role ARN the detection job assumes
    #[arg(long, env = ROLE_ARN_ENV)]
    role_arn: Option<String>,

    /// Language code of the content [default: ja]
    #[arg(long)]
    language: Option<String>,

    /// Name given to the detection job
    #[arg(long)]
    job_name: Option<String>,

    /// Seconds between job status checks [default: 10]
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Maximum job status checks before giving up [default: 100]
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Args {
    /// Flags the user actually passed; these win over the configuration file.
    fn overrides(&self) -> Overrides {
        Overrides {
            bucket: self.bucket.clone(),
            prefix: self.prefix.clone(),
            limit: self.limit,
            role_arn: self.role_arn.clone(),
            language: self.language.clone(),
            job_name: self.job_name.clone(),
            interval_secs: self.interval_secs,
            max_attempts: self.max_attempts,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the report (default: warn; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(stage = %e.stage(), error = %e, "run failed");
            eprintln!("{} failed: {e}", e.stage());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: Args) -> huginn::Result<()> {
    let mut config = Config::load(args.config.as_deref())?;
    config.apply_overrides(args.overrides());
    let workflow_config = config.workflow_config()?;

    let mut out = io::stdout();
    writeln!(out, "START!!!!").map_err(HuginnError::Report)?;
    writeln!(out, "Bucket: {}", workflow_config.bucket).map_err(HuginnError::Report)?;
    writeln!(out, "Prefix: {}", workflow_config.prefix).map_err(HuginnError::Report)?;
    writeln!(out, "Limit: {}", workflow_config.limit).map_err(HuginnError::Report)?;
    writeln!(out, "File: {}", args.file.display()).map_err(HuginnError::Report)?;

    info!(
        version = %huginn::version_string(),
        budget_secs = workflow_config.poll.budget().as_secs(),
        "huginn starting"
    );

    let sdk = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let workflow = Workflow::new(
        Arc::new(S3Store::from_sdk_config(&sdk)),
        Arc::new(ComprehendJobs::from_sdk_config(&sdk)),
        workflow_config,
    )?;

    let summary = workflow.run(&args.file, &mut out).await?;
    info!(
        job_id = %summary.job_id,
        documents = summary.documents,
        entities = summary.entities_printed,
        "run finished"
    );

    writeln!(out).map_err(HuginnError::Report)?;
    writeln!(out).map_err(HuginnError::Report)?;
    writeln!(out, "END!!!!").map_err(HuginnError::Report)?;
    out.flush().map_err(HuginnError::Report)?;
    Ok(())
}
