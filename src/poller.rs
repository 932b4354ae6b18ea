//! Job completion polling.
//!
//! [`PollConfig`] fixes the interval and the attempt budget; there is no
//! backoff and no jitter. [`wait_for_completion`] sleeps, queries, and
//! repeats until the job reports `COMPLETED` or the budget runs out.
//!
//! A failing status query is returned immediately and is distinct from a
//! timeout. With [`PollConfig::fail_fast`] enabled (the default) a job that
//! reports `FAILED` or `STOPPED` ends polling at once with
//! [`HuginnError::JobFailed`](crate::HuginnError::JobFailed); disabled, such
//! a job is polled until the budget is spent and reported as a timeout.

use std::io::Write;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::providers::EntityJobService;
use crate::telemetry;
use crate::types::{JobHandle, JobProperties, JobStatus};
use crate::{HuginnError, Result};

/// Configuration for job status polling.
///
/// ```rust
/// # use huginn::PollConfig;
/// # use std::time::Duration;
/// let config = PollConfig::new()
///     .interval(Duration::from_secs(5))
///     .max_attempts(20);
/// assert_eq!(config.max_attempts, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Wait before each status query. Default: 10s.
    pub interval: Duration,
    /// Maximum number of status queries. Default: 100.
    pub max_attempts: u32,
    /// Stop as soon as the job reports a failed terminal status.
    /// Default: true.
    pub fail_fast: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 100,
            fail_fast: true,
        }
    }
}

impl PollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wait before each status query.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the maximum number of status queries.
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Enable or disable early exit on failed jobs.
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Upper bound on how long polling can take.
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

/// Poll `job` until it completes.
///
/// Each attempt writes `In Progress...` to `out`, sleeps for the configured
/// interval, then issues one status query. Returns the properties from the
/// query that observed `COMPLETED`.
pub async fn wait_for_completion<W: Write>(
    service: &dyn EntityJobService,
    job: &JobHandle,
    config: &PollConfig,
    out: &mut W,
) -> Result<JobProperties> {
    let mut last_status: Option<JobStatus> = None;

    for attempt in 1..=config.max_attempts {
        writeln!(out, "In Progress...").map_err(HuginnError::Report)?;
        tokio::time::sleep(config.interval).await;

        let props = match service.describe_job(job).await {
            Ok(props) => props,
            Err(e) => {
                metrics::counter!(telemetry::POLLS_TOTAL, "status" => "error").increment(1);
                warn!(job_id = %job, attempt, error = %e, "status query failed");
                return Err(e);
            }
        };
        metrics::counter!(telemetry::POLLS_TOTAL, "status" => props.status.as_str().to_owned())
            .increment(1);
        debug!(job_id = %job, attempt, status = %props.status, "job status");

        if props.status == JobStatus::Completed {
            writeln!(out, "Job Completed.").map_err(HuginnError::Report)?;
            info!(job_id = %job, attempts = attempt, "job completed");
            return Ok(props);
        }

        if config.fail_fast && props.status.is_failure() {
            warn!(job_id = %job, status = %props.status, "job ended without completing");
            return Err(HuginnError::JobFailed {
                job_id: job.job_id.clone(),
                status: props.status.to_string(),
                message: props.message,
            });
        }

        last_status = Some(props.status);
    }

    writeln!(out, "Job Timeout.").map_err(HuginnError::Report)?;
    Err(HuginnError::JobTimeout {
        job_id: job.job_id.clone(),
        attempts: config.max_attempts,
        last_status: last_status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "never checked".to_string()),
    })
}
