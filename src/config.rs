//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.huginn/config.toml` (user)
//! 3. `/etc/huginn/config.toml` (system)
//!
//! Unlike the path given on the command line, the user and system files
//! are optional: when neither exists every setting takes its default. The
//! data access role has no default and must come from the file or from the
//! command line.
//!
//! Values given on the command line are layered on top with
//! [`Config::apply_overrides`]; an unset override keeps the file value.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::archive::RESULT_ENTRY_NAME;
use crate::poller::PollConfig;
use crate::results::DEFAULT_LINE_LIMIT;
use crate::types::InputFormat;
use crate::workflow::{
    DEFAULT_JOB_NAME, DEFAULT_LANGUAGE, DEFAULT_LIMIT, DEFAULT_PREFIX, WorkflowConfig,
};
use crate::{HuginnError, Result};

/// Environment variable consulted for the data access role ARN by the CLI.
pub const ROLE_ARN_ENV: &str = "HUGINN_ROLE_ARN";

/// Default bucket name.
pub const DEFAULT_BUCKET: &str = "testcomprehend-tn";

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bucket for input and output objects (default: testcomprehend-tn).
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Key prefix (default: comprehend/).
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Entities printed per document (default: 20).
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub job: JobConfig,
    #[serde(default)]
    pub poll: PollSettings,
    #[serde(default)]
    pub results: ResultsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            prefix: default_prefix(),
            limit: default_limit(),
            job: JobConfig::default(),
            poll: PollSettings::default(),
            results: ResultsConfig::default(),
        }
    }
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Detection job settings.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Job name (default: sample-entities-detection-job).
    #[serde(default = "default_job_name")]
    pub name: String,
    /// Language code of the input (default: ja).
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub input_format: InputFormat,
    /// IAM role ARN the service assumes. No default.
    #[serde(default)]
    pub role_arn: Option<String>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            name: default_job_name(),
            language: default_language(),
            input_format: InputFormat::default(),
            role_arn: None,
        }
    }
}

fn default_job_name() -> String {
    DEFAULT_JOB_NAME.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Polling settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PollSettings {
    /// Seconds between status queries (default: 10).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Maximum status queries (default: 100).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Stop at once when the job fails (default: true).
    #[serde(default = "default_fail_fast")]
    pub fail_fast: bool,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_attempts: default_max_attempts(),
            fail_fast: default_fail_fast(),
        }
    }
}

fn default_interval_secs() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    100
}

fn default_fail_fast() -> bool {
    true
}

impl From<&PollSettings> for PollConfig {
    fn from(settings: &PollSettings) -> Self {
        PollConfig::new()
            .interval(Duration::from_secs(settings.interval_secs))
            .max_attempts(settings.max_attempts)
            .fail_fast(settings.fail_fast)
    }
}

/// Result archive settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultsConfig {
    /// Archive member holding the results (default: output).
    #[serde(default = "default_entry_name")]
    pub entry_name: String,
    /// Longest accepted result line in bytes (default: 1 MiB).
    #[serde(default = "default_line_limit")]
    pub line_limit: usize,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            entry_name: default_entry_name(),
            line_limit: default_line_limit(),
        }
    }
}

fn default_entry_name() -> String {
    RESULT_ENTRY_NAME.to_string()
}

fn default_line_limit() -> usize {
    DEFAULT_LINE_LIMIT
}

/// Command-line values that take precedence over the configuration file.
///
/// `None` leaves the loaded value untouched. The CLI fills `role_arn` from
/// `--role-arn` or, failing that, from [`ROLE_ARN_ENV`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bucket: Option<String>,
    pub prefix: Option<String>,
    pub limit: Option<usize>,
    pub role_arn: Option<String>,
    pub language: Option<String>,
    pub job_name: Option<String>,
    pub interval_secs: Option<u64>,
    pub max_attempts: Option<u32>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.huginn/config.toml`
    /// 3. `/etc/huginn/config.toml`
    ///
    /// Falls back to defaults when no implicit file exists.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            HuginnError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(HuginnError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".huginn").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/huginn/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Layer command-line values over the loaded configuration.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        let Overrides {
            bucket,
            prefix,
            limit,
            role_arn,
            language,
            job_name,
            interval_secs,
            max_attempts,
        } = overrides;

        if let Some(bucket) = bucket {
            self.bucket = bucket;
        }
        if let Some(prefix) = prefix {
            self.prefix = prefix;
        }
        if let Some(limit) = limit {
            self.limit = limit;
        }
        if role_arn.is_some() {
            self.job.role_arn = role_arn;
        }
        if let Some(language) = language {
            self.job.language = language;
        }
        if let Some(name) = job_name {
            self.job.name = name;
        }
        if let Some(secs) = interval_secs {
            self.poll.interval_secs = secs;
        }
        if let Some(n) = max_attempts {
            self.poll.max_attempts = n;
        }
    }

    /// Build the workflow configuration, requiring a role ARN.
    pub fn workflow_config(&self) -> Result<WorkflowConfig> {
        let role_arn = self
            .job
            .role_arn
            .clone()
            .filter(|arn| !arn.trim().is_empty())
            .ok_or_else(|| {
                HuginnError::Configuration(format!(
                    "data access role ARN is required (set --role-arn, {ROLE_ARN_ENV}, or job.role_arn)"
                ))
            })?;

        let config = WorkflowConfig {
            prefix: self.prefix.clone(),
            limit: self.limit,
            job_name: self.job.name.clone(),
            language_code: self.job.language.clone(),
            input_format: self.job.input_format,
            poll: PollConfig::from(&self.poll),
            result_entry: self.results.entry_name.clone(),
            line_limit: self.results.line_limit,
            ..WorkflowConfig::new(&self.bucket, role_arn)
        };
        config.validate()?;
        Ok(config)
    }
}
