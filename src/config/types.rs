// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for fleet-deploy.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, GitHubConfig, CohortConfig, RunConfig, DeployConfig
//! DeployConfig.files: [[deploy.files]] source + target
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::LogLevel;

/// Global options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Discovery and filtering only, no mutation.
    pub dry: bool,
    /// Diagnostic mode: narrows the listing to the first marker match.
    pub debug: bool,
    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            debug: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Remote hosting API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    /// Organization owning the fleet.
    pub org: String,
    /// API base URL.
    pub api_url: String,
    /// API token. Prefer `GITHUB_TOKEN` over storing it here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Attempts per API call (first try included).
    pub api_attempts: u32,
    /// Base backoff between API attempts, in milliseconds. Doubles each retry.
    pub api_backoff_ms: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            org: String::new(),
            api_url: "https://api.github.com".to_string(),
            token: None,
            timeout_secs: 10,
            api_attempts: 3,
            api_backoff_ms: 1000,
        }
    }
}

impl GitHubConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn api_backoff(&self) -> Duration {
        Duration::from_millis(self.api_backoff_ms)
    }
}

/// Cohort membership rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CohortConfig {
    /// Repository name prefix; names must start with `{prefix}-`.
    pub prefix: String,
    /// Marker string; names containing it are candidates too.
    pub marker: String,
    /// Parent-name patterns for the lineage check. Empty means `[prefix]`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lineage_patterns: Vec<String>,
}

impl CohortConfig {
    /// Patterns used by the lineage filter.
    #[must_use]
    pub fn effective_patterns(&self) -> Vec<String> {
        if self.lineage_patterns.is_empty() {
            vec![self.prefix.clone()]
        } else {
            self.lineage_patterns.clone()
        }
    }
}

/// Worker pool, retry and output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Worker-pool size for filtering, verification and mutation.
    pub workers: usize,
    /// Attempts per repository mutation.
    pub max_attempts: u32,
    /// Base delay between mutation attempts, in milliseconds. Doubles each retry.
    pub retry_base_ms: u64,
    /// Directory holding attempt-scoped clones. Defaults to the system temp dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
    /// Directory receiving audit and summary reports.
    pub report_dir: PathBuf,
    /// Skip the confirmation gate.
    pub assume_yes: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            max_attempts: 3,
            retry_base_ms: 1000,
            work_dir: None,
            report_dir: PathBuf::from("."),
            assume_yes: false,
        }
    }
}

impl RunConfig {
    #[must_use]
    pub const fn retry_base(&self) -> Duration {
        Duration::from_millis(self.retry_base_ms)
    }
}

/// One `[[deploy.files]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSpec {
    /// Local source file.
    pub source: PathBuf,
    /// Repository-relative target directory.
    pub target: String,
}

impl std::str::FromStr for FileSpec {
    type Err = String;

    /// Parses `SOURCE:TARGET`, splitting on the last colon.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (source, target) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected SOURCE:TARGET, got '{s}'"))?;
        if source.is_empty() {
            return Err(format!("missing source in '{s}'"));
        }
        Ok(Self {
            source: PathBuf::from(source),
            target: target.to_string(),
        })
    }
}

/// What gets deployed and how it is committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployConfig {
    /// Commit message; the aggregator marker is appended.
    pub commit_message: String,
    /// Commit author name.
    pub author_name: String,
    /// Commit author email.
    pub author_email: String,
    /// Files to place in every repository.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileSpec>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            commit_message: "Add files".to_string(),
            author_name: "fleet-deploy".to_string(),
            author_email: "fleet-deploy@users.noreply.github.com".to_string(),
            files: Vec::new(),
        }
    }
}
