// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for fleet-deploy.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. fleet.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. FLEET_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! FLEET_GLOBAL__DRY=true            → global.dry = true
//! FLEET_GITHUB__ORG=acme            → github.org = "acme"
//! FLEET_RUN__WORKERS=8              → run.workers = 8
//! FLEET_COHORT__LINEAGE_PATTERNS=a,b → cohort.lineage_patterns = ["a", "b"]
//! ```
//!
//! # Example
//!
//! ```toml
//! [github]
//! org = "IFT2245"
//!
//! [cohort]
//! prefix = "hiver25-tp2-os"
//! marker = "hiver25-tp2-os-staff-test"
//!
//! [[deploy.files]]
//! source = "README.md"
//! target = "."
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{CohortConfig, DeployConfig, GitHubConfig, GlobalConfig, RunConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Remote API settings.
    pub github: GitHubConfig,
    /// Cohort membership rules.
    pub cohort: CohortConfig,
    /// Worker pool and retry settings.
    pub run: RunConfig,
    /// Deployment payload.
    pub deploy: DeployConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fleet_deploy::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file("fleet.toml")
    ///     .with_env_prefix("FLEET")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check values that would make a run meaningless.
    ///
    /// Organization and prefix are only checked by [`Config::require_target`],
    /// since `options` and `version` work without them.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` for a zero worker count or
    /// attempt ceiling.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.run.workers == 0 {
            return Err(invalid("run", "workers", "must be at least 1"));
        }
        if self.run.max_attempts == 0 {
            return Err(invalid("run", "max_attempts", "must be at least 1"));
        }
        if self.github.api_attempts == 0 {
            return Err(invalid("github", "api_attempts", "must be at least 1"));
        }
        Ok(())
    }

    /// Ensure the organization and cohort prefix are set.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` naming the first empty key.
    pub fn require_target(&self) -> std::result::Result<(), ConfigError> {
        if self.github.org.trim().is_empty() {
            return Err(ConfigError::MissingKey {
                section: "github".to_string(),
                key: "org".to_string(),
            });
        }
        if self.cohort.prefix.trim().is_empty() {
            return Err(ConfigError::MissingKey {
                section: "cohort".to_string(),
                key: "prefix".to_string(),
            });
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// The token is never printed; it shows as `[hidden]` when set.
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_github_options(&mut options);
        self.format_cohort_options(&mut options);
        self.format_run_options(&mut options);
        self.format_deploy_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert("global.debug".into(), self.global.debug.to_string());
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        if let Some(log_file) = &self.global.log_file {
            options.insert("global.log_file".into(), log_file.display().to_string());
        }
    }

    fn format_github_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("github.org".into(), self.github.org.clone());
        options.insert("github.api_url".into(), self.github.api_url.clone());
        if self.github.token.is_some() {
            options.insert("github.token".into(), "[hidden]".into());
        }
        options.insert(
            "github.timeout_secs".into(),
            self.github.timeout_secs.to_string(),
        );
        options.insert(
            "github.api_attempts".into(),
            self.github.api_attempts.to_string(),
        );
        options.insert(
            "github.api_backoff_ms".into(),
            self.github.api_backoff_ms.to_string(),
        );
    }

    fn format_cohort_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("cohort.prefix".into(), self.cohort.prefix.clone());
        options.insert("cohort.marker".into(), self.cohort.marker.clone());
        options.insert(
            "cohort.lineage_patterns".into(),
            self.cohort.effective_patterns().join(", "),
        );
    }

    fn format_run_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("run.workers".into(), self.run.workers.to_string());
        options.insert("run.max_attempts".into(), self.run.max_attempts.to_string());
        options.insert(
            "run.retry_base_ms".into(),
            self.run.retry_base_ms.to_string(),
        );
        options.insert(
            "run.work_dir".into(),
            self.run
                .work_dir
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert(
            "run.report_dir".into(),
            self.run.report_dir.display().to_string(),
        );
        options.insert("run.assume_yes".into(), self.run.assume_yes.to_string());
    }

    fn format_deploy_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "deploy.commit_message".into(),
            self.deploy.commit_message.clone(),
        );
        options.insert("deploy.author_name".into(), self.deploy.author_name.clone());
        options.insert(
            "deploy.author_email".into(),
            self.deploy.author_email.clone(),
        );
        for (i, file) in self.deploy.files.iter().enumerate() {
            options.insert(
                format!("deploy.files.{i}"),
                format!("{} -> {}", file.source.display(), file.target),
            );
        }
    }
}

fn invalid(section: &str, key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}
