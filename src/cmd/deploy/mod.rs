// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deploy command: the whole run from validation to summary.
//!
//! ```text
//! validate target (+ placements unless dry) --> token --> list_repositories
//!     --> select (lineage) --> audit files --> [dry: stop]
//!     --> ctrl+c / confirmation gate --> process_all --> stats --> summary
//! ```


use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::Local;
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::deploy::DeployArgs;
use crate::config::Config;
use crate::config::types::FileSpec;
use crate::error::{ConfigError, Result};
use crate::fleet::audit::{write_audit, write_summary};
use crate::fleet::mutator::{MutatorSettings, PushGate, RepositoryMutator};
use crate::fleet::placement::validate_all;
use crate::fleet::pool::WorkerPool;
use crate::fleet::processor::FleetProcessor;
use crate::fleet::selector::select;
use crate::fleet::stats::FleetStatistics;
use crate::git::ShellBackend;
use crate::github::DirectoryClient;

/// Files given on the command line replace the configured ones.
pub(crate) fn resolve_files<'a>(args: &'a DeployArgs, config: &'a Config) -> &'a [FileSpec] {
    if args.files.is_empty() {
        &config.deploy.files
    } else {
        &args.files
    }
}

/// Token from `--github-token`/`GITHUB_TOKEN`, then `github.token`.
pub(crate) fn resolve_token(
    args: &DeployArgs,
    config: &Config,
) -> std::result::Result<String, ConfigError> {
    args.github_token
        .as_deref()
        .or(config.github.token.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| ConfigError::MissingKey {
            section: "github".to_string(),
            key: "token".to_string(),
        })
}

async fn confirm(count: usize) -> Result<bool> {
    let prompt = format!("Deploy to {count} repositories?");
    let answer = tokio::task::spawn_blocking(move || {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
    })
    .await
    .context("confirmation prompt aborted")?;
    // A prompt that cannot be shown (no terminal) counts as "no".
    Ok(answer.unwrap_or(false))
}

fn print_kept(names: &[String]) {
    println!("Repositories to process ({}):", names.len());
    for name in names {
        println!("  {name}");
    }
}

/// Main handler for the deploy command.
///
/// # Errors
///
/// Returns an error for invalid configuration or placements, a missing token,
/// a failed or empty discovery outside dry-run, or report files that cannot be
/// written. Per-repository failures never end up here.
pub async fn run_deploy_command(args: &DeployArgs, config: &Config) -> Result<()> {
    config.require_target()?;
    let dry_run = config.global.dry;
    let placements = if dry_run {
        Vec::new()
    } else {
        validate_all(resolve_files(args, config))?
    };
    let token = resolve_token(args, config)?;

    let client = Arc::new(DirectoryClient::new(&config.github, token.clone())?);

    let cancel_token = CancellationToken::new();
    let watcher = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, stopping before dispatch...");
            watcher.cancel();
        }
    });

    let candidates = client
        .list_repositories(
            &config.github.org,
            &config.cohort.prefix,
            &config.cohort.marker,
            config.global.debug,
        )
        .await
        .with_context(|| format!("failed to list repositories of {}", config.github.org))?;

    if candidates.is_empty() {
        if dry_run {
            info!(org = %config.github.org, "no matching repositories, nothing to do");
            return Ok(());
        }
        bail!(
            "no repositories matching prefix '{}' found in {}",
            config.cohort.prefix,
            config.github.org
        );
    }

    let pool = WorkerPool::new(config.run.workers);
    let selection = select(
        Arc::clone(&client),
        candidates,
        &config.cohort.effective_patterns(),
        &pool,
    )
    .await;

    let now = Local::now();
    let audit = write_audit(
        &config.run.report_dir,
        &selection.kept,
        &selection.excluded,
        &now,
    )
    .context("failed to write audit files")?;
    println!("Included repositories written to {}", audit.included.display());
    println!("Excluded repositories written to {}", audit.excluded.display());

    let kept_names: Vec<String> = selection.kept.iter().map(|r| r.full_name.clone()).collect();
    print_kept(&kept_names);

    if dry_run {
        info!(kept = kept_names.len(), "dry run, stopping before mutation");
        return Ok(());
    }
    if selection.kept.is_empty() {
        warn!("no repository passed the lineage filter");
        return Ok(());
    }

    if cancel_token.is_cancelled() {
        warn!("cancelled, nothing was mutated");
        return Ok(());
    }
    if !(args.yes || config.run.assume_yes) && !confirm(kept_names.len()).await? {
        info!("deployment cancelled at confirmation");
        return Ok(());
    }
    if cancel_token.is_cancelled() {
        warn!("cancelled, nothing was mutated");
        return Ok(());
    }

    let run_dir = match &config.run.work_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            tempfile::Builder::new().prefix("fleet-run-").tempdir_in(dir)
        }
        None => tempfile::Builder::new().prefix("fleet-run-").tempdir(),
    }
    .context("failed to create work directory")?;

    let backend = ShellBackend::builder()
        .git(ShellBackend::locate_git()?)
        .author_name(config.deploy.author_name.clone())
        .author_email(config.deploy.author_email.clone())
        .token(token)
        .low_speed_time(config.github.timeout_secs)
        .build();

    let settings = MutatorSettings::builder()
        .commit_message(
            args.message
                .clone()
                .unwrap_or_else(|| config.deploy.commit_message.clone()),
        )
        .max_attempts(config.run.max_attempts)
        .retry_base(config.run.retry_base())
        .work_root(run_dir.path())
        .build();
    let mutator = RepositoryMutator::new(backend, placements, settings, PushGate::new());
    let processor = FleetProcessor::new(client, Arc::new(mutator), pool);

    info!(repos = selection.kept.len(), "starting deployment");
    let outcomes = processor.process_all(selection.kept).await;

    let stats = FleetStatistics::from_outcomes(&outcomes);
    let report = stats.render();
    info!(
        total = stats.total,
        successful = stats.successful,
        failed = stats.failed,
        retries = stats.total_retries,
        "deployment finished"
    );
    println!("\n{report}");

    let summary = write_summary(&config.run.report_dir, &report, &Local::now())
        .context("failed to write summary")?;
    println!("Summary written to {}", summary.display());
    Ok(())
}
