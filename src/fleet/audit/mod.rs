// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Flat report files written into the report directory.
//!
//! ```text
//! included_repos_20250114_093000.txt     excluded_repos_20250114_093000.txt
//!   # Included Repositories                # Excluded Repositories
//!   # Generated: 2025-01-14T09:30:00+01:00
//!   # Format: full_name,created_at,updated_at,parent_name
//!
//!   org/cohort-1,2025-01-10T12:00:00Z,2025-01-11T08:30:00Z,org/template
//!   org/cohort-2,,,N/A
//!
//! summary_20250114_093000.txt            rendered FleetStatistics
//! ```


use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::error::FleetResult;
use crate::github::RepositoryDescriptor;

const FORMAT_LINE: &str = "# Format: full_name,created_at,updated_at,parent_name";

/// Paths of the two audit files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditFiles {
    pub included: PathBuf,
    pub excluded: PathBuf,
}

/// `YYYYmmdd_HHMMSS` suffix shared by all report files of a run.
#[must_use]
pub fn timestamp_suffix(now: &DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// One audit line: `full_name,created_at,updated_at,parent_or_N/A`.
#[must_use]
pub fn audit_line(repo: &RepositoryDescriptor) -> String {
    format!(
        "{},{},{},{}",
        repo.full_name,
        repo.created_at.as_deref().unwrap_or_default(),
        repo.updated_at.as_deref().unwrap_or_default(),
        repo.parent_name().unwrap_or("N/A")
    )
}

fn render_audit(title: &str, repos: &[RepositoryDescriptor], now: &DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {title}");
    let _ = writeln!(out, "# Generated: {}", now.to_rfc3339());
    let _ = writeln!(out, "{FORMAT_LINE}");
    out.push('\n');
    for repo in repos {
        out.push_str(&audit_line(repo));
        out.push('\n');
    }
    out
}

/// Write the included and excluded audit files into `dir`.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created or a file cannot
/// be written.
pub fn write_audit(
    dir: &Path,
    kept: &[RepositoryDescriptor],
    excluded: &[RepositoryDescriptor],
    now: &DateTime<Local>,
) -> FleetResult<AuditFiles> {
    fs::create_dir_all(dir)?;
    let stamp = timestamp_suffix(now);

    let included = dir.join(format!("included_repos_{stamp}.txt"));
    fs::write(&included, render_audit("Included Repositories", kept, now))?;

    let excluded_path = dir.join(format!("excluded_repos_{stamp}.txt"));
    fs::write(
        &excluded_path,
        render_audit("Excluded Repositories", excluded, now),
    )?;

    info!(
        included = %included.display(),
        excluded = %excluded_path.display(),
        "audit files written"
    );
    Ok(AuditFiles {
        included,
        excluded: excluded_path,
    })
}

/// Write a rendered summary report as `summary_{stamp}.txt`.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn write_summary(dir: &Path, report: &str, now: &DateTime<Local>) -> FleetResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("summary_{}.txt", timestamp_suffix(now)));
    fs::write(&path, report)?;
    info!(path = %path.display(), "summary written");
    Ok(path)
}
