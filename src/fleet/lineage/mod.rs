// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Cohort membership by fork lineage.


use tracing::trace;

use crate::error::FleetResult;
use crate::github::{DetailSource, RepositoryDescriptor, RepositoryDetail};

/// True when the repository is a fork whose parent's full name contains any
/// pattern, compared case-insensitively.
#[must_use]
pub fn matches_lineage(detail: &RepositoryDetail, patterns: &[String]) -> bool {
    if !detail.fork {
        return false;
    }
    let Some(parent) = detail.parent.as_deref() else {
        return false;
    };
    let parent = parent.to_lowercase();
    patterns
        .iter()
        .filter(|p| !p.is_empty())
        .any(|p| parent.contains(&p.to_lowercase()))
}

/// Fetch the repository's detail and apply [`matches_lineage`].
///
/// # Errors
///
/// Returns the detail fetch error; the caller decides how to record it.
pub async fn is_descendant_of_cohort<D>(
    source: &D,
    repo: &RepositoryDescriptor,
    patterns: &[String],
) -> FleetResult<bool>
where
    D: DetailSource + ?Sized,
{
    let detail = source.repository_detail(&repo.full_name).await?;
    let keep = matches_lineage(&detail, patterns);
    trace!(
        repo = %repo.full_name,
        fork = detail.fork,
        parent = detail.parent.as_deref().unwrap_or("N/A"),
        keep,
        "lineage checked"
    );
    Ok(keep)
}
