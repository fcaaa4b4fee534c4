// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Partition candidates into kept and excluded by fork lineage.
//!
//! ```text
//! candidates[0..n] --pool--> is_descendant_of_cohort (completion order)
//!                                   |
//!      decisions[i] = Ok(true)  --> kept
//!                     Ok(false) --> excluded
//!                     Err / lost--> excluded + logged
//!      (iterated in candidate order)
//! ```


use std::sync::Arc;

use tracing::{info, warn};

use crate::fleet::lineage::is_descendant_of_cohort;
use crate::fleet::pool::WorkerPool;
use crate::github::{DetailSource, RepositoryDescriptor};

/// A lookup that failed during filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    pub full_name: String,
    pub message: String,
}

/// Result of the filtering pass. Every candidate lands in exactly one of
/// `kept` or `excluded`, in candidate order.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub kept: Vec<RepositoryDescriptor>,
    pub excluded: Vec<RepositoryDescriptor>,
    pub errors: Vec<LookupFailure>,
}

/// Run the lineage filter over `candidates` on `pool`.
pub async fn select<D>(
    source: Arc<D>,
    candidates: Vec<RepositoryDescriptor>,
    patterns: &[String],
    pool: &WorkerPool,
) -> Selection
where
    D: DetailSource + ?Sized + 'static,
{
    let patterns: Arc<[String]> = patterns.into();
    let results = pool
        .run("filtering", candidates.clone(), move |repo| {
            let source = Arc::clone(&source);
            let patterns = Arc::clone(&patterns);
            async move { is_descendant_of_cohort(source.as_ref(), &repo, &patterns).await }
        })
        .await;

    let mut decisions: Vec<Option<Result<bool, String>>> = vec![None; candidates.len()];
    for (index, result) in results {
        if let Some(slot) = decisions.get_mut(index) {
            *slot = result.map(|r| r.map_err(|e| e.to_string()));
        }
    }

    let mut selection = Selection::default();
    for (repo, decision) in candidates.into_iter().zip(decisions) {
        match decision {
            Some(Ok(true)) => selection.kept.push(repo),
            Some(Ok(false)) => selection.excluded.push(repo),
            Some(Err(message)) => {
                warn!(repo = %repo.full_name, error = %message, "lineage lookup failed, excluding");
                selection.errors.push(LookupFailure {
                    full_name: repo.full_name.clone(),
                    message,
                });
                selection.excluded.push(repo);
            }
            None => {
                warn!(repo = %repo.full_name, "lineage lookup lost, excluding");
                selection.errors.push(LookupFailure {
                    full_name: repo.full_name.clone(),
                    message: "lookup did not complete".to_string(),
                });
                selection.excluded.push(repo);
            }
        }
    }

    info!(
        kept = selection.kept.len(),
        excluded = selection.excluded.len(),
        errors = selection.errors.len(),
        "filtering finished"
    );
    selection
}
