// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Drives the mutator across the kept set.
//!
//! ```text
//! kept --pool--> repository_detail
//!                  | can_push = false --> outcome "No push access"
//!                  | Err(e)           --> outcome "Verification failed: e"
//!                  v
//!             accessible --pool--> spawn_blocking(mutate) --(index, outcome)--> outcomes
//! ```


use std::sync::Arc;

use tracing::{error, info, warn};

use crate::fleet::mutator::RepositoryMutator;
use crate::fleet::outcome::{ErrorKind, MutationOutcome};
use crate::fleet::pool::{WorkerPool, panic_message};
use crate::git::VersionControl;
use crate::github::{DetailSource, RepositoryDescriptor};

/// Push-permission check result for one repository.
enum Access {
    Granted(RepositoryDescriptor),
    Denied(MutationOutcome),
}

pub struct FleetProcessor<D: ?Sized, V> {
    source: Arc<D>,
    mutator: Arc<RepositoryMutator<V>>,
    pool: WorkerPool,
}

impl<D, V> FleetProcessor<D, V>
where
    D: DetailSource + ?Sized + 'static,
    V: VersionControl + 'static,
{
    #[must_use]
    pub const fn new(source: Arc<D>, mutator: Arc<RepositoryMutator<V>>, pool: WorkerPool) -> Self {
        Self {
            source,
            mutator,
            pool,
        }
    }

    /// Verify push access, then mutate every accessible repository.
    ///
    /// Returns one outcome per input repository: rejected ones first, then
    /// mutated ones in input order.
    pub async fn process_all(&self, repos: Vec<RepositoryDescriptor>) -> Vec<MutationOutcome> {
        let (accessible, mut outcomes) = self.verify(repos).await;

        if accessible.is_empty() {
            warn!("no repository is accessible, nothing to mutate");
            return outcomes;
        }
        info!(
            accessible = accessible.len(),
            denied = outcomes.len(),
            "verification finished"
        );

        outcomes.extend(self.mutate_all(accessible).await);
        outcomes
    }

    async fn verify(
        &self,
        repos: Vec<RepositoryDescriptor>,
    ) -> (Vec<RepositoryDescriptor>, Vec<MutationOutcome>) {
        let names: Vec<String> = repos.iter().map(|r| r.name.clone()).collect();
        let source = Arc::clone(&self.source);
        let results = self
            .pool
            .run("verifying", repos, move |repo| {
                let source = Arc::clone(&source);
                async move {
                    match source.repository_detail(&repo.full_name).await {
                        Ok(detail) if detail.can_push => Access::Granted(repo),
                        Ok(_) => {
                            warn!(repo = %repo.full_name, "no push access");
                            Access::Denied(MutationOutcome::rejected(
                                repo.name,
                                ErrorKind::AccessDenied,
                                "No push access",
                            ))
                        }
                        Err(e) => {
                            warn!(repo = %repo.full_name, error = %e, "verification failed");
                            Access::Denied(MutationOutcome::rejected(
                                repo.name,
                                ErrorKind::Verification,
                                format!("Verification failed: {e}"),
                            ))
                        }
                    }
                }
            })
            .await;

        let mut seen = vec![false; names.len()];
        let mut accessible = Vec::new();
        let mut denied = Vec::new();
        for (index, result) in results {
            if let Some(flag) = seen.get_mut(index) {
                *flag = true;
            }
            match result {
                Some(Access::Granted(repo)) => accessible.push((index, repo)),
                Some(Access::Denied(outcome)) => denied.push(outcome),
                None => denied.push(MutationOutcome::rejected(
                    names.get(index).cloned().unwrap_or_default(),
                    ErrorKind::Verification,
                    "Verification failed: lookup panicked",
                )),
            }
        }
        for (name, _) in names.iter().zip(&seen).filter(|(_, seen)| !**seen) {
            denied.push(MutationOutcome::rejected(
                name.clone(),
                ErrorKind::Verification,
                "Verification failed: lookup did not complete",
            ));
        }

        accessible.sort_by_key(|(index, _)| *index);
        (accessible.into_iter().map(|(_, repo)| repo).collect(), denied)
    }

    async fn mutate_all(&self, repos: Vec<RepositoryDescriptor>) -> Vec<MutationOutcome> {
        let names: Vec<String> = repos.iter().map(|r| r.name.clone()).collect();
        let mutator = Arc::clone(&self.mutator);

        let results = self
            .pool
            .run("deploying", repos, move |repo| {
                let mutator = Arc::clone(&mutator);
                async move {
                    let name = repo.name.clone();
                    match tokio::task::spawn_blocking(move || mutator.mutate(&repo)).await {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            let message = if e.is_panic() {
                                panic_message(e.into_panic())
                            } else {
                                e.to_string()
                            };
                            error!(repo = %name, error = %message, "mutation aborted");
                            MutationOutcome::rejected(name, ErrorKind::Internal, message)
                        }
                    }
                }
            })
            .await;

        let mut slots: Vec<Option<MutationOutcome>> = vec![None; names.len()];
        for (index, outcome) in results {
            if let (Some(slot), Some(outcome)) = (slots.get_mut(index), outcome) {
                *slot = Some(outcome);
            }
        }

        names
            .into_iter()
            .zip(slots)
            .map(|(name, slot)| {
                slot.unwrap_or_else(|| {
                    error!(repo = %name, "mutation produced no outcome");
                    MutationOutcome::rejected(name, ErrorKind::Internal, "mutation produced no outcome")
                })
            })
            .collect()
    }
}
