// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mutate, commit and push one repository with bounded retries.
//!
//! ```text
//! attempt n (fresh TempDir under the work root)
//!   CLONE --> CHECKOUT --> PLACE_FILES --> DETECT_CHANGES
//!                                            |        |
//!                                          clean    dirty
//!                                            |        v
//!                                        Unchanged  STAGE --> COMMIT --> PUSH (PushGate)
//!                                                                          |
//!                                                                     Pushed{commit}
//!   any step fails --> TempDir dropped --> retryable and n < max?
//!                                           yes: sleep(base * 2^(n-1)), attempt n+1
//!                                           no:  failed outcome
//! ```
//!
//! Runs synchronously; the processor calls it from the blocking pool.


use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use bon::Builder;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::FleetError;
use crate::fleet::outcome::{ErrorKind, MutationOutcome, OutcomeError};
use crate::fleet::placement::FilePlacement;
use crate::git::VersionControl;
use crate::github::RepositoryDescriptor;
use crate::net::RetryPolicy;

/// Appended to every commit message.
pub const COMMIT_MARKER: &str = "!33+";

/// Serializes pushes across all workers.
#[derive(Debug, Clone, Default)]
pub struct PushGate(Arc<Mutex<()>>);

impl PushGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the gate. A poisoned gate is still usable.
    pub fn with_lock<T>(&self, f: impl FnOnce() -> T) -> T {
        let _guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}

/// A failed step within one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepError {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl StepError {
    fn from_error(kind: ErrorKind, err: &FleetError) -> Self {
        Self {
            kind,
            message: err.to_string(),
            retryable: !matches!(err, FleetError::Placement(_)),
        }
    }
}

/// What a single attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    Pushed { commit: String },
    Unchanged,
    Failed(StepError),
}

/// Settings shared by every mutation of a run.
#[derive(Debug, Clone, Builder)]
pub struct MutatorSettings {
    /// Commit message before the marker is appended.
    #[builder(into)]
    pub commit_message: String,
    #[builder(default = 3)]
    pub max_attempts: u32,
    #[builder(default = Duration::from_secs(1))]
    pub retry_base: Duration,
    /// Directory receiving attempt-scoped clones.
    #[builder(into)]
    pub work_root: PathBuf,
}

impl MutatorSettings {
    /// `"{commit_message}, !33+"`.
    #[must_use]
    pub fn full_commit_message(&self) -> String {
        format!("{}, {COMMIT_MARKER}", self.commit_message)
    }
}

/// Deploys the placements into one repository at a time.
pub struct RepositoryMutator<V> {
    vcs: V,
    placements: Arc<[FilePlacement]>,
    settings: MutatorSettings,
    gate: PushGate,
}

impl<V: VersionControl> RepositoryMutator<V> {
    #[must_use]
    pub fn new(
        vcs: V,
        placements: impl Into<Arc<[FilePlacement]>>,
        settings: MutatorSettings,
        gate: PushGate,
    ) -> Self {
        Self {
            vcs,
            placements: placements.into(),
            settings,
            gate,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &MutatorSettings {
        &self.settings
    }

    #[must_use]
    pub const fn vcs(&self) -> &V {
        &self.vcs
    }

    /// Run the attempt loop for `repo`.
    ///
    /// Never panics on step failures; every failure ends up in the outcome.
    pub fn mutate(&self, repo: &RepositoryDescriptor) -> MutationOutcome {
        let started_at = Utc::now();
        let clock = Instant::now();
        let retry = RetryPolicy::new(self.settings.max_attempts, self.settings.retry_base);
        let max = retry.attempts();

        let mut attempts = 0;
        let mut written = Vec::new();
        let mut last_error = None;
        let mut commit_id = None;

        while attempts < max {
            attempts += 1;
            match self.attempt(repo, &mut written) {
                AttemptResult::Pushed { commit } => {
                    info!(repo = %repo.name, attempt = attempts, %commit, "changes pushed");
                    commit_id = Some(commit);
                    last_error = None;
                    break;
                }
                AttemptResult::Unchanged => {
                    info!(repo = %repo.name, attempt = attempts, "no changes to commit");
                    last_error = None;
                    break;
                }
                AttemptResult::Failed(err) => {
                    warn!(
                        repo = %repo.name,
                        attempt = attempts,
                        max,
                        kind = %err.kind,
                        error = %err.message,
                        "attempt {attempts}/{max} failed"
                    );
                    let again = err.retryable && attempts < max;
                    last_error = Some(err);
                    if !again {
                        break;
                    }
                    let delay = retry.delay(attempts - 1);
                    debug!(repo = %repo.name, ?delay, "backing off before retry");
                    std::thread::sleep(delay);
                }
            }
        }

        MutationOutcome {
            repo_name: repo.name.clone(),
            success: last_error.is_none(),
            error: last_error.map(|e| OutcomeError {
                kind: e.kind,
                message: e.message,
            }),
            started_at,
            finished_at: Utc::now(),
            duration: clock.elapsed(),
            commit_id,
            attempts,
            files_written: written,
        }
    }

    /// One full attempt in a fresh directory, removed on return.
    pub fn attempt(&self, repo: &RepositoryDescriptor, written: &mut Vec<String>) -> AttemptResult {
        written.clear();
        self.try_attempt(repo, written)
            .unwrap_or_else(AttemptResult::Failed)
    }

    fn try_attempt(
        &self,
        repo: &RepositoryDescriptor,
        written: &mut Vec<String>,
    ) -> Result<AttemptResult, StepError> {
        let workdir = tempfile::Builder::new()
            .prefix(&format!("{}-", sanitize(&repo.name)))
            .tempdir_in(&self.settings.work_root)
            .map_err(|e| StepError::from_error(ErrorKind::Clone, &FleetError::from(e)))?;
        let root = workdir.path().join("repo");

        self.vcs
            .clone_repo(&repo.clone_url, &root)
            .map_err(|e| StepError::from_error(ErrorKind::Clone, &e))?;
        self.vcs
            .checkout(&root, &repo.default_branch)
            .map_err(|e| StepError::from_error(ErrorKind::Checkout, &e))?;

        self.place_all(&root, written)?;

        let dirty = self
            .vcs
            .is_dirty(&root, true)
            .map_err(|e| StepError::from_error(ErrorKind::Status, &e))?;
        if !dirty {
            return Ok(AttemptResult::Unchanged);
        }

        self.vcs
            .stage(&root, written)
            .map_err(|e| StepError::from_error(ErrorKind::Stage, &e))?;
        let commit = self
            .vcs
            .commit(&root, &self.settings.full_commit_message())
            .map_err(|e| StepError::from_error(ErrorKind::Commit, &e))?;
        self.gate
            .with_lock(|| self.vcs.push(&root, &repo.default_branch))
            .map_err(|e| StepError::from_error(ErrorKind::Push, &e))?;

        Ok(AttemptResult::Pushed { commit })
    }

    fn place_all(&self, root: &Path, written: &mut Vec<String>) -> Result<(), StepError> {
        for placement in self.placements.iter() {
            let relative = placement
                .place(root)
                .map_err(|e| StepError::from_error(ErrorKind::Placement, &e))?;
            written.push(relative);
        }
        Ok(())
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
