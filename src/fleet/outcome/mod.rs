// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-repository results.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Failure category attached where the failure happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    Clone,
    Checkout,
    Placement,
    Status,
    Stage,
    Commit,
    Push,
    AccessDenied,
    Verification,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Clone => "clone failed",
            Self::Checkout => "checkout failed",
            Self::Placement => "file placement failed",
            Self::Status => "status check failed",
            Self::Stage => "staging failed",
            Self::Commit => "commit failed",
            Self::Push => "push failed",
            Self::AccessDenied => "access denied",
            Self::Verification => "verification failed",
            Self::Internal => "internal error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error recorded on a failed outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeError {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for OutcomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Result of deploying to one repository.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub repo_name: String,
    pub success: bool,
    pub error: Option<OutcomeError>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration: Duration,
    /// Set only when a commit was pushed.
    pub commit_id: Option<String>,
    pub attempts: u32,
    /// Repository-relative paths written by the final attempt.
    pub files_written: Vec<String>,
}

impl MutationOutcome {
    /// A failure recorded before any mutation attempt ran.
    #[must_use]
    pub fn rejected(repo_name: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            repo_name: repo_name.into(),
            success: false,
            error: Some(OutcomeError {
                kind,
                message: message.into(),
            }),
            started_at: now,
            finished_at: now,
            duration: Duration::ZERO,
            commit_id: None,
            attempts: 0,
            files_written: Vec::new(),
        }
    }

    /// Whether a commit was pushed.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.commit_id.is_some()
    }
}
