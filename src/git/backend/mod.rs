// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! VersionControl (per-repository capability)
//!   clone_repo / checkout / stage / commit / push --> ShellBackend (git CLI)
//!   is_dirty                                      --> GixBackend  (gix)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use bon::Builder;

use crate::error::{FleetResult, GitError, GixError, ProcessError};

/// Version-control capability used by the repository mutator.
pub trait VersionControl: Send + Sync {
    /// Clone `url` into `dest`, which must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CloneFailed` if the transfer fails.
    fn clone_repo(&self, url: &str, dest: &Path) -> FleetResult<()>;

    /// Check out `branch` in the clone at `repo`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CheckoutFailed` if the branch cannot be checked out.
    fn checkout(&self, repo: &Path, branch: &str) -> FleetResult<()>;

    /// Whether the working tree differs from HEAD.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the status cannot be computed.
    fn is_dirty(&self, repo: &Path, include_untracked: bool) -> FleetResult<bool>;

    /// Stage exactly `paths` (repository-relative).
    ///
    /// # Errors
    ///
    /// Returns `GitError::CommandFailed` if staging fails.
    fn stage(&self, repo: &Path, paths: &[String]) -> FleetResult<()>;

    /// Commit the index and return the new commit id.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CommandFailed` if the commit fails.
    fn commit(&self, repo: &Path, message: &str) -> FleetResult<String>;

    /// Push `branch` to the clone's origin.
    ///
    /// # Errors
    ///
    /// Returns `GitError::PushFailed` if the push is rejected or the transfer fails.
    fn push(&self, repo: &Path, branch: &str) -> FleetResult<()>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Provides read-only status checks without spawning subprocesses.
pub struct GixBackend;

impl GixBackend {
    /// Check for staged, unstaged, and optionally untracked changes.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or the status walk fails.
    pub fn has_uncommitted_changes(path: &Path, include_untracked: bool) -> FleetResult<bool> {
        use gix::status::UntrackedFiles;

        let repo =
            gix::discover(path).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))?;
        if repo.workdir().is_none() {
            return Err(GitError::Gix(GixError::BareRepository).into());
        }

        let untracked = if include_untracked {
            UntrackedFiles::Files
        } else {
            UntrackedFiles::None
        };

        let has_changes = repo
            .status(gix::progress::Discard)
            .map_err(|e| GitError::CommandFailed {
                command: "status".to_string(),
                message: format!("failed to prepare status check: {e}"),
            })?
            .untracked_files(untracked)
            .into_iter(None)
            .map_err(|e| GitError::CommandFailed {
                command: "status".to_string(),
                message: format!("failed to check repository status: {e}"),
            })?
            .next()
            .is_some();

        Ok(has_changes)
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using the git CLI.
///
/// Clone and push carry a low-speed abort so a stalled transfer fails
/// instead of hanging. Commits use the configured author identity.
#[derive(Clone, Builder)]
pub struct ShellBackend {
    /// Resolved git executable.
    #[builder(into)]
    git: PathBuf,
    #[builder(into)]
    author_name: String,
    #[builder(into)]
    author_email: String,
    /// Token injected into `https://` clone URLs.
    #[builder(into)]
    token: Option<String>,
    /// Seconds below 1 byte/s before a transfer is aborted.
    #[builder(default = 10)]
    low_speed_time: u64,
}

impl fmt::Debug for ShellBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellBackend")
            .field("git", &self.git)
            .field("author_name", &self.author_name)
            .field("author_email", &self.author_email)
            .field("token", &self.token.as_ref().map(|_| "[hidden]"))
            .field("low_speed_time", &self.low_speed_time)
            .finish()
    }
}

impl ShellBackend {
    /// Locate git on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if git is not installed.
    pub fn locate_git() -> FleetResult<PathBuf> {
        which::which("git").map_err(|_| {
            ProcessError::ExecutableNotFound {
                name: "git".to_string(),
            }
            .into()
        })
    }

    /// Clone URL with the token embedded as `x-access-token` credentials.
    ///
    /// Non-https URLs and runs without a token are returned unchanged.
    #[must_use]
    pub fn authenticated_url(&self, url: &str) -> String {
        match (&self.token, url.strip_prefix("https://")) {
            (Some(token), Some(rest)) if !token.is_empty() => {
                format!("https://x-access-token:{token}@{rest}")
            }
            _ => url.to_string(),
        }
    }

    /// Replace every occurrence of the token with `***`.
    #[must_use]
    pub fn redact(&self, text: &str) -> String {
        match &self.token {
            Some(token) if !token.is_empty() => text.replace(token.as_str(), "***"),
            _ => text.to_string(),
        }
    }

    fn transfer_flags(&self) -> [String; 4] {
        [
            "-c".to_string(),
            "http.lowSpeedLimit=1".to_string(),
            "-c".to_string(),
            format!("http.lowSpeedTime={}", self.low_speed_time),
        ]
    }

    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    ///
    /// The token never appears in the returned error.
    pub(crate) fn git_command<S: AsRef<str>>(&self, args: &[S], cwd: &Path) -> FleetResult<String> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let output = Command::new(&self.git)
            .args(&args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| ProcessError::SpawnFailed {
                command: "git".to_string(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: self.redact(&format!("git {}", args.join(" "))),
                message: self.redact(String::from_utf8_lossy(&output.stderr).trim()),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn failure_message(&self, err: &crate::error::FleetError) -> String {
        match err {
            crate::error::FleetError::Git(git) => match git.as_ref() {
                GitError::CommandFailed { message, .. } => message.clone(),
                other => self.redact(&other.to_string()),
            },
            other => self.redact(&other.to_string()),
        }
    }
}

impl VersionControl for ShellBackend {
    fn clone_repo(&self, url: &str, dest: &Path) -> FleetResult<()> {
        let dest_str = dest.to_str().ok_or_else(|| GitError::CloneFailed {
            url: url.to_string(),
            message: "invalid destination path".to_string(),
        })?;
        let remote = self.authenticated_url(url);

        let mut args: Vec<String> = self.transfer_flags().into();
        args.extend(["clone", "--quiet", "--no-tags"].map(String::from));
        args.push(remote);
        args.push(dest_str.to_string());

        let parent = dest.parent().unwrap_or_else(|| Path::new("."));
        self.git_command(&args, parent).map_err(|e| GitError::CloneFailed {
            url: url.to_string(),
            message: self.failure_message(&e),
        })?;
        Ok(())
    }

    fn checkout(&self, repo: &Path, branch: &str) -> FleetResult<()> {
        self.git_command(
            &["-c", "advice.detachedHead=false", "checkout", "-q", branch],
            repo,
        )
        .map_err(|e| GitError::CheckoutFailed {
            what: branch.to_string(),
            message: self.failure_message(&e),
        })?;
        Ok(())
    }

    fn is_dirty(&self, repo: &Path, include_untracked: bool) -> FleetResult<bool> {
        GixBackend::has_uncommitted_changes(repo, include_untracked)
    }

    fn stage(&self, repo: &Path, paths: &[String]) -> FleetResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.git_command(&args, repo)?;
        Ok(())
    }

    fn commit(&self, repo: &Path, message: &str) -> FleetResult<String> {
        let name = format!("user.name={}", self.author_name);
        let email = format!("user.email={}", self.author_email);
        self.git_command(
            &[
                "-c",
                name.as_str(),
                "-c",
                email.as_str(),
                "commit",
                "--quiet",
                "--no-verify",
                "-m",
                message,
            ],
            repo,
        )?;
        self.git_command(&["rev-parse", "HEAD"], repo)
    }

    fn push(&self, repo: &Path, branch: &str) -> FleetResult<()> {
        let mut args: Vec<String> = self.transfer_flags().into();
        args.extend(["push", "--quiet", "origin"].map(String::from));
        args.push(format!("HEAD:refs/heads/{branch}"));

        self.git_command(&args, repo).map_err(|e| GitError::PushFailed {
            branch: branch.to_string(),
            message: self.failure_message(&e),
        })?;
        Ok(())
    }
}
