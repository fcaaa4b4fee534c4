// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                    FleetError (16 bytes)
//!                         |
//!   +--------+--------+---+-----+---------+--------+
//!   |        |        |         |         |        |
//!   v        v        v         v         v        v
//!  Git      Net      Cfg    Placement  Process    Io
//!  Box      Box      Box       Box       Box      Box
//!
//! Sub-errors (unboxed internally):
//!   Git       Gix, CommandFailed, CloneFailed, CheckoutFailed, PushFailed
//!   Network   Reqwest, HttpError, Timeout, Decode
//!   Config    ParseError, MissingKey, InvalidValue
//!   Placement SourceMissing, EmptyTarget, AbsoluteTarget, Traversal, Escapes
//!   Process   ExecutableNotFound, SpawnFailed
//!
//! All variants boxed => FleetError is a tagged pointer.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`FleetError`].
pub type FleetResult<T> = std::result::Result<T, FleetError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum small on the stack.
#[derive(Debug, Error)]
pub enum FleetError {
    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Remote API operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// File placement rejected during validation or while writing.
    #[error("placement error: {0}")]
    Placement(#[from] Box<PlacementError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

impl FleetError {
    /// Whether retrying the failed remote call may succeed.
    ///
    /// Only network errors are ever transient; everything else is permanent.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(err) => err.is_transient(),
            _ => false,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for FleetError {
                fn from(err: $error) -> Self {
                    FleetError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    NetworkError => Network,
    ConfigError => Config,
    PlacementError => Placement,
    ProcessError => Process,
    std::io::Error => Io,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to discover repository from path.
    #[error("failed to discover repository: {0}")]
    Discover(#[from] Box<gix::discover::Error>),

    /// Repository has no worktree (bare repository).
    #[error("repository has no worktree (bare repository)")]
    BareRepository,
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// Clone operation failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    /// Checkout operation failed.
    #[error("failed to checkout {what}: {message}")]
    CheckoutFailed { what: String, message: String },

    /// Push operation failed.
    #[error("failed to push {branch}: {message}")]
    PushFailed { branch: String, message: String },
}

// --- Network Errors ---

/// Remote API errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError {
        status: u16,
        url: String,
        /// The server reported an exhausted rate limit.
        rate_limited: bool,
    },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Request timed out.
    #[error("connection timeout: {url}")]
    Timeout { url: String },

    /// Response body did not match the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl NetworkError {
    /// Whether the failure is worth retrying.
    ///
    /// Transport failures, 5xx, 429 and rate-limited 403 responses are
    /// transient. Other client errors and undecodable bodies are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpError {
                status,
                rate_limited,
                ..
            } => *status >= 500 || *status == 429 || (*status == 403 && *rate_limited),
            Self::Reqwest(err) => !err.is_decode() && !err.is_builder(),
            Self::Timeout { .. } => true,
            Self::Decode { .. } => false,
        }
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("failed to parse config '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Placement Errors ---

/// Rejected file placements.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// Source file does not exist or is not a regular file.
    #[error("source file not found: {0}")]
    SourceMissing(String),

    /// Target directory is empty.
    #[error("target directory cannot be empty (source {0})")]
    EmptyTarget(String),

    /// Target directory is an absolute path.
    #[error("target directory must be relative: {0}")]
    AbsoluteTarget(String),

    /// Target directory contains a `..` segment.
    #[error("target directory cannot contain parent directory references (..): {0}")]
    Traversal(String),

    /// Resolved destination lies outside the working tree.
    #[error("destination {path} escapes the repository root")]
    Escapes { path: String },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests;
