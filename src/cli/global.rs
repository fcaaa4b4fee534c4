// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE     ← Additional config files (can repeat)
//! --dry             ← Select and audit only, never mutate
//! --debug           ← Diagnostic mode (first marker match only)
//! --org / --prefix  ← github.org / cohort.prefix
//! --workers N       ← run.workers
//! --max-attempts N  ← run.max_attempts
//! --log-level N     ← Console verbosity (0-6)
//!
//! Precedence: CLI flags > FLEET_* env > --config > fleet.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Selects and audits the cohort without cloning or pushing anything.
    #[arg(long)]
    pub dry: bool,

    /// Diagnostic mode: listing stops at the first marker match.
    #[arg(long)]
    pub debug: bool,

    /// Organization owning the repositories.
    #[arg(long, value_name = "ORG")]
    pub org: Option<String>,

    /// Cohort name prefix (`{prefix}-...`).
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Worker pool size.
    #[arg(short = 'j', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Attempts per repository before giving up.
    #[arg(long = "max-attempts", value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}
