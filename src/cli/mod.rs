// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for fleet-deploy using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! fleet [global options] <command>
//! version
//! options
//! configs
//! deploy [--file SRC:DIR]... [--message MSG] [--yes]
//! ```

pub mod deploy;
pub mod global;


use crate::cli::deploy::DeployArgs;
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Bulk file deployment across repository fleets.
#[derive(Debug, Parser)]
#[command(
    name = "fleet",
    author,
    version,
    about = "Bulk file deployment across repository fleets",
    long_about = "fleet-deploy Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Copies a fixed set of files into every repository of an\n\
                  organization that belongs to a cohort, then commits and pushes.\n\n\
                  Invoking `fleet --org acme --prefix tp1 --dry deploy` lists the\n\
                  cohort and writes the audit files without touching anything.",
    after_help = "CONFIG FILES:\n\n\
                  fleet looks for `fleet.toml` in the current directory. Additional\n\
                  files can be given with --config; later files override earlier ones.\n\
                  FLEET_* environment variables (FLEET_RUN__WORKERS=8) override files,\n\
                  and command-line flags override everything."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the configuration files in use.
    Configs,

    /// Deploys files into every repository of the cohort.
    Deploy(DeployArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
