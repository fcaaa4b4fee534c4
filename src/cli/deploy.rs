// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI arguments for the `deploy` command.
//!
//! ```text
//! USAGE:
//! $ fleet --org acme --prefix tp1 deploy --file README.md:. --file ci.yml:.github/workflows
//! $ fleet --dry deploy                      (files from fleet.toml)
//! $ GITHUB_TOKEN=... fleet deploy --yes
//! ```

use clap::Args;

use crate::config::types::FileSpec;

/// Arguments for the `deploy` command.
#[derive(Debug, Clone, Default, Args)]
pub struct DeployArgs {
    /// File to deploy as `SOURCE:TARGET_DIR`. Replaces `deploy.files` when given.
    #[arg(short = 'f', long = "file", value_name = "SRC:DIR", action = clap::ArgAction::Append)]
    pub files: Vec<FileSpec>,

    /// Commit message; the marker is appended.
    #[arg(short = 'm', long, value_name = "MSG")]
    pub message: Option<String>,

    /// Skips the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// GitHub API token.
    #[arg(long = "github-token", value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,
}
