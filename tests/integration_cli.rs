// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use std::path::PathBuf;

use clap::Parser;
use fleet_deploy::cli::{Cli, Command};

// =============================================================================
// Simple Commands
// =============================================================================

#[test]
fn cli_version_alias() {
    let cli = Cli::try_parse_from(["fleet", "-v"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn cli_configs_command() {
    let cli = Cli::try_parse_from(["fleet", "--config", "course.toml", "configs"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Configs)));
    assert_eq!(cli.global.configs, vec![PathBuf::from("course.toml")]);
}

// =============================================================================
// Deploy Command
// =============================================================================

#[test]
fn cli_deploy_without_files_uses_config() {
    let cli = Cli::try_parse_from(["fleet", "--org", "IFT2245", "deploy"]).unwrap();
    let Some(Command::Deploy(args)) = cli.command else {
        panic!("expected deploy");
    };
    assert!(args.files.is_empty());
    assert!(args.message.is_none());
    assert!(!args.yes);
}

#[test]
fn cli_deploy_target_with_colon_in_source() {
    // The last colon separates source and target.
    let cli = Cli::try_parse_from(["fleet", "deploy", "--file", "C:/course/README.md:docs"]).unwrap();
    let Some(Command::Deploy(args)) = cli.command else {
        panic!("expected deploy");
    };
    assert_eq!(args.files[0].source, PathBuf::from("C:/course/README.md"));
    assert_eq!(args.files[0].target, "docs");
}

#[test]
fn cli_deploy_token_flag() {
    let cli = Cli::try_parse_from(["fleet", "deploy", "--github-token", "abc", "-y"]).unwrap();
    let Some(Command::Deploy(args)) = cli.command else {
        panic!("expected deploy");
    };
    assert_eq!(args.github_token.as_deref(), Some("abc"));
    assert!(args.yes);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn cli_invalid_workers() {
    assert!(Cli::try_parse_from(["fleet", "--workers", "many", "deploy"]).is_err());
}

#[test]
fn cli_unknown_command() {
    assert!(Cli::try_parse_from(["fleet", "build"]).is_err());
}

#[test]
fn cli_file_without_target() {
    assert!(Cli::try_parse_from(["fleet", "deploy", "--file", ":docs"]).is_err());
}
