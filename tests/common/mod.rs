// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Helpers shared by integration tests that need real git repositories.

#![allow(dead_code, unreachable_pub)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use fleet_deploy::git::ShellBackend;

pub fn git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Bare repository with a single commit on `main`, standing in for a remote.
pub fn seeded_remote(root: &Path, name: &str) -> PathBuf {
    let seed = root.join(format!("{name}-seed"));
    fs::create_dir_all(&seed).unwrap();
    git(&["init", "--quiet", "-b", "main"], &seed);
    fs::write(seed.join("main.c"), "int main(void) { return 0; }\n").unwrap();
    git(&["add", "main.c"], &seed);
    git(&["commit", "--quiet", "-m", "initial"], &seed);

    let bare = root.join(format!("{name}.git"));
    git(
        &[
            "clone",
            "--quiet",
            "--bare",
            seed.to_str().unwrap(),
            bare.to_str().unwrap(),
        ],
        root,
    );
    bare
}

/// Files tracked on `main` of a bare repository.
pub fn tracked_files(bare: &Path) -> Vec<String> {
    git(&["ls-tree", "-r", "--name-only", "main"], bare)
        .lines()
        .map(ToString::to_string)
        .collect()
}

pub fn commit_count(bare: &Path) -> usize {
    git(&["rev-list", "--count", "main"], bare).parse().unwrap()
}

pub fn head_subject(bare: &Path) -> String {
    git(&["log", "-1", "--format=%s", "main"], bare)
}

pub fn backend() -> ShellBackend {
    ShellBackend::builder()
        .git(ShellBackend::locate_git().expect("git must be installed"))
        .author_name("fleet-deploy")
        .author_email("fleet-deploy@example.com")
        .build()
}
