// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::time::Duration;

use super::FleetStatistics;
use crate::fleet::outcome::{ErrorKind, MutationOutcome};

fn succeeded(name: &str, attempts: u32, millis: u64) -> MutationOutcome {
    let mut outcome = MutationOutcome::rejected(name, ErrorKind::Internal, "");
    outcome.success = true;
    outcome.error = None;
    outcome.attempts = attempts;
    outcome.duration = Duration::from_millis(millis);
    outcome
}

fn failed(name: &str, kind: ErrorKind, attempts: u32, millis: u64) -> MutationOutcome {
    let mut outcome = MutationOutcome::rejected(name, kind, "boom");
    outcome.attempts = attempts;
    outcome.duration = Duration::from_millis(millis);
    outcome
}

#[test]
fn test_counts_add_up() {
    let outcomes = vec![
        succeeded("a", 1, 1200),
        succeeded("b", 3, 2500),
        failed("c", ErrorKind::Push, 3, 4000),
        failed("d", ErrorKind::AccessDenied, 0, 0),
        failed("e", ErrorKind::Push, 2, 300),
    ];
    let stats = FleetStatistics::from_outcomes(&outcomes);

    assert_eq!(stats.total, 5);
    assert_eq!(stats.successful + stats.failed, stats.total);
    assert_eq!(stats.successful, 2);
    assert_eq!(stats.total_retries, 2 + 2 + 1);
    assert_eq!(stats.total_duration, Duration::from_millis(8000));
    assert_eq!(stats.errors.get(&ErrorKind::Push), Some(&2));
    assert_eq!(stats.errors.get(&ErrorKind::AccessDenied), Some(&1));
}

#[test]
fn test_render_with_failures() {
    let outcomes = vec![
        succeeded("a", 2, 1500),
        failed("b", ErrorKind::Clone, 3, 1000),
        failed("c", ErrorKind::AccessDenied, 0, 0),
    ];
    insta::assert_snapshot!(FleetStatistics::from_outcomes(&outcomes).render(), @r"
    Processing Statistics:
    Total Repositories: 3
    Successful: 1
    Failed: 2
    Total Duration: 2.50 seconds
    Total Retries: 3

    Error Summary:
      clone failed: 1
      access denied: 1
    ");
}

#[test]
fn test_render_without_failures() {
    let stats = FleetStatistics::from_outcomes(&[succeeded("a", 1, 10)]);
    let report = stats.render();
    assert!(!report.contains("Error Summary"));
    assert!(report.contains("Total Duration: 0.01 seconds"));
}

#[test]
fn test_empty_outcomes() {
    let stats = FleetStatistics::from_outcomes(&[]);
    assert_eq!(stats, FleetStatistics::default());
}
