// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Aggregate statistics over a run's outcomes.

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use crate::fleet::outcome::{ErrorKind, MutationOutcome};

/// Totals derived from a set of outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetStatistics {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Sum of per-repository durations.
    pub total_duration: Duration,
    /// Attempts beyond the first, summed over outcomes.
    pub total_retries: u64,
    pub errors: BTreeMap<ErrorKind, usize>,
}

impl FleetStatistics {
    #[must_use]
    pub fn from_outcomes(outcomes: &[MutationOutcome]) -> Self {
        let mut stats = Self {
            total: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            if outcome.success {
                stats.successful += 1;
            } else {
                stats.failed += 1;
                let kind = outcome
                    .error
                    .as_ref()
                    .map_or(ErrorKind::Internal, |e| e.kind);
                *stats.errors.entry(kind).or_default() += 1;
            }
            stats.total_duration += outcome.duration;
            stats.total_retries += u64::from(outcome.attempts.saturating_sub(1));
        }
        stats
    }

    /// Textual report. The error section appears only when something failed.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Processing Statistics:");
        let _ = writeln!(out, "Total Repositories: {}", self.total);
        let _ = writeln!(out, "Successful: {}", self.successful);
        let _ = writeln!(out, "Failed: {}", self.failed);
        let _ = writeln!(
            out,
            "Total Duration: {:.2} seconds",
            self.total_duration.as_secs_f64()
        );
        let _ = writeln!(out, "Total Retries: {}", self.total_retries);

        if self.failed > 0 {
            let _ = writeln!(out, "\nError Summary:");
            for (kind, count) in &self.errors {
                let _ = writeln!(out, "  {kind}: {count}");
            }
        }
        out
    }
}
