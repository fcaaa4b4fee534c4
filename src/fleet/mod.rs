// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fleet pipeline.
//!
//! ```text
//! candidates --> selector (lineage, pool) --> audit files
//!                    |
//!                    v kept
//!               processor: verify push access (pool)
//!                    |
//!                    v accessible
//!               mutator x N (pool, blocking) --push--> PushGate
//!                    |
//!                    v outcomes
//!               stats --> summary report
//! ```

pub mod audit;
pub mod lineage;
pub mod mutator;
pub mod outcome;
pub mod placement;
pub mod pool;
pub mod processor;
pub mod selector;
pub mod stats;

#[cfg(test)]
mod test_utils;
