// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!          RepositoryMutator
//!                 |
//!                 v
//!      ,----------------------,
//!      | VersionControl trait |
//!      '--+----------------+--'
//!         |                |
//!         v                v
//!    GixBackend       ShellBackend
//!   (gix, read)       (git CLI, write)
//!   .is_dirty         .clone_repo  .checkout
//!                     .stage .commit .push
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`ShellBackend`**: git CLI for transport, credentials and writes.

pub mod backend;

pub use backend::{GixBackend, ShellBackend, VersionControl};
