// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP client construction and retry with exponential backoff.
//!
//! ```text
//! build_client(timeout)
//!   User-Agent fleet-deploy/VERSION, per-request timeout, pooled
//!
//! RetryPolicy { attempts, base }
//!   run(op) --> op() --Ok--> value
//!                 |
//!                 +--Err(transient), attempts left--> sleep(base * 2^n) --> op()
//!                 +--Err(permanent) or exhausted----> error
//! ```


use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::warn;

use crate::error::{FleetResult, NetworkError};

/// User-Agent sent with every API request.
#[must_use]
pub fn user_agent() -> String {
    format!("fleet-deploy/{}", env!("CARGO_PKG_VERSION"))
}

/// Build an HTTP client with the crate User-Agent and a per-request timeout.
///
/// # Errors
///
/// Returns `NetworkError::Reqwest` if the TLS backend cannot be initialized.
pub fn build_client(timeout: Duration) -> FleetResult<Client> {
    Client::builder()
        .user_agent(user_agent())
        .timeout(timeout)
        .build()
        .map_err(|e| NetworkError::Reqwest(e).into())
}

/// Map a transport-level reqwest failure, keeping timeouts distinguishable.
#[must_use]
pub fn transport_error(err: reqwest::Error, url: &str) -> NetworkError {
    if err.is_timeout() {
        NetworkError::Timeout {
            url: url.to_string(),
        }
    } else {
        NetworkError::Reqwest(err)
    }
}

/// Bounded retry with a doubling delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    base: Duration,
}

impl RetryPolicy {
    /// Create a policy. An attempt count of zero is treated as one.
    #[must_use]
    pub const fn new(attempts: u32, base: Duration) -> Self {
        Self {
            attempts: if attempts == 0 { 1 } else { attempts },
            base,
        }
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay after the failed attempt with zero-based index `attempt_index`.
    ///
    /// `base * 2^attempt_index`, saturating.
    #[must_use]
    pub fn delay(&self, attempt_index: u32) -> Duration {
        self.base
            .saturating_mul(2_u32.saturating_pow(attempt_index))
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// Only errors whose [`is_transient`](crate::error::FleetError::is_transient)
    /// is true are retried. No delay follows the final attempt.
    ///
    /// # Errors
    ///
    /// Returns the last error produced by `op`.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> FleetResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FleetResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt + 1 < self.attempts => {
                    let delay = self.delay(attempt);
                    attempt += 1;
                    warn!(
                        what,
                        attempt,
                        max = self.attempts,
                        ?delay,
                        error = %err,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
