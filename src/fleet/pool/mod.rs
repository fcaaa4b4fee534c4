// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bounded worker pool shared by the selector and the processor.
//!
//! ```text
//! WorkerPool::new(workers)
//!   .run("label", items, work)
//!       items[i] --spawn--> JoinSet task --acquire permit--> work(item)
//!                                                  |
//!       (i, Some(value)) <-- join_next -----------+   completion order
//!       (i, None)        <-- worker panicked
//! ```
//!
//! Units that are lost entirely (the task itself aborted) do not appear in
//! the result; callers treat absent indices as lost.


use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, OnceLock};

use futures_util::FutureExt;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error};

fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} {msg:<12} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        })
        .clone()
}

/// Bounded-concurrency executor.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    workers: usize,
    show_progress: bool,
}

impl WorkerPool {
    /// Create a pool running at most `workers` units at once (minimum 1).
    #[must_use]
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(workers)),
            workers,
            show_progress: true,
        }
    }

    /// Enable or disable the progress bar.
    #[must_use]
    pub const fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    fn progress_bar(&self, label: &str, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(total as u64);
        bar.set_style(bar_style());
        bar.set_message(label.to_string());
        bar
    }

    /// Run `work` once per item and return `(index, result)` pairs in
    /// completion order.
    ///
    /// A unit that panics yields `(index, None)`; the panic is logged and the
    /// remaining units are unaffected.
    pub async fn run<I, T, F, Fut>(&self, label: &str, items: Vec<I>, work: F) -> Vec<(usize, Option<T>)>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let total = items.len();
        if total == 0 {
            return Vec::new();
        }
        debug!(label, total, workers = self.workers, "dispatching work units");

        let work = Arc::new(work);
        let mut set = JoinSet::new();
        for (index, item) in items.into_iter().enumerate() {
            let semaphore = Arc::clone(&self.semaphore);
            let work = Arc::clone(&work);
            set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = AssertUnwindSafe(async move { work(item).await })
                    .catch_unwind()
                    .await;
                (index, result.map_err(panic_message))
            });
        }

        let bar = self.progress_bar(label, total);
        let mut completed = Vec::with_capacity(total);
        while let Some(joined) = set.join_next().await {
            bar.inc(1);
            match joined {
                Ok((index, Ok(value))) => completed.push((index, Some(value))),
                Ok((index, Err(message))) => {
                    error!(label, index, panic = %message, "work unit panicked");
                    completed.push((index, None));
                }
                Err(e) => error!(label, error = %e, "work unit lost"),
            }
        }
        bar.finish_and_clear();

        completed
    }
}

/// Extract a readable message from a panic payload.
#[must_use]
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
