// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared test doubles for fleet tests.
//!
//! Provides an in-memory detail source, a scripted version-control backend
//! and log capture.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::error::{FleetResult, GitError, NetworkError};
use crate::git::VersionControl;
use crate::github::{DetailSource, RepositoryDescriptor, RepositoryDetail};

pub(crate) fn descriptor(name: &str) -> RepositoryDescriptor {
    RepositoryDescriptor::builder()
        .name(name)
        .full_name(format!("org/{name}"))
        .clone_url(format!("https://example.invalid/org/{name}.git"))
        .build()
}

pub(crate) fn fork_of(parent: &str, can_push: bool) -> RepositoryDetail {
    RepositoryDetail {
        fork: true,
        parent: Some(parent.to_string()),
        can_push,
    }
}

/// Detail lookups answered from a map; unknown names return HTTP 404.
#[derive(Default)]
pub(crate) struct FakeDirectory {
    details: HashMap<String, Result<RepositoryDetail, u16>>,
    lookups: AtomicU32,
}

impl FakeDirectory {
    pub(crate) fn with(mut self, full_name: &str, detail: RepositoryDetail) -> Self {
        self.details.insert(full_name.to_string(), Ok(detail));
        self
    }

    pub(crate) fn failing(mut self, full_name: &str, status: u16) -> Self {
        self.details.insert(full_name.to_string(), Err(status));
        self
    }

    pub(crate) fn lookups(&self) -> u32 {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl DetailSource for FakeDirectory {
    fn repository_detail<'a>(
        &'a self,
        full_name: &'a str,
    ) -> BoxFuture<'a, FleetResult<RepositoryDetail>> {
        Box::pin(async move {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            match self.details.get(full_name) {
                Some(Ok(detail)) => Ok(detail.clone()),
                Some(Err(status)) => Err(NetworkError::HttpError {
                    status: *status,
                    url: format!("https://api.test/repos/{full_name}"),
                    rate_limited: false,
                }
                .into()),
                None => Err(NetworkError::HttpError {
                    status: 404,
                    url: format!("https://api.test/repos/{full_name}"),
                    rate_limited: false,
                }
                .into()),
            }
        })
    }
}

/// Tracks how many callers are inside an operation and the highest count seen.
#[derive(Default)]
pub(crate) struct InFlight {
    current: AtomicU32,
    peak: AtomicU32,
}

impl InFlight {
    fn hold(&self, duration: Duration) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub(crate) fn peak(&self) -> u32 {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Version control that records calls and fails on demand.
#[derive(Default)]
pub(crate) struct ScriptedVcs {
    clone_failures: AtomicU32,
    dirty: bool,
    push_failures: AtomicU32,
    calls: Mutex<Vec<String>>,
    latency: Duration,
    clones: InFlight,
    pushes: InFlight,
}

impl ScriptedVcs {
    pub(crate) fn dirty() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }

    pub(crate) fn failing_clones(self, count: u32) -> Self {
        self.clone_failures.store(count, Ordering::SeqCst);
        self
    }

    pub(crate) fn failing_pushes(self, count: u32) -> Self {
        self.push_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Make every clone and push take `latency`.
    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) const fn clones(&self) -> &InFlight {
        &self.clones
    }

    pub(crate) const fn pushes(&self) -> &InFlight {
        &self.pushes
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub(crate) fn count(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(op)).count()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl VersionControl for ScriptedVcs {
    fn clone_repo(&self, url: &str, dest: &Path) -> FleetResult<()> {
        self.record(format!("clone {url}"));
        self.clones.hold(self.latency);
        if Self::take_failure(&self.clone_failures) {
            return Err(GitError::CloneFailed {
                url: url.to_string(),
                message: "connection reset".to_string(),
            }
            .into());
        }
        std::fs::create_dir_all(dest)?;
        Ok(())
    }

    fn checkout(&self, _repo: &Path, branch: &str) -> FleetResult<()> {
        self.record(format!("checkout {branch}"));
        Ok(())
    }

    fn is_dirty(&self, _repo: &Path, _include_untracked: bool) -> FleetResult<bool> {
        Ok(self.dirty)
    }

    fn stage(&self, _repo: &Path, paths: &[String]) -> FleetResult<()> {
        self.record(format!("stage {}", paths.join(" ")));
        Ok(())
    }

    fn commit(&self, _repo: &Path, message: &str) -> FleetResult<String> {
        self.record(format!("commit {message}"));
        Ok("0123456789abcdef0123456789abcdef01234567".to_string())
    }

    fn push(&self, _repo: &Path, branch: &str) -> FleetResult<()> {
        self.record(format!("push {branch}"));
        self.pushes.hold(self.latency);
        if Self::take_failure(&self.push_failures) {
            return Err(GitError::PushFailed {
                branch: branch.to_string(),
                message: "remote rejected".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[derive(Clone)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| std::io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct BufferMakeWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for BufferMakeWriter {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter {
            buffer: self.buffer.clone(),
        }
    }
}

/// Runs a future on the current thread while capturing tracing output.
///
/// Returns the future's value and the captured log text.
pub(crate) async fn run_with_logs<T, Fut>(fut: Fut) -> (T, String)
where
    Fut: std::future::Future<Output = T>,
{
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(BufferMakeWriter {
            buffer: buffer.clone(),
        })
        .with_max_level(Level::WARN)
        .with_ansi(false)
        .with_target(false)
        .finish();

    let dispatch = tracing::Dispatch::new(subscriber);
    let value = {
        use tracing::instrument::WithSubscriber;
        fut.with_subscriber(dispatch).await
    };

    let logs = buffer
        .lock()
        .map(|b| String::from_utf8_lossy(&b).to_string())
        .unwrap_or_default();
    (value, logs)
}
